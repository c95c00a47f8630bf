//! Enriched AST facade
//!
//! [`Cleast`] runs the whole pipeline eagerly: tree building, span
//! validation, scope resolution, dependency indexing, statement
//! classification, comment attachment and directive lookup. Construction
//! either fully succeeds or returns an error; no partial object is
//! observable.

use crate::comment::Comment;
use crate::directive::{section_at, Directive, DirectiveKind};
use crate::graph::DependencyGraph;
use crate::node::{EnrichedNode, NodeId};
use crate::raw::{NodeKind, RawNode};
use crate::scope::{ScopeResolver, SymbolTable, UnsafeStatement};
use crate::statement::{module_prefix, Classifier, Statement, StatementKind};
use crate::tree::Tree;
use crate::{Error, Result};
use std::collections::HashMap;

/// Clingo Enriched AST of one source file.
#[derive(Debug)]
pub struct Cleast {
    ast: Vec<RawNode>,
    file: Vec<String>,
    filename: String,
    src_dir: String,
    tree: Tree,
    tables: Vec<SymbolTable>,
    diagnostics: Vec<Option<UnsafeStatement>>,
    graph: DependencyGraph,
    statements: Vec<Statement>,
    comments: Vec<Comment>,
    directives: Vec<Directive>,
    /// `@var` directives by variable name
    variable_docs: HashMap<String, usize>,
    /// `@predicate` directives by `name/arity` or bare name
    predicate_docs: HashMap<String, usize>,
}

/// Something located on a source line
#[derive(Debug, Clone, Copy)]
pub enum LineItem<'a> {
    Statement(&'a Statement),
    Comment(&'a Comment),
    Directive(&'a Directive),
    Variable(&'a EnrichedNode),
}

impl Cleast {
    /// Enrich `ast_list`, the parser output for `file`.
    ///
    /// `filename` and `src_dir` are only used to tell local statements from
    /// included ones, to build module prefixes and to label diagnostics.
    pub fn new(
        ast_list: Vec<RawNode>,
        file: Vec<String>,
        filename: impl Into<String>,
        src_dir: impl Into<String>,
    ) -> Result<Self> {
        let filename = filename.into();
        let src_dir = src_dir.into();

        let mut tree = Tree::build(&ast_list)?;
        let origins: Vec<Option<String>> = ast_list
            .iter()
            .map(|raw| raw.location().and_then(|l| l.filename()).map(str::to_string))
            .collect();
        let local: Vec<bool> = origins
            .iter()
            .map(|origin| origin.as_deref().is_none_or(|o| o == filename))
            .collect();
        check_spans(&tree, &local, &file, &filename)?;

        let resolutions = ScopeResolver::new(&tree).resolve_all();
        let mut tables = Vec::with_capacity(resolutions.len());
        let mut diagnostics = Vec::with_capacity(resolutions.len());
        for resolution in resolutions {
            resolution.annotate(&mut tree);
            if let Some(diagnostic) = &resolution.diagnostic {
                tracing::warn!("{}: {}", filename, diagnostic);
            }
            tables.push(resolution.table);
            diagnostics.push(resolution.diagnostic);
        }

        let graph = DependencyGraph::build(&tree);
        let comments = Comment::extract(&file);
        let directives = Directive::extract(&comments);
        let mut variable_docs = HashMap::new();
        let mut predicate_docs = HashMap::new();
        for (index, directive) in directives.iter().enumerate() {
            let Some(subject) = directive.subject() else { continue };
            match directive.kind {
                DirectiveKind::Variable => variable_docs.insert(subject.to_string(), index),
                DirectiveKind::Predicate => predicate_docs.insert(subject.to_string(), index),
                DirectiveKind::Section => None,
            };
        }

        let mut classifier = Classifier::new();
        let mut statements = Vec::with_capacity(ast_list.len());
        for (index, raw) in ast_list.iter().enumerate() {
            let root = tree.roots()[index];
            let span = tree.node(root).span;
            let (kind, identifier) = classifier.classify(raw, &tree, &graph, index);
            let origin = origins[index].clone();
            let prefix = module_prefix(origin.as_deref().unwrap_or(&filename), &src_dir);
            let documented = local[index] && !span.is_origin();
            let attached = if documented {
                comments
                    .iter()
                    .enumerate()
                    .filter(|(i, c)| c.documents(span.start_line) && !directives.iter().any(|d| d.comment == *i))
                    .map(|(i, _)| i)
                    .collect()
            } else {
                Vec::new()
            };
            let section = documented
                .then(|| section_at(&directives, span.start_line))
                .flatten()
                .map(|d| directives[d].title().to_string());
            statements.push(Statement {
                index,
                root,
                kind,
                identifier,
                span,
                origin,
                local: local[index],
                prefix,
                section,
                comments: attached,
            });
        }

        tracing::debug!(
            filename = %filename,
            statements = statements.len(),
            comments = comments.len(),
            directives = directives.len(),
            unsafe_statements = diagnostics.iter().flatten().count(),
            "enriched AST"
        );

        Ok(Self {
            ast: ast_list,
            file,
            filename,
            src_dir,
            tree,
            tables,
            diagnostics,
            graph,
            statements,
            comments,
            directives,
            variable_docs,
            predicate_docs,
        })
    }

    /// Number of top-level statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Statements of one kind (all kinds when `None`), optionally only
    /// those parsed from the analyzed file
    pub fn statements_of_kind(&self, kind: Option<StatementKind>, local_only: bool) -> Vec<&Statement> {
        self.statements
            .iter()
            .filter(|s| !local_only || s.local)
            .filter(|s| kind.is_none_or(|k| s.kind == k))
            .collect()
    }

    /// Root node of a statement
    pub fn root(&self, index: usize) -> Option<&EnrichedNode> {
        self.tree.root(index).map(|id| self.tree.node(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&EnrichedNode> {
        self.tree.get(id)
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Raw parser node of a statement
    pub fn raw(&self, index: usize) -> Option<&RawNode> {
        self.ast.get(index)
    }

    pub fn symbol_table(&self, index: usize) -> Option<&SymbolTable> {
        self.tables.get(index)
    }

    pub fn diagnostic(&self, index: usize) -> Option<&UnsafeStatement> {
        self.diagnostics.get(index)?.as_ref()
    }

    /// All unsafe-statement diagnostics, in statement order
    pub fn diagnostics(&self) -> impl Iterator<Item = &UnsafeStatement> {
        self.diagnostics.iter().flatten()
    }

    /// Whether every variable of a statement is grounded. `None` for an
    /// out-of-range index.
    pub fn is_safe(&self, index: usize) -> Option<bool> {
        self.diagnostics.get(index).map(Option::is_none)
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Source text covered by a node. `None` for nodes of included
    /// statements, whose text is not part of this file.
    pub fn source_text(&self, id: NodeId) -> Option<String> {
        let node = self.tree.get(id)?;
        if !self.statements.get(node.statement)?.local {
            return None;
        }
        node.span.text(&self.file)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Comments documenting a statement
    pub fn comments_of(&self, index: usize) -> Vec<&Comment> {
        self.statements
            .get(index)
            .map(|s| s.comments.iter().map(|c| &self.comments[*c]).collect())
            .unwrap_or_default()
    }

    /// `@section`, `@predicate` and `@var` directives, in source order
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Directive documenting a node: `@var` for a variable, `@predicate`
    /// for a symbolic atom or a function read as a predicate. A predicate
    /// directive may name `name/arity` or just `name`.
    pub fn directive_of(&self, id: NodeId) -> Option<&Directive> {
        let node = self.tree.get(id)?;
        let index = match node.kind {
            NodeKind::Variable => self.variable_docs.get(node.name()?)?,
            NodeKind::SymbolicAtom | NodeKind::Function => {
                let signature = self.tree.signature_of(id).or_else(|| self.tree.term_signature(id))?;
                self.predicate_docs
                    .get(&signature.to_string())
                    .or_else(|| self.predicate_docs.get(&signature.name))?
            }
            _ => return None,
        };
        self.directives.get(*index)
    }

    /// Variable occurrences of local statements, in program order
    pub fn variables(&self) -> Vec<&EnrichedNode> {
        self.statements
            .iter()
            .filter(|s| s.local)
            .flat_map(|s| self.tree.preorder(s.root))
            .map(|id| self.tree.node(id))
            .filter(|n| n.is_variable())
            .collect()
    }

    /// Statements, comments, directives and variables starting on `line`
    pub fn at_line(&self, line: u32) -> Vec<LineItem<'_>> {
        let mut items: Vec<LineItem<'_>> = self
            .statements
            .iter()
            .filter(|s| s.local && s.span.start_line == line)
            .map(LineItem::Statement)
            .collect();
        items.extend(
            self.comments
                .iter()
                .filter(|c| c.span.start_line == line)
                .map(LineItem::Comment),
        );
        items.extend(
            self.directives
                .iter()
                .filter(|d| d.span.start_line == line)
                .map(LineItem::Directive),
        );
        items.extend(
            self.variables()
                .into_iter()
                .filter(|v| v.span.start_line == line)
                .map(LineItem::Variable),
        );
        items
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn src_dir(&self) -> &str {
        &self.src_dir
    }

    pub fn file(&self) -> &[String] {
        &self.file
    }
}

/// Every node of a local statement must point at existing source text.
fn check_spans(tree: &Tree, local: &[bool], file: &[String], filename: &str) -> Result<()> {
    for (statement, is_local) in local.iter().enumerate() {
        if !is_local {
            continue;
        }
        for id in tree.statement_nodes(statement) {
            let span = tree.node(id).span;
            if !span.fits(file) {
                return Err(Error::SourceMismatch {
                    filename: filename.to_string(),
                    statement,
                    span,
                    lines: file.len(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Occurrence;
    use crate::raw::{Location, Sign};
    use crate::signature::Signature;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn at(line: u32, column: u32, end: u32) -> Location {
        Location::new(line, column, line, end).in_file("test.lp")
    }

    /// `p(X) :- q(X).` on line `line`
    fn p_if_q(line: u32) -> RawNode {
        let x = |col| RawNode::variable("X").at(at(line, col, col + 1));
        let head = RawNode::atom(Sign::NoSign, "p", vec![x(3)]).at(at(line, 1, 5));
        let body = RawNode::atom(Sign::NoSign, "q", vec![x(11)]).at(at(line, 9, 13));
        RawNode::rule(head, vec![body]).at(at(line, 1, 14))
    }

    #[test]
    fn test_end_to_end_safe_rule() {
        let cleast = Cleast::new(vec![p_if_q(1)], lines("p(X) :- q(X)."), "test.lp", ".").unwrap();

        assert_eq!(cleast.len(), 1);
        assert_eq!(cleast.is_safe(0), Some(true));

        let table = cleast.symbol_table(0).unwrap();
        let occurrences: Vec<_> = table
            .get("X")
            .unwrap()
            .iter()
            .map(|id| cleast.node(*id).unwrap().occurrence.unwrap())
            .collect();
        assert_eq!(occurrences, vec![Occurrence::Use, Occurrence::Binding]);

        let binding = table.get("X").unwrap()[1];
        assert_eq!(cleast.source_text(binding).as_deref(), Some("X"));
        let body = cleast.node(binding).unwrap().parent.unwrap();
        assert_eq!(cleast.source_text(body).as_deref(), Some("q(X)"));

        let graph = cleast.dependency_graph();
        assert_eq!(graph.defined_by(0), vec![&Signature::new("p", 1)]);
        assert_eq!(graph.used_by(0), vec![&Signature::new("q", 1)]);

        let statement = cleast.statement(0).unwrap();
        assert_eq!(statement.kind, StatementKind::Rule);
        assert_eq!(statement.identifier, "p/1");
        assert!(statement.local);
        assert_eq!(statement.prefix, "test.");
    }

    #[test]
    fn test_source_mismatch() {
        let result = Cleast::new(vec![p_if_q(2)], lines("p(X) :- q(X)."), "test.lp", ".");
        match result {
            Err(Error::SourceMismatch { statement, lines, .. }) => {
                assert_eq!(statement, 0);
                assert_eq!(lines, 1);
            }
            other => panic!("expected source mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_included_statements_are_not_checked() {
        let included = RawNode::rule(RawNode::atom(Sign::NoSign, "base", vec![]), vec![])
            .at(Location::new(40, 1, 40, 6).in_file("lib/base.lp"));
        let cleast = Cleast::new(vec![included], Vec::new(), "test.lp", ".").unwrap();

        let statement = cleast.statement(0).unwrap();
        assert!(!statement.local);
        assert_eq!(statement.prefix, "lib.base.");
        assert_eq!(statement.qualified_identifier(), "lib.base.base/0");
        assert!(cleast.source_text(statement.root).is_none());
        assert!(cleast.statements_of_kind(None, true).is_empty());
        assert_eq!(cleast.statements_of_kind(Some(StatementKind::Fact), false).len(), 1);
    }

    #[test]
    fn test_empty_program() {
        let cleast = Cleast::new(Vec::new(), Vec::new(), "empty.lp", ".").unwrap();
        assert!(cleast.is_empty());
        assert!(cleast.dependency_graph().is_acyclic());
        assert_eq!(cleast.is_safe(0), None);
    }

    #[test]
    fn test_sections_and_descriptions() {
        let file = lines(
            "%@section Reachability\n\
             %@var X - a node\n\
             %@predicate q - graph nodes\n\
             % derive p\n\
             p(X) :- q(X).",
        );
        let cleast = Cleast::new(vec![p_if_q(5)], file, "test.lp", ".").unwrap();

        assert_eq!(cleast.directives().len(), 3);
        let statement = cleast.statement(0).unwrap();
        assert_eq!(statement.section.as_deref(), Some("Reachability"));
        let comments = cleast.comments_of(0);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "derive p");

        let x = cleast.variables()[0];
        assert_eq!(cleast.directive_of(x.id).map(|d| d.description.as_str()), Some("a node"));

        let q_atom = cleast
            .tree()
            .statement_nodes(0)
            .into_iter()
            .find(|id| cleast.tree().signature_of(*id).is_some_and(|s| s.name == "q"))
            .unwrap();
        assert_eq!(cleast.directive_of(q_atom).map(|d| d.description.as_str()), Some("graph nodes"));
        assert!(matches!(cleast.at_line(2)[..], [LineItem::Comment(_), LineItem::Directive(_)]));
    }

    #[test]
    fn test_no_section_above() {
        let file = lines("p(X) :- q(X).\n%@section Later");
        let cleast = Cleast::new(vec![p_if_q(1)], file, "test.lp", ".").unwrap();
        assert!(cleast.statement(0).unwrap().section.is_none());
    }

    #[test]
    fn test_comments_and_lines() {
        let file = lines("% derive p\np(X) :- q(X).");
        let cleast = Cleast::new(vec![p_if_q(2)], file, "test.lp", ".").unwrap();

        let comments = cleast.comments_of(0);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "derive p");

        let items = cleast.at_line(2);
        assert_eq!(items.iter().filter(|i| matches!(i, LineItem::Statement(_))).count(), 1);
        assert_eq!(items.iter().filter(|i| matches!(i, LineItem::Variable(_))).count(), 2);
        assert!(matches!(cleast.at_line(1)[0], LineItem::Comment(_)));
        assert_eq!(cleast.variables().len(), 2);
    }
}
