//! Statement classification
//!
//! Every top-level node gets a [`StatementKind`], a display identifier and
//! the module prefix of the file it comes from. Statements pulled in by
//! `#include` carry another filename and are marked external.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;
use crate::graph::DependencyGraph;
use crate::node::NodeId;
use crate::raw::RawNode;
use crate::span::Span;
use crate::tree::Tree;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Derives head atoms from a body
    Rule,
    /// Head without dependencies
    Fact,
    /// No head predicate
    Constraint,
    /// `#const`
    Definition,
    /// `#defined`
    Input,
    /// `#show`
    Output,
    /// Weak constraints, `#minimize`, `#maximize`
    Optimization,
    /// `#external`
    External,
    /// `#program`
    Program,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Rule => "rule",
            StatementKind::Fact => "fact",
            StatementKind::Constraint => "constraint",
            StatementKind::Definition => "definition",
            StatementKind::Input => "input",
            StatementKind::Output => "output",
            StatementKind::Optimization => "optimization",
            StatementKind::External => "external",
            StatementKind::Program => "program",
        }
    }

    pub fn all() -> &'static [StatementKind] {
        &[
            StatementKind::Rule,
            StatementKind::Fact,
            StatementKind::Constraint,
            StatementKind::Definition,
            StatementKind::Input,
            StatementKind::Output,
            StatementKind::Optimization,
            StatementKind::External,
            StatementKind::Program,
        ]
    }
}

impl FromStr for StatementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatementKind::all()
            .iter()
            .find(|kind| kind.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified top-level statement
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub index: usize,
    pub root: NodeId,
    pub kind: StatementKind,
    /// `p/1` for rules and facts, `Constraint#0` for constraints, ...
    pub identifier: String,
    pub span: Span,
    /// File the statement was parsed from, if the parser recorded it
    pub origin: Option<String>,
    /// Parsed from the analyzed file rather than an included one
    pub local: bool,
    /// Dotted module path of the origin relative to the source directory
    pub prefix: String,
    /// Title of the `@section` directive covering the statement
    pub section: Option<String>,
    /// Indices into the program's comments
    pub comments: Vec<usize>,
}

impl Statement {
    /// Fully qualified identifier, e.g. `graph.reach.path/2`
    pub fn qualified_identifier(&self) -> String {
        format!("{}{}", self.prefix, self.identifier)
    }
}

/// Assigns kinds and identifiers. Constraints and optimization statements
/// are numbered in program order.
#[derive(Debug, Default)]
pub struct Classifier {
    constraints: usize,
    optimizations: usize,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(
        &mut self,
        raw: &RawNode,
        tree: &Tree,
        graph: &DependencyGraph,
        index: usize,
    ) -> (StatementKind, String) {
        match raw {
            RawNode::Rule { .. } => {
                let defines = graph.defined_by(index);
                let depends = !graph.dependencies_of(index).is_empty();
                match (defines.first(), depends) {
                    (None, _) => {
                        let id = format!("Constraint#{}", self.constraints);
                        self.constraints += 1;
                        (StatementKind::Constraint, id)
                    }
                    (Some(head), true) => (StatementKind::Rule, head.to_string()),
                    (Some(head), false) => (StatementKind::Fact, head.to_string()),
                }
            }
            RawNode::Definition { name, .. } => (StatementKind::Definition, name.clone()),
            RawNode::Defined { name, arity, .. } => {
                (StatementKind::Input, format!("{}/{}", name, arity))
            }
            RawNode::ShowSignature { name, arity, .. } => {
                (StatementKind::Output, format!("{}/{}", name, arity))
            }
            RawNode::ShowTerm { .. } => {
                let term = tree
                    .root(index)
                    .and_then(|root| tree.field(root, "term").next().map(|t| t.id))
                    .and_then(|term| tree.term_signature(term));
                let id = term.map(|t| t.to_string()).unwrap_or_else(|| "#show".to_string());
                (StatementKind::Output, id)
            }
            RawNode::Minimize { .. } => {
                let id = format!("Minimize#{}", self.optimizations);
                self.optimizations += 1;
                (StatementKind::Optimization, id)
            }
            RawNode::External { .. } => {
                let id = graph.defined_by(index).first().map(|s| s.to_string());
                (StatementKind::External, id.unwrap_or_else(|| "#external".to_string()))
            }
            RawNode::Program { name, .. } => (StatementKind::Program, name.clone()),
            // Non-statement roots are rejected by the tree builder
            _ => (StatementKind::Program, raw.kind().to_string()),
        }
    }
}

/// Module prefix of `origin` relative to `src_dir`:
/// `src/graph/reach.lp` under `src` becomes `graph.reach.`
pub fn module_prefix(origin: &str, src_dir: &str) -> String {
    let origin = Path::new(origin);
    let relative = origin.strip_prefix(src_dir).unwrap_or(origin);
    let relative = relative.with_extension("");
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    format!("{}.", parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::Sign;

    fn classify_all(statements: Vec<RawNode>) -> Vec<(StatementKind, String)> {
        let tree = Tree::build(&statements).unwrap();
        let graph = DependencyGraph::build(&tree);
        let mut classifier = Classifier::new();
        statements
            .iter()
            .enumerate()
            .map(|(i, raw)| classifier.classify(raw, &tree, &graph, i))
            .collect()
    }

    #[test]
    fn test_rule_fact_constraint() {
        let x = || RawNode::variable("X");
        let kinds = classify_all(vec![
            RawNode::rule(RawNode::atom(Sign::NoSign, "p", vec![x()]), vec![RawNode::atom(Sign::NoSign, "q", vec![x()])]),
            RawNode::rule(RawNode::atom(Sign::NoSign, "q", vec![RawNode::constant("1")]), vec![]),
            RawNode::constraint(vec![RawNode::atom(Sign::NoSign, "p", vec![x()])]),
            RawNode::constraint(vec![RawNode::atom(Sign::NoSign, "q", vec![x()])]),
        ]);

        assert_eq!(kinds[0], (StatementKind::Rule, "p/1".to_string()));
        assert_eq!(kinds[1], (StatementKind::Fact, "q/1".to_string()));
        assert_eq!(kinds[2], (StatementKind::Constraint, "Constraint#0".to_string()));
        assert_eq!(kinds[3], (StatementKind::Constraint, "Constraint#1".to_string()));
    }

    #[test]
    fn test_directives() {
        let kinds = classify_all(vec![
            RawNode::Definition {
                location: None,
                name: "n".into(),
                value: Box::new(RawNode::constant("10")),
                is_default: true,
            },
            RawNode::Defined { location: None, name: "edge".into(), arity: 2, positive: true },
            RawNode::ShowSignature { location: None, name: "path".into(), arity: 2, positive: true },
            RawNode::Program { location: None, name: "base".into(), parameters: vec![] },
        ]);

        assert_eq!(kinds[0], (StatementKind::Definition, "n".to_string()));
        assert_eq!(kinds[1], (StatementKind::Input, "edge/2".to_string()));
        assert_eq!(kinds[2], (StatementKind::Output, "path/2".to_string()));
        assert_eq!(kinds[3], (StatementKind::Program, "base".to_string()));
    }

    #[test]
    fn test_module_prefix() {
        assert_eq!(module_prefix("src/graph/reach.lp", "src"), "graph.reach.");
        assert_eq!(module_prefix("encoding.lp", "."), "encoding.");
        assert_eq!(module_prefix("/abs/dir/main.lp", "/abs/dir"), "main.");
        assert_eq!(module_prefix("./lib/base.lp", "."), "lib.base.");
    }

    #[test]
    fn test_module_prefix_matches_whole_directories() {
        assert_eq!(module_prefix("srcx/a.lp", "src"), "srcx.a.");
        assert_eq!(module_prefix("src/a.lp", "src/"), "a.");
    }

    #[test]
    fn test_statement_kind_roundtrip() {
        for kind in StatementKind::all() {
            let parsed: StatementKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }
}
