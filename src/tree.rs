//! Tree Builder - wraps the parser's statement list into an arena tree
//!
//! Nodes are allocated in pre-order; children keep the order of the raw
//! node's fields, so building the same input twice yields the same ids.

use crate::node::{EnrichedNode, NodeId, Occurrence};
use crate::raw::{NodeClass, NodeKind, RawNode};
use crate::signature::Signature;
use crate::span::Span;
use crate::{Error, Result};

/// Arena of enriched nodes with one root per top-level statement
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<EnrichedNode>,
    roots: Vec<NodeId>,
}

impl Tree {
    /// Wrap every statement of `ast_list`, validating node shapes on the way.
    pub fn build(ast_list: &[RawNode]) -> Result<Self> {
        let mut tree = Self::default();
        for (statement, raw) in ast_list.iter().enumerate() {
            if raw.kind().class() != NodeClass::Statement {
                return Err(Error::Structural {
                    statement,
                    parent: "Program",
                    field: "statement",
                    found: raw.kind(),
                });
            }
            let root = tree.wrap(raw, None, "statement", statement, Span::origin())?;
            tree.roots.push(root);
        }
        tracing::debug!(
            statements = tree.roots.len(),
            nodes = tree.nodes.len(),
            "built enriched tree"
        );
        Ok(tree)
    }

    fn wrap(
        &mut self,
        raw: &RawNode,
        parent: Option<NodeId>,
        field: &'static str,
        statement: usize,
        inherited: Span,
    ) -> Result<NodeId> {
        let id = NodeId(self.nodes.len() as u32);
        let node = EnrichedNode::wrap(id, raw, parent, field, statement, inherited);
        let span = node.span;
        self.nodes.push(node);

        for child in raw.fields() {
            if !child.is_valid() {
                return Err(Error::Structural {
                    statement,
                    parent: raw.kind().as_str(),
                    field: child.name,
                    found: child.node.kind(),
                });
            }
            let child_id = self.wrap(child.node, Some(id), child.name, statement, span)?;
            self.nodes[id.index()].children.push(child_id);
        }
        Ok(id)
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all statements
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root(&self, statement: usize) -> Option<NodeId> {
        self.roots.get(statement).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&EnrichedNode> {
        self.nodes.get(id.index())
    }

    /// Access a node that is known to belong to this tree
    pub fn node(&self, id: NodeId) -> &EnrichedNode {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<&EnrichedNode> {
        self.get(id)?.parent.map(|p| self.node(p))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &EnrichedNode> {
        self.node(id).children.iter().map(|c| self.node(*c))
    }

    /// Children of `id` sitting in the given field
    pub fn field(&self, id: NodeId, field: &str) -> impl Iterator<Item = &EnrichedNode> {
        self.children(id).filter(move |c| c.field == field)
    }

    /// Ancestors from the parent up to the statement root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &EnrichedNode> {
        std::iter::successors(self.parent(id), |n| self.parent(n.id))
    }

    /// `id` and all its descendants in pre-order
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.node(current).children.iter().rev().copied());
        }
        order
    }

    /// All nodes of one statement, root first
    pub fn statement_nodes(&self, statement: usize) -> Vec<NodeId> {
        self.root(statement).map(|r| self.preorder(r)).unwrap_or_default()
    }

    /// Predicate signature of a `SymbolicAtom` node. Classical negation
    /// (`-p(X)`) is kept in the name.
    pub fn signature_of(&self, atom: NodeId) -> Option<Signature> {
        let node = self.get(atom)?;
        if node.kind != NodeKind::SymbolicAtom {
            return None;
        }
        let symbol = self.children(atom).next()?;
        self.term_signature(symbol.id)
    }

    /// Signature of a term read as a predicate, e.g. `p(X, Y)` is `p/2`
    pub fn term_signature(&self, term: NodeId) -> Option<Signature> {
        let node = self.get(term)?;
        match node.kind {
            NodeKind::Function => Some(Signature::new(node.name()?, node.children.len() as u32)),
            NodeKind::SymbolicTerm => Some(Signature::new(node.name()?, 0)),
            NodeKind::UnaryOperation if node.name() == Some("-") => {
                let inner = self.children(term).next()?;
                let signature = self.term_signature(inner.id)?;
                Some(Signature::new(format!("-{}", signature.name), signature.arity))
            }
            _ => None,
        }
    }

    pub(crate) fn annotate(&mut self, id: NodeId, occurrence: Occurrence) {
        self.nodes[id.index()].occurrence = Some(occurrence);
    }
}
