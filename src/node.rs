//! Enriched nodes - one wrapper per raw AST node
//!
//! Nodes live in the arena of a [`Tree`](crate::tree::Tree) and refer to
//! each other by [`NodeId`]. The parent link is an index, so ownership
//! stays strictly with the arena.

use crate::raw::{NodeKind, RawNode, Sign};
use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a variable occurrence relates to its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occurrence {
    /// The occurrence that introduces the variable
    Binding,
    /// Any occurrence that reads an existing binding
    Use,
}

impl Occurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occurrence::Binding => "binding",
            Occurrence::Use => "use",
        }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw node enriched with identity, span and structural links.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Field of the parent this node occupies (`"statement"` for roots)
    pub field: &'static str,
    /// Index of the top-level statement the node belongs to
    pub statement: usize,
    /// Identifier, symbol or operator carried by the node
    pub name: Option<String>,
    /// Arity of `#show p/n` and `#defined p/n` directives
    pub arity: Option<u32>,
    /// Sign of a literal
    pub sign: Option<Sign>,
    /// Scope classification, set on variables by the scope resolver
    pub occurrence: Option<Occurrence>,
}

impl EnrichedNode {
    /// Wrap `raw`. The span falls back to `inherited` when the parser
    /// recorded no location.
    pub fn wrap(
        id: NodeId,
        raw: &RawNode,
        parent: Option<NodeId>,
        field: &'static str,
        statement: usize,
        inherited: Span,
    ) -> Self {
        Self {
            id,
            kind: raw.kind(),
            span: raw.location().map(Span::from_location).unwrap_or(inherited),
            parent,
            children: Vec::new(),
            field,
            statement,
            name: raw.label(),
            arity: raw.arity(),
            sign: raw.sign(),
            occurrence: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_variable(&self) -> bool {
        self.kind == NodeKind::Variable
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True for literals without `not`
    pub fn is_positive(&self) -> bool {
        self.sign.is_none_or(|sign| sign.is_positive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::Location;

    #[test]
    fn test_wrap_uses_own_location() {
        let raw = RawNode::variable("X").at(Location::new(1, 3, 1, 4));
        let node = EnrichedNode::wrap(NodeId(1), &raw, Some(NodeId(0)), "arguments", 0, Span::origin());

        assert_eq!(node.kind, NodeKind::Variable);
        assert_eq!(node.span, Span::new(1, 3, 1, 4));
        assert_eq!(node.name(), Some("X"));
        assert!(!node.is_root());
        assert!(node.occurrence.is_none());
    }

    #[test]
    fn test_wrap_inherits_span() {
        let raw = RawNode::variable("Y");
        let parent_span = Span::new(2, 1, 2, 10);
        let node = EnrichedNode::wrap(NodeId(3), &raw, Some(NodeId(2)), "arguments", 1, parent_span);
        assert_eq!(node.span, parent_span);
    }

    #[test]
    fn test_literal_sign() {
        let raw = RawNode::atom(Sign::Negation, "q", vec![]);
        let node = EnrichedNode::wrap(NodeId(0), &raw, None, "body", 0, Span::origin());
        assert_eq!(node.sign, Some(Sign::Negation));
        assert!(!node.is_positive());
    }
}
