//! Per-statement symbol tables and safety diagnostics

use std::collections::HashMap;
use std::fmt;
use serde::Serialize;
use crate::node::NodeId;
use crate::span::Span;

/// Variable name → occurrences within one statement, both in order of
/// first appearance (pre-order).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    entries: Vec<(String, Vec<NodeId>)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence of `name`
    pub fn insert(&mut self, name: &str, node: NodeId) {
        match self.index.get(name) {
            Some(&slot) => self.entries[slot].1.push(node),
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), vec![node]));
            }
        }
    }

    /// Occurrences of a variable
    pub fn get(&self, name: &str) -> Option<&[NodeId]> {
        self.index.get(name).map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.entries.iter().map(|(name, nodes)| (name.as_str(), nodes.as_slice()))
    }

    /// Number of distinct variables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A statement with variables that no occurrence grounds.
///
/// Not an error: callers decide whether unsafe statements are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsafeStatement {
    pub statement: usize,
    pub span: Span,
    /// Unsafe variable names, sorted
    pub variables: Vec<String>,
}

impl fmt::Display for UnsafeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "statement {} at {} is unsafe: unbound {}",
            self.statement,
            self.span,
            self.variables.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_appearance_order() {
        let mut table = SymbolTable::new();
        table.insert("Y", NodeId(3));
        table.insert("X", NodeId(5));
        table.insert("Y", NodeId(8));

        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Y", "X"]);
        assert_eq!(table.get("Y"), Some(&[NodeId(3), NodeId(8)][..]));
        assert_eq!(table.len(), 2);
        assert!(table.get("Z").is_none());
    }

    #[test]
    fn test_unsafe_display() {
        let diagnostic = UnsafeStatement {
            statement: 2,
            span: Span::new(3, 1, 3, 18),
            variables: vec!["X".into(), "Y".into()],
        };
        assert_eq!(diagnostic.to_string(), "statement 2 at 3:1-3:18 is unsafe: unbound X, Y");
    }
}
