//! Scope Resolver - classifies variable occurrences and checks safety
//!
//! Resolution algorithm, per statement:
//! 1. Walk the statement and collect every variable occurrence with its
//!    scope and whether its position can bind
//! 2. Visit binding candidates outermost scope first, then in pre-order;
//!    a candidate becomes the binding unless one is already visible
//! 3. Every other occurrence is a use
//! 4. An occurrence without a visible grounding binding makes the
//!    statement unsafe
//!
//! Binding positions are the arguments of a symbolic atom in a positive
//! literal of a body or condition, and the head of a rule without body.
//! Arithmetic, comparisons, negated literals, weights and aggregate terms
//! only read.

use std::collections::BTreeSet;
use crate::node::{NodeId, Occurrence};
use crate::raw::NodeKind;
use crate::span::Span;
use crate::tree::Tree;
use super::graph::{Binding, ScopeGraph, ScopeId};
use super::table::{SymbolTable, UnsafeStatement};

/// A variable occurrence awaiting classification
#[derive(Debug, Clone)]
struct Candidate {
    node: NodeId,
    name: String,
    scope: ScopeId,
    /// `Some(grounds)` when the position can bind
    binds: Option<bool>,
}

/// Outcome of resolving one statement
#[derive(Debug)]
pub struct Resolution {
    pub statement: usize,
    pub table: SymbolTable,
    pub scopes: ScopeGraph,
    /// Classification of every variable node, in pre-order
    pub occurrences: Vec<(NodeId, Occurrence)>,
    pub diagnostic: Option<UnsafeStatement>,
}

impl Resolution {
    pub fn is_safe(&self) -> bool {
        self.diagnostic.is_none()
    }

    /// Write the classifications onto the tree's variable nodes
    pub fn annotate(&self, tree: &mut Tree) {
        for (node, occurrence) in &self.occurrences {
            tree.annotate(*node, *occurrence);
        }
    }
}

/// Resolver over a built tree
pub struct ScopeResolver<'a> {
    tree: &'a Tree,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        Self { tree }
    }

    /// Resolve every statement in order
    pub fn resolve_all(&self) -> Vec<Resolution> {
        (0..self.tree.len()).map(|s| self.resolve(s)).collect()
    }

    /// Resolve a single statement
    pub fn resolve(&self, statement: usize) -> Resolution {
        let mut scopes = ScopeGraph::new();
        let mut candidates = Vec::new();
        let root = self.tree.root(statement);
        if let Some(root) = root {
            self.collect(root, ScopeId::root(), None, &mut scopes, &mut candidates);
        }

        let mut table = SymbolTable::new();
        for candidate in &candidates {
            table.insert(&candidate.name, candidate.node);
        }

        // Outer scopes first so a statement-level binding wins over
        // element-local ones; the sort is stable, keeping pre-order.
        let mut order: Vec<usize> = (0..candidates.len())
            .filter(|&i| candidates[i].binds.is_some())
            .collect();
        order.sort_by_key(|&i| scopes.depth(candidates[i].scope));
        for i in order {
            let candidate = &candidates[i];
            if scopes.lookup(candidate.scope, &candidate.name).is_none() {
                let binding = Binding {
                    node: candidate.node,
                    grounds: candidate.binds.unwrap_or(false),
                };
                scopes.add_binding(candidate.scope, candidate.name.clone(), binding);
            }
        }

        let mut unbound = BTreeSet::new();
        let occurrences = candidates
            .iter()
            .map(|candidate| {
                let binding = scopes.lookup(candidate.scope, &candidate.name);
                if !binding.is_some_and(|b| b.grounds) {
                    unbound.insert(candidate.name.clone());
                }
                let occurrence = match binding {
                    Some(b) if b.node == candidate.node => Occurrence::Binding,
                    _ => Occurrence::Use,
                };
                (candidate.node, occurrence)
            })
            .collect();

        let diagnostic = (!unbound.is_empty()).then(|| UnsafeStatement {
            statement,
            span: root.map(|r| self.tree.node(r).span).unwrap_or_else(Span::origin),
            variables: unbound.into_iter().collect(),
        });

        tracing::debug!(
            statement,
            variables = table.len(),
            safe = diagnostic.is_none(),
            "resolved statement scope"
        );

        Resolution { statement, table, scopes, occurrences, diagnostic }
    }

    fn collect(
        &self,
        id: NodeId,
        scope: ScopeId,
        binds: Option<bool>,
        scopes: &mut ScopeGraph,
        out: &mut Vec<Candidate>,
    ) {
        let node = self.tree.node(id);
        let (scope, binds) = match node.kind {
            NodeKind::Variable => {
                if let Some(name) = node.name() {
                    // `_` is anonymous: every occurrence is a fresh variable
                    if name != "_" {
                        out.push(Candidate { node: id, name: name.to_string(), scope, binds });
                    }
                }
                return;
            }
            NodeKind::Literal => (scope, self.literal_binds(id)),
            NodeKind::SymbolicAtom | NodeKind::Function | NodeKind::Pool => (scope, binds),
            NodeKind::ConditionalLiteral => (scopes.add_scope(scope, id), None),
            NodeKind::AggregateElement | NodeKind::HeadAggregateElement => {
                (scopes.add_scope(scope, id), None)
            }
            _ => (scope, None),
        };

        for child in &node.children {
            self.collect(*child, scope, binds, scopes, out);
        }
    }

    /// Whether the atom of a literal sits in a binding position, and if
    /// so whether that binding grounds its variables.
    fn literal_binds(&self, literal: NodeId) -> Option<bool> {
        let node = self.tree.node(literal);
        if !node.is_positive() {
            return None;
        }
        match node.field {
            "body" | "condition" => Some(true),
            "head" => {
                let rule = node.parent?;
                self.tree.field(rule, "body").next().is_none().then_some(false)
            }
            _ => None,
        }
    }
}
