//! Scope graph of one statement
//!
//! The statement itself is the root scope. Conditional literals and
//! aggregate elements open child scopes whose bindings are only visible
//! inside them.

use std::collections::HashMap;
use crate::node::NodeId;

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The statement scope
    pub fn root() -> Self {
        Self(0)
    }
}

/// Where a variable is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// The binding occurrence
    pub node: NodeId,
    /// Whether the binding grounds the variable. Head bindings of
    /// body-less rules do not.
    pub grounds: bool,
}

#[derive(Debug, Default)]
pub struct ScopeGraph {
    next_id: u32,
    /// Scope hierarchy (child → parent)
    parents: HashMap<ScopeId, ScopeId>,
    /// Opening node of each non-root scope
    owners: HashMap<NodeId, ScopeId>,
    /// Bindings: (scope, name) → binding
    bindings: HashMap<(ScopeId, String), Binding>,
}

impl ScopeGraph {
    /// Create a graph holding only the statement scope
    pub fn new() -> Self {
        Self { next_id: 1, ..Self::default() }
    }

    /// Create the scope opened by `owner` inside `parent`
    pub fn add_scope(&mut self, parent: ScopeId, owner: NodeId) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        self.parents.insert(id, parent);
        self.owners.insert(owner, id);
        id
    }

    pub fn add_binding(&mut self, scope: ScopeId, name: impl Into<String>, binding: Binding) {
        self.bindings.insert((scope, name.into()), binding);
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.parents.get(&scope).copied()
    }

    /// Scope opened by a conditional literal or aggregate element
    pub fn scope_of(&self, owner: NodeId) -> Option<ScopeId> {
        self.owners.get(&owner).copied()
    }

    /// Look up a binding in a scope (not walking parents)
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        self.bindings.get(&(scope, name.to_string()))
    }

    /// Look up a binding walking up the scope chain
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        self.scope_chain(scope)
            .into_iter()
            .find_map(|s| self.lookup_local(s, name))
    }

    /// Number of scopes between `scope` and the statement scope
    pub fn depth(&self, scope: ScopeId) -> usize {
        self.scope_chain(scope).len() - 1
    }

    /// Get scope chain from a scope up to root
    pub fn scope_chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}
