//! Variable scoping - binding/use classification and rule safety
//!
//! Each statement is its own scope; statements never share variables.
//! Inside a statement, conditional literals and aggregate elements open
//! nested scopes.

pub mod graph;
pub mod resolver;
pub mod table;

pub use graph::{Binding, ScopeGraph, ScopeId};
pub use resolver::{Resolution, ScopeResolver};
pub use table::{SymbolTable, UnsafeStatement};
