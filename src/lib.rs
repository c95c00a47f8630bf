//! # Cleast - Clingo Enriched AST
//!
//! Static-analysis enrichment for Answer Set Programming encodings.
//!
//! Cleast takes the flat statement list produced by an external ASP parser
//! and provides:
//! - Source spans and span-to-text lookup for every node
//! - An arena tree with parent/child links in parser field order
//! - Per-statement variable scoping with binding/use classification
//! - Safety diagnostics for statements with ungrounded variables
//! - A predicate dependency graph with acyclicity and stratification queries
//! - Comments, `@section`/`@predicate`/`@var` directives and statement sections

pub mod raw;
pub mod span;
pub mod node;
pub mod tree;
pub mod scope;
pub mod signature;
pub mod edge;
pub mod graph;
pub mod statement;
pub mod comment;
pub mod directive;
pub mod cleast;
pub mod load;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use cleast::{Cleast, LineItem};
pub use raw::{Location, NodeKind, RawNode, Sign};
pub use span::Span;
pub use node::{EnrichedNode, NodeId, Occurrence};
pub use tree::Tree;
pub use scope::{SymbolTable, UnsafeStatement};
pub use signature::Signature;
pub use edge::{Edge, EdgeKind};
pub use graph::DependencyGraph;
pub use statement::{Statement, StatementKind};
pub use comment::Comment;
pub use directive::{Directive, DirectiveKind};

/// Result type alias for Cleast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Cleast operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Structural error in statement {statement}: {parent}.{field} cannot hold a {found} node")]
    Structural {
        statement: usize,
        parent: &'static str,
        field: &'static str,
        found: NodeKind,
    },

    #[error("{filename}: statement {statement} spans {span}, but the source has only {lines} lines or the columns do not exist")]
    SourceMismatch {
        filename: String,
        statement: usize,
        span: Span,
        lines: usize,
    },

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
