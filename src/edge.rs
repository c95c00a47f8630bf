//! Edge types - statement/predicate relationships
//!
//! Four edge kinds connect statements and predicates:
//! - `Defines`: statement → predicate (head atoms, `#external`, `#defined`)
//! - `Uses`: predicate → statement (body literals)
//! - `Conditions`: predicate → statement (conditions inside a head)
//! - `Shows`: predicate → statement (`#show p/n`)

use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Statement derives the predicate
    Defines,
    /// Statement body consults the predicate
    Uses,
    /// Statement head is conditioned on the predicate
    Conditions,
    /// `#show` directive outputs the predicate
    Shows,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Defines => "defines",
            EdgeKind::Uses => "uses",
            EdgeKind::Conditions => "conditions",
            EdgeKind::Shows => "shows",
        }
    }

    pub fn all() -> &'static [EdgeKind] {
        &[EdgeKind::Defines, EdgeKind::Uses, EdgeKind::Conditions, EdgeKind::Shows]
    }

    /// Check if the statement depends on the predicate through this edge
    pub fn is_dependency(&self) -> bool {
        matches!(self, EdgeKind::Uses | EdgeKind::Conditions)
    }
}

impl FromStr for EdgeKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "defines" | "define" | "head" => Ok(EdgeKind::Defines),
            "uses" | "use" | "body" => Ok(EdgeKind::Uses),
            "conditions" | "condition" => Ok(EdgeKind::Conditions),
            "shows" | "show" => Ok(EdgeKind::Shows),
            _ => Err(crate::Error::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An edge between a statement and a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub statement: usize,
    pub predicate: Signature,
    pub kind: EdgeKind,
    /// The consulting literal is under `not` or `not not`
    pub negative: bool,
}

impl Edge {
    pub fn defines(statement: usize, predicate: Signature) -> Self {
        Self { statement, predicate, kind: EdgeKind::Defines, negative: false }
    }

    pub fn uses(statement: usize, predicate: Signature, negative: bool) -> Self {
        Self { statement, predicate, kind: EdgeKind::Uses, negative }
    }

    pub fn conditions(statement: usize, predicate: Signature, negative: bool) -> Self {
        Self { statement, predicate, kind: EdgeKind::Conditions, negative }
    }

    pub fn shows(statement: usize, predicate: Signature) -> Self {
        Self { statement, predicate, kind: EdgeKind::Shows, negative: false }
    }

    pub fn is_positive(&self) -> bool {
        !self.negative
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let not = if self.negative { "not " } else { "" };
        write!(f, "statement {} {} {}{}", self.statement, self.kind, not, self.predicate)
    }
}
