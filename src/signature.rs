//! Predicate signatures - `name/arity`
//!
//! Examples:
//! - `p/1` for `p(X)`
//! - `-move/2` for the classically negated `-move(A, B)`
//! - `done/0` for the propositional atom `done`

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a predicate in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature {
    pub name: String,
    pub arity: u32,
}

impl Signature {
    pub fn new(name: impl Into<String>, arity: u32) -> Self {
        Self { name: name.into(), arity }
    }

    /// Parse `name/arity`
    pub fn parse(signature: &str) -> Result<Self> {
        let (name, arity) = signature
            .rsplit_once('/')
            .ok_or_else(|| Error::InvalidSignature(format!("missing '/' in {}", signature)))?;

        if name.is_empty() {
            return Err(Error::InvalidSignature(format!("missing name in {}", signature)));
        }

        let arity: u32 = arity
            .parse()
            .map_err(|_| Error::InvalidSignature(format!("invalid arity: {}", arity)))?;

        Ok(Self::new(name, arity))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Signature::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let sig = Signature::parse("edge/2").unwrap();
        assert_eq!(sig.name, "edge");
        assert_eq!(sig.arity, 2);
        assert_eq!(sig.to_string(), "edge/2");
    }

    #[test]
    fn test_parse_classical_negation() {
        let sig: Signature = "-move/3".parse().unwrap();
        assert_eq!(sig, Signature::new("-move", 3));
    }

    #[test]
    fn test_invalid_signature() {
        assert!(Signature::parse("edge").is_err());
        assert!(Signature::parse("/2").is_err());
        assert!(Signature::parse("edge/two").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Signature::new("p", 1)).unwrap();
        assert_eq!(json, "\"p/1\"");
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Signature::new("p", 1));
    }
}
