//! Documentation directives embedded in line comments
//!
//! A line comment whose text starts with `@` carries a directive:
//!
//! ```text
//! %@section Graph reachability
//! %@predicate path/2 - pairs of connected nodes
//! %@var X - a node of the graph
//! ```
//!
//! For `predicate` and `var`, the words before ` - ` are parameters and
//! the rest is the description. A section's whole text is its title; it
//! covers every statement below it up to the next section.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use crate::comment::Comment;
use crate::span::Span;

static DIRECTIVE: OnceLock<Regex> = OnceLock::new();

fn directive() -> &'static Regex {
    DIRECTIVE.get_or_init(|| Regex::new(r"^@(\w+)\s*(.*)$").expect("static regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    Section,
    Predicate,
    Variable,
}

impl DirectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Section => "section",
            DirectiveKind::Predicate => "predicate",
            DirectiveKind::Variable => "var",
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "section" => Some(DirectiveKind::Section),
            "predicate" | "predicates" | "pred" => Some(DirectiveKind::Predicate),
            "var" | "variable" => Some(DirectiveKind::Variable),
            _ => None,
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub span: Span,
    /// Index of the carrying comment
    pub comment: usize,
    pub parameters: Vec<String>,
    pub description: String,
}

impl Directive {
    /// Directives carried by `comments`, in source order
    pub fn extract(comments: &[Comment]) -> Vec<Directive> {
        comments
            .iter()
            .enumerate()
            .filter_map(|(index, comment)| Self::parse(index, comment))
            .collect()
    }

    fn parse(index: usize, comment: &Comment) -> Option<Directive> {
        if comment.block {
            return None;
        }
        let captures = directive().captures(&comment.content)?;
        let word = captures.get(1)?.as_str();
        let Some(kind) = DirectiveKind::from_word(word) else {
            tracing::debug!(line = comment.span.start_line, directive = word, "ignoring unknown directive");
            return None;
        };
        let rest = captures.get(2).map_or("", |m| m.as_str()).trim();

        let (parameters, description) = match kind {
            DirectiveKind::Section => (Vec::new(), rest.to_string()),
            _ => match rest.split_once(" - ") {
                Some((parameters, description)) => (words(parameters), description.trim().to_string()),
                None => (words(rest), String::new()),
            },
        };

        Some(Directive {
            kind,
            span: comment.span,
            comment: index,
            parameters,
            description,
        })
    }

    /// First parameter: the variable name or predicate of the directive
    pub fn subject(&self) -> Option<&str> {
        self.parameters.first().map(String::as_str)
    }

    /// Title of a section, description otherwise
    pub fn title(&self) -> &str {
        &self.description
    }
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Index of the section directive covering a statement that starts on
/// `line`: the last one strictly above it.
pub fn section_at(directives: &[Directive], line: u32) -> Option<usize> {
    directives
        .iter()
        .enumerate()
        .filter(|(_, d)| d.kind == DirectiveKind::Section && d.span.start_line < line)
        .max_by_key(|(_, d)| d.span.start_line)
        .map(|(index, _)| index)
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.kind)?;
        if !self.parameters.is_empty() {
            write!(f, " {}", self.parameters.join(" "))?;
        }
        match self.kind {
            DirectiveKind::Section => write!(f, " {}", self.description),
            _ if self.description.is_empty() => Ok(()),
            _ => write!(f, " - {}", self.description),
        }
    }
}
