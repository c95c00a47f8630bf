//! Source spans and span-to-text lookup
//!
//! Lines and columns are 1-indexed. Columns count bytes, as clingo does,
//! and the end column is exclusive.

use crate::raw::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self { start_line, start_column, end_line, end_column }
    }

    /// Empty span at the very beginning of the file. Given to statements
    /// whose parser output carries no position at all.
    pub fn origin() -> Self {
        Self::new(1, 1, 1, 1)
    }

    pub fn is_origin(&self) -> bool {
        *self == Self::origin()
    }

    pub fn from_location(location: &Location) -> Self {
        Self::new(
            location.begin.line,
            location.begin.column,
            location.end.line,
            location.end.column,
        )
    }

    /// Check that every line and column of the span exists in `file`.
    pub fn fits(&self, file: &[String]) -> bool {
        if self.is_origin() {
            return true;
        }
        if self.start_line == 0 || self.start_column == 0 || self.end_column == 0 {
            return false;
        }
        if (self.end_line, self.end_column) < (self.start_line, self.start_column) {
            return false;
        }
        let column_fits = |line: u32, column: u32| {
            file.get(line as usize - 1)
                .is_some_and(|text| column as usize <= text.len() + 1)
        };
        column_fits(self.start_line, self.start_column) && column_fits(self.end_line, self.end_column)
    }

    /// Literal source text covered by the span, lines joined by `\n`.
    ///
    /// Returns `None` when the span does not fit `file` or cuts through a
    /// multi-byte character.
    pub fn text(&self, file: &[String]) -> Option<String> {
        if self.is_origin() {
            return Some(String::new());
        }
        if !self.fits(file) {
            return None;
        }
        let start = self.start_column as usize - 1;
        let end = self.end_column as usize - 1;
        let first = self.start_line as usize - 1;
        let last = self.end_line as usize - 1;

        if first == last {
            return file[first].get(start..end).map(str::to_string);
        }

        let mut parts = Vec::with_capacity(last - first + 1);
        parts.push(file[first].get(start..)?);
        for line in &file[first + 1..last] {
            parts.push(line.as_str());
        }
        parts.push(file[last].get(..end)?);
        Some(parts.join("\n"))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_single_line_text() {
        let file = lines("p(X) :- q(X).");
        assert_eq!(Span::new(1, 9, 1, 13).text(&file).as_deref(), Some("q(X)"));
        assert_eq!(Span::new(1, 1, 1, 14).text(&file).as_deref(), Some("p(X) :- q(X)."));
    }

    #[test]
    fn test_multi_line_text() {
        let file = lines("p(X) :-\n  q(X),\n  r(X).");
        let span = Span::new(1, 1, 3, 8);
        assert_eq!(span.text(&file).as_deref(), Some("p(X) :-\n  q(X),\n  r(X)."));
    }

    #[test]
    fn test_fits() {
        let file = lines("a.\nb.");
        assert!(Span::new(2, 1, 2, 3).fits(&file));
        assert!(!Span::new(3, 1, 3, 2).fits(&file));
        assert!(!Span::new(1, 1, 1, 5).fits(&file));
        assert!(!Span::new(2, 1, 1, 1).fits(&file));
    }

    #[test]
    fn test_origin_always_fits() {
        let empty: Vec<String> = Vec::new();
        assert!(Span::origin().fits(&empty));
        assert_eq!(Span::origin().text(&empty).as_deref(), Some(""));
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(1, 2, 3, 4).to_string(), "1:2-3:4");
    }
}
