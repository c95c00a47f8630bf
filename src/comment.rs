//! Comments of an ASP source file
//!
//! ASP has line comments (`% ...`) and block comments (`%* ... *%`).
//! The parser drops both, so they are recovered from the raw lines.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use crate::span::Span;

static LINE_COMMENT: OnceLock<Regex> = OnceLock::new();
static BLOCK_START: OnceLock<Regex> = OnceLock::new();
static BLOCK_END: OnceLock<Regex> = OnceLock::new();

fn line_comment() -> &'static Regex {
    // A `%` not followed by `*`
    LINE_COMMENT.get_or_init(|| Regex::new(r"%(?:[^*].*)?$").expect("static regex"))
}

fn block_start() -> &'static Regex {
    BLOCK_START.get_or_init(|| Regex::new(r"%\*").expect("static regex"))
}

fn block_end() -> &'static Regex {
    BLOCK_END.get_or_init(|| Regex::new(r"\*%").expect("static regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub span: Span,
    /// `%* ... *%` rather than `% ...`
    pub block: bool,
    /// Only whitespace precedes the comment on its first line
    pub standalone: bool,
    /// Text without the comment markers, trimmed
    pub content: String,
}

impl Comment {
    /// Scan `file` for comments, in source order
    pub fn extract(file: &[String]) -> Vec<Comment> {
        let mut comments = Vec::new();
        let mut open: Option<(Span, bool, String)> = None;

        for (row, line) in file.iter().enumerate() {
            let line_number = row as u32 + 1;

            if let Some((mut span, standalone, mut content)) = open.take() {
                match block_end().find(line) {
                    Some(end) => {
                        content.push_str(&line[..end.start()]);
                        span.end_line = line_number;
                        span.end_column = end.end() as u32 + 1;
                        comments.push(Comment::block(span, standalone, &content));
                    }
                    None => {
                        content.push_str(line);
                        content.push('\n');
                        open = Some((span, standalone, content));
                    }
                }
                continue;
            }

            let start = block_start().find(line);
            let single = line_comment().find(line);

            match (start, single) {
                (Some(start), single) if single.is_none_or(|s| start.start() < s.start()) => {
                    let standalone = line[..start.start()].trim().is_empty();
                    let rest = &line[start.end()..];
                    let span = Span::new(line_number, start.start() as u32 + 1, line_number, 0);
                    match block_end().find(rest) {
                        Some(end) => {
                            let span = Span {
                                end_column: (start.end() + end.end()) as u32 + 1,
                                ..span
                            };
                            comments.push(Comment::block(span, standalone, &rest[..end.start()]));
                        }
                        None => open = Some((span, standalone, format!("{}\n", rest))),
                    }
                }
                (_, Some(single)) => {
                    comments.push(Comment {
                        span: Span::new(
                            line_number,
                            single.start() as u32 + 1,
                            line_number,
                            line.len() as u32 + 1,
                        ),
                        block: false,
                        standalone: line[..single.start()].trim().is_empty(),
                        content: line[single.start() + 1..].trim().to_string(),
                    });
                }
                _ => {}
            }
        }

        if let Some((span, _, _)) = open {
            tracing::warn!(line = span.start_line, "unterminated block comment");
        }

        comments
    }

    fn block(span: Span, standalone: bool, content: &str) -> Self {
        Self {
            span,
            block: true,
            standalone,
            content: content.trim().to_string(),
        }
    }

    /// Whether the comment documents a statement starting at `line`:
    /// it sits on that line, or it stands alone and ends right above it.
    pub fn documents(&self, line: u32) -> bool {
        self.span.start_line == line || (self.standalone && self.span.end_line + 1 == line)
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_line_comments() {
        let file = lines("% reachability\npath(X,Y) :- edge(X,Y). % base case");
        let comments = Comment::extract(&file);

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "reachability");
        assert!(comments[0].standalone);
        assert!(!comments[0].block);
        assert_eq!(comments[1].content, "base case");
        assert!(!comments[1].standalone);
        assert_eq!(comments[1].span.start_line, 2);
        assert_eq!(comments[1].span.start_column, 25);
    }

    #[test]
    fn test_block_comment() {
        let file = lines("%* Graph\n   encoding *%\nnode(1).");
        let comments = Comment::extract(&file);

        assert_eq!(comments.len(), 1);
        let comment = &comments[0];
        assert!(comment.block);
        assert_eq!(comment.content, "Graph\n   encoding");
        assert_eq!(comment.span, Span::new(1, 1, 2, 15));
        assert!(comment.documents(3));
    }

    #[test]
    fn test_inline_block_comment() {
        let file = lines("a. %* note *% b.");
        let comments = Comment::extract(&file);

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, "note");
        assert_eq!(comments[0].span, Span::new(1, 4, 1, 14));
        assert_eq!(comments[0].span.text(&file).as_deref(), Some("%* note *%"));
    }

    #[test]
    fn test_trailing_comment_documents_only_its_line() {
        let file = lines("a. % about a\nb.");
        let comments = Comment::extract(&file);
        assert!(comments[0].documents(1));
        assert!(!comments[0].documents(2));
    }

    #[test]
    fn test_no_comments() {
        assert!(Comment::extract(&lines("p(X) :- q(X).")).is_empty());
    }
}
