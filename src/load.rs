//! Loading helpers
//!
//! The enrichment core never touches the filesystem. These helpers read a
//! parser's JSON AST dump and the matching source file, then hand both to
//! [`Cleast::new`].

use std::path::Path;
use crate::cleast::Cleast;
use crate::raw::RawNode;
use crate::Result;

/// Read a JSON array of top-level raw nodes
pub fn read_ast(path: &Path) -> Result<Vec<RawNode>> {
    let contents = std::fs::read_to_string(path)?;
    let ast: Vec<RawNode> = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), statements = ast.len(), "read AST");
    Ok(ast)
}

/// Read a source file as lines without terminators
pub fn read_source(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}

/// Directory holding `path`, `.` for a bare filename
pub fn src_dir_of(path: &Path) -> String {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    }
}

/// Load and enrich `source` from its AST dump. Without an explicit
/// `src_dir` the source's own directory is used.
pub fn open(ast: &Path, source: &Path, src_dir: Option<&str>) -> Result<Cleast> {
    let ast_list = read_ast(ast)?;
    let file = read_source(source)?;
    let src_dir = src_dir.map(str::to_string).unwrap_or_else(|| src_dir_of(source));
    Cleast::new(ast_list, file, source.to_string_lossy(), src_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::fs;
    use tempfile::tempdir;

    const AST: &str = r#"[
        {
            "type": "Rule",
            "location": {
                "begin": {"filename": "FILE", "line": 1, "column": 1},
                "end": {"filename": "FILE", "line": 1, "column": 14}
            },
            "head": {
                "type": "Literal",
                "sign": "no_sign",
                "atom": {
                    "type": "SymbolicAtom",
                    "symbol": {
                        "type": "Function",
                        "name": "p",
                        "arguments": [{"type": "Variable", "name": "X"}],
                        "external": false
                    }
                }
            },
            "body": [
                {
                    "type": "Literal",
                    "sign": "negation",
                    "atom": {
                        "type": "SymbolicAtom",
                        "symbol": {
                            "type": "Function",
                            "name": "q",
                            "arguments": [{"type": "Variable", "name": "X"}],
                            "external": false
                        }
                    }
                }
            ]
        }
    ]"#;

    #[test]
    fn test_src_dir_of() {
        assert_eq!(src_dir_of(Path::new("encoding.lp")), ".");
        assert_eq!(src_dir_of(Path::new("src/graph/reach.lp")), "src/graph");
    }

    #[test]
    fn test_open_from_files() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("main.lp");
        let ast = dir.path().join("main.json");
        fs::write(&source, "p(X) :- not q(X).\n").unwrap();
        let filename = source.to_string_lossy().replace('\\', "\\\\");
        fs::write(&ast, AST.replace("FILE", &filename)).unwrap();

        let cleast = open(&ast, &source, None).unwrap();
        assert_eq!(cleast.len(), 1);
        assert_eq!(cleast.is_safe(0), Some(false));
        assert_eq!(cleast.diagnostic(0).unwrap().variables, vec!["X".to_string()]);

        let statement = cleast.statement(0).unwrap();
        assert!(statement.local);
        assert_eq!(statement.prefix, "main.");
    }

    #[test]
    fn test_read_ast_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let ast = dir.path().join("broken.json");
        fs::write(&ast, "[{").unwrap();
        assert!(matches!(read_ast(&ast), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempdir().unwrap();
        let result = read_source(&dir.path().join("missing.lp"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
