//! Loading items from JSON arrays and JSON Lines.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value as Json;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading items.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON array: {0}")]
    Array(#[source] serde_json::Error),

    #[error("invalid JSON on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// How the input text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A single JSON array.
    Array,
    /// One JSON value per line.
    Lines,
}

impl InputFormat {
    /// `.jsonl`/`.ndjson` files are JSON Lines; otherwise text starting with
    /// `[` is an array and anything else is JSON Lines.
    pub fn detect(path: Option<&Path>, text: &str) -> Self {
        let lines_extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "jsonl" | "ndjson"));

        if !lines_extension && text.trim_start().starts_with('[') {
            InputFormat::Array
        } else {
            InputFormat::Lines
        }
    }
}

/// Reads items from `path`, or stdin when `None`.
pub fn load(path: Option<&Path>) -> Result<Vec<Json>, InputError> {
    let text = match path {
        Some(path) => fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| InputError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            text
        }
    };

    let format = InputFormat::detect(path, &text);
    let items = parse(&text, format)?;
    debug!(?format, items = items.len(), "loaded items");
    Ok(items)
}

/// Parses items from text in the given format. Blank lines are skipped in
/// JSON Lines.
pub fn parse(text: &str, format: InputFormat) -> Result<Vec<Json>, InputError> {
    match format {
        InputFormat::Array => serde_json::from_str(text).map_err(InputError::Array),
        InputFormat::Lines => text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|source| InputError::Line {
                    line: index + 1,
                    source,
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn detects_format() {
        assert_eq!(InputFormat::detect(None, "  [1, 2]"), InputFormat::Array);
        assert_eq!(InputFormat::detect(None, "{\"a\": 1}"), InputFormat::Lines);
        assert_eq!(
            InputFormat::detect(Some(Path::new("items.jsonl")), "[1]"),
            InputFormat::Lines
        );
        assert_eq!(
            InputFormat::detect(Some(Path::new("items.json")), "[1]"),
            InputFormat::Array
        );
    }

    #[test]
    fn parses_array() {
        let items = parse(r#"["a", 1, {"b": true}]"#, InputFormat::Array).unwrap();
        assert_eq!(items, vec![json!("a"), json!(1), json!({"b": true})]);
    }

    #[test]
    fn array_must_be_an_array() {
        assert!(matches!(
            parse("[1, 2", InputFormat::Array),
            Err(InputError::Array(_))
        ));
    }

    #[test]
    fn parses_lines_skipping_blanks() {
        let items = parse("{\"a\": 1}\n\n\"x\"\n", InputFormat::Lines).unwrap();
        assert_eq!(items, vec![json!({"a": 1}), json!("x")]);
    }

    #[test]
    fn reports_bad_line_number() {
        let err = parse("1\n2\n{oops\n", InputFormat::Lines).unwrap_err();
        assert!(matches!(err, InputError::Line { line: 3, .. }));
        assert!(err.to_string().starts_with("invalid JSON on line 3"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Ann"}}]"#).unwrap();
        let items = load(Some(file.path())).unwrap();
        assert_eq!(items, vec![json!({"name": "Ann"})]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
