//! YAML loading for Kubernetes manifests.
//!
//! Multi-document streams are split on `---` separator lines and `...` end
//! markers, and every chunk is parsed on its own, so a syntax error in one
//! document never hides the others.

use crate::validator::document::{ManifestDocument, type_name};
use serde_yaml::Value;
use thiserror::Error;

/// Errors raised while turning raw text into a `ManifestDocument`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input holds no document at all.
    #[error("empty document")]
    Empty,

    /// Malformed YAML (bad syntax, indentation, duplicate keys, ...).
    #[error("YAML syntax error{}: {message}", line_suffix(.line))]
    Syntax {
        /// Absolute 1-based line of the error, when known.
        line: Option<usize>,
        message: String,
    },

    /// The document parsed, but its top level is not a mapping.
    #[error("manifest must be a YAML mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// The input is not UTF-8 text.
    #[error("input is not valid UTF-8 (line {line})")]
    InvalidUtf8 { line: usize },

    /// A single document was expected.
    #[error("expected a single document, found {count}")]
    MultipleDocuments { count: usize },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// A raw document chunk cut from a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Chunk {
    /// 1-based line of the chunk's first content line.
    line: usize,
    /// Leading directive and `---` lines that precede the content in `text`.
    preamble: usize,
    text: String,
}

impl Chunk {
    fn starting_at(line: usize) -> Self {
        Self {
            line,
            preamble: 0,
            text: String::new(),
        }
    }

    /// A chunk whose `%` directives must travel with it.
    fn with_directives(line: usize, directives: &[&str]) -> Self {
        let mut chunk = Self::starting_at(line);
        if !directives.is_empty() {
            for directive in directives {
                chunk.push_line(directive);
            }
            chunk.push_line("---");
            chunk.preamble = directives.len() + 1;
        }
        chunk
    }

    fn push_line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn is_blank(&self) -> bool {
        self.text.lines().skip(self.preamble).all(|l| {
            let l = l.trim();
            l.is_empty() || l.starts_with('#') || l == "..."
        })
    }

    /// Map a chunk-relative 1-based line to its line in the stream.
    fn absolute_line(&self, relative: usize) -> usize {
        self.line + relative.saturating_sub(1 + self.preamble)
    }
}

/// Decode raw input as UTF-8 manifest text.
pub fn decode_text(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        line: bytes[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count() + 1,
    })
}

/// Parse text that must contain exactly one manifest.
pub fn parse_document(content: &str) -> Result<ManifestDocument, ParseError> {
    let mut outcomes = parse_documents(content);
    if outcomes.len() > 1 {
        return Err(ParseError::MultipleDocuments {
            count: outcomes.len(),
        });
    }
    outcomes.pop().unwrap_or(Err(ParseError::Empty))
}

/// Parse a stream of `---`-delimited manifests.
///
/// Returns one entry per non-empty document, in source order. Input that
/// contains no document yields a single `ParseError::Empty`.
pub fn parse_documents(content: &str) -> Vec<Result<ManifestDocument, ParseError>> {
    let outcomes: Vec<_> = split_documents(content)
        .into_iter()
        .filter(|chunk| !chunk.is_blank())
        .enumerate()
        .map(|(index, chunk)| parse_chunk(&chunk, index))
        .collect();

    log::debug!("parsed {} document(s)", outcomes.len());

    if outcomes.is_empty() {
        vec![Err(ParseError::Empty)]
    } else {
        outcomes
    }
}

fn parse_chunk(chunk: &Chunk, index: usize) -> Result<ManifestDocument, ParseError> {
    let value: Value = serde_yaml::from_str(&chunk.text).map_err(|e| {
        let line = e.location().map(|loc| chunk.absolute_line(loc.line()));
        let message = e.to_string();
        // serde_yaml reports chunk-relative positions; drop them in favor of `line`.
        let message = match message.find(" at line ") {
            Some(pos) => message[..pos].to_string(),
            None => message,
        };
        ParseError::Syntax { line, message }
    })?;

    match value {
        Value::Mapping(root) => Ok(ManifestDocument::new(root).with_position(index, chunk.line)),
        Value::Null => Err(ParseError::Empty),
        other => Err(ParseError::NotAMapping {
            found: type_name(&other),
        }),
    }
}

/// Cut a stream into chunks at `---` separator and `...` end lines.
///
/// `%` directive lines between documents are carried into the chunk of the
/// document they introduce.
fn split_documents(content: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = Chunk::starting_at(1);
    let mut directives: Vec<&str> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        if let Some(rest) = separator_remainder(line) {
            let next = Chunk::with_directives(line_no + 1, &directives);
            directives.clear();
            chunks.push(std::mem::replace(&mut current, next));
            // `--- {inline: doc}` keeps its content on the separator line.
            if !rest.is_empty() {
                current.line = line_no;
                current.push_line(rest);
            }
            continue;
        }
        if is_document_end(line) {
            chunks.push(std::mem::replace(&mut current, Chunk::starting_at(line_no + 1)));
            continue;
        }
        if line.starts_with('%') && current.is_blank() {
            directives.push(line);
            continue;
        }
        current.push_line(line);
    }
    chunks.push(current);
    chunks
}

fn separator_remainder(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("---")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn is_document_end(line: &str) -> bool {
    line.strip_prefix("...").is_some_and(|rest| {
        let rest = rest.trim_start();
        rest.is_empty() || rest.starts_with('#')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_document() {
        let yaml = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
  - name: c1
    image: nginx
"#;
        let doc = parse_document(yaml).unwrap();
        assert_eq!(doc.kind(), Some("Pod"));
        assert_eq!(doc.name(), Some("web"));
        assert_eq!(doc.index(), 0);
    }

    #[test]
    fn test_parse_empty_yaml() {
        assert_eq!(parse_document(""), Err(ParseError::Empty));
        assert_eq!(parse_document("   \n\n"), Err(ParseError::Empty));
        assert_eq!(parse_document("# only a comment\n"), Err(ParseError::Empty));
        assert_eq!(parse_document("~\n"), Err(ParseError::Empty));
        assert_eq!(ParseError::Empty.to_string(), "empty document");
    }

    #[test]
    fn test_parse_scalar_is_not_a_mapping() {
        assert_eq!(
            parse_document("just a string"),
            Err(ParseError::NotAMapping { found: "string" })
        );
        assert_eq!(
            parse_document("- a\n- b\n"),
            Err(ParseError::NotAMapping { found: "sequence" })
        );
    }

    #[test]
    fn test_parse_syntax_error() {
        let yaml = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: [unclosed\n";
        match parse_document(yaml) {
            Err(ParseError::Syntax { line, message }) => {
                assert!(line.is_none_or(|l| l >= 4));
                assert!(!message.contains(" at line "));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_indentation() {
        let yaml = "metadata:\n  name: web\n    labels: x\n";
        assert!(matches!(parse_document(yaml), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_parse_multi_document() {
        let yaml = r#"
apiVersion: v1
kind: Service
metadata:
  name: my-service
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: my-deployment
"#;
        let docs = parse_documents(yaml);
        assert_eq!(docs.len(), 2);
        let first = docs[0].as_ref().unwrap();
        let second = docs[1].as_ref().unwrap();
        assert_eq!(first.name(), Some("my-service"));
        assert_eq!(second.name(), Some("my-deployment"));
        assert_eq!(second.index(), 1);
        assert_eq!(second.line(), 7);

        assert_eq!(
            parse_document(yaml),
            Err(ParseError::MultipleDocuments { count: 2 })
        );
    }

    #[test]
    fn test_syntax_error_isolated_to_its_document() {
        let yaml = "kind: Pod\n---\nkind: [broken\n---\nkind: Service\n";
        let docs = parse_documents(yaml);
        assert_eq!(docs.len(), 3);
        assert!(docs[0].is_ok());
        match &docs[1] {
            Err(ParseError::Syntax { line, .. }) => assert!(line.is_none_or(|l| l >= 3)),
            other => panic!("expected syntax error, got {:?}", other),
        }
        assert_eq!(docs[2].as_ref().unwrap().kind(), Some("Service"));
        assert_eq!(docs[2].as_ref().unwrap().index(), 2);
    }

    #[test]
    fn test_empty_chunks_are_skipped() {
        let yaml = "---\n# leading comment\n---\nkind: Pod\n---\n\n";
        let docs = parse_documents(yaml);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].as_ref().unwrap().line(), 4);
    }

    #[test]
    fn test_separator_lookalikes_are_content() {
        let yaml = "kind: ConfigMap\ndata:\n  banner: \"---x\"\n";
        let docs = parse_documents(yaml);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].is_ok());
        assert_eq!(separator_remainder("---x"), None);
        assert_eq!(separator_remainder("--- "), Some(""));
    }

    #[test]
    fn test_inline_document_after_separator() {
        let docs = parse_documents("kind: Pod\n--- {kind: Secret}\n");
        assert_eq!(docs.len(), 2);
        let second = docs[1].as_ref().unwrap();
        assert_eq!(second.kind(), Some("Secret"));
        assert_eq!(second.line(), 2);
    }

    #[test]
    fn test_directive_travels_with_its_document() {
        let yaml = "%YAML 1.2\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: cfg\n";
        let docs = parse_documents(yaml);
        assert_eq!(docs.len(), 1);
        let doc = docs[0].as_ref().unwrap();
        assert_eq!(doc.kind(), Some("ConfigMap"));
        assert_eq!(doc.line(), 3);
    }

    #[test]
    fn test_directive_between_documents() {
        let yaml = "kind: Pod\n...\n%YAML 1.2\n---\nkind: Service\nspec: [oops\n";
        let docs = parse_documents(yaml);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].as_ref().unwrap().kind(), Some("Pod"));
        match &docs[1] {
            Err(ParseError::Syntax { line, .. }) => assert!(line.is_none_or(|l| l >= 5)),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_document_end_marker_splits() {
        let docs = parse_documents("kind: Pod\n...\nkind: Service\n");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].as_ref().unwrap().kind(), Some("Pod"));
        let second = docs[1].as_ref().unwrap();
        assert_eq!(second.kind(), Some("Service"));
        assert_eq!(second.line(), 3);

        let docs = parse_documents("kind: Pod\n...\n---\nkind: Service\n");
        assert_eq!(docs.len(), 2);
        assert!(is_document_end("... # done"));
        assert!(!is_document_end("...x"));
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text(b"kind: Pod\n"), Ok("kind: Pod\n"));
        let err = decode_text(b"kind: Pod\nmetadata:\n  name: \xff\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidUtf8 { line: 3 });
        assert_eq!(err.to_string(), "input is not valid UTF-8 (line 3)");
    }
}
