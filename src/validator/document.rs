//! Parsed manifest documents and dotted field-path queries.

use serde_yaml::{Mapping, Value};
use std::fmt;

/// A parsed Kubernetes manifest.
///
/// The root is always a YAML mapping; the loader rejects anything else.
/// Documents are never mutated after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Mapping,
    index: usize,
    line: usize,
}

impl ManifestDocument {
    /// Wrap a mapping as a standalone document.
    pub fn new(root: Mapping) -> Self {
        Self {
            root,
            index: 0,
            line: 1,
        }
    }

    /// Record where the document sits in its source stream.
    pub fn with_position(mut self, index: usize, line: usize) -> Self {
        self.index = index;
        self.line = line;
        self
    }

    /// Zero-based position of this document in a multi-document stream.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based line on which the document starts.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The top-level mapping.
    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Query a dotted field path.
    pub fn lookup(&self, path: &FieldPath) -> Lookup<'_> {
        path.lookup(&self.root)
    }

    /// The declared `kind`, when it is a string.
    pub fn kind(&self) -> Option<&str> {
        self.get("kind").and_then(Value::as_str)
    }

    /// `metadata.name`, when present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    /// `metadata.namespace`, when present and non-empty.
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.get("metadata")?
            .get(key)?
            .as_str()
            .filter(|s| !s.trim().is_empty())
    }

    /// Clone the document back into a YAML value.
    pub fn to_value(&self) -> Value {
        Value::Mapping(self.root.clone())
    }
}

/// Result of a field-path query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The path resolved to a value.
    Found(&'a Value),
    /// Some segment of the path does not exist (or is null).
    Missing,
    /// A prefix of the path holds something other than a mapping.
    NotAMapping {
        /// Number of leading segments that resolved to the offending value.
        depth: usize,
        /// YAML type name of the offending value.
        found: &'static str,
    },
}

impl<'a> Lookup<'a> {
    /// The resolved value, if any.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the path resolved to a non-null value.
    pub fn exists(&self) -> bool {
        matches!(self, Self::Found(v) if !v.is_null())
    }
}

/// A dotted path into a manifest, e.g. `spec.template.spec.containers`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path. Empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The path's segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Render the first `depth` segments.
    pub fn prefix(&self, depth: usize) -> String {
        self.segments[..depth.min(self.segments.len())].join(".")
    }

    /// Resolve the path against a mapping.
    ///
    /// An explicit `null` anywhere along the path counts as missing.
    pub fn lookup<'a>(&self, root: &'a Mapping) -> Lookup<'a> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Lookup::Missing;
        };

        let mut current = root;
        for (depth, segment) in parents.iter().enumerate() {
            match current.get(segment.as_str()) {
                None | Some(Value::Null) => return Lookup::Missing,
                Some(Value::Mapping(m)) => current = m,
                Some(other) => {
                    return Lookup::NotAMapping {
                        depth: depth + 1,
                        found: type_name(other),
                    };
                }
            }
        }

        match current.get(last.as_str()) {
            None | Some(Value::Null) => Lookup::Missing,
            Some(v) => Lookup::Found(v),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Human-readable YAML type name of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> ManifestDocument {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        ManifestDocument::new(value.as_mapping().unwrap().clone())
    }

    #[test]
    fn test_lookup_found() {
        let d = doc("metadata:\n  name: web\n");
        let found = d.lookup(&FieldPath::parse("metadata.name"));
        assert_eq!(found.value().and_then(Value::as_str), Some("web"));
        assert!(found.exists());
    }

    #[test]
    fn test_lookup_missing_segments() {
        let d = doc("metadata: {}\n");
        assert_eq!(d.lookup(&"metadata.name".into()), Lookup::Missing);
        assert_eq!(d.lookup(&"spec.containers".into()), Lookup::Missing);
    }

    #[test]
    fn test_lookup_null_is_missing() {
        let d = doc("metadata:\nspec:\n  ports: ~\n");
        assert_eq!(d.lookup(&"metadata.name".into()), Lookup::Missing);
        assert_eq!(d.lookup(&"spec.ports".into()), Lookup::Missing);
    }

    #[test]
    fn test_lookup_through_scalar() {
        let d = doc("spec: just-a-string\n");
        let path = FieldPath::parse("spec.template.spec.containers");
        assert_eq!(
            d.lookup(&path),
            Lookup::NotAMapping {
                depth: 1,
                found: "string"
            }
        );
        assert_eq!(path.prefix(1), "spec");
    }

    #[test]
    fn test_parse_and_display() {
        let path = FieldPath::parse("spec..template.spec.");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "spec.template.spec");
        assert_eq!(FieldPath::parse("").lookup(&Mapping::new()), Lookup::Missing);
    }

    #[test]
    fn test_document_accessors() {
        let d = doc("kind: Pod\nmetadata:\n  name: web\n  namespace: '  '\n");
        assert_eq!(d.kind(), Some("Pod"));
        assert_eq!(d.name(), Some("web"));
        assert_eq!(d.namespace(), None);
        assert_eq!(d.index(), 0);
        assert_eq!(d.line(), 1);

        let d = d.with_position(2, 14);
        assert_eq!((d.index(), d.line()), (2, 14));
    }

    #[test]
    fn test_non_string_kind() {
        let d = doc("kind: 42\n");
        assert_eq!(d.kind(), None);
        assert_eq!(type_name(d.get("kind").unwrap()), "number");
    }
}
