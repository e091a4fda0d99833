//! Core types for the manifest validator.
//!
//! - `Severity` - Finding severity levels
//! - `RuleCode` - Rule identifiers (e.g., "metadata-name")
//! - `Finding` - A single rule violation

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Severity levels for findings.
///
/// Ordered from most severe to least severe: `Error > Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural violations that make a manifest invalid
    #[default]
    Error,
    /// Deviations that only invalidate a manifest in strict mode
    Warning,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Error => 1,
            Self::Warning => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A rule identifier (e.g., "api-version", "containers-present").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleCode(pub String);

impl RuleCode {
    /// Rule code attached to the unknown-kind finding.
    pub const UNKNOWN_KIND: &'static str = "unknown-kind";

    /// Create a new rule code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RuleCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RuleCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for RuleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single rule violation found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The severity of the violation.
    pub severity: Severity,
    /// The rule that produced this finding.
    pub rule: RuleCode,
    /// A human-readable message describing the violation.
    pub message: String,
    /// The field path the finding refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Finding {
    /// Create a new finding without a field path.
    pub fn new(severity: Severity, rule: impl Into<RuleCode>, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule: rule.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Create an error-severity finding.
    pub fn error(rule: impl Into<RuleCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, rule, message)
    }

    /// Create a warning-severity finding.
    pub fn warning(rule: impl Into<RuleCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, rule, message)
    }

    /// Set the field path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Check if this finding has error severity.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule, self.message)?;
        if let Some(path) = &self.path {
            write!(f, " ({})", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert_eq!(
            [Severity::Warning, Severity::Error].iter().max(),
            Some(&Severity::Error)
        );
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("WARNING"), Some(Severity::Warning));
        assert_eq!(Severity::parse("warn"), Some(Severity::Warning));
        assert_eq!(Severity::parse("info"), None);
    }

    #[test]
    fn test_finding_display() {
        let f = Finding::error("metadata-name", "missing required field: metadata.name")
            .with_path("metadata.name");
        assert_eq!(
            f.to_string(),
            "[error] metadata-name: missing required field: metadata.name (metadata.name)"
        );
        assert!(f.is_error());

        let w = Finding::warning("style", "something odd");
        assert_eq!(w.to_string(), "[warning] style: something odd");
        assert!(!w.is_error());
    }

    #[test]
    fn test_finding_json_shape() {
        let f = Finding::error("ports-present", "spec.ports must not be empty").with_path("spec.ports");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["rule"], "ports-present");
        assert_eq!(json["path"], "spec.ports");

        let no_path = serde_json::to_value(Finding::warning("x", "y")).unwrap();
        assert!(no_path.get("path").is_none());
    }
}
