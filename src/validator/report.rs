//! Presentation model for validation results.

use crate::validator::types::Finding;
use crate::validator::validate::ValidationResult;
use serde::Serialize;

/// A validation result packaged for rendering or serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Zero-based position of the document in its source.
    pub document: usize,
    /// 1-based line where the document starts.
    pub line: usize,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub valid: bool,
    pub errors: usize,
    pub warnings: usize,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Build a report for a document at a given position.
    pub fn new(result: ValidationResult, document: usize, line: usize) -> Self {
        Self {
            document,
            line,
            errors: result.error_count(),
            warnings: result.warning_count(),
            kind: result.kind,
            name: result.name,
            namespace: result.namespace,
            valid: result.valid,
            findings: result.findings,
        }
    }

    /// One-line verdict: `VALID` or `INVALID (n errors, m warnings)`.
    pub fn summary_line(&self) -> String {
        summary_line(self.valid, self.errors, self.warnings)
    }

    /// `Kind/name`, falling back to placeholders.
    pub fn object_identifier(&self) -> String {
        let kind = self.kind.as_deref().unwrap_or("<unknown kind>");
        match (&self.namespace, &self.name) {
            (Some(ns), Some(name)) => format!("{}/{}/{}", kind, ns, name),
            (None, Some(name)) => format!("{}/{}", kind, name),
            _ => format!("{}/<unnamed>", kind),
        }
    }
}

impl From<ValidationResult> for ValidationReport {
    fn from(result: ValidationResult) -> Self {
        Self::new(result, 0, 1)
    }
}

/// Derive the verdict line from counts alone.
pub fn summary_line(valid: bool, errors: usize, warnings: usize) -> String {
    if valid {
        "VALID".to_string()
    } else {
        format!("INVALID ({} errors, {} warnings)", errors, warnings)
    }
}
