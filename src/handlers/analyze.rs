//! Handler for the `analyze` command.
//!
//! A detailed, single-file view: per document the kind, name, status, counts
//! and every finding with its rule code and path.

use crate::error::{AegisError, Result};
use crate::validator::batch::{DocumentOutcome, Verdict, validate_content};
use crate::validator::catalog::RuleCatalog;
use crate::validator::report::ValidationReport;
use crate::validator::types::Severity;
use crate::validator::validate::Validator;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;

pub fn handle_analyze(file: &Path, strict: bool) -> Result<Verdict> {
    let content = std::fs::read_to_string(file).map_err(|e| AegisError::io(file, e))?;

    let catalog = RuleCatalog::builtin();
    let validator = Validator::new(&catalog).strict(strict);
    let outcomes = validate_content(&content, &validator);

    print!("{}", render_analysis(file, &outcomes));

    Ok(outcomes
        .iter()
        .map(DocumentOutcome::verdict)
        .fold(Verdict::Valid, Verdict::worst))
}

/// Render the analysis of a file's documents.
pub fn render_analysis(file: &Path, outcomes: &[DocumentOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analyzing manifest: {}", file.display());
    let _ = writeln!(out, "{}", "-".repeat(60));

    for (position, outcome) in outcomes.iter().enumerate() {
        if outcomes.len() > 1 {
            let _ = writeln!(out, "{}", format!("Document {}", position + 1).bold());
        }
        match outcome {
            DocumentOutcome::Checked(report) => render_report(report, &mut out),
            DocumentOutcome::Unparseable(err) => {
                let _ = writeln!(out, "{} {}", "Parse error:".red().bold(), err);
            }
        }
        out.push('\n');
    }

    out
}

fn render_report(report: &ValidationReport, out: &mut String) {
    let status = if report.valid {
        "VALID".green().bold()
    } else {
        "INVALID".red().bold()
    };

    let _ = writeln!(out, "Kind: {}", report.kind.as_deref().unwrap_or("<missing>"));
    let _ = writeln!(out, "Name: {}", report.name.as_deref().unwrap_or("<unnamed>"));
    if let Some(namespace) = &report.namespace {
        let _ = writeln!(out, "Namespace: {}", namespace);
    }
    let _ = writeln!(out, "Line: {}", report.line);
    let _ = writeln!(out, "Status: {}", status);
    let _ = writeln!(out, "Errors: {}  Warnings: {}", report.errors, report.warnings);

    if report.findings.is_empty() {
        let _ = writeln!(out, "{}", "No issues found!".green());
        return;
    }

    let _ = writeln!(out, "{}", "Issues found:".yellow().bold());
    for finding in &report.findings {
        let line = format!("  - [{}] {}: {}", finding.severity, finding.rule, finding.message);
        let line = match finding.severity {
            Severity::Error => line.red(),
            Severity::Warning => line.yellow(),
        };
        let _ = write!(out, "{}", line);
        if let Some(path) = &finding.path {
            let _ = write!(out, " {}", format!("(at {})", path).dimmed());
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(yaml: &str) -> String {
        colored::control::set_override(false);
        let catalog = RuleCatalog::builtin();
        let outcomes = validate_content(yaml, &Validator::new(&catalog));
        render_analysis(Path::new("app.yaml"), &outcomes)
    }

    #[test]
    fn test_analysis_of_valid_manifest() {
        let out = analyze("apiVersion: v1\nkind: Secret\nmetadata:\n  name: creds\n  namespace: prod\nstringData:\n  token: x\n");
        assert!(out.starts_with("Analyzing manifest: app.yaml\n"));
        assert!(out.contains("Kind: Secret\n"));
        assert!(out.contains("Name: creds\n"));
        assert!(out.contains("Namespace: prod\n"));
        assert!(out.contains("Status: VALID\n"));
        assert!(out.contains("No issues found!"));
        assert!(!out.contains("Document 1"));
    }

    #[test]
    fn test_analysis_lists_findings() {
        let out = analyze("apiVersion: v1\nkind: Service\nmetadata: {}\nspec: {}\n");
        assert!(out.contains("Status: INVALID\n"));
        assert!(out.contains("Errors: 2  Warnings: 0"));
        assert!(out.contains(
            "  - [error] metadata-name: missing required field: metadata.name (at metadata.name)"
        ));
        assert!(out.contains("  - [error] ports-present: missing required field: spec.ports (at spec.ports)"));
    }

    #[test]
    fn test_analysis_of_stream() {
        let out = analyze("kind: Pod\n---\nkind: [broken\n");
        assert!(out.contains("Document 1"));
        assert!(out.contains("Document 2"));
        assert!(out.contains("Parse error:"));
    }
}
