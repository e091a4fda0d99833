//! Plain text formatter.

use crate::validator::batch::{BatchOutcome, DocumentOutcome, FileOutcome};
use crate::validator::report::ValidationReport;
use crate::validator::types::{Finding, Severity};
use colored::Colorize;

/// Format a batch outcome as plain text.
pub fn format(outcome: &BatchOutcome) -> String {
    let mut output = String::new();

    for file in &outcome.files {
        format_file(file, &mut output);
    }

    let totals = outcome.totals();
    if totals.files == 0 {
        output.push_str("No manifests found.\n");
        return output;
    }

    let mut line = format!(
        "\nChecked {} document(s) in {} file(s): {} valid, {} invalid",
        totals.documents, totals.files, totals.valid, totals.invalid
    );
    if totals.unvalidated + totals.unreadable > 0 {
        line.push_str(&format!(
            ", {} not validated",
            totals.unvalidated + totals.unreadable
        ));
    }
    line.push_str(".\n");
    output.push_str(&line);

    output
}

fn format_file(file: &FileOutcome, output: &mut String) {
    output.push_str(&format!("{}\n", file.source.display().to_string().bold()));

    let documents = match &file.documents {
        Ok(documents) => documents,
        Err(err) => {
            output.push_str(&format!("  {} {}\n", "error:".red().bold(), err));
            return;
        }
    };

    for (position, doc) in documents.iter().enumerate() {
        match doc {
            DocumentOutcome::Checked(report) => format_report(report, output),
            DocumentOutcome::Unparseable(err) => {
                output.push_str(&format!(
                    "  document {}: {} {}\n",
                    position + 1,
                    "could not parse:".red().bold(),
                    err
                ));
            }
        }
    }
}

/// Render one validated document.
pub fn format_report(report: &ValidationReport, output: &mut String) {
    let summary = report.summary_line();
    let summary = if report.valid {
        summary.green().bold()
    } else {
        summary.red().bold()
    };

    output.push_str(&format!(
        "  document {} (line {}) {}: {}\n",
        report.document + 1,
        report.line,
        report.object_identifier(),
        summary
    ));

    for finding in &report.findings {
        output.push_str(&format!("    - {}\n", format_finding(finding)));
    }
}

fn format_finding(finding: &Finding) -> String {
    let severity = match finding.severity {
        Severity::Error => format!("[{}]", finding.severity).red(),
        Severity::Warning => format!("[{}]", finding.severity).yellow(),
    };
    let mut line = format!("{} {}: {}", severity, finding.rule, finding.message);
    if let Some(path) = &finding.path {
        line.push_str(&format!(" ({})", path.dimmed()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AegisError;
    use crate::validator::batch::validate_source;
    use crate::validator::catalog::RuleCatalog;
    use crate::validator::validate::Validator;
    use std::io;
    use std::path::PathBuf;

    fn render(sources: &[(&str, &str)]) -> String {
        colored::control::set_override(false);
        let catalog = RuleCatalog::builtin();
        let validator = Validator::new(&catalog);
        let files = sources
            .iter()
            .map(|(label, content)| validate_source(label, content, &validator))
            .collect();
        format(&BatchOutcome { files })
    }

    #[test]
    fn test_format_valid() {
        let out = render(&[(
            "pod.yaml",
            "{apiVersion: v1, kind: Pod, metadata: {name: web}, spec: {containers: [{name: c, image: i}]}}",
        )]);
        assert!(out.contains("pod.yaml\n"));
        assert!(out.contains("document 1 (line 1) Pod/web: VALID"));
        assert!(out.contains("Checked 1 document(s) in 1 file(s): 1 valid, 0 invalid."));
    }

    #[test]
    fn test_format_findings() {
        let out = render(&[("cm.yaml", "{apiVersion: v1, kind: ConfigMap, metadata: {}}")]);
        assert!(out.contains("ConfigMap/<unnamed>: INVALID (2 errors, 0 warnings)"));
        assert!(out.contains(
            "    - [error] metadata-name: missing required field: metadata.name (metadata.name)"
        ));
        assert!(out.contains("    - [error] data-present: missing required field: data (data)"));
    }

    #[test]
    fn test_format_parse_and_io_errors() {
        colored::control::set_override(false);
        let outcome = BatchOutcome {
            files: vec![FileOutcome {
                source: PathBuf::from("gone.yaml"),
                documents: Err(AegisError::io(
                    "gone.yaml",
                    io::Error::new(io::ErrorKind::NotFound, "not found"),
                )),
            }],
        };
        let out = format(&outcome);
        assert!(out.contains("  error: cannot read gone.yaml: not found"));
        assert!(out.contains("1 not validated"));

        let out = render(&[("empty.yaml", "")]);
        assert!(out.contains("document 1: could not parse: empty document"));
    }

    #[test]
    fn test_format_no_files() {
        assert_eq!(format(&BatchOutcome::default()), "No manifests found.\n");
    }
}
