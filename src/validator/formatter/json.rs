//! JSON formatter.

use crate::validator::batch::{BatchOutcome, BatchTotals, DocumentOutcome, FileOutcome, Verdict};
use crate::validator::report::ValidationReport;
use serde::Serialize;

/// Format a batch outcome as JSON.
pub fn format(outcome: &BatchOutcome) -> String {
    let output = JsonOutput::from(outcome);
    let mut json = serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: Vec<JsonFile<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    source: String,
    verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    documents: Vec<JsonDocument<'a>>,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    status: &'static str,
    #[serde(flatten)]
    report: Option<&'a ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> JsonDocument<'a> {
    fn new(position: usize, outcome: &'a DocumentOutcome) -> Self {
        match outcome {
            DocumentOutcome::Checked(report) => Self {
                status: "checked",
                report: Some(report),
                summary: Some(report.summary_line()),
                document: None,
                error: None,
            },
            DocumentOutcome::Unparseable(err) => Self {
                status: "unparseable",
                report: None,
                summary: None,
                document: Some(position),
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Serialize)]
struct JsonSummary {
    verdict: Verdict,
    #[serde(flatten)]
    totals: BatchTotals,
}

impl<'a> From<&'a BatchOutcome> for JsonOutput<'a> {
    fn from(outcome: &'a BatchOutcome) -> Self {
        Self {
            files: outcome.files.iter().map(JsonFile::from).collect(),
            summary: JsonSummary {
                verdict: outcome.verdict(),
                totals: outcome.totals(),
            },
        }
    }
}

impl<'a> From<&'a FileOutcome> for JsonFile<'a> {
    fn from(file: &'a FileOutcome) -> Self {
        let (documents, error) = match &file.documents {
            Ok(docs) => (
                docs.iter()
                    .enumerate()
                    .map(|(i, doc)| JsonDocument::new(i, doc))
                    .collect(),
                None,
            ),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };

        Self {
            source: file.source.display().to_string(),
            verdict: file.verdict(),
            error,
            documents,
        }
    }
}
