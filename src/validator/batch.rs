//! Validation of whole inputs: text streams, files and directory trees.
//!
//! Each file is independent, so files are validated in parallel. Output order
//! is always sorted by path, never by completion order.

use crate::error::AegisError;
use crate::validator::parser::{ParseError, decode_text, parse_documents};
use crate::validator::report::ValidationReport;
use crate::validator::validate::Validator;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Label used for input read from standard input.
pub const STDIN_LABEL: &str = "<stdin>";

/// Worst-wins classification of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Every document was validated and passed.
    Valid,
    /// Every document was validated; at least one failed.
    Invalid,
    /// At least one file or document could not be validated.
    Unvalidated,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Valid => 0,
            Self::Invalid => 1,
            Self::Unvalidated => 2,
        }
    }

    /// Combine two verdicts, keeping the worse.
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

/// What happened to one document of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The document parsed and was validated.
    Checked(ValidationReport),
    /// The document could not be parsed; no validation took place.
    Unparseable(ParseError),
}

impl DocumentOutcome {
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Checked(report) if report.valid => Verdict::Valid,
            Self::Checked(_) => Verdict::Invalid,
            Self::Unparseable(_) => Verdict::Unvalidated,
        }
    }

    /// The report, when the document was validated.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Checked(report) => Some(report),
            Self::Unparseable(_) => None,
        }
    }
}

/// Outcome of one input source.
#[derive(Debug)]
pub struct FileOutcome {
    /// File path, or `<stdin>`.
    pub source: PathBuf,
    /// Per-document outcomes, or the error that prevented reading the source.
    pub documents: Result<Vec<DocumentOutcome>, AegisError>,
}

impl FileOutcome {
    pub fn verdict(&self) -> Verdict {
        match &self.documents {
            Ok(docs) => docs
                .iter()
                .map(DocumentOutcome::verdict)
                .fold(Verdict::Valid, Verdict::worst),
            Err(_) => Verdict::Unvalidated,
        }
    }

    /// Reports of every validated document.
    pub fn reports(&self) -> impl Iterator<Item = &ValidationReport> {
        self.documents
            .iter()
            .flatten()
            .filter_map(DocumentOutcome::report)
    }
}

/// Outcome of a batch of sources, sorted by path.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub files: Vec<FileOutcome>,
}

impl BatchOutcome {
    /// Worst verdict across all files. An empty batch is valid.
    pub fn verdict(&self) -> Verdict {
        self.files
            .iter()
            .map(FileOutcome::verdict)
            .fold(Verdict::Valid, Verdict::worst)
    }

    /// Aggregate counts across the batch.
    pub fn totals(&self) -> BatchTotals {
        let mut totals = BatchTotals {
            files: self.files.len(),
            ..BatchTotals::default()
        };
        for file in &self.files {
            match &file.documents {
                Ok(docs) => {
                    for doc in docs {
                        match doc {
                            DocumentOutcome::Checked(report) => {
                                totals.documents += 1;
                                if report.valid {
                                    totals.valid += 1;
                                } else {
                                    totals.invalid += 1;
                                }
                                totals.errors += report.errors;
                                totals.warnings += report.warnings;
                            }
                            DocumentOutcome::Unparseable(_) => {
                                totals.documents += 1;
                                totals.unvalidated += 1;
                            }
                        }
                    }
                }
                Err(_) => totals.unreadable += 1,
            }
        }
        totals
    }
}

/// Counts summarizing a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    pub files: usize,
    pub unreadable: usize,
    pub documents: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unvalidated: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Validate every document of a YAML stream.
pub fn validate_content(content: &str, validator: &Validator<'_>) -> Vec<DocumentOutcome> {
    parse_documents(content)
        .into_iter()
        .map(|parsed| match parsed {
            Ok(doc) => DocumentOutcome::Checked(ValidationReport::new(
                validator.validate(&doc),
                doc.index(),
                doc.line(),
            )),
            Err(err) => DocumentOutcome::Unparseable(err),
        })
        .collect()
}

/// Validate raw input. Bytes that are not UTF-8 make one unparseable document.
pub fn validate_bytes(bytes: &[u8], validator: &Validator<'_>) -> Vec<DocumentOutcome> {
    match decode_text(bytes) {
        Ok(content) => validate_content(content, validator),
        Err(err) => vec![DocumentOutcome::Unparseable(err)],
    }
}

/// Read and validate a single file.
pub fn validate_file(path: &Path, validator: &Validator<'_>) -> FileOutcome {
    log::debug!("validating {}", path.display());
    let documents = std::fs::read(path)
        .map_err(|e| AegisError::io(path, e))
        .map(|bytes| validate_bytes(&bytes, validator));
    FileOutcome {
        source: path.to_path_buf(),
        documents,
    }
}

/// Validate text that did not come from a file (e.g. standard input).
pub fn validate_source(label: &str, content: &str, validator: &Validator<'_>) -> FileOutcome {
    FileOutcome {
        source: PathBuf::from(label),
        documents: Ok(validate_content(content, validator)),
    }
}

/// Expand inputs into the list of manifest files to validate.
///
/// Files are kept as given (a missing file surfaces later as an I/O error).
/// Directories are walked recursively for `*.yaml` and `*.yml`. The result is
/// sorted and free of duplicates.
pub fn collect_manifest_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in walkdir::WalkDir::new(input)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && is_manifest_file(entry_path) {
                    paths.push(entry_path.to_path_buf());
                }
            }
        } else {
            paths.push(input.clone());
        }
    }

    paths.sort();
    paths.dedup();
    paths
}

fn is_manifest_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Validate files and directories, in parallel across files.
pub fn validate_paths(inputs: &[PathBuf], validator: &Validator<'_>) -> BatchOutcome {
    let paths = collect_manifest_paths(inputs);
    log::info!("validating {} file(s)", paths.len());

    let files = paths
        .par_iter()
        .map(|path| validate_file(path, validator))
        .collect();

    BatchOutcome { files }
}
