//! Handler for the `validate` command.

use crate::error::{AegisError, Result};
use crate::validator::batch::{
    BatchOutcome, FileOutcome, STDIN_LABEL, Verdict, validate_bytes, validate_paths,
};
use crate::validator::catalog::RuleCatalog;
use crate::validator::formatter::{OutputFormat, format_outcome};
use crate::validator::validate::Validator;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Options for the validate command
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    pub format: OutputFormat,
    pub strict: bool,
    /// Skip the report; only the exit status is produced.
    pub quiet: bool,
}

/// Validate every input and print the report. Returns the batch verdict.
pub fn handle_validate(paths: &[PathBuf], options: &ValidateOptions) -> Result<Verdict> {
    let catalog = RuleCatalog::builtin();
    let validator = Validator::new(&catalog).strict(options.strict);

    let outcome = run_validate(paths, &validator, read_stdin);
    let verdict = outcome.verdict();
    log::info!(
        "{} file(s) checked, verdict {:?}",
        outcome.files.len(),
        verdict
    );

    if !options.quiet {
        format_outcome(&outcome, options.format);
    }

    Ok(verdict)
}

/// Validate inputs, with `-` standing for text supplied by `stdin`.
///
/// Standard input, when requested, comes first; files follow in path order.
pub fn run_validate(
    paths: &[PathBuf],
    validator: &Validator<'_>,
    stdin: impl FnOnce() -> Result<Vec<u8>>,
) -> BatchOutcome {
    let (stdin_inputs, file_inputs): (Vec<PathBuf>, Vec<PathBuf>) =
        paths.iter().cloned().partition(|p| is_stdin(p));

    let mut files = Vec::new();
    if !stdin_inputs.is_empty() {
        files.push(match stdin() {
            Ok(bytes) => FileOutcome {
                source: PathBuf::from(STDIN_LABEL),
                documents: Ok(validate_bytes(&bytes, validator)),
            },
            Err(err) => FileOutcome {
                source: PathBuf::from(STDIN_LABEL),
                documents: Err(err),
            },
        });
    }

    if !file_inputs.is_empty() {
        files.extend(validate_paths(&file_inputs, validator).files);
    }

    BatchOutcome { files }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut content = Vec::new();
    std::io::stdin()
        .read_to_end(&mut content)
        .map_err(|e| AegisError::io(STDIN_LABEL, e))?;
    Ok(content)
}
