//! # kube-aegis
//!
//! Structural validation for Kubernetes manifests. Manifests are parsed from
//! YAML, checked against a catalog of per-kind rules (required top-level
//! fields, known kinds, `metadata.name`, containers, ports, data), and
//! summarized as pass/fail with a list of findings.
//!
//! The tool never contacts a cluster and does not validate against the full
//! OpenAPI schema.
//!
//! ## Example
//!
//! ```rust
//! use kube_aegis::validator::{RuleCatalog, Validator, validate_content};
//!
//! let stream = "apiVersion: v1\nkind: Pod\nmetadata: {}\n";
//! let catalog = RuleCatalog::builtin();
//! let outcomes = validate_content(stream, &Validator::new(&catalog));
//!
//! let report = outcomes[0].report().unwrap();
//! assert!(!report.valid);
//! assert_eq!(report.summary_line(), "INVALID (2 errors, 0 warnings)");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod validator;

pub use error::{AegisError, Result};
pub use validator::{
    Finding, ManifestDocument, ParseError, RuleCatalog, Severity, ValidationReport,
    ValidationResult, Validator, Verdict,
};

use cli::Commands;
use config::Config;
use std::path::Path;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute a command against the effective configuration.
///
/// `quiet` suppresses the validation report; every other command prints as usual.
pub fn run_command(
    command: Commands,
    config: &Config,
    config_source: Option<&Path>,
    quiet: bool,
) -> Result<Verdict> {
    match command {
        Commands::Validate {
            paths,
            format,
            strict,
        } => {
            let options = handlers::ValidateOptions {
                format: format.unwrap_or(config.output.format),
                strict: strict || config.validation.strict,
                quiet,
            };
            handlers::handle_validate(&paths, &options)
        }
        Commands::Analyze { file, strict } => {
            handlers::handle_analyze(&file, strict || config.validation.strict)
        }
        Commands::Fix {
            file,
            write,
            namespace,
        } => {
            let mut options = config.resolver.to_options();
            if let Some(namespace) = namespace.filter(|n| !n.trim().is_empty()) {
                options = options.with_namespace(namespace);
            }
            handlers::handle_fix(&file, write, &options)
        }
        Commands::Rules { json } => handlers::handle_rules(json).map(|_| Verdict::Valid),
        Commands::Config => {
            handlers::handle_config(config, config_source).map(|_| Verdict::Valid)
        }
        Commands::Health { json } => handlers::handle_health(config, json).map(|_| Verdict::Valid),
    }
}
