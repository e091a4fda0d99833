//! Structural validation of Kubernetes manifests.
//!
//! The engine is a pipeline of small pieces:
//!
//! - [`parser`] turns YAML text into [`ManifestDocument`]s, keeping syntax
//!   errors apart from validation findings
//! - [`catalog`] maps each supported kind to its ordered [`ValidationRule`]s
//! - [`validate`] applies a catalog to one document and collects [`Finding`]s
//! - [`report`] packages a result for rendering
//! - [`batch`] runs the pipeline over streams, files and directories
//!
//! [`resolver`] is separate from validation: it proposes a repaired copy of a
//! manifest with conventional defaults filled in.
//!
//! # Example
//!
//! ```rust
//! use kube_aegis::validator::{RuleCatalog, Validator, parse_document};
//!
//! let yaml = r#"
//! apiVersion: v1
//! kind: ConfigMap
//! metadata:
//!   name: settings
//! data: {}
//! "#;
//!
//! let catalog = RuleCatalog::builtin();
//! let document = parse_document(yaml).unwrap();
//! let result = Validator::new(&catalog).validate(&document);
//! assert!(result.valid);
//! ```

pub mod batch;
pub mod catalog;
pub mod document;
pub mod formatter;
pub mod parser;
pub mod repair;
pub mod report;
pub mod resolver;
pub mod types;
pub mod validate;

pub use batch::{
    BatchOutcome, BatchTotals, DocumentOutcome, FileOutcome, STDIN_LABEL, Verdict,
    validate_bytes, validate_content, validate_file, validate_paths, validate_source,
};
pub use catalog::{Check, ResourceKind, RuleCatalog, ValidationRule};
pub use document::{FieldPath, Lookup, ManifestDocument};
pub use formatter::OutputFormat;
pub use parser::{ParseError, decode_text, parse_document, parse_documents};
pub use repair::{SyntaxRepair, repair_syntax};
pub use report::ValidationReport;
pub use resolver::{Resolution, ResolveOptions, resolve};
pub use types::{Finding, RuleCode, Severity};
pub use validate::{ValidationResult, Validator};
