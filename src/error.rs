//! Error types for kube-aegis.

use crate::validator::parser::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum AegisError {
    /// A manifest or configuration file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A manifest could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Command-line input that cannot be acted on.
    #[error("{0}")]
    InvalidInput(String),
}

impl AegisError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means a manifest could not be validated at all.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<serde_json::Error> for AegisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AegisError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AegisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = AegisError::io(
            "manifests/missing.yaml",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert!(err.is_io());
        assert_eq!(
            err.to_string(),
            "cannot read manifests/missing.yaml: No such file or directory"
        );
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err = AegisError::from(ParseError::Empty);
        assert!(!err.is_io());
        assert_eq!(err.to_string(), "empty document");
    }

    #[test]
    fn test_config_error_display() {
        let err = AegisError::from(ConfigError::InvalidValue {
            key: "output.format".into(),
            value: "xml".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid value for output.format: xml"
        );
    }
}
