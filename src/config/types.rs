use crate::validator::formatter::OutputFormat;
use crate::validator::resolver::{DEFAULT_IMAGE, DEFAULT_NAMESPACE, ResolveOptions};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub output: OutputConfig,
    pub resolver: ResolverConfig,
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Treat warnings as failures.
    pub strict: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

/// Defaults used by `fix`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub default_namespace: String,
    pub default_image: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            default_image: DEFAULT_IMAGE.to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn to_options(&self) -> ResolveOptions {
        ResolveOptions::default()
            .with_namespace(self.default_namespace.clone())
            .with_image(self.default_image.clone())
    }
}
