//! Output formatters for batch outcomes.

pub mod json;
pub mod plain;

use crate::validator::batch::BatchOutcome;
use serde::{Deserialize, Serialize};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Structured JSON.
    Json,
}

impl OutputFormat {
    /// Parse from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Format a batch outcome to a string.
pub fn format_outcome_to_string(outcome: &BatchOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => plain::format(outcome),
        OutputFormat::Json => json::format(outcome),
    }
}

/// Format and print a batch outcome.
pub fn format_outcome(outcome: &BatchOutcome, format: OutputFormat) {
    print!("{}", format_outcome_to_string(outcome, format));
}
