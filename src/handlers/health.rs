//! Handler for the `health` command.
//!
//! Purely informational; it always reports healthy and never touches a cluster.

use crate::config::Config;
use crate::error::Result;
use crate::validator::catalog::ResourceKind;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub supported_kinds: Vec<&'static str>,
    pub strict_validation: bool,
    pub output_format: &'static str,
    pub default_namespace: String,
}

impl HealthStatus {
    pub fn new(config: &Config) -> Self {
        Self {
            status: "healthy",
            version: crate::VERSION,
            supported_kinds: ResourceKind::ALL.iter().map(ResourceKind::as_str).collect(),
            strict_validation: config.validation.strict,
            output_format: config.output.format.as_str(),
            default_namespace: config.resolver.default_namespace.clone(),
        }
    }
}

pub fn handle_health(config: &Config, json: bool) -> Result<()> {
    let status = HealthStatus::new(config);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "kube-aegis health check".bold());
    println!("{}", "-".repeat(60));
    println!("{}", format!("Status: {}", status.status.to_uppercase()).green().bold());
    println!("Version: {}", status.version);
    println!("\nConfiguration:");
    println!("  Supported Kinds: {}", status.supported_kinds.join(", "));
    println!("  Strict Validation: {}", status.strict_validation);
    println!("  Output Format: {}", status.output_format);
    println!("  Default Namespace: {}", status.default_namespace);
    Ok(())
}
