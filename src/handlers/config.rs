use crate::config::Config;
use crate::error::{AegisError, Result};
use colored::Colorize;
use std::path::Path;

/// Print the effective configuration as TOML.
pub fn handle_config(config: &Config, source: Option<&Path>) -> Result<()> {
    println!("{}", "kube-aegis configuration".bold());
    println!("{}", "-".repeat(60));
    match source {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# no configuration file found, using defaults"),
    }
    print!("{}", render_config(config)?);
    Ok(())
}

pub fn render_config(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| AegisError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_config_reloads() {
        let mut config = Config::default();
        config.validation.strict = true;
        config.resolver.default_namespace = "staging".to_string();

        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("[validation]"));
        assert!(rendered.contains("strict = true"));
        assert!(rendered.contains("format = \"text\""));

        let reloaded: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(reloaded, config);
    }
}
