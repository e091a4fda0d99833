pub mod types;

pub use types::{Config, OutputConfig, ResolverConfig, ValidationConfig};

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".kube-aegis.toml";

/// Get the global config file path (~/.kube-aegis.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (<dir>/.kube-aegis.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Find the config file that applies in `dir`: local first, then global.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let local = local_config_path(dir);
    if local.is_file() {
        return Some(local);
    }
    global_config_path().filter(|global| global.is_file())
}

/// Read and parse one config file.
pub fn load_config_file(path: &Path) -> std::result::Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    check(&config)?;
    Ok(config)
}

fn check(config: &Config) -> std::result::Result<(), ConfigError> {
    if config.resolver.default_namespace.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "resolver.default_namespace".to_string(),
            value: config.resolver.default_namespace.clone(),
        });
    }
    if config.resolver.default_image.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "resolver.default_image".to_string(),
            value: config.resolver.default_image.clone(),
        });
    }
    Ok(())
}

/// Load configuration from file or use defaults
///
/// An explicit path must load. Otherwise the local config in `dir` is tried,
/// then the global one; a discovered file that fails to load is skipped with
/// a warning.
pub fn load_config_from(explicit: Option<&Path>, dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let config = load_config_file(path)?;
        log::debug!("loaded configuration from {}", path.display());
        return Ok((config, Some(path.to_path_buf())));
    }

    if let Some(path) = find_config_file(dir) {
        match load_config_file(&path) {
            Ok(config) => {
                log::debug!("loaded configuration from {}", path.display());
                return Ok((config, Some(path)));
            }
            Err(e) => log::warn!("ignoring configuration: {}", e),
        }
    }

    Ok((Config::default(), None))
}

/// Load configuration for the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(explicit, &cwd)
}
