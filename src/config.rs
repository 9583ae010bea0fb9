//! Configuration loading
//!
//! Reads `config.toml` from the platform config directory. A missing file means
//! defaults; an unreadable or invalid file also means defaults, plus a warning
//! for the host to show.

mod types;

use std::path::{Path, PathBuf};

pub use types::{AccountConfig, Config, LoggingConfig, LookupConfig, ServerConfig};

use crate::error::MentionError;

/// Loaded configuration and any problem found while loading it
#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Default location: `<config_dir>/mentions/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mentions").join("config.toml"))
}

/// Load from the default location
pub fn load_config() -> ConfigResult {
    match default_config_path() {
        Some(path) => load_config_from_path(&path),
        None => ConfigResult::default(),
    }
}

/// Load from an explicit path
pub fn load_config_from_path(path: &Path) -> ConfigResult {
    if !path.exists() {
        return ConfigResult::default();
    }

    match read_config(path) {
        Ok(config) => ConfigResult {
            config,
            warning: None,
        },
        Err(e) => {
            log::warn!("{}", e);
            ConfigResult {
                config: Config::default(),
                warning: Some(e.to_string()),
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config, MentionError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| MentionError::InvalidConfig {
        path: path.display().to_string(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
