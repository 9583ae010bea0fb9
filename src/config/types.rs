// Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::mention::{DEFAULT_LIMIT, RetryPolicy};

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_timeout_ms() -> u64 {
    5000
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Server section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Account section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Lookup tuning section
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Total attempts per query, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    /// Candidates requested per lookup
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            max_attempts: default_max_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            limit: default_limit(),
        }
    }
}

impl LookupConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
        }
    }
}

/// Logging section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log file; logging is off when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
