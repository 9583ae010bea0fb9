use thiserror::Error;

use crate::mention::LookupError;

/// Custom error types for mentions
#[derive(Debug, Error)]
pub enum MentionError {
    #[error("Missing setting: {0}\n\nPass it on the command line or add it to the config file.")]
    MissingSetting(&'static str),

    #[error("Invalid config file {path}: {message}")]
    InvalidConfig { path: String, message: String },

    #[error("Lookup client unavailable: {0}")]
    Client(#[from] LookupError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
