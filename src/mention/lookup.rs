//! Remote lookup abstraction
//!
//! Defines the LookupClient trait, the request it receives, and LookupError.

use futures::future::BoxFuture;
use thiserror::Error;

use super::session::{RoomToken, SessionContext};
use super::suggestion::RawCandidate;

mod nextcloud;

pub use nextcloud::NextcloudClient;

/// Errors from a single lookup attempt
///
/// Every variant is treated as transient by the worker and retried until the
/// attempt budget for the generation is spent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Transport failure (DNS, connect, TLS, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("Server error ({code}): {message}")]
    Status { code: u16, message: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Attempt did not finish within the configured timeout
    #[error("Lookup timed out after {0} ms")]
    Timeout(u64),
}

/// Everything a client needs to run one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Value for the `Authorization` header
    pub credentials: String,
    /// Base URL of the account's server
    pub base_url: String,
    /// Room the search is scoped to
    pub scope: RoomToken,
    /// Text typed after the trigger
    pub query: String,
    /// Opaque pagination cursor, passed through untouched
    pub cursor: Option<String>,
    /// Maximum number of candidates to ask for
    pub limit: u32,
}

impl LookupRequest {
    pub fn new(session: &SessionContext, query: &str, limit: u32) -> Self {
        Self {
            credentials: session.account.credentials(),
            base_url: session.account.base_url.clone(),
            scope: session.room.clone(),
            query: query.to_string(),
            cursor: None,
            limit,
        }
    }
}

/// Source of mention candidates
pub trait LookupClient: Send + Sync {
    fn lookup<'a>(
        &'a self,
        request: &'a LookupRequest,
    ) -> BoxFuture<'a, Result<Vec<RawCandidate>, LookupError>>;
}
