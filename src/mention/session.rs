//! Session and account context
//!
//! The hosting application owns the account and room scope. The lookup core only
//! reads them: every suggestion keeps a shared handle to the account it was
//! produced for, and every request carries credentials derived from it.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Remote account a lookup acts as
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// Server base URL, without trailing slash
    pub base_url: String,
    /// Login name
    pub user_id: String,
    /// App password or session token
    pub token: String,
}

impl Account {
    pub fn new(base_url: &str, user_id: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
            token: token.to_string(),
        }
    }

    /// Value for the `Authorization` header
    pub fn credentials(&self) -> String {
        let raw = format!("{}:{}", self.user_id, self.token);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Identifier of the room/conversation a lookup is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomToken(String);

impl RoomToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only context every lookup is bound to
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub account: Arc<Account>,
    pub room: RoomToken,
}

impl SessionContext {
    pub fn new(account: Account, room: RoomToken) -> Self {
        Self {
            account: Arc::new(account),
            room,
        }
    }
}
