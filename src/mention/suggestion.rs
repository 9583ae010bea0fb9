//! Suggestion items
//!
//! Maps raw lookup records to the immutable entries shown in the suggestion list.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use super::session::Account;

/// One candidate record as returned by the remote service
///
/// Both fields are optional on the wire; incomplete records are dropped during
/// mapping instead of failing the whole batch. Numeric values are kept as their
/// decimal text, since servers send numeric user ids as JSON numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawCandidate {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub label: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
    }))
}

impl RawCandidate {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            label: Some(label.to_string()),
        }
    }
}

/// A selectable entry in the suggestion list
#[derive(Debug, Clone)]
pub struct SuggestionItem {
    id: String,
    label: String,
    account: Arc<Account>,
}

impl SuggestionItem {
    /// Build an item from a raw record, or `None` if the id or label is missing or blank
    ///
    /// The id is kept exactly as sent; only the label is trimmed for display.
    pub fn from_raw(raw: &RawCandidate, account: &Arc<Account>) -> Option<Self> {
        let id = raw.id.as_deref().filter(|s| !s.trim().is_empty())?;
        let label = raw
            .label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;

        Some(Self {
            id: id.to_string(),
            label: label.to_string(),
            account: Arc::clone(account),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Account the lookup that produced this item ran as
    pub fn account(&self) -> &Arc<Account> {
        &self.account
    }
}

impl PartialEq for SuggestionItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label && Arc::ptr_eq(&self.account, &other.account)
    }
}

/// Map a batch of raw records, keeping input order and skipping malformed ones
pub fn map_candidates(raw: &[RawCandidate], account: &Arc<Account>) -> Vec<SuggestionItem> {
    let items: Vec<SuggestionItem> = raw
        .iter()
        .filter_map(|candidate| SuggestionItem::from_raw(candidate, account))
        .collect();

    let skipped = raw.len() - items.len();
    if skipped > 0 {
        log::warn!("Skipped {} malformed mention candidate(s)", skipped);
    }

    items
}

#[cfg(test)]
#[path = "suggestion_tests.rs"]
mod suggestion_tests;
