//! Selection mapping
//!
//! Turns a picked suggestion into the structured reference the composer embeds.

use serde::Serialize;

use super::suggestion::SuggestionItem;

/// Kind of entity a mention points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionSource {
    Users,
}

impl MentionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentionSource::Users => "users",
        }
    }
}

/// Mention produced when the user picks a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionReference {
    pub id: String,
    pub label: String,
    pub source: MentionSource,
}

impl From<&SuggestionItem> for MentionReference {
    fn from(item: &SuggestionItem) -> Self {
        Self {
            id: item.id().to_string(),
            label: item.label().to_string(),
            source: MentionSource::Users,
        }
    }
}

/// Map a suggestion to its mention reference
pub fn to_mention_reference(item: &SuggestionItem) -> MentionReference {
    MentionReference::from(item)
}
