//! Mention trigger handling for a single composer line
//!
//! Finds the `@query` token the cursor sits at the end of, and replaces it with
//! a picked mention. Columns are character offsets, matching the text area.

/// Character that starts a mention
pub const TRIGGER: char = '@';

/// A mention token ending at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionToken<'a> {
    /// Character column of the trigger
    pub start: usize,
    /// Text typed after the trigger
    pub query: &'a str,
}

impl MentionToken<'_> {
    /// Length in characters, trigger included
    pub fn char_len(&self) -> usize {
        1 + self.query.chars().count()
    }
}

fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// Token the user is typing at `col`, if any
///
/// The trigger must start the line or follow whitespace (so `me@host` is not a
/// mention), and the query may not contain whitespace.
pub fn active_mention(line: &str, col: usize) -> Option<MentionToken<'_>> {
    let before = &line[..byte_offset(line, col)];
    let at = before.rfind(TRIGGER)?;

    if !before[..at].is_empty() && !before[..at].ends_with(char::is_whitespace) {
        return None;
    }

    let query = &before[at + TRIGGER.len_utf8()..];
    if query.contains(char::is_whitespace) {
        return None;
    }

    Some(MentionToken {
        start: before[..at].chars().count(),
        query,
    })
}

/// Query to feed the lookup for the cursor position; empty when not in a token
pub fn query_at(line: &str, col: usize) -> &str {
    active_mention(line, col).map_or("", |token| token.query)
}

/// Text inserted in place of the token for a picked mention
pub fn mention_text(label: &str) -> String {
    format!("{}{} ", TRIGGER, label)
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod composer_tests;
