//! Collaborator contracts for presentation and composer output

use super::selection::MentionReference;
use super::suggestion::SuggestionItem;

/// Presentation layer for the suggestion list
///
/// Click events flow the other way: the host forwards them to
/// [`QueryController::on_suggestion_clicked`](super::QueryController::on_suggestion_clicked)
/// with the index of the clicked row.
pub trait SuggestionListView {
    /// Replace the displayed list with `items`, in order
    fn render(&mut self, items: &[SuggestionItem]);

    /// Show an empty list
    fn clear(&mut self);
}

/// Receiver of picked mentions (the composer)
pub trait MentionSink {
    fn emit_mention(&mut self, mention: MentionReference);
}
