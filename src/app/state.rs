use std::cell::{Ref, RefCell};
use std::rc::Rc;

use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use tui_textarea::TextArea;

use crate::error::MentionError;
use crate::mention::{
    MentionReference, MentionSink, QueryController, SuggestionItem, SuggestionListView,
};

/// Rows the suggestion popup shows, as last rendered by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupRows {
    labels: Vec<String>,
    selected: Option<usize>,
}

impl PopupRows {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_visible(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Move the highlight down, wrapping to the first row
    pub fn select_next(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(current) => (current + 1) % self.labels.len(),
            None => 0,
        });
    }

    /// Move the highlight up, wrapping to the last row
    pub fn select_previous(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        let last = self.labels.len() - 1;
        self.selected = Some(match self.selected {
            Some(0) | None => last,
            Some(current) => current - 1,
        });
    }
}

/// Suggestion list view backed by the popup rows; clones share state
#[derive(Debug, Clone, Default)]
pub struct PopupView(Rc<RefCell<PopupRows>>);

impl PopupView {
    pub fn rows(&self) -> Ref<'_, PopupRows> {
        self.0.borrow()
    }

    pub fn selected(&self) -> Option<usize> {
        self.0.borrow().selected
    }

    pub fn select_next(&self) {
        self.0.borrow_mut().select_next();
    }

    pub fn select_previous(&self) {
        self.0.borrow_mut().select_previous();
    }
}

impl SuggestionListView for PopupView {
    fn render(&mut self, items: &[SuggestionItem]) {
        let mut rows = self.0.borrow_mut();
        rows.labels = items.iter().map(|item| item.label().to_string()).collect();
        rows.selected = Some(0);
    }

    fn clear(&mut self) {
        let mut rows = self.0.borrow_mut();
        rows.labels.clear();
        rows.selected = None;
    }
}

/// Mentions picked but not yet placed in the draft; clones share state
#[derive(Debug, Clone, Default)]
pub struct PickedMentions(Rc<RefCell<Vec<MentionReference>>>);

impl PickedMentions {
    pub fn take(&self) -> Vec<MentionReference> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl MentionSink for PickedMentions {
    fn emit_mention(&mut self, mention: MentionReference) {
        self.0.borrow_mut().push(mention);
    }
}

/// Composer application state
pub struct App {
    pub textarea: TextArea<'static>,
    pub controller: QueryController,
    pub popup: PopupView,
    pub(super) picked: PickedMentions,
    /// Mentions placed in the current draft, in insertion order
    pub draft_mentions: Vec<MentionReference>,
    /// One-line message for the status area
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Create the app around a controller built from the app's own view and sink
    pub fn new<F>(build_controller: F) -> Result<Self, MentionError>
    where
        F: FnOnce(
            Box<dyn SuggestionListView>,
            Box<dyn MentionSink>,
        ) -> Result<QueryController, MentionError>,
    {
        let popup = PopupView::default();
        let picked = PickedMentions::default();
        let controller = build_controller(Box::new(popup.clone()), Box::new(picked.clone()))?;

        Ok(Self {
            textarea: Self::new_textarea(),
            controller,
            popup,
            picked,
            draft_mentions: Vec::new(),
            status: None,
            should_quit: false,
        })
    }

    pub(super) fn new_textarea() -> TextArea<'static> {
        let mut textarea = TextArea::default();

        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Message ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        // Remove default underline from cursor line
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("Type @ to mention someone");

        textarea
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply lookup results delivered since the last tick
    ///
    /// Returns true if the popup changed.
    pub fn tick(&mut self) -> bool {
        self.controller.poll_responses()
    }
}
