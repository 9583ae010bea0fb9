use std::io;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::App;
use crate::composer;

impl App {
    /// Wait up to `timeout` for one terminal event and handle it
    pub fn handle_events(&mut self, timeout: Duration) -> io::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                // Check that it's a key press event to avoid duplicates
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.handle_key_event(key);
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.handle_global_keys(key) {
            return;
        }

        let popup_visible = self.popup.rows().is_visible();
        if popup_visible && self.handle_popup_key(key) {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.send_draft(),
            _ => {
                self.textarea.input(key);
                self.sync_query();
            }
        }
    }

    /// Returns true if the key was handled
    fn handle_global_keys(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }
        false
    }

    /// Keys the suggestion popup takes while it is showing
    fn handle_popup_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => self.popup.select_previous(),
            KeyCode::Down => self.popup.select_next(),
            KeyCode::Enter | KeyCode::Tab => {
                if let Some(index) = self.popup.selected()
                    && self.controller.on_suggestion_clicked(index)
                {
                    self.insert_picked_mentions();
                }
            }
            KeyCode::Esc => self.controller.on_query_changed(""),
            _ => return false,
        }
        true
    }

    /// Feed the mention query under the cursor to the controller
    ///
    /// Outside a mention token the query is empty, which dismisses the popup.
    pub fn sync_query(&mut self) {
        let (row, col) = self.textarea.cursor();
        let query = self
            .textarea
            .lines()
            .get(row)
            .map(|line| composer::query_at(line, col).to_string())
            .unwrap_or_default();

        self.controller.on_query_changed(&query);
    }

    /// Replace the token under the cursor with each picked mention
    fn insert_picked_mentions(&mut self) {
        for mention in self.picked.take() {
            let (row, col) = self.textarea.cursor();
            let token_len = self
                .textarea
                .lines()
                .get(row)
                .and_then(|line| composer::active_mention(line, col))
                .map(|token| token.char_len())
                .unwrap_or(0);

            for _ in 0..token_len {
                self.textarea.delete_char();
            }
            self.textarea.insert_str(composer::mention_text(&mention.label));

            log::debug!("Inserted mention {} ({})", mention.label, mention.id);
            self.draft_mentions.push(mention);
        }
        self.sync_query();
    }

    /// Hand off the draft and its mention references, then start a new one
    fn send_draft(&mut self) {
        let text = self.textarea.lines().join("\n");
        if text.trim().is_empty() {
            return;
        }

        let references = match serde_json::to_string(&self.draft_mentions) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize mentions: {}", e);
                "[]".to_string()
            }
        };
        log::info!("Sending message with {} mention(s)", self.draft_mentions.len());
        self.status = Some(format!("Sent: {} mentions={}", text, references));

        self.textarea = Self::new_textarea();
        self.draft_mentions.clear();
        self.sync_query();
    }
}
