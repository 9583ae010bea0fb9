//! Tests for the composer app: key handling, mention insertion and rendering

use super::*;
use crate::mention::{LookupCommand, LookupResponse, QueryController, RawCandidate};
use crate::test_utils::test_helpers::test_session;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{self, Sender};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

struct TestApp {
    app: App,
    command_rx: UnboundedReceiver<LookupCommand>,
    response_tx: Sender<LookupResponse>,
}

impl TestApp {
    fn new() -> Self {
        let (command_tx, command_rx) = unbounded_channel();
        let (response_tx, response_rx) = mpsc::channel();

        let app = App::new(|view, sink| {
            let mut controller = QueryController::new(test_session(), view, sink);
            controller.set_channels(command_tx, response_rx);
            Ok(controller)
        })
        .unwrap();

        Self {
            app,
            command_rx,
            response_tx,
        }
    }

    fn press(&mut self, code: KeyCode) {
        self.app
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyCode::Char(ch));
        }
    }

    /// Generation and query of the last lookup sent, draining the channel
    fn last_query(&mut self) -> Option<(u64, String)> {
        let mut last = None;
        while let Ok(command) = self.command_rx.try_recv() {
            if let LookupCommand::Query {
                request,
                generation,
            } = command
            {
                last = Some((generation, request.query));
            }
        }
        last
    }

    fn complete(&mut self, generation: u64, candidates: &[(&str, &str)]) {
        self.response_tx
            .send(LookupResponse::Completed {
                generation,
                candidates: candidates
                    .iter()
                    .map(|(id, label)| RawCandidate::new(id, label))
                    .collect(),
            })
            .unwrap();
        self.app.tick();
    }

    /// Type `@al` and deliver two matches
    fn with_suggestions() -> Self {
        let mut t = Self::new();
        t.type_str("hi @al");
        let (generation, _) = t.last_query().unwrap();
        t.complete(generation, &[("alice", "Alice"), ("alan", "Alan")]);
        t
    }

    fn line(&self) -> String {
        self.app.textarea.lines()[0].clone()
    }
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn test_typing_after_trigger_sends_query() {
    let mut t = TestApp::new();

    t.type_str("@al");

    let (_, query) = t.last_query().unwrap();
    assert_eq!(query, "al");
}

#[test]
fn test_typing_without_trigger_sends_nothing() {
    let mut t = TestApp::new();

    t.type_str("hello al");

    assert_eq!(t.last_query(), None);
}

#[test]
fn test_completed_lookup_shows_popup() {
    let t = TestApp::with_suggestions();

    let rows = t.app.popup.rows();
    assert!(rows.is_visible());
    assert_eq!(rows.labels(), ["Alice".to_string(), "Alan".to_string()]);
    assert_eq!(rows.selected(), Some(0));
}

#[test]
fn test_stale_lookup_does_not_show_popup() {
    let mut t = TestApp::new();
    t.type_str("@a");
    let (stale, _) = t.last_query().unwrap();
    t.type_str("l");

    t.complete(stale, &[("alice", "Alice")]);

    assert!(!t.app.popup.rows().is_visible());
}

#[test]
fn test_arrow_keys_move_selection_with_wrap() {
    let mut t = TestApp::with_suggestions();

    t.press(KeyCode::Down);
    assert_eq!(t.app.popup.selected(), Some(1));

    t.press(KeyCode::Down);
    assert_eq!(t.app.popup.selected(), Some(0));

    t.press(KeyCode::Up);
    assert_eq!(t.app.popup.selected(), Some(1));
}

#[test]
fn test_enter_inserts_selected_mention() {
    let mut t = TestApp::with_suggestions();
    t.press(KeyCode::Down);

    t.press(KeyCode::Enter);

    assert_eq!(t.line(), "hi @Alan ");
    assert_eq!(t.app.draft_mentions.len(), 1);
    assert_eq!(t.app.draft_mentions[0].id, "alan");
    assert!(!t.app.popup.rows().is_visible());
}

#[test]
fn test_tab_inserts_selected_mention() {
    let mut t = TestApp::with_suggestions();

    t.press(KeyCode::Tab);

    assert_eq!(t.line(), "hi @Alice ");
    assert_eq!(t.app.draft_mentions[0].id, "alice");
}

#[test]
fn test_esc_dismisses_popup_before_quitting() {
    let mut t = TestApp::with_suggestions();

    t.press(KeyCode::Esc);
    assert!(!t.app.popup.rows().is_visible());
    assert!(!t.app.should_quit());
    assert_eq!(t.line(), "hi @al");

    t.press(KeyCode::Esc);
    assert!(t.app.should_quit());
}

#[test]
fn test_ctrl_c_quits() {
    let mut t = TestApp::with_suggestions();

    t.app
        .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

    assert!(t.app.should_quit());
}

#[test]
fn test_leaving_token_dismisses_popup() {
    let mut t = TestApp::with_suggestions();

    t.press(KeyCode::Char(' '));

    assert!(!t.app.popup.rows().is_visible());
}

#[test]
fn test_enter_without_popup_sends_draft() {
    let mut t = TestApp::with_suggestions();
    t.press(KeyCode::Enter);

    t.press(KeyCode::Enter);

    let status = t.app.status.clone().unwrap();
    assert!(status.contains("hi @Alice"));
    assert!(status.contains(r#""id":"alice""#));
    assert!(status.contains(r#""source":"users""#));
    assert_eq!(t.line(), "");
    assert!(t.app.draft_mentions.is_empty());
}

#[test]
fn test_enter_on_empty_draft_does_nothing() {
    let mut t = TestApp::new();

    t.press(KeyCode::Enter);

    assert_eq!(t.app.status, None);
}

#[test]
fn test_popup_rows_navigation_on_empty_list_is_noop() {
    let mut rows = PopupRows::default();

    rows.select_next();
    rows.select_previous();

    assert_eq!(rows.selected(), None);
}

#[test]
fn test_render_shows_suggestions() {
    let t = TestApp::with_suggestions();
    let mut terminal = Terminal::new(TestBackend::new(50, 14)).unwrap();

    terminal.draw(|f| t.app.render(f)).unwrap();

    let text = buffer_text(&terminal);
    assert!(text.contains("Alice"));
    assert!(text.contains("Alan"));
    assert!(text.contains("Mentions"));
}

#[test]
fn test_render_shows_searching_while_requesting() {
    let mut t = TestApp::new();
    t.type_str("@al");
    let mut terminal = Terminal::new(TestBackend::new(50, 14)).unwrap();

    terminal.draw(|f| t.app.render(f)).unwrap();

    assert!(buffer_text(&terminal).contains("Searching"));
}

#[test]
fn test_render_without_popup_shows_room() {
    let t = TestApp::new();
    let mut terminal = Terminal::new(TestBackend::new(50, 14)).unwrap();

    terminal.draw(|f| t.app.render(f)).unwrap();

    let text = buffer_text(&terminal);
    assert!(text.contains("#room1"));
    assert!(!text.contains("Alice"));
}
