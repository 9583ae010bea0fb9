use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::App;
use crate::mention::QueryPhase;
use crate::widgets::popup;

/// Rows shown before the popup scrolls
const MAX_VISIBLE_SUGGESTIONS: usize = 8;
const MAX_POPUP_WIDTH: u16 = 48;
/// Horizontal offset from the input's left edge
const POPUP_OFFSET_X: u16 = 1;
const INPUT_HEIGHT: u16 = 3;

impl App {
    pub fn render(&self, frame: &mut Frame) {
        let [status_area, input_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(INPUT_HEIGHT)])
                .areas(frame.area());

        self.render_status(frame, status_area);
        frame.render_widget(&self.textarea, input_area);

        // Popup goes last so it sits on top of the status area
        self.render_suggestions(frame, input_area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let session = self.controller.session();
        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("#{}", session.room),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  as {}", session.account.user_id),
                Style::default().fg(Color::DarkGray),
            ),
        ])];

        let phase_line = match self.controller.phase() {
            QueryPhase::Requesting { .. } => {
                Some(Span::styled("Searching…", Style::default().fg(Color::Yellow)))
            }
            QueryPhase::Succeeded { .. } if self.controller.items().is_empty() => {
                Some(Span::styled("No matches", Style::default().fg(Color::DarkGray)))
            }
            QueryPhase::Failed { .. } => {
                Some(Span::styled("Lookup failed", Style::default().fg(Color::Red)))
            }
            _ => None,
        };
        if let Some(span) = phase_line {
            lines.push(Line::from(span));
        }

        if !self.draft_mentions.is_empty() {
            let names: Vec<&str> = self
                .draft_mentions
                .iter()
                .map(|mention| mention.label.as_str())
                .collect();
            lines.push(Line::from(Span::styled(
                format!("Mentions: {}", names.join(", ")),
                Style::default().fg(Color::Green),
            )));
        }

        if let Some(status) = &self.status {
            lines.push(Line::from(status.as_str()));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Chat "))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_suggestions(&self, frame: &mut Frame, input_area: Rect) {
        let rows = self.popup.rows();
        if !rows.is_visible() {
            return;
        }

        let labels: Vec<&str> = rows.labels().iter().map(String::as_str).collect();
        let (width, height) =
            popup::list_popup_size(&labels, MAX_VISIBLE_SUGGESTIONS, MAX_POPUP_WIDTH);
        let area = popup::popup_above_anchor(input_area, width, height, POPUP_OFFSET_X);
        if area.height == 0 {
            return;
        }

        popup::clear_area(frame, area);

        let items: Vec<ListItem> = labels
            .iter()
            .map(|label| ListItem::new(Line::from(*label)))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Mentions ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ")
            .highlight_spacing(HighlightSpacing::Always);

        let mut state = ListState::default().with_selected(rows.selected());
        frame.render_stateful_widget(list, area, &mut state);
    }
}
