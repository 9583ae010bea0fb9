use ratatui::{Frame, layout::Rect, widgets::Clear};
use unicode_width::UnicodeWidthStr;

/// Border rows/columns around a bordered list
const BORDER: u16 = 2;
/// Room for the selection marker in front of each row
const MARKER_WIDTH: u16 = 2;

/// Outer size of a bordered list popup showing `labels`
///
/// Width follows the widest label in display columns, so CJK and emoji names
/// are not cut short.
pub fn list_popup_size(labels: &[&str], max_rows: usize, max_width: u16) -> (u16, u16) {
    let widest = labels
        .iter()
        .map(|label| label.width())
        .max()
        .unwrap_or(0)
        .min(u16::MAX as usize) as u16;

    let width = widest
        .saturating_add(MARKER_WIDTH + BORDER)
        .min(max_width);
    let height = (labels.len().min(max_rows) as u16) + BORDER;

    (width, height)
}

/// Area directly above `anchor`, shifted right by `x_offset`
///
/// Shrinks to fit between the top of the screen and the anchor, and within the
/// anchor's width.
pub fn popup_above_anchor(anchor: Rect, width: u16, height: u16, x_offset: u16) -> Rect {
    let height = height.min(anchor.y);

    Rect {
        x: anchor.x + x_offset,
        y: anchor.y - height,
        width: width.min(anchor.width.saturating_sub(x_offset)),
        height,
    }
}

pub fn clear_area(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
}

#[cfg(test)]
#[path = "popup_tests.rs"]
mod popup_tests;
