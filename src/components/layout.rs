//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas shared by every page
pub struct PageLayout {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Popup anchored at a screen position, shifted to stay inside `area`
pub fn popup_at(area: Rect, x: u16, y: u16, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = x.clamp(area.x, area.right().saturating_sub(width));
    let y = y.clamp(area.y, area.bottom().saturating_sub(height));

    Rect::new(x, y, width, height)
}

/// Title bar, page body and a one-line key hint footer
pub fn calculate_page_layout(area: Rect) -> PageLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    PageLayout {
        header: chunks[0],
        body: chunks[1],
        footer: chunks[2],
    }
}
