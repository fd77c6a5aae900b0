//! Help dialog component
//!
//! Lists the keyboard shortcuts and mouse gestures of the data tables.

use crate::action::Action;
use crate::component::Component;
use crate::model::mouse::MouseActionMapping;
use crate::model::MouseActionsMapping;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing shortcuts and the configured mouse mapping
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
    mouse_actions: MouseActionsMapping,
}

impl HelpDialog {
    pub fn new(mouse_actions: MouseActionsMapping) -> Self {
        Self {
            scroll_offset: 0,
            mouse_actions,
        }
    }
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_offset = self.scroll_offset.saturating_add(1),
            MouseEventKind::ScrollUp => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let margin = 4;
        let dialog_area = Rect::new(
            area.x + margin,
            area.y + margin / 2,
            area.width.saturating_sub(margin * 2),
            area.height.saturating_sub(margin),
        );
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content(&self.mouse_actions);
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        // Clamp scroll offset
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(visible_height))
                .position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn describe_mapping(mapping: &MouseActionMapping) -> String {
    match mapping {
        MouseActionMapping::Primary => "Run the primary action".to_string(),
        MouseActionMapping::Contextual => "Open the actions menu".to_string(),
        MouseActionMapping::Action { action } => format!("Run '{}'", action),
    }
}

fn build_help_content(mouse_actions: &MouseActionsMapping) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.len() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:16}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Navigation");
    add_shortcut(&mut lines, "j / ↓", "Next row");
    add_shortcut(&mut lines, "k / ↑", "Previous row");
    add_shortcut(&mut lines, "g / G", "First / last row");
    add_shortcut(&mut lines, "Tab", "Switch between country selector and step table");
    add_shortcut(&mut lines, "] / [", "Next / previous analysis step");
    add_shortcut(&mut lines, "Backspace", "Back to the landing page");

    add_section(&mut lines, "Rows");
    add_shortcut(&mut lines, "→ / l", "Expand row");
    add_shortcut(&mut lines, "← / h", "Collapse row");
    add_shortcut(&mut lines, "Enter", "Same as a left click on the row");
    add_shortcut(&mut lines, "m", "Same as a right click on the row");
    add_shortcut(&mut lines, "Space", "Toggle row selection");
    add_shortcut(&mut lines, "x", "Remove checked countries from the analysis");
    add_shortcut(&mut lines, "s", "Sort by next column");
    add_shortcut(&mut lines, "o", "Flip sort order");
    add_shortcut(&mut lines, "r", "Reload");

    add_section(&mut lines, "Mouse");
    add_shortcut(&mut lines, "Left click", &describe_mapping(&mouse_actions.left));
    add_shortcut(&mut lines, "Right click", &describe_mapping(&mouse_actions.right));
    add_shortcut(&mut lines, "Ctrl + click", "Toggle row selection");
    add_shortcut(&mut lines, "Click ▸ / ▾", "Expand or collapse");
    add_shortcut(&mut lines, "Click ⋮", "Open the actions menu");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q", "Quit / Close dialog");
    add_shortcut(&mut lines, "Ctrl+c", "Quit immediately");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_describes_configured_mouse_mapping() {
        let mapping = MouseActionsMapping {
            left: MouseActionMapping::Action {
                action: "details".to_string(),
            },
            right: MouseActionMapping::Contextual,
        };
        let text: Vec<String> = build_help_content(&mapping)
            .iter()
            .map(|line| line.to_string())
            .collect();

        assert!(text.iter().any(|l| l.contains("Left click") && l.contains("Run 'details'")));
        assert!(text.iter().any(|l| l.contains("Right click") && l.contains("actions menu")));
    }
}
