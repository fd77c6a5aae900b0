//! Contextual actions menu
//!
//! Opened at the pointer position by a right click (or a click on the row's
//! actions button); lists the actions that apply to that row.

use crate::action::Action;
use crate::component::Component;
use crate::components::popup_at;
use crate::model::TableAction;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Menu of row actions anchored at a screen position
pub struct ContextMenu {
    row_id: String,
    items: Vec<TableAction>,
    anchor: (u16, u16),
    state: ListState,
    area: Option<Rect>,
}

impl ContextMenu {
    pub fn new(
        row_id: impl Into<String>,
        items: Vec<TableAction>,
        screen_x: u16,
        screen_y: u16,
    ) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }
        Self {
            row_id: row_id.into(),
            items,
            anchor: (screen_x, screen_y),
            state,
            area: None,
        }
    }

    fn run_selected(&self) -> Option<Action> {
        let action = self.items.get(self.state.selected()?)?;
        Some(Action::RunTableAction {
            name: action.name.clone(),
            ids: vec![self.row_id.clone()],
        })
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(self.items.len() as isize);
        self.state.select(Some(next as usize));
    }

    fn label(action: &TableAction) -> String {
        match &action.icon {
            Some(icon) => format!("{} {}", icon, action.text),
            None => action.text.clone(),
        }
    }
}

impl Component for ContextMenu {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Enter => self.run_selected(),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Down(MouseButton::Right)
        ) {
            return Ok(None);
        }

        let Some(area) = self.area else {
            return Ok(None);
        };
        let inside = mouse.column > area.x
            && mouse.column < area.right().saturating_sub(1)
            && mouse.row > area.y
            && mouse.row < area.bottom().saturating_sub(1);
        if !inside {
            return Ok(Some(Action::CloseModal));
        }

        let index = (mouse.row - area.y - 1) as usize;
        if index >= self.items.len() {
            return Ok(None);
        }
        self.state.select(Some(index));
        Ok(self.run_selected())
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = self
            .items
            .iter()
            .map(|item| Self::label(item).width())
            .max()
            .unwrap_or(0)
            .max(self.row_id.width() + 2) as u16
            + 4;
        let height = self.items.len() as u16 + 2;
        let popup = popup_at(area, self.anchor.0, self.anchor.1, width, height);
        self.area = Some(popup);

        frame.render_widget(Clear, popup);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let style = if item.primary {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(Span::styled(format!(" {}", Self::label(item)), style)))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.row_id))
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD));

        frame.render_stateful_widget(list, popup, &mut self.state);
        Ok(())
    }
}
