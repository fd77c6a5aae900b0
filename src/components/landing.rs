//! Landing page: entry menu of the application

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

struct MenuEntry {
    title: &'static str,
    description: &'static str,
    path: &'static str,
}

const ENTRIES: [MenuEntry; 2] = [
    MenuEntry {
        title: "Analysis",
        description: "Run the data quality analysis on a set of countries",
        path: "/analysis",
    },
    MenuEntry {
        title: "Example",
        description: "Greeting page",
        path: "/for/",
    },
];

pub struct LandingPage {
    state: ListState,
    list_area: Option<Rect>,
}

impl Default for LandingPage {
    fn default() -> Self {
        let mut state = ListState::default();
        state.select(Some(0));
        Self {
            state,
            list_area: None,
        }
    }
}

impl LandingPage {
    fn open_selected(&self) -> Option<Action> {
        let entry = ENTRIES.get(self.state.selected()?)?;
        Some(Action::Navigate(entry.path.to_string()))
    }
}

impl Component for LandingPage {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::CursorDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Enter => self.open_selected(),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let Some(area) = self.list_area else {
            return Ok(None);
        };
        if mouse.kind != MouseEventKind::Down(MouseButton::Left)
            || mouse.column <= area.x
            || mouse.column >= area.right().saturating_sub(1)
            || mouse.row <= area.y
        {
            return Ok(None);
        }

        // each entry takes two lines: title and description
        let index = ((mouse.row - area.y - 1) / 2) as usize;
        if index >= ENTRIES.len() {
            return Ok(None);
        }
        self.state.select(Some(index));
        Ok(self.open_selected())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let selected = self.state.selected().unwrap_or(0);
        match action {
            Action::CursorDown => self.state.select(Some((selected + 1) % ENTRIES.len())),
            Action::CursorUp => {
                self.state
                    .select(Some((selected + ENTRIES.len() - 1) % ENTRIES.len()))
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(ENTRIES.len() as u16 * 2 + 2),
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Data Quality",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let list_area = Rect {
            x: chunks[1].x + chunks[1].width.saturating_sub(60) / 2,
            width: chunks[1].width.min(60),
            ..chunks[1]
        };
        self.list_area = Some(list_area);

        let items: Vec<ListItem> = ENTRIES
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        format!(" {}", entry.title),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("   {}", entry.description),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().bg(Color::Blue));

        frame.render_stateful_widget(list, list_area, &mut self.state);
        Ok(())
    }
}
