//! Example page greeting the name taken from the route

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct ExamplePage {
    name: String,
}

impl ExamplePage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn greeting(&self) -> String {
        format!("Hello {}", self.name)
    }
}

impl Component for ExamplePage {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Backspace | KeyCode::Esc => Some(Action::Navigate("/".to_string())),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let box_area = centered_popup(area, 40, 5);
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                self.greeting(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        frame.render_widget(paragraph, box_area);
        Ok(())
    }
}
