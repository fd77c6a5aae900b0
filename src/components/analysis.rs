//! Analysis page
//!
//! Country selection on the left, the current analysis step on the right. The
//! step table lists the selected countries and offers `details` (primary) and
//! `remove` on each of them.

use crate::action::Action;
use crate::component::Component;
use crate::components::{centered_popup, CountrySelector, DataTable};
use crate::model::formatting::{format_value, parse_actions};
use crate::model::selection::checked_ids;
use crate::model::{
    AnalysisStep, Country, MouseActionsMapping, Row, TableAction, TableColumn, TableSelection,
};
use crate::services::{CountryRepository, Fetcher, GetCountriesByIdsUseCase};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};
use serde_json::Value;
use std::sync::Arc;

pub const DETAILS_ACTION: &str = "details";
pub const REMOVE_ACTION: &str = "remove";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Selector,
    Steps,
}

fn render_level(_row: &Row, value: &Value) -> String {
    match value.as_u64() {
        Some(1) => "Country".to_string(),
        Some(2) => "Region".to_string(),
        Some(3) => "District".to_string(),
        Some(level) => format!("Level {}", level),
        None => String::new(),
    }
}

fn step_actions() -> Vec<TableAction> {
    vec![
        TableAction::new(DETAILS_ACTION, "Details").primary().with_icon("ℹ"),
        TableAction::new(REMOVE_ACTION, "Remove from analysis")
            .multiple()
            .with_icon("✗"),
    ]
}

fn step_table(
    step: AnalysisStep,
    enable_multiple_action: bool,
    mouse_actions: MouseActionsMapping,
) -> DataTable {
    DataTable::new(
        step.name(),
        vec![
            TableColumn::new("name", "Name"),
            TableColumn::new("code", "Code"),
            TableColumn::new("level", "Type").with_render(render_level),
            TableColumn::new("lastUpdated", "Last updated"),
        ],
    )
    .with_actions(step_actions())
    .with_multiple_action(enable_multiple_action)
    .with_mouse_actions(mouse_actions)
}

pub struct AnalysisPage {
    name: String,
    pub selector: CountrySelector,
    steps: Vec<AnalysisStep>,
    step_index: usize,
    pub table: DataTable,
    use_case: GetCountriesByIdsUseCase,
    fetcher: Fetcher<Vec<Country>>,
    focus: Focus,
    details: Option<Row>,
    error: Option<String>,
    enable_multiple_action: bool,
    mouse_actions: MouseActionsMapping,
}

impl AnalysisPage {
    pub fn new(
        name: impl Into<String>,
        repository: Arc<dyn CountryRepository>,
        root_ids: Vec<String>,
        enable_multiple_action: bool,
        mouse_actions: MouseActionsMapping,
    ) -> Self {
        let steps = AnalysisStep::all();
        let mut selector =
            CountrySelector::new(Arc::clone(&repository), root_ids, mouse_actions.clone());
        selector.table.focused = true;

        Self {
            name: name.into(),
            selector,
            table: step_table(steps[0], enable_multiple_action, mouse_actions.clone()),
            steps,
            step_index: 0,
            use_case: GetCountriesByIdsUseCase::new(repository),
            fetcher: Fetcher::new(),
            focus: Focus::Selector,
            details: None,
            error: None,
            enable_multiple_action,
            mouse_actions,
        }
    }

    pub fn current_step(&self) -> AnalysisStep {
        self.steps[self.step_index]
    }

    /// Open the step whose name matches `name`, ignoring case
    pub fn open_step(&mut self, name: &str) -> bool {
        let Some(step) = AnalysisStep::from_section_name(name) else {
            return false;
        };
        if let Some(index) = self.steps.iter().position(|s| *s == step) {
            self.set_step(index);
        }
        true
    }

    pub fn details(&self) -> Option<&Row> {
        self.details.as_ref()
    }

    fn set_step(&mut self, index: usize) {
        self.step_index = index;
        self.table = step_table(
            self.current_step(),
            self.enable_multiple_action,
            self.mouse_actions.clone(),
        );
        self.table.focused = self.focus == Focus::Steps;
        self.load_step_rows();
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.selector.table.focused = focus == Focus::Selector;
        self.table.focused = focus == Focus::Steps;
    }

    fn focused_table(&mut self) -> &mut DataTable {
        match self.focus {
            Focus::Selector => &mut self.selector.table,
            Focus::Steps => &mut self.table,
        }
    }

    /// Query the selected countries for the step table
    fn load_step_rows(&mut self) {
        if self.fetcher.is_loading() {
            log::debug!("replacing pending step query");
        }
        let ids = self.selector.selected_ids();
        let use_case = self.use_case.clone();
        self.fetcher.spawn(move || use_case.execute(&ids));
        self.table.set_loading(true);
    }

    fn set_step_countries(&mut self, countries: Vec<Country>) {
        let rows: Vec<Row> = countries.iter().map(Country::to_row).collect();

        // keep only checks on rows that are still listed
        let listed: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        let selection: Vec<TableSelection> = self
            .table
            .selection()
            .iter()
            .filter(|s| listed.contains(&s.id.as_str()))
            .cloned()
            .collect();

        self.table.set_rows(rows);
        self.table.set_selection(selection);
    }

    /// Actions offered by the contextual menu of `row_id` in the focused table
    pub fn contextual_actions(&self, row_id: &str) -> Vec<TableAction> {
        let table = match self.focus {
            Focus::Selector => &self.selector.table,
            Focus::Steps => &self.table,
        };
        let Some(row) = table.find_row(row_id) else {
            return Vec::new();
        };
        parse_actions(&[&row], table.actions())
            .into_iter()
            .cloned()
            .collect()
    }

    fn run_step_action(&mut self, name: &str, ids: Vec<String>) -> Option<Action> {
        match name {
            DETAILS_ACTION => {
                self.details = ids.first().and_then(|id| self.table.find_row(id));
                None
            }
            REMOVE_ACTION => {
                log::info!("removing {:?} from the analysis", ids);
                self.selector.deselect(&ids);
                self.load_step_rows();
                None
            }
            other => {
                log::warn!("unknown step action {}", other);
                None
            }
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| Line::from(format!("{}. {}", i + 1, step.name())))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.step_index)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.name))
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect, row: &Row) {
        let popup = centered_popup(area, 56, row.fields.len() as u16 + 5);
        frame.render_widget(Clear, popup);

        let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{:14}", "id"), label),
            Span::raw(row.id.clone()),
        ])];
        lines.extend(row.fields.iter().map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{:14}", key), label),
                Span::raw(format_value(value)),
            ])
        }));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Esc to close",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Details ")
                    .border_style(Style::default().fg(Color::Yellow)),
            );
        frame.render_widget(paragraph, popup);
    }
}

impl Component for AnalysisPage {
    fn init(&mut self) -> Result<()> {
        self.selector.init()?;
        self.load_step_rows();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.details.is_some() {
            let action = match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::CloseModal),
                _ => None,
            };
            return Ok(action);
        }

        let action = match key.code {
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Char(']') | KeyCode::Char('n') => Some(Action::NextStep),
            KeyCode::Char('[') | KeyCode::Char('p') => Some(Action::PrevStep),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Backspace => Some(Action::Navigate("/".to_string())),
            KeyCode::Char('x') if self.focus == Focus::Steps => {
                let ids = checked_ids(self.table.selection());
                (!ids.is_empty()).then(|| Action::RunTableAction {
                    name: REMOVE_ACTION.to_string(),
                    ids,
                })
            }
            _ => return self.focused_table().handle_key_event(key),
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.details.is_some() {
            return Ok(None);
        }
        if self.selector.table.contains(mouse.column, mouse.row) {
            self.set_focus(Focus::Selector);
            return self.selector.handle_mouse_event(mouse);
        }
        if self.table.contains(mouse.column, mouse.row) {
            self.set_focus(Focus::Steps);
            return self.table.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.selector.poll();
                match self.fetcher.poll() {
                    Some(Ok(countries)) => {
                        self.error = None;
                        self.set_step_countries(countries);
                    }
                    Some(Err(e)) => {
                        log::error!("loading step countries failed: {}", e);
                        self.error = Some(e.to_string());
                        self.table.set_rows(Vec::new());
                    }
                    None => {}
                }
            }
            Action::CloseModal => self.details = None,
            Action::FocusNext => {
                let next = match self.focus {
                    Focus::Selector => Focus::Steps,
                    Focus::Steps => Focus::Selector,
                };
                self.set_focus(next);
            }
            Action::NextStep => self.set_step((self.step_index + 1) % self.steps.len()),
            Action::PrevStep => {
                self.set_step((self.step_index + self.steps.len() - 1) % self.steps.len())
            }
            Action::Reload => {
                self.selector.load();
                self.load_step_rows();
            }
            Action::SelectionChanged(_) => match self.focus {
                Focus::Selector => {
                    self.selector.update(action)?;
                    self.load_step_rows();
                }
                Focus::Steps => {
                    if let Action::SelectionChanged(selection) = action {
                        self.table.set_selection(selection);
                    }
                }
            },
            Action::RunTableAction { .. } if self.focus == Focus::Selector => {
                self.selector.update(action)?;
                self.load_step_rows();
            }
            Action::RunTableAction { name, ids } => return Ok(self.run_step_action(&name, ids)),
            other => {
                return self.focused_table().update(other);
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(2)])
            .split(area);
        self.draw_header(frame, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);
        self.selector.draw(frame, columns[0])?;
        self.table.draw(frame, columns[1])?;

        let status = match (&self.selector.error, &self.error) {
            (Some(e), _) | (None, Some(e)) => {
                Line::from(Span::styled(format!(" {}", e), Style::default().fg(Color::Red)))
            }
            (None, None) => Line::from(Span::styled(
                format!(
                    " {} · {} countries selected",
                    self.current_step().description(),
                    self.selector.selected_ids().len()
                ),
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), rows[2]);

        if let Some(row) = &self.details {
            self.draw_details(frame, area, row);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::repository::tests::sample_repository;
    use crossterm::event::KeyModifiers;

    fn page() -> AnalysisPage {
        let repository = Arc::new(sample_repository());
        let mut page = AnalysisPage::new(
            "Analysis Page",
            repository.clone(),
            Vec::new(),
            true,
            MouseActionsMapping::default(),
        );
        page.selector.set_countries(repository.get_roots(&[]).unwrap());
        page
    }

    fn with_selected(ids: &[&str]) -> AnalysisPage {
        let mut page = page();
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        page.selector.set_selected_ids(&ids);
        let countries = page.use_case.execute(&ids).unwrap();
        page.set_step_countries(countries);
        page
    }

    #[test]
    fn test_level_renderer() {
        assert_eq!(render_level(&Row::new("x"), &Value::from(2)), "Region");
        assert_eq!(render_level(&Row::new("x"), &Value::Null), "");
    }

    #[test]
    fn test_step_navigation_wraps_and_lookup_ignores_case() {
        let mut page = page();
        page.update(Action::PrevStep).unwrap();
        assert_eq!(page.current_step(), AnalysisStep::Validation);

        assert!(page.open_step("general practitioners"));
        assert_eq!(page.current_step(), AnalysisStep::GeneralPractitioners);
        assert!(!page.open_step("unknown"));
    }

    #[test]
    fn test_details_action_opens_and_close_modal_dismisses() {
        let mut page = with_selected(&["ke", "mw"]);
        page.update(Action::FocusNext).unwrap();

        page.update(Action::RunTableAction {
            name: DETAILS_ACTION.to_string(),
            ids: vec!["mw".to_string()],
        })
        .unwrap();
        assert_eq!(page.details().map(|r| r.id.as_str()), Some("mw"));

        let close = page
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(close, Some(Action::CloseModal));
        page.update(Action::CloseModal).unwrap();
        assert!(page.details().is_none());
    }

    #[test]
    fn test_remove_action_deselects_country() {
        let mut page = with_selected(&["ke", "mw"]);
        page.update(Action::FocusNext).unwrap();

        page.update(Action::RunTableAction {
            name: REMOVE_ACTION.to_string(),
            ids: vec!["ke".to_string()],
        })
        .unwrap();
        assert_eq!(page.selector.selected_ids(), vec!["mw".to_string()]);
    }

    #[test]
    fn test_contextual_actions_for_step_rows() {
        let mut page = with_selected(&["ke"]);
        page.update(Action::FocusNext).unwrap();

        let names: Vec<String> = page
            .contextual_actions("ke")
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec![DETAILS_ACTION.to_string(), REMOVE_ACTION.to_string()]);
        assert!(page.contextual_actions("missing").is_empty());
    }

    #[test]
    fn test_remove_checked_rows_with_keyboard() {
        let mut page = with_selected(&["ke", "mw"]);
        page.update(Action::FocusNext).unwrap();
        page.update(Action::SelectionChanged(vec![
            TableSelection::checked("ke"),
            TableSelection::checked("mw"),
        ]))
        .unwrap();

        let action = page
            .handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(
            action,
            Some(Action::RunTableAction {
                name: REMOVE_ACTION.to_string(),
                ids: vec!["ke".to_string(), "mw".to_string()],
            })
        );
    }
}
