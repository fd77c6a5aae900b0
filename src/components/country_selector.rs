//! Country selector: organisation unit tree with multi-selection
//!
//! Units of levels 1 to 3 are shown and selectable. Checking a unit marks its
//! ancestors as partially selected.

use crate::action::Action;
use crate::component::Component;
use crate::components::DataTable;
use crate::model::country::CHILDREN_KEY;
use crate::model::selection::checked_ids;
use crate::model::{
    Country, MouseActionsMapping, Row, RowConfig, TableAction, TableColumn, TableSelection,
};
use crate::services::{CountryRepository, Fetcher};
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;

const MAX_LEVEL: u32 = 3;
const PARTIAL_ICON: &str = "◐";

pub const SELECT_ACTION: &str = "select";

fn is_selectable(row: &Row) -> bool {
    let level = row.field("level").as_u64().unwrap_or(0);
    (1..=MAX_LEVEL as u64).contains(&level)
}

fn row_config(row: &Row) -> RowConfig {
    if is_selectable(row) {
        RowConfig::default()
    } else {
        RowConfig::not_selectable()
    }
}

pub struct CountrySelector {
    pub table: DataTable,
    repository: Arc<dyn CountryRepository>,
    root_ids: Vec<String>,
    fetcher: Fetcher<Vec<Country>>,
    pub error: Option<String>,
}

impl CountrySelector {
    pub fn new(
        repository: Arc<dyn CountryRepository>,
        root_ids: Vec<String>,
        mouse_actions: MouseActionsMapping,
    ) -> Self {
        let table = DataTable::new(
            "Countries",
            vec![
                TableColumn::new("name", "Name"),
                TableColumn::new("code", "Code"),
                TableColumn::new("level", "Level"),
            ],
        )
        .with_visible_columns(vec!["name".to_string(), "code".to_string()])
        .with_children_keys(vec![CHILDREN_KEY.to_string()])
        .with_actions(vec![TableAction::new(SELECT_ACTION, "Select / unselect")
            .primary()
            .active_when(|rows| rows.iter().all(|row| is_selectable(row)))])
        .with_row_config(row_config)
        .with_multiple_action(true)
        .with_mouse_actions(mouse_actions);

        Self {
            table,
            repository,
            root_ids,
            fetcher: Fetcher::new(),
            error: None,
        }
    }

    /// Query the tree roots in the background
    pub fn load(&mut self) {
        let repository = Arc::clone(&self.repository);
        let root_ids = self.root_ids.clone();
        self.fetcher.spawn(move || repository.get_roots(&root_ids));
        self.table.set_loading(true);
    }

    /// Collect a finished load; returns whether the rows changed
    pub fn poll(&mut self) -> bool {
        match self.fetcher.poll() {
            Some(Ok(countries)) => {
                self.set_countries(countries);
                true
            }
            Some(Err(e)) => {
                log::error!("loading countries failed: {}", e);
                self.error = Some(e.to_string());
                self.table.set_rows(Vec::new());
                true
            }
            None => false,
        }
    }

    pub fn set_countries(&mut self, countries: Vec<Country>) {
        self.error = None;
        let rows = countries.iter().map(|c| c.pruned(MAX_LEVEL).to_row()).collect();
        self.table.set_rows(rows);

        // partial markers depend on the tree, recompute them for the new rows
        let ids = self.selected_ids();
        self.set_selected_ids(&ids);
    }

    pub fn selected_ids(&self) -> Vec<String> {
        checked_ids(self.table.selection())
    }

    pub fn set_selected_ids(&mut self, ids: &[String]) {
        let selection = selection_with_ancestors(self.table.rows(), ids);
        self.table.set_selection(selection);
    }

    /// Toggle every id in `ids`
    pub fn toggle(&mut self, ids: &[String]) {
        let mut selected = self.selected_ids();
        for id in ids {
            if let Some(position) = selected.iter().position(|s| s == id) {
                selected.remove(position);
            } else {
                selected.push(id.clone());
            }
        }
        self.set_selected_ids(&selected);
    }

    pub fn deselect(&mut self, ids: &[String]) {
        let selected: Vec<String> = self
            .selected_ids()
            .into_iter()
            .filter(|id| !ids.contains(id))
            .collect();
        self.set_selected_ids(&selected);
    }
}

/// Checked entries for `checked` plus partial entries for their ancestors
fn selection_with_ancestors(rows: &[Row], checked: &[String]) -> Vec<TableSelection> {
    let keys = [CHILDREN_KEY.to_string()];
    let mut selection: Vec<TableSelection> =
        checked.iter().map(TableSelection::checked).collect();

    for id in checked {
        let Some(path) = path_to(rows, id, &keys) else {
            continue;
        };
        for ancestor in path.iter().filter(|a| *a != id) {
            if !selection.iter().any(|s| &s.id == ancestor) {
                selection.push(TableSelection {
                    icon: Some(PARTIAL_ICON.to_string()),
                    ..TableSelection::indeterminate(ancestor.clone())
                });
            }
        }
    }
    selection
}

/// Ids from a root down to `id`, inclusive
fn path_to(rows: &[Row], id: &str, keys: &[String]) -> Option<Vec<String>> {
    rows.iter().find_map(|row| {
        if row.id == id {
            return Some(vec![row.id.clone()]);
        }
        let mut path = path_to(&row.children(keys), id, keys)?;
        path.insert(0, row.id.clone());
        Some(path)
    })
}

impl Component for CountrySelector {
    fn init(&mut self) -> Result<()> {
        self.load();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.table.handle_key_event(key)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        self.table.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SelectionChanged(selection) => {
                let ids = checked_ids(&selection);
                log::debug!("selected countries: {:?}", ids);
                self.set_selected_ids(&ids);
                Ok(None)
            }
            Action::RunTableAction { name, ids } if name == SELECT_ACTION => {
                self.toggle(&ids);
                Ok(None)
            }
            other => self.table.update(other),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.table.draw(frame, area)
    }
}
