//! Hierarchical data table component
//!
//! Renders rows with expandable children, selection checkboxes and a
//! contextual actions button. Mouse clicks and key presses are translated into
//! pointer events and dispatched through [`crate::model::mouse::dispatch`].
//!
//! The body is built by [`build_body`], a pure function of the table inputs and
//! the expanded-row snapshot; drawing and hit-testing both work from its output.

use crate::action::Action;
use crate::component::Component;
use crate::model::formatting::{current_columns, format_row_value, parse_actions};
use crate::model::mouse::{dispatch, DispatchContext};
use crate::model::selection::find_selection;
use crate::model::table::RowConfigFn;
use crate::model::{
    ExpandedRows, MouseActionsMapping, PointerEvent, Row, RowConfig, SortOrder, TableAction,
    TableColumn, TableSelection, TableSorting, TargetKind,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{
        Block, Borders, Cell, HighlightSpacing, Paragraph, Row as TableRow, Table, TableState,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub const NO_RESULTS: &str = "No results found";

/// Columns reserved next to the data columns: lead (selection/expansion) and actions
const RESERVED_COLUMNS: usize = 2;
const ACTIONS_WIDTH: u16 = 3;
const MAX_COLUMN_WIDTH: usize = 40;
const COLUMN_SPACING: u16 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// Body model
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the body needs for one render pass
#[derive(Clone, Copy)]
pub struct DataTableBodyProps<'a> {
    pub rows: &'a [Row],
    pub columns: &'a [TableColumn],
    pub visible_columns: &'a [String],
    pub sorting: &'a TableSorting,
    pub children_keys: &'a [String],
    pub loading: bool,
    pub selected: &'a [TableSelection],
    pub available_actions: &'a [TableAction],
    pub row_config: Option<RowConfigFn>,
    pub enable_multiple_action: bool,
}

/// Checkbox drawn in the lead cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxState {
    pub checked: bool,
    pub indeterminate: bool,
    pub icon: String,
    pub interactive: bool,
}

impl CheckboxState {
    fn for_row(selected: &[TableSelection], id: &str, selectable: bool) -> Self {
        let entry = find_selection(selected, id);
        Self {
            checked: entry.is_some_and(|e| e.checked),
            indeterminate: entry.is_some_and(|e| e.indeterminate),
            icon: entry
                .and_then(|e| e.icon.clone())
                .unwrap_or_else(|| "▣".to_string()),
            interactive: selectable,
        }
    }

    fn symbol(&self) -> String {
        if self.indeterminate {
            format!("[{}]", self.icon)
        } else if self.checked {
            "[x]".to_string()
        } else {
            "[ ]".to_string()
        }
    }
}

/// One row as it appears on screen
#[derive(Debug, Clone)]
pub struct RenderedRow {
    /// Position path, `"<index>"` for top-level rows and `"<parent>-<child>"` below
    pub key: String,
    pub row: Row,
    pub level: usize,
    pub cells: Vec<String>,
    pub checkbox: Option<CheckboxState>,
    /// `Some(expanded)` when the row has children
    pub expander: Option<bool>,
    pub show_actions: bool,
    pub config: RowConfig,
}

impl RenderedRow {
    pub fn is_selected(&self) -> bool {
        self.checkbox
            .as_ref()
            .is_some_and(|c| c.checked || c.indeterminate)
    }

    fn indent(&self) -> usize {
        self.level * 2
    }

    fn lead_text(&self) -> String {
        let mut text = " ".repeat(self.indent());
        if let Some(checkbox) = &self.checkbox {
            text.push_str(&checkbox.symbol());
            text.push(' ');
        }
        if let Some(expanded) = self.expander {
            text.push_str(if expanded { "▾ " } else { "▸ " });
        }
        text
    }

    fn lead_width(&self) -> usize {
        let checkbox = if self.checkbox.is_some() { 4 } else { 0 };
        let expander = if self.expander.is_some() { 2 } else { 0 };
        self.indent() + checkbox + expander
    }

    /// Part of the lead cell at column offset `x`
    fn lead_target(&self, x: usize) -> TargetKind {
        let mut start = self.indent();
        if self.checkbox.is_some() {
            if (start..start + 3).contains(&x) {
                return TargetKind::Checkbox;
            }
            start += 4;
        }
        if self.expander.is_some() && (start..start + 2).contains(&x) {
            return TargetKind::ExpandToggle;
        }
        TargetKind::Cell
    }
}

#[derive(Debug, Clone)]
pub enum BodyLine {
    Row(RenderedRow),
    Placeholder { col_span: usize, text: String },
}

/// Build the visible lines of the table body
pub fn build_body(props: &DataTableBodyProps<'_>, expanded: &ExpandedRows) -> Vec<BodyLine> {
    let mut lines = Vec::new();

    for (index, row) in props.rows.iter().enumerate() {
        push_row(props, expanded, row, index.to_string(), 0, &mut lines);
    }

    if !props.loading && props.rows.is_empty() {
        lines.push(BodyLine::Placeholder {
            col_span: props.columns.len() + RESERVED_COLUMNS,
            text: NO_RESULTS.to_string(),
        });
    }

    lines
}

fn push_row(
    props: &DataTableBodyProps<'_>,
    expanded: &ExpandedRows,
    row: &Row,
    key: String,
    level: usize,
    lines: &mut Vec<BodyLine>,
) {
    let mut children = row.children(props.children_keys);
    props.sorting.sort_rows(&mut children);

    let config = props.row_config.map(|f| f(row)).unwrap_or_default();
    let is_expanded = expanded.contains(&row.id);

    let rendered = RenderedRow {
        key: key.clone(),
        row: row.clone(),
        level,
        cells: current_columns(props.visible_columns, props.columns)
            .into_iter()
            .map(|column| format_row_value(column, row))
            .collect(),
        checkbox: props
            .enable_multiple_action
            .then(|| CheckboxState::for_row(props.selected, &row.id, config.selectable)),
        expander: (!children.is_empty()).then_some(is_expanded),
        show_actions: !parse_actions(&[row], props.available_actions).is_empty(),
        config,
    };
    lines.push(BodyLine::Row(rendered));

    if is_expanded {
        for (child_index, child) in children.iter().enumerate() {
            let child_key = format!("{}-{}", key, child_index);
            push_row(props, expanded, child, child_key, level + 1, lines);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Screen geometry of the last draw
#[derive(Debug, Clone, Default)]
struct DrawnLayout {
    /// Area holding the body rows (below the header)
    rows_area: Rect,
    /// Lead and actions columns, x relative to `rows_area.x`
    lead: Rect,
    actions: Rect,
}

impl DrawnLayout {
    fn in_column(column: Rect, x: u16) -> bool {
        x >= column.x && x < column.right()
    }
}

/// Data table with its own expansion state and cursor
pub struct DataTable {
    title: String,
    rows: Vec<Row>,
    columns: Vec<TableColumn>,
    visible_columns: Vec<String>,
    sorting: TableSorting,
    children_keys: Vec<String>,
    loading: bool,
    selected: Vec<TableSelection>,
    actions: Vec<TableAction>,
    row_config: Option<RowConfigFn>,
    enable_multiple_action: bool,
    mouse_actions: MouseActionsMapping,
    expanded: ExpandedRows,
    state: TableState,
    pub focused: bool,
    layout: Option<DrawnLayout>,
}

impl DataTable {
    /// New table showing every column in `columns`, sorted by the first one
    pub fn new(title: impl Into<String>, columns: Vec<TableColumn>) -> Self {
        let visible_columns = columns.iter().map(|c| c.name.clone()).collect();
        let sort_field = columns.first().map(|c| c.name.clone()).unwrap_or_default();
        Self {
            title: title.into(),
            rows: Vec::new(),
            columns,
            visible_columns,
            sorting: TableSorting::new(sort_field, SortOrder::Asc),
            children_keys: Vec::new(),
            loading: false,
            selected: Vec::new(),
            actions: Vec::new(),
            row_config: None,
            enable_multiple_action: false,
            mouse_actions: MouseActionsMapping::default(),
            expanded: ExpandedRows::new(),
            state: TableState::default(),
            focused: false,
            layout: None,
        }
    }

    pub fn with_visible_columns(mut self, visible: Vec<String>) -> Self {
        self.visible_columns = visible;
        self
    }

    pub fn with_children_keys(mut self, keys: Vec<String>) -> Self {
        self.children_keys = keys;
        self
    }

    pub fn with_actions(mut self, actions: Vec<TableAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_row_config(mut self, row_config: RowConfigFn) -> Self {
        self.row_config = Some(row_config);
        self
    }

    pub fn with_multiple_action(mut self, enabled: bool) -> Self {
        self.enable_multiple_action = enabled;
        self
    }

    pub fn with_mouse_actions(mut self, mapping: MouseActionsMapping) -> Self {
        self.mouse_actions = mapping;
        self
    }

    /// Replace the rows; top-level rows are ordered by the active sorting
    pub fn set_rows(&mut self, mut rows: Vec<Row>) {
        self.sorting.sort_rows(&mut rows);
        self.rows = rows;
        self.loading = false;
        self.clamp_cursor();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_selection(&mut self, selected: Vec<TableSelection>) {
        self.selected = selected;
    }

    pub fn selection(&self) -> &[TableSelection] {
        &self.selected
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn expanded(&self) -> &ExpandedRows {
        &self.expanded
    }

    pub fn actions(&self) -> &[TableAction] {
        &self.actions
    }

    /// Find a rendered or nested row by id
    pub fn find_row(&self, id: &str) -> Option<Row> {
        fn search(rows: &[Row], id: &str, keys: &[String]) -> Option<Row> {
            rows.iter().find_map(|row| {
                if row.id == id {
                    Some(row.clone())
                } else {
                    search(&row.children(keys), id, keys)
                }
            })
        }
        search(&self.rows, id, &self.children_keys)
    }

    pub fn body(&self) -> Vec<BodyLine> {
        let props = DataTableBodyProps {
            rows: &self.rows,
            columns: &self.columns,
            visible_columns: &self.visible_columns,
            sorting: &self.sorting,
            children_keys: &self.children_keys,
            loading: self.loading,
            selected: &self.selected,
            available_actions: &self.actions,
            row_config: self.row_config,
            enable_multiple_action: self.enable_multiple_action,
        };
        build_body(&props, &self.expanded)
    }

    /// Row under the cursor
    pub fn cursor_row(&self) -> Option<RenderedRow> {
        let index = self.state.selected()?;
        match self.body().into_iter().nth(index)? {
            BodyLine::Row(row) => Some(row),
            BodyLine::Placeholder { .. } => None,
        }
    }

    /// Whether the terminal cell at (`column`, `row`) lies inside the table body
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.layout.as_ref().is_some_and(|layout| {
            let area = layout.rows_area;
            column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
        })
    }

    fn row_count(&self) -> usize {
        self.body()
            .iter()
            .filter(|line| matches!(line, BodyLine::Row(_)))
            .count()
    }

    fn clamp_cursor(&mut self) {
        let count = self.row_count();
        let selected = match self.state.selected() {
            _ if count == 0 => None,
            Some(index) => Some(index.min(count - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    fn move_cursor(&mut self, delta: isize) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let current = self.state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, count as isize - 1);
        self.state.select(Some(next as usize));
    }

    fn toggle_expanded(&mut self, id: &str) {
        self.expanded = self.expanded.toggled(id);
        log::debug!("{}: row {} expanded = {}", self.title, id, self.expanded.contains(id));
        self.clamp_cursor();
    }

    fn cycle_sort_field(&mut self) {
        let sortable: Vec<&TableColumn> = current_columns(&self.visible_columns, &self.columns)
            .into_iter()
            .filter(|c| c.sortable)
            .collect();
        if sortable.is_empty() {
            return;
        }
        let position = sortable.iter().position(|c| c.name == self.sorting.field);
        let next = position.map_or(0, |p| (p + 1) % sortable.len());
        self.sorting = TableSorting::new(sortable[next].name.clone(), self.sorting.order);
        self.resort();
    }

    fn resort(&mut self) {
        let rows = std::mem::take(&mut self.rows);
        let loading = self.loading;
        self.set_rows(rows);
        self.loading = loading;
    }

    /// Dispatch a pointer event on the body line at `index`
    fn handle_pointer(&mut self, index: usize, event: PointerEvent) -> Option<Action> {
        let lines = self.body();
        let BodyLine::Row(rendered) = lines.get(index)? else {
            return None;
        };
        self.state.select(Some(index));

        let ctx = DispatchContext {
            actions: &self.actions,
            selected: &self.selected,
            mapping: &self.mouse_actions,
            enable_multiple_action: self.enable_multiple_action,
        };
        let result = dispatch(&ctx, &rendered.row, &rendered.config, &event);
        if result.prevent_default {
            log::trace!("{}: default context menu suppressed", self.title);
        }

        match result.command.map(Action::from) {
            Some(Action::ToggleExpanded(id)) => {
                self.toggle_expanded(&id);
                None
            }
            other => other,
        }
    }

    /// Map a terminal position to a body line and the part of the row hit
    fn hit_test(&self, column: u16, row: u16) -> Option<(usize, TargetKind)> {
        if !self.contains(column, row) {
            return None;
        }
        let layout = self.layout.as_ref()?;
        let index = self.state.offset() + (row - layout.rows_area.y) as usize;
        let x = column - layout.rows_area.x;

        let lines = self.body();
        let BodyLine::Row(rendered) = lines.get(index)? else {
            return None;
        };

        let target = if DrawnLayout::in_column(layout.lead, x) {
            rendered.lead_target((x - layout.lead.x) as usize)
        } else if DrawnLayout::in_column(layout.actions, x) && rendered.show_actions {
            TargetKind::ActionsButton
        } else {
            TargetKind::Cell
        };
        Some((index, target))
    }

    /// Screen position used for keyboard-triggered pointer events
    fn cursor_position(&self) -> (u16, u16) {
        match (&self.layout, self.state.selected()) {
            (Some(layout), Some(index)) => {
                let visible = index.saturating_sub(self.state.offset()) as u16;
                (
                    layout.rows_area.x + layout.lead.right(),
                    layout.rows_area.y + visible,
                )
            }
            _ => (0, 0),
        }
    }

    fn keyboard_pointer(&mut self, target: TargetKind, right: bool) -> Option<Action> {
        let index = self.state.selected()?;
        let (x, y) = self.cursor_position();
        let event = if right {
            PointerEvent::right(target, x, y)
        } else {
            PointerEvent::left(target, x, y)
        };
        self.handle_pointer(index, event)
    }

    fn column_widths(&self, lines: &[BodyLine]) -> (u16, Vec<u16>) {
        let columns = current_columns(&self.visible_columns, &self.columns);
        let mut widths: Vec<usize> = columns
            .iter()
            .map(|c| c.text.width() + 2)
            .collect();
        let mut lead = 1;

        for line in lines {
            if let BodyLine::Row(rendered) = line {
                lead = lead.max(rendered.lead_width());
                for (i, cell) in rendered.cells.iter().enumerate() {
                    if let Some(width) = widths.get_mut(i) {
                        *width = (*width).max(cell.width());
                    }
                }
            }
        }

        let widths = widths
            .into_iter()
            .map(|w| w.min(MAX_COLUMN_WIDTH) as u16)
            .collect();
        (lead as u16, widths)
    }

    fn row_style(rendered: &RenderedRow) -> Style {
        let mut style = if rendered.level == 0 {
            Style::default()
        } else {
            Style::default().bg(Color::Indexed(236))
        };
        if rendered.is_selected() {
            style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
        }
        if rendered.config.disabled {
            style = style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
        }
        match rendered.config.style {
            Some(custom) => style.patch(custom),
            None => style,
        }
    }

    fn title_line(&self) -> String {
        let mut title = format!(" {} ({}) ", self.title, self.rows.len());
        let checked = self.selected.iter().filter(|s| s.checked).count();
        if checked > 0 {
            title = format!("{}[{}✓] ", title, checked);
        }
        if self.loading {
            title = format!("{}[loading…] ", title);
        }
        title
    }
}

impl Component for DataTable {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::CursorDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::CursorUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstItem),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastItem),
            KeyCode::Char('s') => Some(Action::CycleSortField),
            KeyCode::Char('o') => Some(Action::ToggleSortOrder),
            KeyCode::Right | KeyCode::Char('l') => {
                let row = self.cursor_row();
                row.filter(|r| !r.config.disabled && r.expander == Some(false))
                    .map(|r| Action::ToggleExpanded(r.row.id))
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let row = self.cursor_row();
                row.filter(|r| !r.config.disabled && r.expander == Some(true))
                    .map(|r| Action::ToggleExpanded(r.row.id))
            }
            KeyCode::Enter => self.keyboard_pointer(TargetKind::Cell, false),
            KeyCode::Char(' ') => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                let index = self.state.selected();
                let (x, y) = self.cursor_position();
                let event = PointerEvent::left(TargetKind::Checkbox, x, y).with_ctrl(ctrl);
                index.and_then(|index| self.handle_pointer(index, event))
            }
            KeyCode::Char('m') | KeyCode::Menu => self.keyboard_pointer(TargetKind::Cell, true),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let button = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => MouseButton::Left,
            MouseEventKind::Down(MouseButton::Right) => MouseButton::Right,
            MouseEventKind::ScrollDown if self.contains(mouse.column, mouse.row) => {
                return Ok(Some(Action::CursorDown));
            }
            MouseEventKind::ScrollUp if self.contains(mouse.column, mouse.row) => {
                return Ok(Some(Action::CursorUp));
            }
            _ => return Ok(None),
        };

        let Some((index, target)) = self.hit_test(mouse.column, mouse.row) else {
            return Ok(None);
        };

        let event = match button {
            MouseButton::Right => PointerEvent::right(target, mouse.column, mouse.row),
            _ => PointerEvent::left(target, mouse.column, mouse.row),
        }
        .with_ctrl(mouse.modifiers.contains(KeyModifiers::CONTROL));

        Ok(self.handle_pointer(index, event))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::CursorDown => self.move_cursor(1),
            Action::CursorUp => self.move_cursor(-1),
            Action::FirstItem => self.move_cursor(isize::MIN / 2),
            Action::LastItem => self.move_cursor(isize::MAX / 2),
            Action::ToggleExpanded(id) => self.toggle_expanded(&id),
            Action::CycleSortField => self.cycle_sort_field(),
            Action::ToggleSortOrder => {
                self.sorting.order = self.sorting.order.toggled();
                self.resort();
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let border_color = if self.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title_line())
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(area);
        let lines = self.body();

        if self.rows.is_empty() {
            // No rows: either still loading or the "no results" placeholder
            let text = match lines.first() {
                Some(BodyLine::Placeholder { text, .. }) => text.clone(),
                _ => "Loading…".to_string(),
            };
            let paragraph = Paragraph::new(vec![Line::from(""), Line::from(text)])
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            self.layout = None;
            return Ok(());
        }

        let (lead_width, widths) = self.column_widths(&lines);
        let columns = current_columns(&self.visible_columns, &self.columns);

        let header_cells = std::iter::once(Cell::from(""))
            .chain(columns.iter().map(|column| {
                if column.name == self.sorting.field {
                    Cell::from(format!("{} {}", column.text, self.sorting.order.arrow()))
                } else {
                    Cell::from(column.text.clone())
                }
            }))
            .chain(std::iter::once(Cell::from("")));
        let header = TableRow::new(header_cells)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows: Vec<TableRow> = lines
            .iter()
            .filter_map(|line| match line {
                BodyLine::Row(rendered) => Some(rendered),
                BodyLine::Placeholder { .. } => None,
            })
            .map(|rendered| {
                let cell_style = rendered.config.cell_style.unwrap_or_default();
                let lead = Cell::from(rendered.lead_text()).style(
                    match &rendered.checkbox {
                        Some(checkbox) if !checkbox.interactive => {
                            cell_style.add_modifier(Modifier::DIM)
                        }
                        _ => cell_style,
                    },
                );
                let actions = Cell::from(if rendered.show_actions { " ⋮ " } else { "" })
                    .style(cell_style.fg(Color::Yellow));

                let cells = std::iter::once(lead)
                    .chain(
                        rendered
                            .cells
                            .iter()
                            .map(|text| Cell::from(text.clone()).style(cell_style)),
                    )
                    .chain(std::iter::once(actions));

                TableRow::new(cells).style(Self::row_style(rendered))
            })
            .collect();

        let constraints: Vec<Constraint> = std::iter::once(lead_width)
            .chain(widths.iter().copied())
            .chain(std::iter::once(ACTIONS_WIDTH))
            .map(Constraint::Length)
            .collect();

        // the split Table performs internally
        let drawn_columns = Layout::horizontal(constraints.clone())
            .flex(Flex::Start)
            .spacing(COLUMN_SPACING)
            .split(Rect::new(0, 0, inner.width, 1));

        let table = Table::new(rows, constraints)
            .header(header)
            .block(block)
            .column_spacing(COLUMN_SPACING)
            .flex(Flex::Start)
            .highlight_spacing(HighlightSpacing::Never)
            .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD));

        frame.render_stateful_widget(table, area, &mut self.state);

        self.layout = Some(DrawnLayout {
            rows_area: Rect {
                y: inner.y + 1,
                height: inner.height.saturating_sub(1),
                ..inner
            },
            lead: drawn_columns.first().copied().unwrap_or_default(),
            actions: drawn_columns.last().copied().unwrap_or_default(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn columns() -> Vec<TableColumn> {
        vec![TableColumn::new("name", "Name"), TableColumn::new("level", "Level")]
    }

    fn tree() -> Vec<Row> {
        vec![
            Row::from_value(&json!({
                "id": "mw",
                "name": "Malawi",
                "level": 1,
                "children": [
                    {"id": "s", "name": "Southern", "level": 2},
                    {"id": "n", "name": "Northern", "level": 2,
                     "children": [{"id": "n1", "name": "Mzimba", "level": 3}]}
                ]
            }))
            .unwrap(),
            Row::from_value(&json!({"id": "ke", "name": "Kenya", "level": 1})).unwrap(),
        ]
    }

    struct Fixture {
        rows: Vec<Row>,
        columns: Vec<TableColumn>,
        visible: Vec<String>,
        sorting: TableSorting,
        keys: Vec<String>,
        selected: Vec<TableSelection>,
        actions: Vec<TableAction>,
    }

    impl Fixture {
        fn new(rows: Vec<Row>) -> Self {
            Self {
                rows,
                columns: columns(),
                visible: vec!["name".to_string(), "level".to_string()],
                sorting: TableSorting::new("name", SortOrder::Asc),
                keys: vec!["children".to_string()],
                selected: Vec::new(),
                actions: vec![TableAction::new("details", "Details").primary()],
            }
        }

        fn props(&self, loading: bool) -> DataTableBodyProps<'_> {
            DataTableBodyProps {
                rows: &self.rows,
                columns: &self.columns,
                visible_columns: &self.visible,
                sorting: &self.sorting,
                children_keys: &self.keys,
                loading,
                selected: &self.selected,
                available_actions: &self.actions,
                row_config: None,
                enable_multiple_action: true,
            }
        }
    }

    fn rendered(lines: &[BodyLine]) -> Vec<&RenderedRow> {
        lines
            .iter()
            .filter_map(|line| match line {
                BodyLine::Row(row) => Some(row),
                BodyLine::Placeholder { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_rows_render_single_placeholder() {
        let fixture = Fixture::new(Vec::new());
        let lines = build_body(&fixture.props(false), &ExpandedRows::new());

        assert_eq!(lines.len(), 1);
        match &lines[0] {
            BodyLine::Placeholder { col_span, text } => {
                assert_eq!(*col_span, fixture.columns.len() + 2);
                assert_eq!(text, "No results found");
            }
            other => panic!("unexpected line {:?}", other),
        }
    }

    #[test]
    fn test_empty_rows_while_loading_render_nothing() {
        let fixture = Fixture::new(Vec::new());
        assert!(build_body(&fixture.props(true), &ExpandedRows::new()).is_empty());
    }

    #[test]
    fn test_rows_without_children_have_no_expand_control() {
        let fixture = Fixture::new(tree());
        let lines = build_body(&fixture.props(false), &ExpandedRows::new());
        let rows = rendered(&lines);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].expander, Some(false));
        assert_eq!(rows[1].expander, None);
    }

    #[test]
    fn test_expanded_children_are_sorted_and_nested() {
        let fixture = Fixture::new(tree());
        let expanded = ExpandedRows::new().toggled("mw").toggled("n");
        let lines = build_body(&fixture.props(false), &expanded);

        let summary: Vec<(&str, usize, &str)> = rendered(&lines)
            .iter()
            .map(|r| (r.row.id.as_str(), r.level, r.key.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("mw", 0, "0"),
                ("n", 1, "0-0"),
                ("n1", 2, "0-0-0"),
                ("s", 1, "0-1"),
                ("ke", 0, "1"),
            ]
        );
    }

    #[test]
    fn test_children_hidden_when_parent_collapsed() {
        let fixture = Fixture::new(tree());
        // "n" is expanded but its parent is not
        let expanded = ExpandedRows::new().toggled("n");
        let lines = build_body(&fixture.props(false), &expanded);

        assert_eq!(rendered(&lines).len(), 2);
    }

    #[test]
    fn test_descending_child_order() {
        let mut fixture = Fixture::new(tree());
        fixture.sorting = TableSorting::new("name", SortOrder::Desc);
        let expanded = ExpandedRows::new().toggled("mw");
        let lines = build_body(&fixture.props(false), &expanded);

        let ids: Vec<&str> = rendered(&lines).iter().map(|r| r.row.id.as_str()).collect();
        // top-level order is left as given
        assert_eq!(ids, vec!["mw", "s", "n", "ke"]);
    }

    #[test]
    fn test_cells_follow_visible_columns() {
        let mut fixture = Fixture::new(tree());
        fixture.visible = vec!["level".to_string(), "missing".to_string(), "name".to_string()];
        let lines = build_body(&fixture.props(false), &ExpandedRows::new());

        assert_eq!(rendered(&lines)[1].cells, vec!["1".to_string(), "Kenya".to_string()]);
    }

    #[test]
    fn test_checkbox_reflects_selection() {
        let mut fixture = Fixture::new(tree());
        fixture.selected = vec![
            TableSelection::checked("ke"),
            TableSelection {
                icon: Some("◐".to_string()),
                ..TableSelection::indeterminate("mw")
            },
        ];
        let lines = build_body(&fixture.props(false), &ExpandedRows::new());
        let rows = rendered(&lines);

        assert!(rows[0].is_selected());
        assert_eq!(rows[0].lead_text(), "[◐] ▸ ");
        assert_eq!(rows[1].lead_text(), "[x] ");
    }

    #[test]
    fn test_lead_targets() {
        let fixture = Fixture::new(tree());
        let expanded = ExpandedRows::new().toggled("mw");
        let lines = build_body(&fixture.props(false), &expanded);
        let rows = rendered(&lines);

        // top-level: "[ ] ▾ "
        assert_eq!(rows[0].lead_target(1), TargetKind::Checkbox);
        assert_eq!(rows[0].lead_target(4), TargetKind::ExpandToggle);
        // child "n" at level 1: "  [ ] ▸ "
        assert_eq!(rows[1].lead_target(0), TargetKind::Cell);
        assert_eq!(rows[1].lead_target(2), TargetKind::Checkbox);
        assert_eq!(rows[1].lead_target(6), TargetKind::ExpandToggle);
    }

    #[test]
    fn test_disabled_row_is_marked_but_keeps_checkbox() {
        fn config(row: &Row) -> RowConfig {
            if row.id == "ke" {
                RowConfig::disabled()
            } else {
                RowConfig::default()
            }
        }

        let fixture = Fixture::new(tree());
        let mut props = fixture.props(false);
        props.row_config = Some(config);
        let lines = build_body(&props, &ExpandedRows::new());
        let kenya = rendered(&lines)[1].clone();

        assert!(kenya.config.disabled);
        let checkbox = kenya.checkbox.expect("checkbox still drawn");
        assert!(!checkbox.interactive);
    }

    #[test]
    fn test_actions_button_only_when_an_action_applies() {
        let mut fixture = Fixture::new(tree());
        fixture.actions.clear();
        let lines = build_body(&fixture.props(false), &ExpandedRows::new());
        assert!(rendered(&lines).iter().all(|r| !r.show_actions));
    }

    #[test]
    fn test_component_keyboard_expand_and_primary_action() {
        let mut table = DataTable::new("Countries", columns())
            .with_children_keys(vec!["children".to_string()])
            .with_actions(vec![TableAction::new("details", "Details").primary()]);
        table.set_rows(tree());

        // rows sorted by name: Kenya, Malawi
        table.update(Action::CursorDown).unwrap();
        let expand = table
            .handle_key_event(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(expand, Some(Action::ToggleExpanded("mw".to_string())));

        table.update(expand.unwrap()).unwrap();
        assert!(table.expanded().contains("mw"));
        assert_eq!(table.body().len(), 4);

        let primary = table
            .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(
            primary,
            Some(Action::RunTableAction {
                name: "details".to_string(),
                ids: vec!["mw".to_string()],
            })
        );
    }

    #[test]
    fn test_component_space_toggles_selection() {
        let mut table = DataTable::new("Countries", columns()).with_multiple_action(true);
        table.set_rows(tree());

        let action = table
            .handle_key_event(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(
            action,
            Some(Action::SelectionChanged(vec![TableSelection::checked("ke")]))
        );
        // the table never stores the selection itself
        assert!(table.selection().is_empty());
    }

    #[test]
    fn test_find_row_searches_children() {
        let mut table = DataTable::new("Countries", columns())
            .with_children_keys(vec!["children".to_string()]);
        table.set_rows(tree());

        assert_eq!(table.find_row("n1").map(|r| r.id), Some("n1".to_string()));
        assert!(table.find_row("zz").is_none());
    }

    #[test]
    fn test_row_style_marks_children_and_disabled_rows() {
        fn config(row: &Row) -> RowConfig {
            if row.id == "ke" {
                RowConfig::disabled()
            } else {
                RowConfig::default()
            }
        }

        let fixture = Fixture::new(tree());
        let mut props = fixture.props(false);
        props.row_config = Some(config);
        let lines = build_body(&props, &ExpandedRows::new().toggled("mw"));
        let rows = rendered(&lines);

        // mw, n, s, ke
        let top = DataTable::row_style(rows[0]);
        let child = DataTable::row_style(rows[1]);
        let disabled = DataTable::row_style(rows[3]);

        assert_eq!(top.bg, None);
        assert!(child.bg.is_some());
        assert_ne!(top, child);
        assert_eq!(disabled.fg, Some(Color::DarkGray));
        assert!(disabled.add_modifier.contains(Modifier::DIM));
        assert_ne!(top, disabled);
    }

    fn step_rows_table() -> DataTable {
        let mut table = DataTable::new(
            "Outliers",
            vec![
                TableColumn::new("name", "Name"),
                TableColumn::new("code", "Code"),
                TableColumn::new("type", "Type"),
                TableColumn::new("lastUpdated", "Last updated"),
            ],
        )
        .with_actions(vec![TableAction::new("details", "Details").primary()])
        .with_multiple_action(true)
        .with_mouse_actions(MouseActionsMapping::default());
        table.set_rows(vec![Row::from_value(&json!({
            "id": "sl-wau",
            "name": "Western Area Urban",
            "code": "SL-WAU-0001",
            "type": "District",
            "lastUpdated": "2024-03-11T09:22:41.120"
        }))
        .unwrap()]);
        table
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_click_on_drawn_actions_button_in_narrow_pane() {
        for width in [40, 48, 80] {
            let mut table = step_rows_table();
            let mut terminal = Terminal::new(TestBackend::new(width, 8)).unwrap();
            terminal
                .draw(|frame| table.draw(frame, frame.area()).unwrap())
                .unwrap();

            let buffer = terminal.backend().buffer();
            let index = buffer
                .content
                .iter()
                .position(|cell| cell.symbol() == "⋮")
                .expect("actions button drawn");
            let (x, y) = (index as u16 % width, index as u16 / width);

            assert_eq!(table.hit_test(x, y), Some((0, TargetKind::ActionsButton)));
            assert_eq!(table.hit_test(x - 2, y), Some((0, TargetKind::Cell)));

            let action = table.handle_mouse_event(left_click(x, y)).unwrap();
            assert_eq!(
                action,
                Some(Action::OpenContextualMenu {
                    row_id: "sl-wau".to_string(),
                    screen_y: y,
                    screen_x: x,
                }),
                "width {}",
                width
            );
        }
    }
}
