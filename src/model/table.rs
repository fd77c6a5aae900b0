//! Data table model - rows, columns, selection, sorting and actions
//!
//! These types describe what a data table shows. They carry no rendering
//! logic and are shared by every table in the application.

use ratatui::style::Style;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

// ═══════════════════════════════════════════════════════════════════════════════
// Rows
// ═══════════════════════════════════════════════════════════════════════════════

/// A single record shown by a data table
///
/// Every row has an identifier; everything else lives in `fields` and is read
/// through the column and children-key names configured on the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Value stored under `key`, `Null` when absent. `id` resolves to the identifier.
    pub fn field(&self, key: &str) -> Value {
        if key == "id" {
            return Value::String(self.id.clone());
        }
        self.fields.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Build a row from a JSON object carrying an `id`
    ///
    /// Numeric identifiers are accepted and stringified. Anything that is not
    /// an object with an identifier yields `None`.
    pub fn from_value(value: &Value) -> Option<Row> {
        let object = value.as_object()?;
        let id = match object.get("id")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let fields = object
            .iter()
            .filter(|(key, _)| key.as_str() != "id")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Row { id, fields })
    }

    /// Child rows found under the given keys
    ///
    /// Values are collected in key order and nested arrays are flattened to
    /// any depth. Entries that are not rows are skipped.
    pub fn children(&self, keys: &[String]) -> Vec<Row> {
        let mut children = Vec::new();
        for key in keys {
            if let Some(value) = self.fields.get(key) {
                collect_rows(value, &mut children);
            }
        }
        children
    }
}

fn collect_rows(value: &Value, out: &mut Vec<Row>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_rows(item, out);
            }
        }
        Value::Object(_) => {
            if let Some(row) = Row::from_value(value) {
                out.push(row);
            }
        }
        _ => {}
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Columns
// ═══════════════════════════════════════════════════════════════════════════════

/// Custom cell renderer: receives the row and the raw field value
pub type CellRenderer = fn(&Row, &Value) -> String;

/// Column descriptor pairing a field name with its formatting rule
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub name: String,
    /// Header text
    pub text: String,
    pub sortable: bool,
    pub render: Option<CellRenderer>,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            sortable: true,
            render: None,
        }
    }

    pub fn with_render(mut self, render: CellRenderer) -> Self {
        self.render = Some(render);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Selection
// ═══════════════════════════════════════════════════════════════════════════════

/// Selection state of one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelection {
    pub id: String,
    pub checked: bool,
    /// Partial selection, owned and maintained by the caller
    pub indeterminate: bool,
    /// Icon drawn instead of the default one for indeterminate rows
    pub icon: Option<String>,
}

impl TableSelection {
    pub fn checked(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            checked: true,
            ..Default::default()
        }
    }

    pub fn indeterminate(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            indeterminate: true,
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sorting
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "▲",
            SortOrder::Desc => "▼",
        }
    }
}

/// Active sort field and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSorting {
    pub field: String,
    pub order: SortOrder,
}

impl TableSorting {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Stable sort of `rows` by the active field
    pub fn sort_rows(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }

    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ordering = compare_values(&a.field(&self.field), &b.field(&self.field));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Ascending comparison of two field values
///
/// Missing values sort after everything else, numbers compare numerically and
/// all other values by their string form.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Expansion
// ═══════════════════════════════════════════════════════════════════════════════

/// Ids of rows whose children are visible
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows {
    ids: BTreeSet<String>,
}

impl ExpandedRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// New snapshot with `id` expanded if it was collapsed and vice versa
    pub fn toggled(&self, id: &str) -> ExpandedRows {
        let mut ids = self.ids.clone();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        ExpandedRows { ids }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Row configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-row presentation and interaction flags
#[derive(Debug, Clone, PartialEq)]
pub struct RowConfig {
    pub style: Option<Style>,
    pub cell_style: Option<Style>,
    /// Disabled rows are greyed out and ignore every interaction
    pub disabled: bool,
    pub selectable: bool,
}

impl Default for RowConfig {
    fn default() -> Self {
        Self {
            style: None,
            cell_style: None,
            disabled: false,
            selectable: true,
        }
    }
}

impl RowConfig {
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            selectable: false,
            ..Default::default()
        }
    }

    pub fn not_selectable() -> Self {
        Self {
            selectable: false,
            ..Default::default()
        }
    }
}

/// Row configuration provider, consulted once per row per render
pub type RowConfigFn = fn(&Row) -> RowConfig;

// ═══════════════════════════════════════════════════════════════════════════════
// Actions
// ═══════════════════════════════════════════════════════════════════════════════

/// Predicate deciding whether an action applies to a set of rows
pub type ActionPredicate = fn(&[&Row]) -> bool;

/// A named operation a user can run on one or more rows
///
/// Running an action is the host's job: the table only reports the action
/// name together with the row ids it applies to.
#[derive(Debug, Clone)]
pub struct TableAction {
    pub name: String,
    pub text: String,
    pub primary: bool,
    pub icon: Option<String>,
    /// Whether the action can run on several rows at once
    pub multiple: bool,
    pub is_active: Option<ActionPredicate>,
}

impl TableAction {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            primary: false,
            icon: None,
            multiple: false,
            is_active: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn active_when(mut self, predicate: ActionPredicate) -> Self {
        self.is_active = Some(predicate);
        self
    }

    /// Whether the action can run on `rows`
    pub fn applies_to(&self, rows: &[&Row]) -> bool {
        if rows.is_empty() || (rows.len() > 1 && !self.multiple) {
            return false;
        }
        self.is_active.map_or(true, |is_active| is_active(rows))
    }
}

/// The action invoked by a plain click, if any is marked primary
pub fn primary_action(actions: &[TableAction]) -> Option<&TableAction> {
    actions.iter().find(|action| action.primary)
}

pub fn find_action<'a>(actions: &'a [TableAction], name: &str) -> Option<&'a TableAction> {
    actions.iter().find(|action| action.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_from(value: Value) -> Row {
        Row::from_value(&value).expect("row with id")
    }

    #[test]
    fn test_children_flattens_nested_collections_in_key_order() {
        let row = row_from(json!({
            "id": "parent",
            "districts": [[{"id": "d1"}], [{"id": "d2"}, [{"id": "d3"}]]],
            "regions": [{"id": "r1"}],
            "name": "Parent"
        }));

        let keys = vec!["regions".to_string(), "districts".to_string()];
        let ids: Vec<String> = row.children(&keys).into_iter().map(|r| r.id).collect();

        assert_eq!(ids, vec!["r1", "d1", "d2", "d3"]);
    }

    #[test]
    fn test_children_skips_values_without_ids() {
        let row = row_from(json!({
            "id": "parent",
            "children": [{"name": "no id"}, 3, "text", {"id": 7}]
        }));

        let children = row.children(&["children".to_string()]);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "7");
    }

    #[test]
    fn test_children_unknown_key_yields_nothing() {
        let row = Row::new("a").with_field("name", "A");
        assert!(row.children(&["children".to_string()]).is_empty());
    }

    #[test]
    fn test_sorting_numbers_and_missing_values() {
        let mut rows = vec![
            Row::new("a").with_field("level", 3),
            Row::new("b"),
            Row::new("c").with_field("level", 1),
        ];

        TableSorting::new("level", SortOrder::Asc).sort_rows(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        TableSorting::new("level", SortOrder::Desc).sort_rows(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_expanded_rows_toggle_twice_is_identity() {
        let expanded = ExpandedRows::new().toggled("x");
        let toggled = expanded.toggled("r").toggled("r");

        assert_eq!(toggled, expanded);
        assert!(expanded.toggled("r").contains("r"));
        assert!(!expanded.toggled("x").contains("x"));
    }

    #[test]
    fn test_row_config_selectable_follows_disabled() {
        assert!(RowConfig::default().selectable);
        assert!(!RowConfig::disabled().selectable);
    }

    #[test]
    fn test_action_applies_to_multiple_rows_only_when_flagged() {
        let a = Row::new("a");
        let b = Row::new("b");
        let single = TableAction::new("details", "Details");
        let bulk = TableAction::new("remove", "Remove").multiple();

        assert!(single.applies_to(&[&a]));
        assert!(!single.applies_to(&[&a, &b]));
        assert!(bulk.applies_to(&[&a, &b]));
    }

    #[test]
    fn test_primary_action_is_first_marked() {
        let actions = vec![
            TableAction::new("edit", "Edit"),
            TableAction::new("details", "Details").primary(),
        ];
        assert_eq!(primary_action(&actions).map(|a| a.name.as_str()), Some("details"));
        assert!(find_action(&actions, "missing").is_none());
    }
}
