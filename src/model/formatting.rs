//! Cell formatting and column/action filtering for data tables

use super::table::{Row, TableAction, TableColumn};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// Display text of one cell
///
/// Uses the column's renderer when it has one, otherwise the raw field value.
pub fn format_row_value(column: &TableColumn, row: &Row) -> String {
    let value = row.field(&column.name);
    match column.render {
        Some(render) => render(row, &value),
        None => format_value(&value),
    }
}

/// Coerce a raw field value to display text
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format_date(s).unwrap_or_else(|| s.clone()),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(object) => ["displayName", "name", "id"]
            .iter()
            .find_map(|key| object.get(*key))
            .map(format_value)
            .unwrap_or_default(),
    }
}

/// Render ISO date-times as `YYYY-MM-DD HH:MM`
fn format_date(s: &str) -> Option<String> {
    const DISPLAY: &str = "%Y-%m-%d %H:%M";

    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.format(DISPLAY).to_string());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|date| date.format(DISPLAY).to_string())
}

/// Column descriptors for the visible column names, in visible order
///
/// Names without a matching descriptor are dropped.
pub fn current_columns<'a>(visible: &[String], columns: &'a [TableColumn]) -> Vec<&'a TableColumn> {
    visible
        .iter()
        .filter_map(|name| columns.iter().find(|column| &column.name == name))
        .collect()
}

/// Actions that can run on `rows`
pub fn parse_actions<'a>(rows: &[&Row], actions: &'a [TableAction]) -> Vec<&'a TableAction> {
    actions.iter().filter(|action| action.applies_to(rows)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_visible_columns_drop_unknown_names_and_keep_order() {
        let columns = vec![TableColumn::new("b", "B"), TableColumn::new("a", "A")];
        let visible = vec!["a".to_string(), "x".to_string(), "b".to_string()];

        let names: Vec<&str> = current_columns(&visible, &columns)
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_format_uses_custom_renderer() {
        fn shout(_row: &Row, value: &Value) -> String {
            format_value(value).to_uppercase()
        }

        let column = TableColumn::new("name", "Name").with_render(shout);
        let row = Row::new("1").with_field("name", "Malawi");

        assert_eq!(format_row_value(&column, &row), "MALAWI");
    }

    #[test]
    fn test_format_coerces_raw_values() {
        assert_eq!(format_value(&json!(null)), "");
        assert_eq!(format_value(&json!(true)), "Yes");
        assert_eq!(format_value(&json!(false)), "No");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(["a", null, 2])), "a, 2");
        assert_eq!(format_value(&json!({"id": "x1", "name": "Kenya"})), "Kenya");
        assert_eq!(format_value(&json!({"id": "x1"})), "x1");
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_value(&json!("2023-04-05T10:11:12.000")), "2023-04-05 10:11");
        assert_eq!(format_value(&json!("2023-04-05T10:11:12Z")), "2023-04-05 10:11");
        assert_eq!(format_value(&json!("not a date")), "not a date");
    }

    #[test]
    fn test_format_id_column() {
        let column = TableColumn::new("id", "Id");
        assert_eq!(format_row_value(&column, &Row::new("abc")), "abc");
    }

    #[test]
    fn test_parse_actions_respects_predicate() {
        fn never(_rows: &[&Row]) -> bool {
            false
        }

        let actions = vec![
            TableAction::new("details", "Details"),
            TableAction::new("hidden", "Hidden").active_when(never),
        ];
        let row = Row::new("r");

        let names: Vec<&str> = parse_actions(&[&row], &actions)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["details"]);
    }
}
