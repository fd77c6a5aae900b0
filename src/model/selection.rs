//! Selection reconciliation for data tables
//!
//! Pure functions computing the next selection when a row is toggled. The
//! caller owns the selection and decides what to do with the result.

use super::table::TableSelection;

/// Selection entries that take part in toggling (indeterminate ones excluded)
pub fn active_selection(selected: &[TableSelection]) -> Vec<TableSelection> {
    selected
        .iter()
        .filter(|entry| !entry.indeterminate)
        .cloned()
        .collect()
}

/// Toggle `row_id` within `active`
///
/// Removes the row when it is already selected, otherwise appends a checked
/// entry for it.
pub fn update_selection(active: &[TableSelection], row_id: &str) -> Vec<TableSelection> {
    if active.iter().any(|entry| entry.id == row_id) {
        active
            .iter()
            .filter(|entry| entry.id != row_id)
            .cloned()
            .collect()
    } else {
        let mut next = active.to_vec();
        next.push(TableSelection::checked(row_id));
        next
    }
}

pub fn find_selection<'a>(selected: &'a [TableSelection], id: &str) -> Option<&'a TableSelection> {
    selected.iter().find(|entry| entry.id == id)
}

/// Ids of the fully checked rows
pub fn checked_ids(selected: &[TableSelection]) -> Vec<String> {
    selected
        .iter()
        .filter(|entry| entry.checked && !entry.indeterminate)
        .map(|entry| entry.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(selection: &[TableSelection]) -> Vec<&str> {
        let mut ids: Vec<&str> = selection.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_toggle_adds_unselected_row_as_checked() {
        let current = vec![TableSelection::checked("r1")];
        let next = update_selection(&current, "r2");

        assert_eq!(ids(&next), vec!["r1", "r2"]);
        let added = find_selection(&next, "r2").unwrap();
        assert!(added.checked);
        assert!(!added.indeterminate);
    }

    #[test]
    fn test_toggle_removes_selected_row() {
        let current = vec![TableSelection::checked("r1"), TableSelection::checked("r2")];
        let next = update_selection(&current, "r1");

        assert_eq!(ids(&next), vec!["r2"]);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let current = vec![TableSelection::checked("a"), TableSelection::checked("b")];

        for row_id in ["a", "c"] {
            let twice = update_selection(&update_selection(&current, row_id), row_id);
            assert_eq!(ids(&twice), ids(&current));
        }
    }

    #[test]
    fn test_indeterminate_entries_are_dropped_from_active_set() {
        let selected = vec![
            TableSelection::checked("a"),
            TableSelection::indeterminate("parent"),
        ];

        let active = active_selection(&selected);
        let next = update_selection(&active, "b");

        assert_eq!(ids(&next), vec!["a", "b"]);
    }

    #[test]
    fn test_checked_ids_ignores_partial_entries() {
        let selected = vec![
            TableSelection::checked("a"),
            TableSelection::indeterminate("b"),
            TableSelection {
                id: "c".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(checked_ids(&selected), vec!["a".to_string()]);
    }
}
