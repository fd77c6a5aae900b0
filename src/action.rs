//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{TableCommand, TableSelection};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background fetches
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Go to a route path
    Navigate(String),
    /// Move the table cursor down
    CursorDown,
    /// Move the table cursor up
    CursorUp,
    /// Jump to first row
    FirstItem,
    /// Jump to last row
    LastItem,
    /// Next analysis step
    NextStep,
    /// Previous analysis step
    PrevStep,
    /// Move focus to the next panel
    FocusNext,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal
    ConfirmModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Data Table
    // ─────────────────────────────────────────────────────────────────────────
    /// Expand or collapse a row
    ToggleExpanded(String),
    /// New selection computed by a table
    SelectionChanged(Vec<TableSelection>),
    /// Run a named row action on the given ids
    RunTableAction { name: String, ids: Vec<String> },
    /// Open the contextual menu of a row at a screen position
    OpenContextualMenu {
        row_id: String,
        screen_y: u16,
        screen_x: u16,
    },
    /// Sort by the next sortable column
    CycleSortField,
    /// Flip the sort direction
    ToggleSortOrder,

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Query the repository again
    Reload,
}

impl From<TableCommand> for Action {
    fn from(command: TableCommand) -> Self {
        match command {
            TableCommand::RunAction { name, ids } => Action::RunTableAction { name, ids },
            TableCommand::OpenContextualMenu {
                row_id,
                screen_y,
                screen_x,
            } => Action::OpenContextualMenu {
                row_id,
                screen_y,
                screen_x,
            },
            TableCommand::SelectionChanged(selection) => Action::SelectionChanged(selection),
            TableCommand::ToggleExpanded { row_id } => Action::ToggleExpanded(row_id),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::Navigate(path) => write!(f, "Navigate({})", path),
            Action::CursorDown => write!(f, "CursorDown"),
            Action::CursorUp => write!(f, "CursorUp"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::NextStep => write!(f, "NextStep"),
            Action::PrevStep => write!(f, "PrevStep"),
            Action::FocusNext => write!(f, "FocusNext"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ToggleExpanded(id) => write!(f, "ToggleExpanded({})", id),
            Action::SelectionChanged(selection) => {
                write!(f, "SelectionChanged({} rows)", selection.len())
            }
            Action::RunTableAction { name, ids } => {
                write!(f, "RunTableAction({}, [{}])", name, ids.join(", "))
            }
            Action::OpenContextualMenu {
                row_id,
                screen_y,
                screen_x,
            } => write!(f, "OpenContextualMenu({}, {}, {})", row_id, screen_y, screen_x),
            Action::CycleSortField => write!(f, "CycleSortField"),
            Action::ToggleSortOrder => write!(f, "ToggleSortOrder"),
            Action::Reload => write!(f, "Reload"),
        }
    }
}
