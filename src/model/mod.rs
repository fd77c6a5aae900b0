//! Model layer - data and state types
//!
//! This module contains all state-related types:
//! - `table` - rows, columns, selection, sorting and actions of data tables
//! - `selection` / `mouse` / `formatting` - pure table behaviour
//! - `country` / `steps` - analysis domain entities
//! - `ModalStack` - modal overlay management

pub mod country;
pub mod formatting;
pub mod modal;
pub mod mouse;
pub mod selection;
pub mod steps;
pub mod table;

// Re-export commonly used types
pub use country::Country;
pub use mouse::{MouseActionsMapping, PointerEvent, TableCommand, TargetKind};
pub use steps::AnalysisStep;
pub use table::{
    ExpandedRows, Row, RowConfig, SortOrder, TableAction, TableColumn, TableSelection,
    TableSorting,
};
