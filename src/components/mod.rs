//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod analysis;
pub mod context_menu;
pub mod country_selector;
pub mod data_table;
pub mod example;
pub mod help_dialog;
pub mod landing;
pub mod layout;
pub mod quit_dialog;

pub use analysis::AnalysisPage;
pub use context_menu::ContextMenu;
pub use country_selector::CountrySelector;
pub use data_table::DataTable;
pub use example::ExamplePage;
pub use help_dialog::HelpDialog;
pub use landing::LandingPage;
pub use layout::{calculate_page_layout, centered_popup, popup_at};
pub use quit_dialog::QuitDialog;
