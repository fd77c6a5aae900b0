//! Modal stack for overlays drawn above the current page

/// An overlay shown on top of the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Keyboard and mouse reference
    Help,
    /// Row actions opened at a screen position
    ContextMenu {
        row_id: String,
        screen_x: u16,
        screen_y: u16,
    },
}

/// A stack of modal overlays
///
/// Modals are drawn bottom to top; only the top one receives input.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Replace any open context menu with `modal`
    ///
    /// Only one context menu is open at a time.
    pub fn open_context_menu(&mut self, modal: Modal) {
        self.stack
            .retain(|m| !matches!(m, Modal::ContextMenu { .. }));
        self.stack.push(modal);
    }
}
