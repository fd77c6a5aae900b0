//! Pointer gesture dispatch for data table rows
//!
//! A pointer event on a row is turned into at most one [`TableCommand`]. The
//! table host executes the command; nothing here has side effects.

use super::selection::{active_selection, update_selection};
use super::table::{find_action, primary_action, Row, RowConfig, TableAction, TableSelection};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// Mappings
// ═══════════════════════════════════════════════════════════════════════════════

/// What a mouse gesture does on a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MouseActionMapping {
    /// Run the action marked primary
    Primary,
    /// Open the contextual menu at the pointer position
    Contextual,
    /// Run the action with the given name
    Action { action: String },
}

/// Gesture-to-behaviour mapping for the left and right buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseActionsMapping {
    pub left: MouseActionMapping,
    pub right: MouseActionMapping,
}

impl Default for MouseActionsMapping {
    fn default() -> Self {
        Self {
            left: MouseActionMapping::Primary,
            right: MouseActionMapping::Contextual,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pointer events
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// Part of the row the pointer hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Cell,
    Checkbox,
    ExpandToggle,
    ActionsButton,
}

/// Toolkit-independent pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub ctrl_key: bool,
    pub target_kind: TargetKind,
    pub screen_x: u16,
    pub screen_y: u16,
}

impl PointerEvent {
    pub fn left(target_kind: TargetKind, screen_x: u16, screen_y: u16) -> Self {
        Self {
            button: PointerButton::Left,
            ctrl_key: false,
            target_kind,
            screen_x,
            screen_y,
        }
    }

    pub fn right(target_kind: TargetKind, screen_x: u16, screen_y: u16) -> Self {
        Self {
            button: PointerButton::Right,
            ..Self::left(target_kind, screen_x, screen_y)
        }
    }

    pub fn with_ctrl(mut self, ctrl_key: bool) -> Self {
        self.ctrl_key = ctrl_key;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    LeftClick,
    RightClick,
    CtrlClick,
    CheckboxClick,
}

pub fn classify(event: &PointerEvent) -> GestureKind {
    match (event.button, event.ctrl_key, event.target_kind) {
        (PointerButton::Right, _, _) => GestureKind::RightClick,
        (PointerButton::Left, true, _) => GestureKind::CtrlClick,
        (PointerButton::Left, false, TargetKind::Checkbox) => GestureKind::CheckboxClick,
        (PointerButton::Left, false, _) => GestureKind::LeftClick,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dispatch
// ═══════════════════════════════════════════════════════════════════════════════

/// Effect requested by a row gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    RunAction { name: String, ids: Vec<String> },
    OpenContextualMenu { row_id: String, screen_y: u16, screen_x: u16 },
    SelectionChanged(Vec<TableSelection>),
    ToggleExpanded { row_id: String },
}

/// Outcome of dispatching one pointer event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Whether the host's default handling of the event is suppressed
    pub prevent_default: bool,
    pub command: Option<TableCommand>,
}

impl Dispatch {
    fn run(command: Option<TableCommand>) -> Self {
        Self {
            prevent_default: false,
            command,
        }
    }
}

/// Table state a dispatch reads from
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    pub actions: &'a [TableAction],
    pub selected: &'a [TableSelection],
    pub mapping: &'a MouseActionsMapping,
    pub enable_multiple_action: bool,
}

/// Map a pointer event on `row` to the command it triggers
pub fn dispatch(
    ctx: &DispatchContext<'_>,
    row: &Row,
    config: &RowConfig,
    event: &PointerEvent,
) -> Dispatch {
    if config.disabled {
        return Dispatch::default();
    }

    if event.button == PointerButton::Left {
        match event.target_kind {
            TargetKind::ExpandToggle => {
                return Dispatch::run(Some(TableCommand::ToggleExpanded {
                    row_id: row.id.clone(),
                }));
            }
            // with ctrl held the click falls through to the row gesture
            TargetKind::ActionsButton if !event.ctrl_key => {
                return Dispatch::run(contextual(row, event));
            }
            _ => {}
        }
    }

    match classify(event) {
        // ctrl + right click belongs to the host's own menu
        GestureKind::RightClick if event.ctrl_key => Dispatch::default(),
        GestureKind::RightClick => Dispatch {
            prevent_default: true,
            command: run_mouse_action(ctx, row, event, &ctx.mapping.right),
        },
        GestureKind::CheckboxClick if ctx.enable_multiple_action && !config.selectable => {
            Dispatch::default()
        }
        GestureKind::CtrlClick | GestureKind::CheckboxClick if ctx.enable_multiple_action => {
            let active = active_selection(ctx.selected);
            Dispatch::run(Some(TableCommand::SelectionChanged(update_selection(
                &active, &row.id,
            ))))
        }
        _ => Dispatch::run(run_mouse_action(ctx, row, event, &ctx.mapping.left)),
    }
}

fn run_mouse_action(
    ctx: &DispatchContext<'_>,
    row: &Row,
    event: &PointerEvent,
    mapping: &MouseActionMapping,
) -> Option<TableCommand> {
    let action = match mapping {
        MouseActionMapping::Primary => primary_action(ctx.actions),
        MouseActionMapping::Contextual => return contextual(row, event),
        MouseActionMapping::Action { action } => find_action(ctx.actions, action),
    }?;

    log::debug!("row {} runs action '{}'", row.id, action.name);
    Some(TableCommand::RunAction {
        name: action.name.clone(),
        ids: vec![row.id.clone()],
    })
}

fn contextual(row: &Row, event: &PointerEvent) -> Option<TableCommand> {
    if event.ctrl_key {
        return None;
    }
    Some(TableCommand::OpenContextualMenu {
        row_id: row.id.clone(),
        screen_y: event.screen_y,
        screen_x: event.screen_x,
    })
}
