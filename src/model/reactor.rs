use serde::{Deserialize, Serialize};

use crate::layout_engine::LayoutTemplate;

/// Operations reachable from the hotkey table. Commands that act on "the
/// focused window" are no-ops when nothing is focused.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ApplyTemplate(LayoutTemplate),
    /// Leave tiling mode; every window becomes freely draggable.
    Float,
    CloseFocused,
    MinimizeFocused,
    /// Toggles maximize on the focused window.
    MaximizeFocused,
    RestoreFocused,
    FocusNext,
    FocusPrev,
    /// Shows the next tab of the focused window's group.
    NextTab,
    ToggleSnap,
    SaveLayout(String),
    LoadLayout(String),
    DeleteLayout(String),
}
