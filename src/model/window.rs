use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout_engine::snap::SnapEdge;
use crate::model::group::GroupId;
use crate::sys::geometry::Rect;

/// Session-scoped window identity. Assigned from a monotonic counter and
/// never reused, so ordering by id is creation order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn new(id: u64) -> Self { WindowId(id) }

    pub const fn get(self) -> u64 { self.0 }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Reference to whatever panel renders the window body. The engine never
/// looks inside it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct ContentRef(pub String);

impl From<&str> for ContentRef {
    fn from(s: &str) -> Self { ContentRef(s.to_string()) }
}

impl From<String> for ContentRef {
    fn from(s: String) -> Self { ContentRef(s) }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlacementState {
    #[default]
    Free,
    Snapped(SnapEdge),
    Tiled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMembership {
    pub group: GroupId,
    pub tab_index: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub content: ContentRef,
    pub frame: Rect,
    pub z_order: u64,
    pub lifecycle: LifecycleState,
    pub placement: PlacementState,
    /// Present iff the window is listed in exactly that group's members.
    pub group: Option<GroupMembership>,
    /// Render hint set by the Focus template for background windows.
    pub dimmed: bool,
    /// Frame to return to when leaving the maximized state.
    pub(crate) restore_frame: Option<Rect>,
    /// Whether a minimized window was maximized before minimizing.
    pub(crate) minimized_from_maximized: bool,
}

impl Window {
    pub fn is_minimized(&self) -> bool { self.lifecycle == LifecycleState::Minimized }

    pub fn is_maximized(&self) -> bool { self.lifecycle == LifecycleState::Maximized }

    pub fn is_visible(&self) -> bool { !self.is_minimized() }

    pub fn group_id(&self) -> Option<GroupId> { self.group.map(|m| m.group) }

    pub fn tab_index(&self) -> Option<usize> { self.group.map(|m| m.tab_index) }
}
