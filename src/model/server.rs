//! Serializable snapshots handed to collaborators and the CLI.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::layout_engine::LayoutTemplate;
use crate::layout_engine::snap::SnapEdge;
use crate::model::group::{Arrangement, GroupId};
use crate::model::window::{
    ContentRef, GroupMembership, LifecycleState, PlacementState, Window, WindowId,
};
use crate::sys::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowData {
    pub window: Window,
    pub is_focused: bool,
    /// Hidden behind another tab of its group.
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    pub id: GroupId,
    pub arrangement: Arrangement,
    pub members: Vec<WindowId>,
    pub shown_tab: Option<WindowId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutStateData {
    pub area: Rect,
    pub active_template: Option<LayoutTemplate>,
    pub tiling: bool,
    pub snap_enabled: bool,
    pub snap_threshold: f64,
    pub focused_window: Option<WindowId>,
    pub tiled_windows: Vec<WindowId>,
    pub floating_windows: Vec<WindowId>,
    pub snap_preview: Option<SnapEdge>,
    pub custom_layouts: Vec<String>,
}

impl Serialize for WindowData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        #[derive(Serialize)]
        struct WindowDataSer<'a> {
            id: WindowId,
            title: &'a str,
            content: &'a ContentRef,
            frame: &'a Rect,
            z_order: u64,
            lifecycle: LifecycleState,
            placement: PlacementState,
            group: Option<GroupId>,
            tab_index: Option<usize>,
            is_focused: bool,
            is_hidden: bool,
            is_dimmed: bool,
        }

        let w = &self.window;
        let helper = WindowDataSer {
            id: w.id,
            title: &w.title,
            content: &w.content,
            frame: &w.frame,
            z_order: w.z_order,
            lifecycle: w.lifecycle,
            placement: w.placement,
            group: w.group_id(),
            tab_index: w.tab_index(),
            is_focused: self.is_focused,
            is_hidden: self.is_hidden,
            is_dimmed: w.dimmed,
        };

        helper.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WindowData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        #[derive(Deserialize)]
        struct WindowDataDe {
            id: WindowId,
            title: String,
            content: ContentRef,
            frame: Rect,
            z_order: u64,
            lifecycle: LifecycleState,
            placement: PlacementState,
            group: Option<GroupId>,
            tab_index: Option<usize>,
            is_focused: bool,
            is_hidden: bool,
            is_dimmed: bool,
        }

        let helper = WindowDataDe::deserialize(deserializer)?;
        let group = match (helper.group, helper.tab_index) {
            (Some(group), Some(tab_index)) => Some(GroupMembership { group, tab_index }),
            _ => None,
        };
        let window = Window {
            id: helper.id,
            title: helper.title,
            content: helper.content,
            frame: helper.frame,
            z_order: helper.z_order,
            lifecycle: helper.lifecycle,
            placement: helper.placement,
            group,
            dimmed: helper.is_dimmed,
            restore_frame: None,
            minimized_from_maximized: false,
        };

        Ok(WindowData {
            window,
            is_focused: helper.is_focused,
            is_hidden: helper.is_hidden,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn data() -> WindowData {
        WindowData {
            window: Window {
                id: WindowId::new(3),
                title: "Notes".to_string(),
                content: ContentRef::from("panel:notes"),
                frame: Rect::new(8.0, 8.0, 588.0, 784.0),
                z_order: 5,
                lifecycle: LifecycleState::Normal,
                placement: PlacementState::Snapped(SnapEdge::Left),
                group: None,
                dimmed: false,
                restore_frame: None,
                minimized_from_maximized: false,
            },
            is_focused: true,
            is_hidden: false,
        }
    }

    #[test]
    fn window_data_serializes_flat() {
        let value = serde_json::to_value(data()).unwrap();
        let expected = json!({
            "id": 3,
            "title": "Notes",
            "content": "panel:notes",
            "frame": { "x": 8.0, "y": 8.0, "width": 588.0, "height": 784.0 },
            "z_order": 5,
            "lifecycle": "normal",
            "placement": { "snapped": "left" },
            "group": null,
            "tab_index": null,
            "is_focused": true,
            "is_hidden": false,
            "is_dimmed": false,
        });
        assert_eq!(value, expected);
    }

    #[test]
    fn window_data_deserializes_its_own_shape() {
        let text = serde_json::to_string(&data()).unwrap();
        let back: WindowData = serde_json::from_str(&text).unwrap();
        assert_eq!(back, data());
    }
}
