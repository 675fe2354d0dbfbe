use ascii_tree::Tree;

use crate::actor::reactor::Reactor;
use crate::actor::reactor::managers::LayoutManager;
use crate::common::collections::HashSet;
use crate::model::server::{GroupData, LayoutStateData, WindowData};
use crate::model::window::{PlacementState, Window, WindowId};
use crate::sys::geometry::Rect;

impl Reactor {
    /// Every window in creation order.
    pub fn query_windows(&self) -> Vec<WindowData> {
        let hidden = self.groups.hidden_windows();
        self.registry.iter().map(|w| self.window_data(w, &hidden)).collect()
    }

    pub fn query_window_info(&self, id: WindowId) -> Option<WindowData> {
        let window = self.registry.get(id)?;
        Some(self.window_data(window, &self.groups.hidden_windows()))
    }

    pub fn query_groups(&self) -> Vec<GroupData> {
        self.groups
            .iter()
            .map(|g| GroupData {
                id: g.id,
                arrangement: g.arrangement,
                members: g.members.clone(),
                shown_tab: g.shown_tab(),
            })
            .collect()
    }

    pub fn query_layout_state(&self) -> LayoutStateData {
        let prefs = &self.persistence_manager.preferences;
        let engine = &self.layout_manager.layout_engine;
        let (tiled_windows, floating_windows) = if engine.is_tiling() {
            let tiled: Vec<WindowId> = LayoutManager::candidates(self, false)
                .into_iter()
                .filter(|&id| {
                    self.registry.get(id).is_some_and(|w| w.placement == PlacementState::Tiled)
                })
                .collect();
            let floating = self
                .registry
                .visible()
                .map(|w| w.id)
                .filter(|id| !tiled.contains(id))
                .collect();
            (tiled, floating)
        } else {
            (Vec::new(), self.registry.visible().map(|w| w.id).collect())
        };

        LayoutStateData {
            area: self.registry.area(),
            active_template: engine.active_template(),
            tiling: engine.is_tiling(),
            snap_enabled: prefs.snap_enabled,
            snap_threshold: prefs.snap_threshold,
            focused_window: self.registry.active(),
            tiled_windows,
            floating_windows,
            snap_preview: self.drag_manager.input.preview().map(|z| z.edge),
            custom_layouts: prefs.custom_layouts.keys().cloned().collect(),
        }
    }

    /// The desktop as an indented tree: loose windows first, then one node
    /// per group.
    pub fn draw_tree(&self) -> String {
        let engine = &self.layout_manager.layout_engine;
        let mode = match engine.active_template() {
            Some(template) => format!("tiling: {template}"),
            None => "floating".to_string(),
        };
        let hidden = self.groups.hidden_windows();
        let mut children: Vec<Tree> = self
            .registry
            .iter()
            .filter(|w| w.group.is_none())
            .map(|w| Tree::Leaf(vec![self.describe(w, &hidden)]))
            .collect();
        for group in self.groups.iter() {
            let members = group
                .members
                .iter()
                .filter_map(|&id| self.registry.get(id))
                .map(|w| Tree::Leaf(vec![self.describe(w, &hidden)]))
                .collect();
            children.push(Tree::Node(format!("group {}", group.arrangement), members));
        }
        let root = Tree::Node(format!("desktop {} ({mode})", fmt_rect(self.registry.area())), children);

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = ascii_tree::write_tree(&mut out, &root);
        out
    }

    fn describe(&self, window: &Window, hidden: &HashSet<WindowId>) -> String {
        let mut flags = Vec::new();
        if self.registry.active() == Some(window.id) {
            flags.push("focused".to_string());
        }
        match window.placement {
            PlacementState::Free => {}
            PlacementState::Tiled => flags.push("tiled".to_string()),
            PlacementState::Snapped(edge) => flags.push(format!("snapped {edge}")),
        }
        if window.is_minimized() {
            flags.push("minimized".to_string());
        } else if window.is_maximized() {
            flags.push("maximized".to_string());
        }
        if hidden.contains(&window.id) {
            flags.push("hidden".to_string());
        }
        if window.dimmed {
            flags.push("dimmed".to_string());
        }
        let flags = if flags.is_empty() { String::new() } else { format!(" [{}]", flags.join(", ")) };
        format!("{} {:?} {}{flags}", window.id, window.title, fmt_rect(window.frame))
    }

    fn window_data(&self, window: &Window, hidden: &HashSet<WindowId>) -> WindowData {
        WindowData {
            window: window.clone(),
            is_focused: self.registry.active() == Some(window.id),
            is_hidden: hidden.contains(&window.id),
        }
    }
}

fn fmt_rect(r: Rect) -> String { format!("{}x{} at ({}, {})", r.width, r.height, r.x, r.y) }
