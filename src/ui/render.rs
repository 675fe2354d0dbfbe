//! The render step: a flat picture of what should be on screen, diffed
//! against the previous picture into surface operations.

use serde::{Deserialize, Serialize};

use crate::common::collections::{HashMap, HashSet};
use crate::model::group::GroupManager;
use crate::model::registry::WindowRegistry;
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenderedWindow {
    pub id: WindowId,
    pub title: String,
    pub frame: Rect,
    pub z_order: u64,
    pub is_active: bool,
    pub is_dimmed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    /// Bottom to top.
    pub windows: Vec<RenderedWindow>,
    /// Overlay showing where a drop would snap.
    pub snap_preview: Option<Rect>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RenderOp {
    Mount(RenderedWindow),
    Update(RenderedWindow),
    Unmount(WindowId),
    ShowPreview(Rect),
    HidePreview,
}

impl RenderFrame {
    /// Minimized windows and background tabs are not drawn.
    pub fn capture(
        registry: &WindowRegistry,
        groups: &GroupManager,
        snap_preview: Option<Rect>,
    ) -> RenderFrame {
        let hidden = groups.hidden_windows();
        let active = registry.active();
        let mut windows: Vec<RenderedWindow> = registry
            .visible()
            .filter(|w| !hidden.contains(&w.id))
            .map(|w| RenderedWindow {
                id: w.id,
                title: w.title.clone(),
                frame: w.frame,
                z_order: w.z_order,
                is_active: active == Some(w.id),
                is_dimmed: w.dimmed,
            })
            .collect();
        windows.sort_by_key(|w| w.z_order);
        RenderFrame { windows, snap_preview }
    }

    pub fn contains(&self, id: WindowId) -> bool { self.windows.iter().any(|w| w.id == id) }
}

/// Operations that turn `prev` into `next`. Unmounts come first, then
/// mounts and updates in bottom-to-top order, then the preview.
pub fn diff(prev: &RenderFrame, next: &RenderFrame) -> Vec<RenderOp> {
    let mut ops = Vec::new();
    let next_ids: HashSet<WindowId> = next.windows.iter().map(|w| w.id).collect();
    for w in &prev.windows {
        if !next_ids.contains(&w.id) {
            ops.push(RenderOp::Unmount(w.id));
        }
    }
    let prev_by_id: HashMap<WindowId, &RenderedWindow> =
        prev.windows.iter().map(|w| (w.id, w)).collect();
    for w in &next.windows {
        match prev_by_id.get(&w.id) {
            None => ops.push(RenderOp::Mount(w.clone())),
            Some(old) if *old != w => ops.push(RenderOp::Update(w.clone())),
            Some(_) => {}
        }
    }
    match (prev.snap_preview, next.snap_preview) {
        (_, Some(rect)) if prev.snap_preview != Some(rect) => ops.push(RenderOp::ShowPreview(rect)),
        (Some(_), None) => ops.push(RenderOp::HidePreview),
        _ => {}
    }
    ops
}

/// Remembers the last frame handed to the surface.
#[derive(Debug, Default)]
pub struct Renderer {
    last: RenderFrame,
}

impl Renderer {
    pub fn new() -> Self { Self::default() }

    pub fn last_frame(&self) -> &RenderFrame { &self.last }

    pub fn update(&mut self, next: RenderFrame) -> Vec<RenderOp> {
        let ops = diff(&self.last, &next);
        self.last = next;
        ops
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::group::Arrangement;
    use crate::model::registry::RegistrySettings;
    use crate::model::window::ContentRef;

    fn registry() -> WindowRegistry {
        WindowRegistry::new(Rect::new(0.0, 0.0, 1200.0, 800.0), RegistrySettings::default())
    }

    #[test]
    fn frame_is_bottom_to_top_and_skips_hidden_windows() {
        let mut reg = registry();
        let mut groups = GroupManager::new(30.0);
        let a = reg.create("a", ContentRef::default());
        let b = reg.create("b", ContentRef::default());
        let c = reg.create("c", ContentRef::default());
        reg.focus(a);
        reg.minimize(c);

        let frame = RenderFrame::capture(&reg, &groups, None);
        let order: Vec<WindowId> = frame.windows.iter().map(|w| w.id).collect();
        assert_eq!(order, vec![b, a]);
        assert!(frame.windows[1].is_active);

        groups.group(&mut reg, &[a, b], Arrangement::Tabs);
        let frame = RenderFrame::capture(&reg, &groups, None);
        assert!(frame.contains(a));
        assert!(!frame.contains(b));
    }

    #[test]
    fn diff_mounts_updates_and_unmounts() {
        let mut reg = registry();
        let groups = GroupManager::new(30.0);
        let mut renderer = Renderer::new();
        let a = reg.create("a", ContentRef::default());
        let b = reg.create("b", ContentRef::default());

        let ops = renderer.update(RenderFrame::capture(&reg, &groups, None));
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| matches!(op, RenderOp::Mount(_))));

        assert!(renderer.update(RenderFrame::capture(&reg, &groups, None)).is_empty());

        reg.set_frame(a, Rect::new(100.0, 100.0, 400.0, 300.0));
        reg.close(b);
        let ops = renderer.update(RenderFrame::capture(&reg, &groups, None));
        assert_eq!(ops[0], RenderOp::Unmount(b));
        assert!(matches!(&ops[1], RenderOp::Update(w) if w.id == a && w.is_active));
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn preview_shows_and_hides() {
        let reg = registry();
        let groups = GroupManager::new(30.0);
        let mut renderer = Renderer::new();
        let half = Rect::new(8.0, 8.0, 588.0, 784.0);
        assert_eq!(
            renderer.update(RenderFrame::capture(&reg, &groups, Some(half))),
            vec![RenderOp::ShowPreview(half)]
        );
        assert!(renderer.update(RenderFrame::capture(&reg, &groups, Some(half))).is_empty());
        assert_eq!(
            renderer.update(RenderFrame::capture(&reg, &groups, None)),
            vec![RenderOp::HidePreview]
        );
    }
}
