//! The window registry owns every window record of a desktop session.
//!
//! Everything else (groups, render order, the input controller) refers to
//! windows by [`WindowId`] only. Records are kept in an id-ordered map, so
//! iteration order is creation order; layout templates rely on that for
//! stable re-tiling.

use tracing::{debug, info, trace};

use crate::common::collections::BTreeMap;
use crate::common::config::Settings;
use crate::model::window::{ContentRef, LifecycleState, PlacementState, Window, WindowId};
use crate::sys::geometry::{Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySettings {
    pub gap: f64,
    pub min_size: Size,
    pub default_size: Size,
    pub stagger: f64,
}

impl From<&Settings> for RegistrySettings {
    fn from(settings: &Settings) -> Self {
        RegistrySettings {
            gap: settings.gap,
            min_size: settings.min_window_size,
            default_size: settings.default_window_size,
            stagger: settings.stagger,
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self { RegistrySettings::from(&Settings::default()) }
}

#[derive(Debug)]
pub struct WindowRegistry {
    windows: BTreeMap<WindowId, Window>,
    next_id: u64,
    z_counter: u64,
    active: Option<WindowId>,
    area: Rect,
    settings: RegistrySettings,
    dirty: bool,
}

impl WindowRegistry {
    pub fn new(area: Rect, settings: RegistrySettings) -> Self {
        WindowRegistry {
            windows: BTreeMap::new(),
            next_id: 1,
            z_counter: 0,
            active: None,
            area,
            settings,
            dirty: false,
        }
    }

    pub fn area(&self) -> Rect { self.area }

    /// The area windows must stay inside: the desktop area minus the gap.
    pub fn bounds(&self) -> Rect { self.area.inset(self.settings.gap) }

    pub fn gap(&self) -> f64 { self.settings.gap }

    pub fn min_size(&self) -> Size { self.settings.min_size }

    pub fn settings(&self) -> &RegistrySettings { &self.settings }

    pub fn len(&self) -> usize { self.windows.len() }

    pub fn is_empty(&self) -> bool { self.windows.is_empty() }

    pub fn contains(&self, id: WindowId) -> bool { self.windows.contains_key(&id) }

    pub fn get(&self, id: WindowId) -> Option<&Window> { self.windows.get(&id) }

    pub(crate) fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    /// All windows in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Window> { self.windows.values() }

    pub fn list(&self, predicate: impl Fn(&Window) -> bool) -> Vec<&Window> {
        self.windows.values().filter(|w| predicate(w)).collect()
    }

    /// Non-minimized windows, in creation order.
    pub fn visible(&self) -> impl Iterator<Item = &Window> {
        self.windows.values().filter(|w| w.is_visible())
    }

    pub fn active(&self) -> Option<WindowId> { self.active }

    /// The id the next [`WindowRegistry::create`] will hand out.
    pub fn peek_next_id(&self) -> WindowId { WindowId::new(self.next_id) }

    /// Highest zOrder over every window, minimized or not.
    pub fn top_z(&self) -> u64 { self.windows.values().map(|w| w.z_order).max().unwrap_or(0) }

    /// The visible window drawn on top of all others.
    pub fn topmost_visible(&self) -> Option<WindowId> {
        self.visible().max_by_key(|w| w.z_order).map(|w| w.id)
    }

    /// Reports and clears whether anything structural changed since the
    /// last call.
    pub fn take_dirty(&mut self) -> bool { std::mem::take(&mut self.dirty) }

    pub fn mark_dirty(&mut self) { self.dirty = true; }

    fn bump_z(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }

    /// Clamps a requested frame into the bounds and enforces the size floor.
    pub fn clamp_frame(&self, frame: Rect) -> Rect {
        frame.clamp_within(&self.bounds(), self.settings.min_size)
    }

    pub fn set_area(&mut self, area: Rect) {
        if area == self.area {
            return;
        }
        debug!(?area, "desktop area changed");
        self.area = area;
        let bounds = self.bounds();
        let min = self.settings.min_size;
        for window in self.windows.values_mut() {
            window.frame = if window.is_maximized() {
                bounds
            } else {
                window.frame.clamp_within(&bounds, min)
            };
        }
        self.dirty = true;
    }

    pub fn create(&mut self, title: impl Into<String>, content: ContentRef) -> WindowId {
        let id = WindowId::new(self.next_id);
        self.next_id += 1;

        let bounds = self.bounds();
        let offset = self.settings.stagger * self.windows.len() as f64;
        let requested = Rect::new(
            bounds.x + offset,
            bounds.y + offset,
            self.settings.default_size.width,
            self.settings.default_size.height,
        );
        let frame = self.clamp_frame(requested);
        let z_order = self.bump_z();
        let window = Window {
            id,
            title: title.into(),
            content,
            frame,
            z_order,
            lifecycle: LifecycleState::Normal,
            placement: PlacementState::Free,
            group: None,
            dimmed: false,
            restore_frame: None,
            minimized_from_maximized: false,
        };
        info!(%id, title = %window.title, ?frame, "window created");
        self.windows.insert(id, window);
        self.active = Some(id);
        self.dirty = true;
        id
    }

    /// Removes the window. Unknown ids are ignored; UI actions routinely race
    /// with an earlier close.
    pub fn close(&mut self, id: WindowId) -> Option<Window> {
        let Some(window) = self.windows.remove(&id) else {
            trace!(%id, "close of unknown window ignored");
            return None;
        };
        info!(%id, title = %window.title, "window closed");
        if self.active == Some(id) {
            self.active = self.topmost_visible();
        }
        self.dirty = true;
        Some(window)
    }

    /// Makes `id` the active window and brings it to the top. Focusing also
    /// un-minimizes. Returns false for unknown ids.
    pub fn focus(&mut self, id: WindowId) -> bool {
        let top = self.top_z();
        let Some(z_order) = self.windows.get(&id).map(|w| w.z_order) else {
            trace!(%id, "focus of unknown window ignored");
            return false;
        };
        let new_z = if z_order < top { Some(self.bump_z()) } else { None };
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if let Some(z) = new_z {
            window.z_order = z;
        }
        if window.is_minimized() {
            window.lifecycle = if window.minimized_from_maximized {
                LifecycleState::Maximized
            } else {
                LifecycleState::Normal
            };
            window.minimized_from_maximized = false;
            self.dirty = true;
        }
        if self.active != Some(id) {
            self.active = Some(id);
            self.dirty = true;
        }
        trace!(%id, z = ?new_z, "focused");
        true
    }

    /// Raises without changing the active window.
    pub(crate) fn raise(&mut self, id: WindowId) {
        if !self.windows.contains_key(&id) {
            return;
        }
        let z = self.bump_z();
        if let Some(window) = self.windows.get_mut(&id) {
            window.z_order = z;
        }
    }

    pub fn minimize(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(&id) else {
            trace!(%id, "minimize of unknown window ignored");
            return;
        };
        if window.is_minimized() {
            return;
        }
        window.minimized_from_maximized = window.is_maximized();
        window.lifecycle = LifecycleState::Minimized;
        debug!(%id, "minimized");
        if self.active == Some(id) {
            self.active = self.topmost_visible();
        }
        self.dirty = true;
    }

    /// Maximizes the window, or restores it when it is already maximized.
    pub fn toggle_maximize(&mut self, id: WindowId) {
        let Some(window) = self.windows.get(&id) else {
            trace!(%id, "maximize of unknown window ignored");
            return;
        };
        if window.is_maximized() {
            self.restore(id);
            return;
        }
        let bounds = self.bounds();
        if let Some(window) = self.windows.get_mut(&id) {
            if !(window.is_minimized() && window.minimized_from_maximized) {
                window.restore_frame = Some(window.frame);
            }
            window.frame = bounds;
            window.lifecycle = LifecycleState::Maximized;
            window.minimized_from_maximized = false;
            window.placement = PlacementState::Free;
            debug!(%id, "maximized");
        }
        self.dirty = true;
        self.focus(id);
    }

    /// Returns a minimized or maximized window to the normal state, putting
    /// back its pre-maximize frame.
    pub fn restore(&mut self, id: WindowId) {
        let bounds = self.bounds();
        let min = self.settings.min_size;
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        let was_maximized = match window.lifecycle {
            LifecycleState::Normal => return,
            LifecycleState::Maximized => true,
            LifecycleState::Minimized => window.minimized_from_maximized,
        };
        if was_maximized {
            if let Some(frame) = window.restore_frame.take() {
                window.frame = frame.clamp_within(&bounds, min);
            }
        }
        window.lifecycle = LifecycleState::Normal;
        window.minimized_from_maximized = false;
        debug!(%id, "restored");
        self.dirty = true;
    }

    /// Commits a user-requested frame (drag, resize, custom layout), clamped
    /// into bounds with the size floor applied.
    pub fn set_frame(&mut self, id: WindowId, frame: Rect) -> Option<Rect> {
        let clamped = self.clamp_frame(frame);
        let window = self.windows.get_mut(&id)?;
        window.frame = clamped;
        Some(clamped)
    }

    /// Commits template output. Frames are kept inside the bounds but the
    /// size floor is not applied: a dense grid may need smaller cells.
    pub fn commit_layout(&mut self, frames: &[(WindowId, Rect)], placement: PlacementState) {
        let bounds = self.bounds();
        for (id, frame) in frames {
            if let Some(window) = self.windows.get_mut(id) {
                window.frame = frame.fit_within(&bounds);
                window.placement = placement;
            }
        }
    }

    pub fn set_placement(&mut self, id: WindowId, placement: PlacementState) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.placement = placement;
        }
    }

    /// Sets the dimmed render hint on exactly the given windows.
    pub fn set_dimmed(&mut self, dimmed: &[WindowId]) {
        for window in self.windows.values_mut() {
            window.dimmed = dimmed.contains(&window.id);
        }
    }

    /// Leaves the maximized state without touching the frame; used before a
    /// template overwrites geometry.
    pub(crate) fn normalize_lifecycle(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(&id) {
            if window.is_maximized() {
                window.lifecycle = LifecycleState::Normal;
                window.restore_frame = None;
            }
        }
    }

    /// The visible window after (or before) the active one in creation
    /// order, wrapping around.
    pub fn cycle_target(&self, forward: bool) -> Option<WindowId> {
        let visible: Vec<WindowId> = self.visible().map(|w| w.id).collect();
        if visible.is_empty() {
            return None;
        }
        let Some(pos) = self.active.and_then(|a| visible.iter().position(|&id| id == a)) else {
            return visible.first().copied();
        };
        let len = visible.len();
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        Some(visible[next])
    }
}
