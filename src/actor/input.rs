//! Pointer input: turns raw pointer streams into drag and resize intents.
//!
//! The controller owns only the in-progress interaction. It reads the
//! registry but never writes it; the reactor applies the [`Intent`]s it
//! returns, in order, as soon as they are produced.

use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::layout_engine::snap::{self, SnapEdge, SnapZone};
use crate::model::registry::WindowRegistry;
use crate::model::window::{PlacementState, WindowId};
use crate::sys::geometry::{Point, Rect, Size};

bitflags! {
    /// Edges moved by a resize handle. A corner handle sets two bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ResizeEdges: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    Header(WindowId),
    ResizeHandle(WindowId, ResizeEdges),
    Desktop,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down(PointerTarget),
    Move,
    Up,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    /// Host event time. Only differences matter.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn down(target: PointerTarget, x: f64, y: f64, timestamp_ms: u64) -> Self {
        PointerEvent {
            kind: PointerKind::Down(target),
            position: Point::new(x, y),
            timestamp_ms,
        }
    }

    pub fn moved(x: f64, y: f64, timestamp_ms: u64) -> Self {
        PointerEvent {
            kind: PointerKind::Move,
            position: Point::new(x, y),
            timestamp_ms,
        }
    }

    pub fn up(x: f64, y: f64, timestamp_ms: u64) -> Self {
        PointerEvent {
            kind: PointerKind::Up,
            position: Point::new(x, y),
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        window: WindowId,
        /// Pointer position relative to the frame origin at pointer-down.
        grab: Point,
    },
    Resizing {
        window: WindowId,
        edges: ResizeEdges,
        start: Point,
        start_frame: Rect,
    },
}

/// What the reactor should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Focus(WindowId),
    DragMove { window: WindowId, frame: Rect },
    ResizeMove { window: WindowId, frame: Rect },
    /// The zone a drop would snap to right now, or none.
    Preview(Option<SnapZone>),
    Snap { window: WindowId, edge: SnapEdge },
    /// The interaction ended without a snap.
    Release(WindowId),
}

/// Read-only view of the desktop the controller needs per event.
pub struct InputContext<'a> {
    pub registry: &'a WindowRegistry,
    /// Whether a tiling template governs geometry.
    pub tiling: bool,
    /// Snap threshold in px, or `None` while snapping is disabled.
    pub snap_threshold: Option<f64>,
}

/// Bounds how often snap zones are evaluated during a drag.
#[derive(Debug, Clone)]
pub struct SnapThrottle {
    interval_ms: u64,
    last_check_ms: Option<u64>,
}

impl SnapThrottle {
    pub fn new(interval: Duration) -> Self {
        SnapThrottle {
            interval_ms: interval.as_millis() as u64,
            last_check_ms: None,
        }
    }

    pub fn reset(&mut self) { self.last_check_ms = None; }

    #[inline]
    pub fn should_check(&mut self, timestamp_ms: u64) -> bool {
        let Some(last) = self.last_check_ms else {
            self.last_check_ms = Some(timestamp_ms);
            return true;
        };
        if timestamp_ms.saturating_sub(last) < self.interval_ms {
            return false;
        }
        self.last_check_ms = Some(timestamp_ms);
        true
    }
}

#[derive(Debug, Clone)]
pub struct InputController {
    interaction: Interaction,
    throttle: SnapThrottle,
    preview: Option<SnapZone>,
}

impl InputController {
    pub fn new(check_interval: Duration) -> Self {
        InputController {
            interaction: Interaction::Idle,
            throttle: SnapThrottle::new(check_interval),
            preview: None,
        }
    }

    pub fn interaction(&self) -> Interaction { self.interaction }

    pub fn is_idle(&self) -> bool { self.interaction == Interaction::Idle }

    pub fn preview(&self) -> Option<SnapZone> { self.preview }

    pub fn set_check_interval(&mut self, interval: Duration) {
        self.throttle = SnapThrottle::new(interval);
    }

    /// Drops the current snap preview, e.g. when snapping gets disabled.
    pub fn clear_preview(&mut self) -> Option<Intent> {
        self.preview.take().map(|_| Intent::Preview(None))
    }

    pub fn handle(&mut self, event: &PointerEvent, cx: &InputContext<'_>) -> Vec<Intent> {
        match event.kind {
            PointerKind::Down(target) => {
                if !self.is_idle() {
                    trace!(?target, "pointer down during an interaction ignored");
                    return Vec::new();
                }
                self.begin(target, event.position, cx)
            }
            PointerKind::Move => self.track(event, cx),
            PointerKind::Up => self.finish(event, cx),
        }
    }

    fn begin(&mut self, target: PointerTarget, pos: Point, cx: &InputContext<'_>) -> Vec<Intent> {
        let (window, edges) = match target {
            PointerTarget::Header(window) => (window, None),
            PointerTarget::ResizeHandle(window, edges) => (window, Some(edges)),
            PointerTarget::Desktop => return Vec::new(),
        };
        let Some(w) = cx.registry.get(window).filter(|w| w.is_visible()) else {
            trace!(%window, "pointer down on unknown or hidden window");
            return Vec::new();
        };
        let intents = vec![Intent::Focus(window)];
        if w.is_maximized() {
            debug!(%window, "maximized window is not moved by the pointer");
            return intents;
        }
        if cx.tiling && w.placement == PlacementState::Tiled {
            debug!(%window, "tiled window is not moved by the pointer");
            return intents;
        }
        self.throttle.reset();
        self.interaction = match edges {
            None => Interaction::Dragging {
                window,
                grab: Point::new(pos.x - w.frame.x, pos.y - w.frame.y),
            },
            Some(edges) if !edges.is_empty() => Interaction::Resizing {
                window,
                edges,
                start: pos,
                start_frame: w.frame,
            },
            Some(_) => return intents,
        };
        debug!(%window, interaction = ?self.interaction, "interaction started");
        intents
    }

    fn track(&mut self, event: &PointerEvent, cx: &InputContext<'_>) -> Vec<Intent> {
        let pos = event.position;
        match self.interaction {
            Interaction::Idle => Vec::new(),
            Interaction::Dragging { window, grab } => {
                let Some(frame) = dragged_frame(cx.registry, window, grab, pos) else {
                    return self.cancel();
                };
                let mut intents = vec![Intent::DragMove { window, frame }];
                match cx.snap_threshold {
                    Some(threshold) if self.throttle.should_check(event.timestamp_ms) => {
                        let zones = snap::zones_for(cx.registry.area(), threshold);
                        let zone = snap::find_zone(&frame, &zones);
                        if zone != self.preview {
                            trace!(edge = ?zone.map(|z| z.edge), "snap preview changed");
                            self.preview = zone;
                            intents.push(Intent::Preview(zone));
                        }
                    }
                    Some(_) => {}
                    None => intents.extend(self.clear_preview()),
                }
                intents
            }
            Interaction::Resizing { window, edges, start, start_frame } => {
                if !cx.registry.contains(window) {
                    return self.cancel();
                }
                let frame = resize_frame(
                    start_frame,
                    edges,
                    pos.x - start.x,
                    pos.y - start.y,
                    cx.registry.bounds(),
                    cx.registry.min_size(),
                );
                vec![Intent::ResizeMove { window, frame }]
            }
        }
    }

    /// Ends the interaction wherever the pointer is. The release position is
    /// authoritative, so snapping is re-evaluated here without the throttle.
    fn finish(&mut self, event: &PointerEvent, cx: &InputContext<'_>) -> Vec<Intent> {
        let pos = event.position;
        let interaction = std::mem::take(&mut self.interaction);
        let mut intents = Vec::new();
        match interaction {
            Interaction::Idle => {}
            Interaction::Dragging { window, grab } => {
                let Some(frame) = dragged_frame(cx.registry, window, grab, pos) else {
                    intents.extend(self.clear_preview());
                    return intents;
                };
                intents.push(Intent::DragMove { window, frame });
                intents.extend(self.clear_preview());
                let zone = cx.snap_threshold.and_then(|threshold| {
                    snap::find_zone(&frame, &snap::zones_for(cx.registry.area(), threshold))
                });
                match zone {
                    Some(zone) => intents.push(Intent::Snap { window, edge: zone.edge }),
                    None => intents.push(Intent::Release(window)),
                }
            }
            Interaction::Resizing { window, edges, start, start_frame } => {
                if cx.registry.contains(window) {
                    let frame = resize_frame(
                        start_frame,
                        edges,
                        pos.x - start.x,
                        pos.y - start.y,
                        cx.registry.bounds(),
                        cx.registry.min_size(),
                    );
                    intents.push(Intent::ResizeMove { window, frame });
                    intents.push(Intent::Release(window));
                }
            }
        }
        if !intents.is_empty() {
            debug!(?interaction, "interaction finished");
        }
        intents
    }

    /// The window went away mid-interaction.
    fn cancel(&mut self) -> Vec<Intent> {
        debug!(interaction = ?self.interaction, "interaction target vanished");
        self.interaction = Interaction::Idle;
        self.clear_preview().into_iter().collect()
    }
}

fn dragged_frame(registry: &WindowRegistry, window: WindowId, grab: Point, pos: Point) -> Option<Rect> {
    let current = registry.get(window)?.frame;
    Some(Rect::new(pos.x - grab.x, pos.y - grab.y, current.width, current.height))
}

/// Projects a pointer delta onto the moving edges of `start`. The size floor
/// is applied first, then the bounds.
pub fn resize_frame(
    start: Rect,
    edges: ResizeEdges,
    dx: f64,
    dy: f64,
    bounds: Rect,
    min: Size,
) -> Rect {
    let (mut x, mut y, mut max_x, mut max_y) = (start.x, start.y, start.max_x(), start.max_y());
    if edges.contains(ResizeEdges::LEFT) {
        x = (start.x + dx).min(max_x - min.width).max(bounds.x);
    } else if edges.contains(ResizeEdges::RIGHT) {
        max_x = (max_x + dx).max(x + min.width).min(bounds.max_x());
    }
    if edges.contains(ResizeEdges::TOP) {
        y = (start.y + dy).min(max_y - min.height).max(bounds.y);
    } else if edges.contains(ResizeEdges::BOTTOM) {
        max_y = (max_y + dy).max(y + min.height).min(bounds.max_y());
    }
    Rect::new(x, y, max_x - x, max_y - y)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::registry::RegistrySettings;
    use crate::model::window::ContentRef;

    fn setup() -> (WindowRegistry, WindowId, InputController) {
        let mut reg =
            WindowRegistry::new(Rect::new(0.0, 0.0, 1200.0, 800.0), RegistrySettings::default());
        let id = reg.create("Files", ContentRef::default());
        (reg, id, InputController::new(Duration::from_millis(50)))
    }

    fn cx(reg: &WindowRegistry) -> InputContext<'_> {
        InputContext {
            registry: reg,
            tiling: false,
            snap_threshold: Some(20.0),
        }
    }

    #[test]
    fn throttle_checks_at_most_once_per_interval() {
        let mut throttle = SnapThrottle::new(Duration::from_millis(50));
        let checked: Vec<u64> =
            (0..=100).step_by(10).filter(|&t| throttle.should_check(t)).collect();
        assert_eq!(checked, vec![0, 50, 100]);
    }

    #[test]
    fn drag_keeps_the_grab_offset() {
        let (reg, id, mut input) = setup();
        let down = input.handle(&PointerEvent::down(PointerTarget::Header(id), 100.0, 20.0, 0), &cx(&reg));
        assert_eq!(down, vec![Intent::Focus(id)]);
        let moved = input.handle(&PointerEvent::moved(300.0, 220.0, 1), &cx(&reg));
        assert_eq!(
            moved[0],
            Intent::DragMove {
                window: id,
                frame: Rect::new(208.0, 208.0, 640.0, 480.0),
            }
        );
    }

    #[test]
    fn preview_waits_for_the_throttle() {
        let (reg, id, mut input) = setup();
        input.handle(&PointerEvent::down(PointerTarget::Header(id), 20.0, 20.0, 0), &cx(&reg));
        // Checked at t=0, nothing near an edge.
        let first = input.handle(&PointerEvent::moved(312.0, 212.0, 0), &cx(&reg));
        assert_eq!(first.len(), 1);
        // Inside the left band, but the last check was 10ms ago.
        let throttled = input.handle(&PointerEvent::moved(22.0, 212.0, 10), &cx(&reg));
        assert_eq!(throttled.len(), 1);
        assert_eq!(input.preview(), None);
        let checked = input.handle(&PointerEvent::moved(22.0, 212.0, 60), &cx(&reg));
        assert!(
            matches!(checked.last(), Some(Intent::Preview(Some(z))) if z.edge == SnapEdge::Left),
            "{checked:?}"
        );
    }

    #[test]
    fn release_position_is_authoritative() {
        let (reg, id, mut input) = setup();
        input.handle(&PointerEvent::down(PointerTarget::Header(id), 20.0, 20.0, 0), &cx(&reg));
        input.handle(&PointerEvent::moved(312.0, 212.0, 0), &cx(&reg));
        input.handle(&PointerEvent::moved(22.0, 212.0, 10), &cx(&reg));
        let up = input.handle(&PointerEvent::up(22.0, 212.0, 20), &cx(&reg));
        assert_eq!(
            up,
            vec![
                Intent::DragMove {
                    window: id,
                    frame: Rect::new(10.0, 200.0, 640.0, 480.0),
                },
                Intent::Snap { window: id, edge: SnapEdge::Left },
            ]
        );
        assert!(input.is_idle());
    }

    #[test]
    fn drop_without_snapping_releases() {
        let (reg, id, mut input) = setup();
        let no_snap = InputContext { snap_threshold: None, ..cx(&reg) };
        input.handle(&PointerEvent::down(PointerTarget::Header(id), 20.0, 20.0, 0), &no_snap);
        let up = input.handle(&PointerEvent::up(22.0, 212.0, 20), &no_snap);
        assert_eq!(up.last(), Some(&Intent::Release(id)));
    }

    #[test]
    fn resize_enforces_the_floor_on_the_moving_edge() {
        let (reg, id, mut input) = setup();
        let handle = PointerTarget::ResizeHandle(id, ResizeEdges::LEFT);
        input.handle(&PointerEvent::down(handle, 8.0, 100.0, 0), &cx(&reg));
        let moved = input.handle(&PointerEvent::moved(508.0, 100.0, 5), &cx(&reg));
        // Right edge stays at 648; the floor keeps the width at 300.
        assert_eq!(
            moved,
            vec![Intent::ResizeMove {
                window: id,
                frame: Rect::new(348.0, 8.0, 300.0, 480.0),
            }]
        );
    }

    #[test]
    fn corner_resize_is_bounded_by_the_desktop() {
        let start = Rect::new(100.0, 100.0, 640.0, 480.0);
        let bounds = Rect::new(8.0, 8.0, 1184.0, 784.0);
        let frame = resize_frame(
            start,
            ResizeEdges::RIGHT | ResizeEdges::BOTTOM,
            2000.0,
            2000.0,
            bounds,
            Size::new(300.0, 200.0),
        );
        assert_eq!(frame, Rect::new(100.0, 100.0, 1092.0, 692.0));
    }

    #[test]
    fn tiled_and_maximized_windows_only_focus() {
        let (mut reg, id, mut input) = setup();
        reg.set_placement(id, PlacementState::Tiled);
        let tiling = InputContext { tiling: true, ..cx(&reg) };
        let intents = input.handle(&PointerEvent::down(PointerTarget::Header(id), 20.0, 20.0, 0), &tiling);
        assert_eq!(intents, vec![Intent::Focus(id)]);
        assert!(input.is_idle());

        reg.toggle_maximize(id);
        let intents = input.handle(&PointerEvent::down(PointerTarget::Header(id), 20.0, 20.0, 0), &cx(&reg));
        assert_eq!(intents, vec![Intent::Focus(id)]);
        assert!(input.is_idle());
    }

    #[test]
    fn second_pointer_down_is_ignored() {
        let (mut reg, id, mut input) = setup();
        let other = reg.create("Notes", ContentRef::default());
        input.handle(&PointerEvent::down(PointerTarget::Header(id), 20.0, 20.0, 0), &cx(&reg));
        let ignored = input.handle(&PointerEvent::down(PointerTarget::Header(other), 50.0, 50.0, 1), &cx(&reg));
        assert!(ignored.is_empty());
        assert_eq!(input.interaction(), Interaction::Dragging { window: id, grab: Point::new(12.0, 12.0) });
    }

    #[test]
    fn closing_the_dragged_window_ends_the_interaction() {
        let (mut reg, id, mut input) = setup();
        input.handle(&PointerEvent::down(PointerTarget::Header(id), 20.0, 20.0, 0), &cx(&reg));
        reg.close(id);
        assert!(input.handle(&PointerEvent::moved(40.0, 40.0, 5), &cx(&reg)).is_empty());
        assert!(input.is_idle());
        assert!(input.handle(&PointerEvent::up(40.0, 40.0, 6), &cx(&reg)).is_empty());
    }
}
