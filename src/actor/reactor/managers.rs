use tracing::{debug, trace, warn};

use super::replay::Record;
use crate::actor::input::InputController;
use crate::actor::reactor::Reactor;
use crate::common::collections::HashMap;
use crate::common::config::Config;
use crate::layout_engine::{LayoutEngine, LayoutResult, snap};
use crate::model::preferences::LayoutPreferences;
use crate::model::reactor::Command;
use crate::model::store::LayoutStore;
use crate::model::window::{PlacementState, WindowId};
use crate::sys::geometry::Rect;
use crate::sys::hotkey::Hotkey;
use crate::ui::render::{RenderFrame, RenderOp, Renderer};

/// Manages layout engine state
pub struct LayoutManager {
    pub layout_engine: LayoutEngine,
}

impl LayoutManager {
    /// Windows a template lays out: visible and ungrouped, in creation
    /// order. Group members follow their group's arrangement instead.
    /// Automatic re-layout also leaves maximized windows alone.
    pub fn candidates(reactor: &Reactor, include_maximized: bool) -> Vec<WindowId> {
        reactor
            .registry
            .visible()
            .filter(|w| w.group.is_none())
            .filter(|w| include_maximized || !w.is_maximized())
            .map(|w| w.id)
            .collect()
    }

    /// Re-applies the governing tiling template after a structural change.
    pub fn update_layout(reactor: &mut Reactor) {
        let Some(template) = reactor.layout_manager.layout_engine.active_template() else {
            return;
        };
        let windows = Self::candidates(reactor, false);
        trace!(%template, windows = windows.len(), "re-applying layout");
        let result = reactor.layout_manager.layout_engine.apply(
            template,
            &windows,
            reactor.registry.area(),
            reactor.registry.gap(),
            reactor.registry.active(),
        );
        Self::commit(reactor, &result);
    }

    pub fn commit(reactor: &mut Reactor, result: &LayoutResult) {
        let placement = match result.template {
            Some(template) if template.is_tiling() => PlacementState::Tiled,
            _ => PlacementState::Free,
        };
        reactor.registry.commit_layout(&result.frames, placement);
        reactor.registry.set_dimmed(&result.dimmed);
    }
}

/// Manages the pointer interaction and its snap preview
pub struct DragManager {
    pub input: InputController,
}

impl DragManager {
    /// Where the previewed snap would put the window, for the overlay.
    pub fn preview_rect(reactor: &Reactor) -> Option<Rect> {
        let zone = reactor.drag_manager.input.preview()?;
        Some(snap::resolve(zone.edge, reactor.registry.area(), reactor.registry.gap()))
    }
}

/// Manages persisted preferences and the store behind them
pub struct PersistenceManager {
    pub store: Box<dyn LayoutStore>,
    pub preferences: LayoutPreferences,
}

impl PersistenceManager {
    /// Writes preferences through to the store. Failures are logged and the
    /// in-memory state is kept as is.
    pub fn persist(&mut self) {
        match self.preferences.save(self.store.as_mut()) {
            Ok(()) => trace!("layout preferences saved"),
            Err(e) => warn!(error = %e, "failed to save layout preferences"),
        }
    }
}

/// Manages recording state
pub struct RecordingManager {
    pub record: Record,
}

/// Manages the last frame handed to the surface and the ops the host has
/// not collected yet
pub struct RenderManager {
    pub renderer: Renderer,
    pub pending: Vec<RenderOp>,
}

impl RenderManager {
    /// Diffs the current desktop against the last frame and queues the ops.
    pub fn render(reactor: &mut Reactor) -> usize {
        let preview = DragManager::preview_rect(reactor);
        let frame = RenderFrame::capture(&reactor.registry, &reactor.groups, preview);
        let ops = reactor.render_manager.renderer.update(frame);
        let count = ops.len();
        reactor.render_manager.pending.extend(ops);
        count
    }
}

/// Manages the chord table
pub struct HotkeyManager {
    pub bindings: HashMap<Hotkey, Command>,
}

impl HotkeyManager {
    /// Parses every chord in the config. Chords that do not parse are
    /// skipped with a warning.
    pub fn from_config(config: &Config) -> Self {
        let mut bindings = HashMap::default();
        for (chord, command) in &config.hotkeys {
            match chord.parse::<Hotkey>() {
                Ok(hotkey) => {
                    if let Some(prev) = bindings.insert(hotkey, command.clone()) {
                        debug!(chord, ?prev, "hotkey bound twice; keeping the later binding");
                    }
                }
                Err(e) => warn!(chord, error = %e, "skipping unparsable hotkey"),
            }
        }
        HotkeyManager { bindings }
    }

    pub fn lookup(&self, hotkey: &Hotkey) -> Option<&Command> { self.bindings.get(hotkey) }
}
