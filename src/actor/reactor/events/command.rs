use tracing::{debug, info, trace, warn};

use super::group::GroupEventHandler;
use super::window::WindowEventHandler;
use crate::actor::reactor::Reactor;
use crate::actor::reactor::managers::LayoutManager;
use crate::layout_engine::{LayoutTemplate, parse_template};
use crate::model::preferences::{LayoutSnapshot, floor_snap_threshold};
use crate::model::reactor::Command;
use crate::model::window::{PlacementState, WindowId};
use crate::sys::hotkey::Hotkey;

pub struct CommandEventHandler;

impl CommandEventHandler {
    pub fn handle_command(reactor: &mut Reactor, command: Command) {
        debug!(?command, "command");
        let focused = reactor.registry.active();
        match command {
            Command::ApplyTemplate(template) => Self::handle_apply_template(reactor, template),
            Command::Float => Self::handle_float(reactor),
            Command::CloseFocused => {
                with_focused(focused, |w| WindowEventHandler::handle_close(reactor, w))
            }
            Command::MinimizeFocused => {
                with_focused(focused, |w| WindowEventHandler::handle_minimize(reactor, w))
            }
            Command::MaximizeFocused => {
                with_focused(focused, |w| WindowEventHandler::handle_maximize(reactor, w))
            }
            Command::RestoreFocused => {
                with_focused(focused, |w| WindowEventHandler::handle_restore(reactor, w))
            }
            Command::FocusNext => WindowEventHandler::handle_cycle_focus(reactor, true),
            Command::FocusPrev => WindowEventHandler::handle_cycle_focus(reactor, false),
            Command::NextTab => {
                let group = focused.and_then(|w| reactor.registry.get(w)).and_then(|w| w.group_id());
                if let Some(group) = group {
                    GroupEventHandler::handle_next_tab(reactor, group);
                }
            }
            Command::ToggleSnap => {
                let enabled = !reactor.persistence_manager.preferences.snap_enabled;
                Self::handle_set_snap_enabled(reactor, enabled);
            }
            Command::SaveLayout(name) => Self::handle_save_layout(reactor, name),
            Command::LoadLayout(name) => Self::handle_load_layout(reactor, &name),
            Command::DeleteLayout(name) => Self::handle_delete_layout(reactor, &name),
        }
    }

    /// Looks `chord` up in the hotkey table. Unknown or unparsable chords do
    /// nothing.
    pub fn handle_chord(reactor: &mut Reactor, chord: &str) {
        let hotkey = match chord.parse::<Hotkey>() {
            Ok(hotkey) => hotkey,
            Err(e) => {
                debug!(chord, error = %e, "ignoring malformed chord");
                return;
            }
        };
        let Some(command) = reactor.hotkey_manager.lookup(&hotkey).cloned() else {
            trace!(%hotkey, "no binding for chord");
            return;
        };
        Self::handle_command(reactor, command);
    }

    pub fn handle_apply_named(reactor: &mut Reactor, name: &str) {
        let Some(template) = parse_template(name) else {
            return;
        };
        Self::handle_apply_template(reactor, template);
    }

    /// Lays out every visible window (maximized ones included) and makes a
    /// tiling template the governing one.
    pub fn handle_apply_template(reactor: &mut Reactor, template: LayoutTemplate) {
        let windows = LayoutManager::candidates(reactor, true);
        for &window in &windows {
            reactor.registry.normalize_lifecycle(window);
        }
        let result = reactor.layout_manager.layout_engine.apply(
            template,
            &windows,
            reactor.registry.area(),
            reactor.registry.gap(),
            reactor.registry.active(),
        );
        LayoutManager::commit(reactor, &result);
        reactor.layout_manager.layout_engine.set_active_template(Some(template));
        info!(%template, windows = windows.len(), "template applied");

        reactor.persistence_manager.preferences.active_template = Some(template);
        reactor.persistence_manager.persist();
    }

    /// Leaves tiling mode. Geometry stays where the template put it.
    pub fn handle_float(reactor: &mut Reactor) {
        reactor.layout_manager.layout_engine.set_active_template(None);
        let tiled: Vec<WindowId> = reactor
            .registry
            .iter()
            .filter(|w| w.placement == PlacementState::Tiled)
            .map(|w| w.id)
            .collect();
        for window in tiled {
            reactor.registry.set_placement(window, PlacementState::Free);
        }
        reactor.registry.set_dimmed(&[]);
        info!("floating mode");

        if reactor.persistence_manager.preferences.active_template.take().is_some() {
            reactor.persistence_manager.persist();
        }
    }

    pub fn handle_save_layout(reactor: &mut Reactor, name: String) {
        let snapshot = LayoutSnapshot::capture(&reactor.registry);
        info!(name, windows = snapshot.windows.len(), "layout saved");
        reactor.persistence_manager.preferences.custom_layouts.insert(name, snapshot);
        reactor.persistence_manager.persist();
    }

    /// Puts windows back where the named layout had them. Loading leaves
    /// tiling mode, since a template would immediately overwrite the frames.
    pub fn handle_load_layout(reactor: &mut Reactor, name: &str) {
        let Some(snapshot) = reactor.persistence_manager.preferences.custom_layouts.get(name).cloned()
        else {
            warn!(name, "no saved layout with that name");
            return;
        };
        Self::handle_float(reactor);
        let placed = snapshot.restore(&mut reactor.registry);
        info!(name, placed, "layout loaded");
    }

    pub fn handle_delete_layout(reactor: &mut Reactor, name: &str) {
        if reactor.persistence_manager.preferences.custom_layouts.remove(name).is_none() {
            trace!(name, "delete of unknown layout ignored");
            return;
        }
        info!(name, "layout deleted");
        reactor.persistence_manager.persist();
    }

    pub fn handle_set_snap_enabled(reactor: &mut Reactor, enabled: bool) {
        reactor.persistence_manager.preferences.snap_enabled = enabled;
        if !enabled {
            let _ = reactor.drag_manager.input.clear_preview();
        }
        debug!(enabled, "snapping toggled");
        reactor.persistence_manager.persist();
    }

    pub fn handle_set_snap_threshold(reactor: &mut Reactor, threshold: f64) {
        let threshold = floor_snap_threshold(threshold);
        reactor.persistence_manager.preferences.snap_threshold = threshold;
        debug!(threshold, "snap threshold changed");
        reactor.persistence_manager.persist();
    }
}

fn with_focused(focused: Option<WindowId>, f: impl FnOnce(WindowId)) {
    match focused {
        Some(window) => f(window),
        None => trace!("no focused window"),
    }
}
