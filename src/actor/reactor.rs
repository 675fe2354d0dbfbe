//! The Reactor owns the session: every window, group and preference lives
//! here, and every change goes through one dispatch path, whether it
//! arrives as an [`Event`] or through a typed call.
//!
//! Handlers run synchronously. After each event the governing layout (if
//! any) is re-applied when the registry reports a structural change, and the
//! resulting picture is diffed against the last one handed to the surface.

mod events;
mod managers;
mod query;
mod replay;

#[cfg(test)]
mod testing;


use events::command::CommandEventHandler;
use events::drag::DragEventHandler;
use events::group::GroupEventHandler;
use events::window::WindowEventHandler;
use managers::{
    DragManager, HotkeyManager, LayoutManager, PersistenceManager, RecordingManager,
    RenderManager,
};
pub use replay::{Record, RecordHeader, ReplayError, replay, replay_from};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::actor::input::{InputController, PointerEvent};
use crate::common::config::Config;
use crate::layout_engine::LayoutEngine;
use crate::model::group::{Arrangement, GroupId, GroupManager};
use crate::model::preferences::LayoutPreferences;
pub use crate::model::reactor::Command;
use crate::model::registry::{RegistrySettings, WindowRegistry};
use crate::model::store::LayoutStore;
use crate::model::window::{ContentRef, WindowId};
use crate::sys::geometry::{Rect, Size};
use crate::ui::render::{RenderFrame, RenderOp, Renderer};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Event {
    /// The browser viewport was resized. The desktop area is the viewport
    /// minus the top bar.
    ViewportChanged(Size),

    OpenWindow {
        title: String,
        content: ContentRef,
    },
    CloseWindow(WindowId),
    FocusWindow(WindowId),
    MinimizeWindow(WindowId),
    /// Toggles between maximized and the previous frame.
    MaximizeWindow(WindowId),
    RestoreWindow(WindowId),

    /// Applies a template by name. Unknown names change nothing.
    ApplyTemplate(String),

    CreateGroup {
        windows: Vec<WindowId>,
        arrangement: Arrangement,
    },
    SetGroupArrangement {
        group: GroupId,
        arrangement: Arrangement,
    },
    Ungroup(GroupId),
    SelectTab {
        group: GroupId,
        index: usize,
    },
    NextTab(GroupId),

    SaveNamedLayout(String),
    LoadNamedLayout(String),
    DeleteNamedLayout(String),

    SetSnapEnabled(bool),
    SetSnapThreshold(f64),

    Pointer(PointerEvent),
    /// A key chord as typed, e.g. `"Ctrl+Alt+G"`.
    Chord(String),
    Command(Command),
}

/// What a single event produced.
#[must_use]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventResponse {
    pub opened_window: Option<WindowId>,
    pub created_group: Option<GroupId>,
    /// Surface operations bringing the last rendered frame up to date,
    /// including any queued by earlier typed calls that were not taken yet.
    pub render: Vec<RenderOp>,
}

pub struct Reactor {
    config: Config,
    viewport: Size,
    registry: WindowRegistry,
    groups: GroupManager,
    layout_manager: LayoutManager,
    drag_manager: DragManager,
    persistence_manager: PersistenceManager,
    recording_manager: RecordingManager,
    render_manager: RenderManager,
    hotkey_manager: HotkeyManager,
}

impl Reactor {
    /// Opens a session. Preferences come from `store`; a store that cannot
    /// be read yields the defaults from `config`.
    pub fn new(mut config: Config, viewport: Size, store: Box<dyn LayoutStore>, record: Record) -> Self {
        config.settings.sanitize();
        let settings = &config.settings;
        let area = desktop_area(viewport, settings.top_bar_height);
        let defaults = LayoutPreferences::from_settings(&settings.snap);
        let preferences = LayoutPreferences::load(store.as_ref(), defaults);

        let mut layout_engine = LayoutEngine::new(settings.layout.clone());
        layout_engine.set_active_template(preferences.active_template);

        let mut reactor = Reactor {
            registry: WindowRegistry::new(area, RegistrySettings::from(settings)),
            groups: GroupManager::new(settings.layout.stack_offset),
            layout_manager: LayoutManager { layout_engine },
            drag_manager: DragManager {
                input: InputController::new(settings.snap.check_interval),
            },
            persistence_manager: PersistenceManager { store, preferences },
            recording_manager: RecordingManager { record },
            render_manager: RenderManager {
                renderer: Renderer::new(),
                pending: Vec::new(),
            },
            hotkey_manager: HotkeyManager::from_config(&config),
            viewport,
            config,
        };
        debug!(?viewport, ?area, tiling = reactor.is_tiling(), "session opened");
        reactor.recording_manager.record.start(
            &reactor.config,
            viewport,
            &reactor.persistence_manager.preferences,
        );
        reactor
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn viewport(&self) -> Size { self.viewport }

    pub fn registry(&self) -> &WindowRegistry { &self.registry }

    pub fn groups(&self) -> &GroupManager { &self.groups }

    pub fn preferences(&self) -> &LayoutPreferences { &self.persistence_manager.preferences }

    pub fn layout_engine(&self) -> &LayoutEngine { &self.layout_manager.layout_engine }

    pub fn is_tiling(&self) -> bool { self.layout_manager.layout_engine.is_tiling() }

    pub fn input(&self) -> &InputController { &self.drag_manager.input }

    /// The picture the surface was last brought up to date with.
    pub fn last_frame(&self) -> &RenderFrame { self.render_manager.renderer.last_frame() }

    fn desktop_area(&self) -> Rect { desktop_area(self.viewport, self.config.settings.top_bar_height) }

    /// Applies one event and hands out every render op not collected yet.
    pub fn handle_event(&mut self, event: Event) -> EventResponse {
        let mut response = self.dispatch(event);
        response.render = self.take_render_ops();
        response
    }

    /// Render ops queued since they were last taken. The typed calls below
    /// leave their ops here for the host to collect.
    pub fn take_render_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.render_manager.pending)
    }

    #[instrument(name = "reactor::handle_event", skip(self), fields(event=?event))]
    fn dispatch(&mut self, event: Event) -> EventResponse {
        self.recording_manager.record.on_event(&event);
        let mut response = EventResponse::default();

        match event {
            Event::ViewportChanged(size) => {
                WindowEventHandler::handle_viewport_changed(self, size);
            }
            Event::OpenWindow { title, content } => {
                response.opened_window = Some(WindowEventHandler::handle_open(self, title, content));
            }
            Event::CloseWindow(window) => WindowEventHandler::handle_close(self, window),
            Event::FocusWindow(window) => WindowEventHandler::handle_focus(self, window),
            Event::MinimizeWindow(window) => WindowEventHandler::handle_minimize(self, window),
            Event::MaximizeWindow(window) => WindowEventHandler::handle_maximize(self, window),
            Event::RestoreWindow(window) => WindowEventHandler::handle_restore(self, window),
            Event::ApplyTemplate(name) => CommandEventHandler::handle_apply_named(self, &name),
            Event::CreateGroup { windows, arrangement } => {
                response.created_group =
                    GroupEventHandler::handle_create(self, &windows, arrangement);
            }
            Event::SetGroupArrangement { group, arrangement } => {
                GroupEventHandler::handle_set_arrangement(self, group, arrangement);
            }
            Event::Ungroup(group) => GroupEventHandler::handle_ungroup(self, group),
            Event::SelectTab { group, index } => {
                GroupEventHandler::handle_select_tab(self, group, index);
            }
            Event::NextTab(group) => GroupEventHandler::handle_next_tab(self, group),
            Event::SaveNamedLayout(name) => CommandEventHandler::handle_save_layout(self, name),
            Event::LoadNamedLayout(name) => CommandEventHandler::handle_load_layout(self, &name),
            Event::DeleteNamedLayout(name) => {
                CommandEventHandler::handle_delete_layout(self, &name);
            }
            Event::SetSnapEnabled(enabled) => {
                CommandEventHandler::handle_set_snap_enabled(self, enabled);
            }
            Event::SetSnapThreshold(threshold) => {
                CommandEventHandler::handle_set_snap_threshold(self, threshold);
            }
            Event::Pointer(pointer) => DragEventHandler::handle_pointer(self, pointer),
            Event::Chord(chord) => CommandEventHandler::handle_chord(self, &chord),
            Event::Command(command) => CommandEventHandler::handle_command(self, command),
        }

        if self.registry.take_dirty() {
            LayoutManager::update_layout(self);
        }
        let ops = RenderManager::render(self);
        trace!(ops, "event handled");
        response
    }

    pub fn open_window(&mut self, title: impl Into<String>, content: impl Into<ContentRef>) -> WindowId {
        let id = self.registry.peek_next_id();
        let response = self.dispatch(Event::OpenWindow {
            title: title.into(),
            content: content.into(),
        });
        response.opened_window.unwrap_or(id)
    }

    pub fn close_window(&mut self, window: WindowId) {
        let _ = self.dispatch(Event::CloseWindow(window));
    }

    pub fn focus_window(&mut self, window: WindowId) {
        let _ = self.dispatch(Event::FocusWindow(window));
    }

    pub fn minimize_window(&mut self, window: WindowId) {
        let _ = self.dispatch(Event::MinimizeWindow(window));
    }

    pub fn maximize_window(&mut self, window: WindowId) {
        let _ = self.dispatch(Event::MaximizeWindow(window));
    }

    pub fn restore_window(&mut self, window: WindowId) {
        let _ = self.dispatch(Event::RestoreWindow(window));
    }

    pub fn focus_next(&mut self) { self.execute(Command::FocusNext) }

    pub fn focus_prev(&mut self) { self.execute(Command::FocusPrev) }

    pub fn apply_template(&mut self, name: &str) {
        let _ = self.dispatch(Event::ApplyTemplate(name.to_string()));
    }

    /// Leaves tiling mode without moving anything.
    pub fn float(&mut self) { self.execute(Command::Float) }

    pub fn create_group(&mut self, windows: &[WindowId], arrangement: Arrangement) -> Option<GroupId> {
        self.dispatch(Event::CreateGroup {
            windows: windows.to_vec(),
            arrangement,
        })
        .created_group
    }

    pub fn set_group_arrangement(&mut self, group: GroupId, arrangement: Arrangement) {
        let _ = self.dispatch(Event::SetGroupArrangement { group, arrangement });
    }

    pub fn ungroup(&mut self, group: GroupId) {
        let _ = self.dispatch(Event::Ungroup(group));
    }

    pub fn select_tab(&mut self, group: GroupId, index: usize) {
        let _ = self.dispatch(Event::SelectTab { group, index });
    }

    pub fn next_tab(&mut self, group: GroupId) {
        let _ = self.dispatch(Event::NextTab(group));
    }

    pub fn save_named_layout(&mut self, name: &str) {
        let _ = self.dispatch(Event::SaveNamedLayout(name.to_string()));
    }

    pub fn load_named_layout(&mut self, name: &str) {
        let _ = self.dispatch(Event::LoadNamedLayout(name.to_string()));
    }

    pub fn delete_named_layout(&mut self, name: &str) {
        let _ = self.dispatch(Event::DeleteNamedLayout(name.to_string()));
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        let _ = self.dispatch(Event::SetSnapEnabled(enabled));
    }

    pub fn set_snap_threshold(&mut self, threshold: f64) {
        let _ = self.dispatch(Event::SetSnapThreshold(threshold));
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        let _ = self.dispatch(Event::ViewportChanged(viewport));
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        let _ = self.dispatch(Event::Pointer(event));
    }

    pub fn handle_chord(&mut self, chord: &str) {
        let _ = self.dispatch(Event::Chord(chord.to_string()));
    }

    pub fn execute(&mut self, command: Command) {
        let _ = self.dispatch(Event::Command(command));
    }
}

/// The part of the viewport windows may occupy.
pub fn desktop_area(viewport: Size, top_bar_height: f64) -> Rect {
    let top = top_bar_height.clamp(0.0, viewport.height.max(0.0));
    Rect::new(0.0, top, viewport.width.max(0.0), viewport.height.max(0.0) - top)
}
