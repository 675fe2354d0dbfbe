use tracing::{info, trace};

use super::window::WindowEventHandler;
use crate::actor::input::{InputContext, Intent, PointerEvent};
use crate::actor::reactor::Reactor;
use crate::layout_engine::snap;
use crate::model::window::PlacementState;

pub struct DragEventHandler;

impl DragEventHandler {
    pub fn handle_pointer(reactor: &mut Reactor, event: PointerEvent) {
        let prefs = &reactor.persistence_manager.preferences;
        let cx = InputContext {
            registry: &reactor.registry,
            tiling: reactor.layout_manager.layout_engine.is_tiling(),
            snap_threshold: prefs.snap_enabled.then_some(prefs.snap_threshold),
        };
        let intents = reactor.drag_manager.input.handle(&event, &cx);
        for intent in intents {
            Self::apply_intent(reactor, intent);
        }
    }

    fn apply_intent(reactor: &mut Reactor, intent: Intent) {
        match intent {
            Intent::Focus(window) => WindowEventHandler::handle_focus(reactor, window),
            Intent::DragMove { window, frame } | Intent::ResizeMove { window, frame } => {
                if reactor.registry.set_frame(window, frame).is_some() {
                    reactor.registry.set_placement(window, PlacementState::Free);
                }
            }
            Intent::Preview(zone) => trace!(edge = ?zone.map(|z| z.edge), "snap preview"),
            Intent::Snap { window, edge } => {
                let frame = snap::resolve(edge, reactor.registry.area(), reactor.registry.gap());
                if reactor.registry.set_frame(window, frame).is_some() {
                    reactor.registry.set_placement(window, PlacementState::Snapped(edge));
                    info!(%window, ?edge, "window snapped");
                }
            }
            Intent::Release(window) => {
                reactor.registry.set_placement(window, PlacementState::Free);
            }
        }
    }
}
