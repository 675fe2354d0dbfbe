use tracing::{debug, trace};

use crate::actor::reactor::Reactor;
use crate::model::group::GroupId;
use crate::model::window::{ContentRef, WindowId};
use crate::sys::geometry::Size;

pub struct WindowEventHandler;

impl WindowEventHandler {
    pub fn handle_open(reactor: &mut Reactor, title: String, content: ContentRef) -> WindowId {
        reactor.registry.create(title, content)
    }

    /// Detaches from the group and removes from the registry in one step, so
    /// no group ever lists a closed window.
    pub fn handle_close(reactor: &mut Reactor, window: WindowId) {
        if !reactor.registry.contains(window) {
            trace!(%window, "close of unknown window ignored");
            return;
        }
        let group = reactor.registry.get(window).and_then(|w| w.group_id());
        reactor.groups.detach(&mut reactor.registry, window);
        reactor.registry.close(window);
        if let Some(group) = group {
            Self::rearrange_group(reactor, group);
        }
    }

    pub fn handle_focus(reactor: &mut Reactor, window: WindowId) {
        if reactor.registry.focus(window) {
            reactor.groups.note_focus(&reactor.registry, window);
        }
    }

    pub fn handle_minimize(reactor: &mut Reactor, window: WindowId) {
        reactor.registry.minimize(window);
    }

    pub fn handle_maximize(reactor: &mut Reactor, window: WindowId) {
        reactor.registry.toggle_maximize(window);
        reactor.groups.note_focus(&reactor.registry, window);
    }

    pub fn handle_restore(reactor: &mut Reactor, window: WindowId) {
        reactor.registry.restore(window);
    }

    pub fn handle_cycle_focus(reactor: &mut Reactor, forward: bool) {
        if let Some(target) = reactor.registry.cycle_target(forward) {
            Self::handle_focus(reactor, target);
        }
    }

    pub fn handle_viewport_changed(reactor: &mut Reactor, viewport: Size) {
        reactor.viewport = viewport;
        let area = reactor.desktop_area();
        debug!(?viewport, ?area, "viewport changed");
        reactor.registry.set_area(area);
        let groups: Vec<GroupId> = reactor.groups.iter().map(|g| g.id).collect();
        for group in groups {
            Self::rearrange_group(reactor, group);
        }
    }

    fn rearrange_group(reactor: &mut Reactor, group: GroupId) {
        let Some(arrangement) = reactor.groups.get(group).map(|g| g.arrangement) else {
            return;
        };
        reactor.groups.arrange(&mut reactor.registry, group, arrangement);
    }
}
