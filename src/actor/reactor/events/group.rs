use tracing::trace;

use super::window::WindowEventHandler;
use crate::actor::reactor::Reactor;
use crate::model::group::{Arrangement, GroupId};
use crate::model::window::WindowId;

pub struct GroupEventHandler;

impl GroupEventHandler {
    pub fn handle_create(
        reactor: &mut Reactor,
        windows: &[WindowId],
        arrangement: Arrangement,
    ) -> Option<GroupId> {
        reactor.groups.group(&mut reactor.registry, windows, arrangement)
    }

    pub fn handle_set_arrangement(
        reactor: &mut Reactor,
        group: GroupId,
        arrangement: Arrangement,
    ) {
        if reactor.groups.get(group).is_none() {
            trace!(?group, "arrangement change for unknown group ignored");
            return;
        }
        reactor.groups.arrange(&mut reactor.registry, group, arrangement);
    }

    pub fn handle_ungroup(reactor: &mut Reactor, group: GroupId) {
        if reactor.groups.get(group).is_none() {
            return;
        }
        reactor.groups.ungroup(&mut reactor.registry, group);
        reactor.registry.mark_dirty();
    }

    /// Shows and focuses tab `index`.
    pub fn handle_select_tab(reactor: &mut Reactor, group: GroupId, index: usize) {
        if let Some(window) = reactor.groups.select_tab(group, index) {
            WindowEventHandler::handle_focus(reactor, window);
        }
    }

    pub fn handle_next_tab(reactor: &mut Reactor, group: GroupId) {
        if let Some(window) = reactor.groups.next_tab(group) {
            WindowEventHandler::handle_focus(reactor, window);
        }
    }
}
