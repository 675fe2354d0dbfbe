use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use strum::{Display, EnumString};
use tracing::{debug, info, trace};

use crate::common::collections::HashSet;
use crate::layout_engine::utils::grid_cells;
use crate::model::registry::WindowRegistry;
use crate::model::window::{GroupMembership, PlacementState, WindowId};
use crate::sys::geometry::Rect;

new_key_type! {
    pub struct GroupId;
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Arrangement {
    /// Members share one rectangle; only the selected tab is shown.
    #[default]
    Tabs,
    /// Members divide the area like the Grid template.
    Tiles,
    /// Members cascade with shrinking bounds, earlier members on top.
    Stack,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub members: Vec<WindowId>,
    pub arrangement: Arrangement,
    pub active_tab: usize,
}

impl Group {
    pub fn shown_tab(&self) -> Option<WindowId> { self.members.get(self.active_tab).copied() }
}

/// Owns every group of the session. Windows carry a back reference
/// ([`GroupMembership`]); the manager keeps both sides in step.
#[derive(Debug, Default)]
pub struct GroupManager {
    groups: SlotMap<GroupId, Group>,
    stack_offset: f64,
}

impl GroupManager {
    pub fn new(stack_offset: f64) -> Self {
        GroupManager {
            groups: SlotMap::with_key(),
            stack_offset,
        }
    }

    pub fn get(&self, id: GroupId) -> Option<&Group> { self.groups.get(id) }

    pub fn iter(&self) -> impl Iterator<Item = &Group> { self.groups.values() }

    pub fn len(&self) -> usize { self.groups.len() }

    pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    /// Groups the known windows among `ids` and arranges them. Windows that
    /// already belong to a group leave it first.
    pub fn group(
        &mut self,
        registry: &mut WindowRegistry,
        ids: &[WindowId],
        arrangement: Arrangement,
    ) -> Option<GroupId> {
        let mut members: Vec<WindowId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if registry.contains(id) && !members.contains(&id) {
                members.push(id);
            }
        }
        if members.is_empty() {
            debug!(?ids, "group request names no known windows");
            return None;
        }
        for &id in &members {
            self.detach(registry, id);
        }
        let group = self.groups.insert_with_key(|key| Group {
            id: key,
            members: members.clone(),
            arrangement,
            active_tab: 0,
        });
        for (tab_index, &id) in members.iter().enumerate() {
            if let Some(window) = registry.get_mut(id) {
                window.group = Some(GroupMembership { group, tab_index });
            }
        }
        info!(?group, ?members, %arrangement, "group created");
        self.arrange(registry, group, arrangement);
        Some(group)
    }

    /// Re-arranges one group. Windows outside the group are never touched.
    pub fn arrange(
        &mut self,
        registry: &mut WindowRegistry,
        group: GroupId,
        arrangement: Arrangement,
    ) {
        let Some(entry) = self.groups.get_mut(group) else {
            trace!(?group, "arrange of unknown group ignored");
            return;
        };
        entry.arrangement = arrangement;
        let members = entry.members.clone();
        let shown = entry.shown_tab();
        let visible: Vec<WindowId> = members
            .iter()
            .copied()
            .filter(|&id| registry.get(id).is_some_and(|w| w.is_visible()))
            .collect();

        for &id in &members {
            registry.normalize_lifecycle(id);
        }
        match arrangement {
            Arrangement::Tabs => {
                let rect = registry.bounds();
                let frames: Vec<(WindowId, Rect)> = members.iter().map(|&id| (id, rect)).collect();
                registry.commit_layout(&frames, PlacementState::Tiled);
                if let Some(shown) = shown {
                    registry.raise(shown);
                }
            }
            Arrangement::Tiles => {
                let cells = grid_cells(visible.len(), registry.area(), registry.gap());
                let frames: Vec<(WindowId, Rect)> = visible.iter().copied().zip(cells).collect();
                registry.commit_layout(&frames, PlacementState::Tiled);
            }
            Arrangement::Stack => {
                let bounds = registry.bounds();
                for (index, &id) in visible.iter().enumerate() {
                    let step = self.stack_offset * index as f64;
                    let frame = Rect::new(
                        bounds.x + step,
                        bounds.y + step,
                        bounds.width - 2.0 * step,
                        bounds.height - 2.0 * step,
                    );
                    registry.set_frame(id, frame);
                    registry.set_placement(id, PlacementState::Free);
                }
                for &id in visible.iter().rev() {
                    registry.raise(id);
                }
            }
        }
        debug!(?group, %arrangement, members = members.len(), "group arranged");
    }

    /// Removes `window` from its group, renumbering the remaining tabs.
    /// A group left without members is deleted.
    pub fn detach(&mut self, registry: &mut WindowRegistry, window: WindowId) {
        let Some(membership) = registry.get_mut(window).and_then(|w| w.group.take()) else {
            return;
        };
        let Some(group) = self.groups.get_mut(membership.group) else {
            return;
        };
        let Some(pos) = group.members.iter().position(|&id| id == window) else {
            return;
        };
        group.members.remove(pos);
        if pos < group.active_tab {
            group.active_tab -= 1;
        }
        group.active_tab = group.active_tab.min(group.members.len().saturating_sub(1));
        for (tab_index, &id) in group.members.iter().enumerate().skip(pos) {
            if let Some(w) = registry.get_mut(id) {
                w.group = Some(GroupMembership {
                    group: membership.group,
                    tab_index,
                });
            }
        }
        if group.members.is_empty() {
            self.groups.remove(membership.group);
            debug!(group = ?membership.group, "empty group removed");
        }
    }

    pub fn ungroup(&mut self, registry: &mut WindowRegistry, group: GroupId) {
        let Some(entry) = self.groups.remove(group) else {
            return;
        };
        for id in entry.members {
            if let Some(window) = registry.get_mut(id) {
                window.group = None;
            }
        }
        info!(?group, "group dissolved");
    }

    /// Shows tab `index` of a tab group. Returns the newly shown window.
    pub fn select_tab(&mut self, group: GroupId, index: usize) -> Option<WindowId> {
        let entry = self.groups.get_mut(group)?;
        let id = *entry.members.get(index)?;
        entry.active_tab = index;
        Some(id)
    }

    pub fn next_tab(&mut self, group: GroupId) -> Option<WindowId> {
        let entry = self.groups.get(group)?;
        if entry.members.is_empty() {
            return None;
        }
        let next = (entry.active_tab + 1) % entry.members.len();
        self.select_tab(group, next)
    }

    /// Focusing a tab member makes it the shown tab.
    pub fn note_focus(&mut self, registry: &WindowRegistry, window: WindowId) {
        if let Some(m) = registry.get(window).and_then(|w| w.group) {
            if let Some(group) = self.groups.get_mut(m.group) {
                group.active_tab = m.tab_index;
            }
        }
    }

    /// Tab members that are not the shown tab.
    pub fn hidden_windows(&self) -> HashSet<WindowId> {
        self.groups
            .values()
            .filter(|g| g.arrangement == Arrangement::Tabs)
            .flat_map(|g| {
                g.members
                    .iter()
                    .enumerate()
                    .filter(move |(index, _)| *index != g.active_tab)
                    .map(|(_, &id)| id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::registry::RegistrySettings;
    use crate::model::window::ContentRef;

    fn setup(n: usize) -> (WindowRegistry, GroupManager, Vec<WindowId>) {
        let mut reg =
            WindowRegistry::new(Rect::new(0.0, 0.0, 1200.0, 800.0), RegistrySettings::default());
        let ids = (0..n).map(|i| reg.create(format!("w{i}"), ContentRef::default())).collect();
        (reg, GroupManager::new(30.0), ids)
    }

    fn assert_consistent(reg: &WindowRegistry, groups: &GroupManager) {
        for window in reg.iter() {
            let listed: Vec<_> =
                groups.iter().filter(|g| g.members.contains(&window.id)).collect();
            match window.group {
                Some(m) => {
                    assert_eq!(listed.len(), 1, "{} listed in {} groups", window.id, listed.len());
                    assert_eq!(listed[0].id, m.group);
                    assert_eq!(listed[0].members[m.tab_index], window.id);
                }
                None => assert!(listed.is_empty(), "{} has no group but is listed", window.id),
            }
        }
    }

    #[test]
    fn tabs_share_one_rect_and_hide_all_but_one() {
        let (mut reg, mut groups, ids) = setup(3);
        let g = groups.group(&mut reg, &ids[..2], Arrangement::Tabs).unwrap();
        let bounds = reg.bounds();
        assert_eq!(reg.get(ids[0]).unwrap().frame, bounds);
        assert_eq!(reg.get(ids[1]).unwrap().frame, bounds);
        assert_eq!(groups.hidden_windows().into_iter().collect::<Vec<_>>(), vec![ids[1]]);

        assert_eq!(groups.next_tab(g), Some(ids[1]));
        assert_eq!(groups.hidden_windows().into_iter().collect::<Vec<_>>(), vec![ids[0]]);
        assert_consistent(&reg, &groups);
    }

    #[test]
    fn tiles_use_the_grid_over_members_only() {
        let (mut reg, mut groups, ids) = setup(3);
        let outsider = reg.get(ids[2]).unwrap().clone();
        groups.group(&mut reg, &ids[..2], Arrangement::Tiles).unwrap();
        assert_eq!(reg.get(ids[0]).unwrap().frame, Rect::new(8.0, 8.0, 588.0, 784.0));
        assert_eq!(reg.get(ids[1]).unwrap().frame, Rect::new(604.0, 8.0, 588.0, 784.0));
        assert_eq!(reg.get(ids[2]).unwrap(), &outsider);
    }

    #[test]
    fn stack_cascades_with_earlier_members_on_top() {
        let (mut reg, mut groups, ids) = setup(3);
        groups.group(&mut reg, &ids, Arrangement::Stack).unwrap();
        assert_eq!(reg.get(ids[0]).unwrap().frame, Rect::new(8.0, 8.0, 1184.0, 784.0));
        assert_eq!(reg.get(ids[1]).unwrap().frame, Rect::new(38.0, 38.0, 1124.0, 724.0));
        let z: Vec<u64> = ids.iter().map(|&id| reg.get(id).unwrap().z_order).collect();
        assert!(z[0] > z[1] && z[1] > z[2], "z orders {z:?}");
    }

    #[test]
    fn regrouping_moves_window_between_groups() {
        let (mut reg, mut groups, ids) = setup(3);
        let first = groups.group(&mut reg, &ids[..2], Arrangement::Tabs).unwrap();
        let second = groups.group(&mut reg, &ids[1..], Arrangement::Tiles).unwrap();
        assert_eq!(groups.get(first).unwrap().members, vec![ids[0]]);
        assert_eq!(groups.get(second).unwrap().members, vec![ids[1], ids[2]]);
        assert_consistent(&reg, &groups);
    }

    #[test]
    fn detach_renumbers_and_drops_empty_groups() {
        let (mut reg, mut groups, ids) = setup(3);
        let g = groups.group(&mut reg, &ids, Arrangement::Tabs).unwrap();
        groups.select_tab(g, 2);
        groups.detach(&mut reg, ids[0]);
        assert_eq!(reg.get(ids[1]).unwrap().tab_index(), Some(0));
        assert_eq!(reg.get(ids[2]).unwrap().tab_index(), Some(1));
        assert_eq!(groups.get(g).unwrap().shown_tab(), Some(ids[2]));
        assert_consistent(&reg, &groups);

        groups.detach(&mut reg, ids[1]);
        groups.detach(&mut reg, ids[2]);
        assert!(groups.get(g).is_none());
        assert_consistent(&reg, &groups);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (mut reg, mut groups, ids) = setup(1);
        assert!(groups.group(&mut reg, &[WindowId::new(42)], Arrangement::Tabs).is_none());
        let g = groups.group(&mut reg, &[ids[0], WindowId::new(42)], Arrangement::Tabs).unwrap();
        assert_eq!(groups.get(g).unwrap().members, vec![ids[0]]);
        groups.ungroup(&mut reg, g);
        groups.arrange(&mut reg, g, Arrangement::Tiles);
        assert!(groups.is_empty());
        assert_consistent(&reg, &groups);
    }

    #[test]
    fn arrangement_names_parse() {
        assert_eq!("tiles".parse::<Arrangement>().unwrap(), Arrangement::Tiles);
        assert_eq!(Arrangement::Stack.to_string(), "stack");
    }
}
