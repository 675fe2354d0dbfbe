use tracing::warn;

use crate::common::config::LayoutSettings;
use crate::layout_engine::systems::LayoutSystem;
use crate::model::window::WindowId;
use crate::sys::geometry::{Rect, Size};

/// Centers the focused window and pins every other window, shrunk to a
/// thumbnail, to the corners (slot = background index mod 4). Background
/// windows are reported as dimmed.
///
/// With more than four background windows the corner slots are reused, so
/// thumbnails stack on top of each other; that case is logged.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusLayoutSystem {
    fraction: f64,
    thumbnail: Size,
}

impl FocusLayoutSystem {
    pub fn new(settings: &LayoutSettings) -> Self {
        FocusLayoutSystem {
            fraction: settings.focus_fraction,
            thumbnail: settings.focus_thumbnail,
        }
    }

    fn target(windows: &[WindowId], focused: Option<WindowId>) -> Option<WindowId> {
        focused.filter(|f| windows.contains(f)).or_else(|| windows.first().copied())
    }
}

impl LayoutSystem for FocusLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        focused: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)> {
        let Some(target) = Self::target(windows, focused) else {
            return Vec::new();
        };
        let width = area.width * self.fraction;
        let height = area.height * self.fraction;
        let center = Rect::new(
            area.x + (area.width - width) / 2.0,
            area.y + (area.height - height) / 2.0,
            width,
            height,
        );

        let bounds = area.inset(gap);
        let tw = self.thumbnail.width.min(bounds.width);
        let th = self.thumbnail.height.min(bounds.height);
        let corners = [
            Rect::new(bounds.x, bounds.y, tw, th),
            Rect::new(bounds.max_x() - tw, bounds.y, tw, th),
            Rect::new(bounds.x, bounds.max_y() - th, tw, th),
            Rect::new(bounds.max_x() - tw, bounds.max_y() - th, tw, th),
        ];

        let background = windows.len() - 1;
        if background > corners.len() {
            warn!(background, "more background windows than corners; thumbnails will overlap");
        }

        let mut slot = 0;
        windows
            .iter()
            .map(|&wid| {
                if wid == target {
                    (wid, center)
                } else {
                    let frame = corners[slot % corners.len()];
                    slot += 1;
                    (wid, frame)
                }
            })
            .collect()
    }

    fn dimmed_windows(&self, windows: &[WindowId], focused: Option<WindowId>) -> Vec<WindowId> {
        let target = Self::target(windows, focused);
        windows.iter().copied().filter(|&wid| Some(wid) != target).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::systems::testing::*;

    fn system() -> FocusLayoutSystem { FocusLayoutSystem::new(&LayoutSettings::default()) }

    #[test]
    fn focused_window_is_centered_and_others_pinned() {
        let windows = wids(3);
        let frames = system().calculate_layout(&windows, desktop(), 8.0, Some(windows[1]));
        assert_eq!(
            frames,
            vec![
                (windows[0], Rect::new(8.0, 8.0, 300.0, 200.0)),
                (windows[1], Rect::new(300.0, 200.0, 600.0, 400.0)),
                (windows[2], Rect::new(892.0, 8.0, 300.0, 200.0)),
            ]
        );
        assert_eq!(system().dimmed_windows(&windows, Some(windows[1])), vec![windows[0], windows[2]]);
    }

    #[test]
    fn falls_back_to_first_window_without_focus() {
        let windows = wids(2);
        let frames = system().calculate_layout(&windows, desktop(), 8.0, None);
        assert_eq!(frames[0].1, Rect::new(300.0, 200.0, 600.0, 400.0));
        assert_eq!(system().dimmed_windows(&windows, None), vec![windows[1]]);
    }

    #[test]
    fn corner_slots_cycle_past_four() {
        let windows = wids(6);
        let frames = system().calculate_layout(&windows, desktop(), 8.0, Some(windows[0]));
        assert_eq!(frames[1].1, Rect::new(8.0, 8.0, 300.0, 200.0));
        assert_eq!(frames[4].1, Rect::new(892.0, 592.0, 300.0, 200.0));
        assert_eq!(frames[5].1, frames[1].1);
    }
}
