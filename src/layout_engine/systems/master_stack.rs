use crate::common::config::LayoutSettings;
use crate::layout_engine::systems::LayoutSystem;
use crate::layout_engine::utils::{split_columns, split_span};
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

/// The first window is the master and takes `master_ratio` of the usable
/// width at full height; the rest share the other column equally. A lone
/// window takes the whole area.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterStackLayoutSystem {
    master_ratio: f64,
}

impl MasterStackLayoutSystem {
    pub fn new(settings: &LayoutSettings) -> Self {
        MasterStackLayoutSystem {
            master_ratio: settings.master_ratio.clamp(0.05, 0.95),
        }
    }
}

impl LayoutSystem for MasterStackLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        _focused: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)> {
        let Some((&master, stack)) = windows.split_first() else {
            return Vec::new();
        };
        if stack.is_empty() {
            return vec![(master, area.inset(gap))];
        }
        let (master_rect, column) = split_columns(area, gap, self.master_ratio);
        let rows = split_span(area.y, area.height, gap, stack.len());
        let mut frames = vec![(master, master_rect)];
        frames.extend(
            stack
                .iter()
                .zip(rows)
                .map(|(&wid, (y, height))| (wid, Rect::new(column.x, y, column.width, height))),
        );
        frames
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::systems::testing::*;

    fn system() -> MasterStackLayoutSystem { MasterStackLayoutSystem::new(&LayoutSettings::default()) }

    #[test]
    fn single_window_fills_area() {
        let windows = wids(1);
        let frames = system().calculate_layout(&windows, desktop(), 8.0, None);
        assert_eq!(frames, vec![(windows[0], Rect::new(8.0, 8.0, 1184.0, 784.0))]);
    }

    #[test]
    fn master_takes_sixty_percent() {
        let windows = wids(3);
        let frames = system().calculate_layout(&windows, desktop(), 8.0, None);
        let usable = 1200.0 - 24.0;
        assert_rect_eq(frames[0].1, Rect::new(8.0, 8.0, usable * 0.6, 784.0));
        let stack_x = 8.0 + usable * 0.6 + 8.0;
        assert_rect_eq(frames[1].1, Rect::new(stack_x, 8.0, usable * 0.4, 388.0));
        assert_rect_eq(frames[2].1, Rect::new(stack_x, 404.0, usable * 0.4, 388.0));
        assert_no_overlap(&frames);
        assert_inside(&frames, desktop().inset(8.0));
    }
}
