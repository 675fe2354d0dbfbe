use crate::common::config::LayoutSettings;
use crate::layout_engine::systems::LayoutSystem;
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

/// Floating-mode arrangement: every window gets the same capped size and a
/// fixed diagonal offset per index. When the diagonal runs out of room the
/// offsets start again from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeLayoutSystem {
    offset: f64,
    fraction: f64,
}

impl CascadeLayoutSystem {
    pub fn new(settings: &LayoutSettings) -> Self {
        CascadeLayoutSystem {
            offset: settings.cascade_offset,
            fraction: settings.cascade_fraction,
        }
    }
}

impl LayoutSystem for CascadeLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        _focused: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)> {
        let bounds = area.inset(gap);
        let width = (area.width * self.fraction).min(bounds.width);
        let height = (area.height * self.fraction).min(bounds.height);
        let steps = if self.offset > 0.0 {
            let room = (bounds.width - width).min(bounds.height - height).max(0.0);
            (room / self.offset).floor() as usize + 1
        } else {
            1
        };
        windows
            .iter()
            .enumerate()
            .map(|(index, &wid)| {
                let step = (index % steps) as f64 * self.offset;
                (wid, Rect::new(bounds.x + step, bounds.y + step, width, height))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::systems::testing::*;

    #[test]
    fn offsets_each_window_diagonally() {
        let system = CascadeLayoutSystem::new(&LayoutSettings::default());
        let windows = wids(3);
        let frames = system.calculate_layout(&windows, desktop(), 8.0, None);
        assert_eq!(frames[0].1, Rect::new(8.0, 8.0, 720.0, 480.0));
        assert_eq!(frames[1].1, Rect::new(38.0, 38.0, 720.0, 480.0));
        assert_eq!(frames[2].1, Rect::new(68.0, 68.0, 720.0, 480.0));
    }

    #[test]
    fn wraps_before_leaving_the_area() {
        let system = CascadeLayoutSystem::new(&LayoutSettings::default());
        let frames = system.calculate_layout(&wids(40), desktop(), 8.0, None);
        assert_inside(&frames, desktop().inset(8.0));
        // 304px of vertical room at 30px per step: 11 distinct positions.
        assert_eq!(frames[11].1.origin(), frames[0].1.origin());
    }
}
