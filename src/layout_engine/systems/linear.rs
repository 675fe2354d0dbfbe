use crate::layout_engine::Orientation;
use crate::layout_engine::systems::LayoutSystem;
use crate::layout_engine::utils::split_equal;
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

/// Equal division along one axis: `Vertical` stacks windows top to bottom,
/// `Horizontal` places them side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearLayoutSystem {
    orientation: Orientation,
}

impl LinearLayoutSystem {
    pub fn new(orientation: Orientation) -> Self { LinearLayoutSystem { orientation } }
}

impl LayoutSystem for LinearLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        _focused: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)> {
        windows
            .iter()
            .copied()
            .zip(split_equal(area, gap, windows.len(), self.orientation))
            .collect()
    }
}
