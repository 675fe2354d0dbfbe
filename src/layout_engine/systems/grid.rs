use crate::layout_engine::systems::LayoutSystem;
use crate::layout_engine::utils::grid_cells;
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

/// `ceil(sqrt(n))` columns, filled row-major. A partially filled last row
/// keeps the regular cell width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridLayoutSystem;

impl LayoutSystem for GridLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        _focused: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)> {
        windows.iter().copied().zip(grid_cells(windows.len(), area, gap)).collect()
    }
}
