use crate::common::config::LayoutSettings;
use crate::layout_engine::systems::LayoutSystem;
use crate::layout_engine::utils::{split_columns, split_span};
use crate::model::window::WindowId;
use crate::sys::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct MosaicLayoutSystem {
    /// Share of the first window when there are exactly two.
    primary_ratio: f64,
}

impl MosaicLayoutSystem {
    pub fn new(settings: &LayoutSettings) -> Self {
        MosaicLayoutSystem {
            primary_ratio: settings.mosaic_primary_ratio,
        }
    }
}

impl LayoutSystem for MosaicLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[WindowId],
        area: Rect,
        gap: f64,
        _focused: Option<WindowId>,
    ) -> Vec<(WindowId, Rect)> {
        match windows {
            [] => Vec::new(),
            [only] => vec![(*only, area.inset(gap))],
            [first, second] => {
                let (left, right) = split_columns(area, gap, self.primary_ratio);
                vec![(*first, left), (*second, right)]
            }
            [main, rest @ ..] => {
                let (main_rect, side) = split_columns(area, gap, 0.5);
                let rows = split_span(area.y, area.height, gap, rest.len().div_ceil(2));
                let cell_width = ((side.width - gap) / 2.0).max(0.0);
                let mut frames = vec![(*main, main_rect)];
                for (index, &wid) in rest.iter().enumerate() {
                    let column = (index % 2) as f64;
                    let (y, height) = rows[index / 2];
                    let x = side.x + column * (cell_width + gap);
                    frames.push((wid, Rect::new(x, y, cell_width, height)));
                }
                frames
            }
        }
    }
}
