//! Edge and corner snapping.
//!
//! An area has eight zones: a `threshold`-wide band along each edge and a
//! `2 * threshold` square in each corner. Corners are tested first but only
//! fire when the moving rectangle qualifies on both axes; otherwise the
//! single-axis edge wins.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::layout_engine::utils::split_columns;
use crate::sys::geometry::Rect;

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SnapEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapEdge {
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            SnapEdge::TopLeft | SnapEdge::TopRight | SnapEdge::BottomLeft | SnapEdge::BottomRight
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SnapZone {
    pub edge: SnapEdge,
    pub bounds: Rect,
}

impl SnapZone {
    /// Whether the leading or trailing edge of `rect` has reached this zone.
    /// Overshooting past the desktop edge still counts.
    pub fn accepts(&self, rect: &Rect) -> bool {
        let b = &self.bounds;
        let near_left = rect.x <= b.max_x();
        let near_right = rect.max_x() >= b.x;
        let near_top = rect.y <= b.max_y();
        let near_bottom = rect.max_y() >= b.y;
        match self.edge {
            SnapEdge::Left => near_left,
            SnapEdge::Right => near_right,
            SnapEdge::Top => near_top,
            SnapEdge::Bottom => near_bottom,
            SnapEdge::TopLeft => near_left && near_top,
            SnapEdge::TopRight => near_right && near_top,
            SnapEdge::BottomLeft => near_left && near_bottom,
            SnapEdge::BottomRight => near_right && near_bottom,
        }
    }
}

/// Zones for `area`, corners first so that [`find_zone`] prefers them when
/// both axes qualify.
pub fn zones_for(area: Rect, threshold: f64) -> Vec<SnapZone> {
    let t = threshold;
    let c = 2.0 * threshold;
    let zone = |edge, x, y, w, h| SnapZone { edge, bounds: Rect::new(x, y, w, h) };
    vec![
        zone(SnapEdge::TopLeft, area.x, area.y, c, c),
        zone(SnapEdge::TopRight, area.max_x() - c, area.y, c, c),
        zone(SnapEdge::BottomLeft, area.x, area.max_y() - c, c, c),
        zone(SnapEdge::BottomRight, area.max_x() - c, area.max_y() - c, c, c),
        zone(SnapEdge::Left, area.x, area.y, t, area.height),
        zone(SnapEdge::Right, area.max_x() - t, area.y, t, area.height),
        zone(SnapEdge::Top, area.x, area.y, area.width, t),
        zone(SnapEdge::Bottom, area.x, area.max_y() - t, area.width, t),
    ]
}

/// First zone in `zones` that accepts `rect`.
pub fn find_zone(rect: &Rect, zones: &[SnapZone]) -> Option<SnapZone> {
    zones.iter().find(|zone| zone.accepts(rect)).copied()
}

/// Canonical frame for a snap: halves for edges (same gap convention as the
/// master layout), quarters split at the area's midlines for corners.
pub fn resolve(edge: SnapEdge, area: Rect, gap: f64) -> Rect {
    let half_w = area.width / 2.0 - gap;
    let half_h = area.height / 2.0 - gap;
    let mid_x = area.x + area.width / 2.0;
    let mid_y = area.y + area.height / 2.0;
    match edge {
        SnapEdge::Left => split_columns(area, gap, 0.5).0,
        SnapEdge::Right => split_columns(area, gap, 0.5).1,
        SnapEdge::Top | SnapEdge::Bottom => {
            let height = ((area.height - 3.0 * gap) / 2.0).max(0.0);
            let width = (area.width - 2.0 * gap).max(0.0);
            let y = if edge == SnapEdge::Top {
                area.y + gap
            } else {
                area.y + 2.0 * gap + height
            };
            Rect::new(area.x + gap, y, width, height)
        }
        SnapEdge::TopLeft => Rect::new(area.x + gap, area.y + gap, half_w, half_h),
        SnapEdge::TopRight => Rect::new(mid_x, area.y + gap, half_w, half_h),
        SnapEdge::BottomLeft => Rect::new(area.x + gap, mid_y, half_w, half_h),
        SnapEdge::BottomRight => Rect::new(mid_x, mid_y, half_w, half_h),
    }
}
