//! Rectangle math shared by the registry, the layout systems and the snap
//! engine. Everything here is pure; coordinates are desktop pixels with the
//! origin at the top-left corner and y growing downwards.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point { Point::new(self.x, self.y) }

    pub fn size(&self) -> Size { Size::new(self.width, self.height) }

    pub fn max_x(&self) -> f64 { self.x + self.width }

    pub fn max_y(&self) -> f64 { self.y + self.height }

    pub fn mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 { self.width.max(0.0) * self.height.max(0.0) }

    pub fn is_empty(&self) -> bool { self.width <= 0.0 || self.height <= 0.0 }

    /// Shrinks the rectangle by `amount` on every side. Never produces a
    /// negative extent.
    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    /// True when `other` lies entirely within `self` (edges may touch).
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        (max_x > x && max_y > y).then(|| Rect::new(x, y, max_x - x, max_y - y))
    }

    /// Rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool { self.intersection(other).is_some() }

    /// Forces the rectangle inside `bounds`, enforcing `min` as a size floor.
    ///
    /// The floor wins over the bounds: when `bounds` is smaller than `min`
    /// the result is pinned to the bounds' origin and may overhang.
    pub fn clamp_within(&self, bounds: &Rect, min: Size) -> Rect {
        let width = self.width.min(bounds.width).max(min.width);
        let height = self.height.min(bounds.height).max(min.height);
        let x = self.x.min(bounds.max_x() - width).max(bounds.x);
        let y = self.y.min(bounds.max_y() - height).max(bounds.y);
        Rect::new(x, y, width, height)
    }

    /// Like [`Rect::clamp_within`] but without a size floor.
    pub fn fit_within(&self, bounds: &Rect) -> Rect {
        self.clamp_within(bounds, Size::default())
    }
}
