use crate::layout_engine::Orientation;
use crate::sys::geometry::Rect;

/// `(cols, rows)` of the Grid template for `n` windows.
pub fn grid_dimensions(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    (cols, rows)
}

/// Divides `extent` starting at `start` into `n` equal spans separated by
/// `gap`, with a gap before the first span and after the last one.
/// Returns `(offset, length)` pairs.
pub fn split_span(start: f64, extent: f64, gap: f64, n: usize) -> Vec<(f64, f64)> {
    if n == 0 {
        return Vec::new();
    }
    let length = ((extent - gap * (n as f64 + 1.0)) / n as f64).max(0.0);
    (0..n).map(|i| (start + gap + i as f64 * (length + gap), length)).collect()
}

/// Row-major grid cells for `n` windows inside `area`.
pub fn grid_cells(n: usize, area: Rect, gap: f64) -> Vec<Rect> {
    let (cols, rows) = grid_dimensions(n);
    let xs = split_span(area.x, area.width, gap, cols);
    let ys = split_span(area.y, area.height, gap, rows);
    (0..n)
        .map(|i| {
            let (x, width) = xs[i % cols];
            let (y, height) = ys[i / cols];
            Rect::new(x, y, width, height)
        })
        .collect()
}

/// Equal single-axis division of `area` with outer and inner gaps.
/// `Horizontal` places windows side by side, `Vertical` stacks them.
pub fn split_equal(area: Rect, gap: f64, n: usize, orientation: Orientation) -> Vec<Rect> {
    match orientation {
        Orientation::Horizontal => {
            let height = (area.height - 2.0 * gap).max(0.0);
            split_span(area.x, area.width, gap, n)
                .into_iter()
                .map(|(x, width)| Rect::new(x, area.y + gap, width, height))
                .collect()
        }
        Orientation::Vertical => {
            let width = (area.width - 2.0 * gap).max(0.0);
            split_span(area.y, area.height, gap, n)
                .into_iter()
                .map(|(y, height)| Rect::new(area.x + gap, y, width, height))
                .collect()
        }
    }
}

/// Splits `area` into two side-by-side columns sharing the gap convention
/// of the master layout: `gap | first | gap | second | gap`.
pub fn split_columns(area: Rect, gap: f64, ratio: f64) -> (Rect, Rect) {
    let usable = (area.width - 3.0 * gap).max(0.0);
    let first_width = usable * ratio;
    let height = (area.height - 2.0 * gap).max(0.0);
    let first = Rect::new(area.x + gap, area.y + gap, first_width, height);
    let second = Rect::new(first.max_x() + gap, area.y + gap, usable - first_width, height);
    (first, second)
}
