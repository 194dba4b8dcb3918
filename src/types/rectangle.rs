//! Grid points and selection rectangles.

use serde::{Deserialize, Serialize};

/// A cell coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned block of cells.
///
/// `extent` may be negative on either axis; the sign records the drag
/// direction from `origin`. A single cell has extent `(0, 0)`. Bounds are
/// inclusive: the rectangle covers `origin` through `origin + extent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub origin: Point,
    pub extent: Point,
    /// Cell the user started from, before any normalization.
    pub first_selected_cell: Point,
    /// Corner of the normalized bounds diagonally opposite the anchor.
    pub last_selected_cell: Point,
}

impl Rectangle {
    /// Create a rectangle anchored at its own origin.
    pub fn new(ox: i32, oy: i32, ex: i32, ey: i32) -> Self {
        Self::with_anchor(ox, oy, ex, ey, Point::new(ox, oy))
    }

    /// Create a rectangle whose anchor was `first` before normalization.
    pub fn with_anchor(ox: i32, oy: i32, ex: i32, ey: i32, first: Point) -> Self {
        let mut rect = Self {
            origin: Point::new(ox, oy),
            extent: Point::new(ex, ey),
            first_selected_cell: first,
            last_selected_cell: first,
        };
        rect.last_selected_cell = rect.opposite_corner(first);
        rect
    }

    /// `origin + extent`, the cell diagonally opposite `origin`.
    pub fn corner(&self) -> Point {
        Point::new(
            self.origin.x.saturating_add(self.extent.x),
            self.origin.y.saturating_add(self.extent.y),
        )
    }

    pub fn left(&self) -> i32 {
        self.origin.x.min(self.corner().x)
    }

    pub fn right(&self) -> i32 {
        self.origin.x.max(self.corner().x)
    }

    pub fn top(&self) -> i32 {
        self.origin.y.min(self.corner().y)
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y.max(self.corner().y)
    }

    /// Normalized bounds as `(left, top, right, bottom)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (self.left(), self.top(), self.right(), self.bottom())
    }

    /// Number of columns covered.
    pub fn width(&self) -> i64 {
        i64::from(self.right()) - i64::from(self.left()) + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> i64 {
        i64::from(self.bottom()) - i64::from(self.top()) + 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.left() <= x && x <= self.right() && self.top() <= y && y <= self.bottom()
    }

    /// True if both rectangles cover exactly the same cells.
    pub fn same_bounds(&self, other: &Rectangle) -> bool {
        self.bounds() == other.bounds()
    }

    /// Collapse to zero height at row `y`, keeping the column range.
    pub fn flatten_x_at(&self, y: i32) -> Rectangle {
        Rectangle::new(self.origin.x, y, self.extent.x, 0)
    }

    /// Collapse to zero width at column `x`, keeping the row range.
    pub fn flatten_y_at(&self, x: i32) -> Rectangle {
        Rectangle::new(x, self.origin.y, 0, self.extent.y)
    }

    fn opposite_corner(&self, anchor: Point) -> Point {
        let (left, top, right, bottom) = self.bounds();
        Point::new(
            if anchor.x == left { right } else { left },
            if anchor.y == top { bottom } else { top },
        )
    }
}

/// Convert a host-supplied extent to a cell delta.
///
/// `NaN` becomes 0; fractions truncate toward zero; out-of-range values
/// saturate.
pub fn coerce_extent(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let clamped = value.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    #[allow(clippy::cast_possible_truncation)]
    {
        clamped as i32
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn negative_extent_normalizes_bounds() {
        let rect = Rectangle::new(5, 5, -2, -3);
        assert_eq!(rect.bounds(), (3, 2, 5, 5));
        assert!(rect.contains(4, 3));
        assert!(!rect.contains(6, 3));
        assert_eq!(rect.width(), 3);
        assert_eq!(rect.height(), 4);
    }

    #[test]
    fn last_selected_cell_is_opposite_anchor() {
        let rect = Rectangle::new(5, 5, -2, -3);
        assert_eq!(rect.first_selected_cell, Point::new(5, 5));
        assert_eq!(rect.last_selected_cell, Point::new(3, 2));

        let rect = Rectangle::new(1, 1, 2, 2);
        assert_eq!(rect.last_selected_cell, Point::new(3, 3));

        // Dragging down-left from the top-right corner
        let rect = Rectangle::new(4, 0, -3, 2);
        assert_eq!(rect.last_selected_cell, Point::new(1, 2));
    }

    #[test]
    fn flattened_projections_keep_one_axis() {
        let rect = Rectangle::new(2, 7, 3, 4);
        let fx = rect.flatten_x_at(0);
        assert!(fx.contains(4, 0));
        assert!(!fx.contains(4, 7));
        let fy = rect.flatten_y_at(0);
        assert!(fy.contains(0, 9));
        assert!(!fy.contains(2, 9));
    }

    #[test]
    fn coerce_extent_handles_nan_and_overflow() {
        assert_eq!(coerce_extent(f64::NAN), 0);
        assert_eq!(coerce_extent(2.9), 2);
        assert_eq!(coerce_extent(-2.9), -2);
        assert_eq!(coerce_extent(1e12), i32::MAX);
        assert_eq!(coerce_extent(f64::NEG_INFINITY), i32::MIN);
    }
}
