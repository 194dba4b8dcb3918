//! Pixel offset <-> index conversion over non-uniform sizes.
//!
//! Sizes are read through [`GridMetrics`] on every call, never cached, so
//! the mapper stays correct while rows and columns are being resized.

use crate::model::{Axis, GridMetrics};

/// Binary-search mapper for one axis.
///
/// Pixel 0 is the leading edge of `first`; indices before `first` (the fixed
/// region, for a scroll mapper) are never returned.
#[derive(Debug)]
pub struct ScrollCoordinateMapper<'a, M: GridMetrics + ?Sized> {
    metrics: &'a M,
    axis: Axis,
    first: i32,
}

impl<'a, M: GridMetrics + ?Sized> ScrollCoordinateMapper<'a, M> {
    /// Mapper over the whole axis, pixel 0 at index 0.
    pub fn new(metrics: &'a M, axis: Axis) -> Self {
        Self {
            metrics,
            axis,
            first: 0,
        }
    }

    /// Mapper over the scrollable part of the axis, pixel 0 at the first
    /// non-fixed index.
    pub fn scrollable(metrics: &'a M, axis: Axis) -> Self {
        let first = metrics.fixed_count(axis).clamp(0, metrics.count(axis).max(0));
        Self {
            metrics,
            axis,
            first,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// First index this mapper addresses.
    pub fn first(&self) -> i32 {
        self.first
    }

    /// One past the last index.
    pub fn end(&self) -> i32 {
        self.metrics.count(self.axis).max(self.first)
    }

    /// Leading edge of `index`, relative to the leading edge of `first`.
    pub fn pixel_from_index(&self, index: i32) -> f64 {
        let base = self.metrics.cumulative_size(self.axis, self.first);
        self.metrics.cumulative_size(self.axis, index) - base
    }

    /// Total extent of the addressed indices.
    pub fn extent(&self) -> f64 {
        self.pixel_from_index(self.end())
    }

    pub fn size(&self, index: i32) -> f64 {
        self.metrics.size(self.axis, index)
    }

    /// Smallest index whose leading edge is at or past `offset`.
    ///
    /// Offsets beyond the last edge clamp to the last index; an empty axis
    /// returns `first`. Search is over indices, so it stays O(log n) even
    /// when every size is 0.
    pub fn index_from_pixel(&self, offset: f64) -> i32 {
        let offset = if offset.is_nan() { 0.0 } else { offset };
        let found = self.search(|edge| edge >= offset);
        self.clamp_index(found)
    }

    /// Index of the cell containing `offset`: the last one starting at or
    /// before it.
    pub fn index_containing(&self, offset: f64) -> i32 {
        let offset = if offset.is_nan() { 0.0 } else { offset };
        let after = self.search(|edge| edge > offset);
        self.clamp_index(after - 1)
    }

    /// New scroll value after moving `cell_delta` cells from `old`.
    ///
    /// The step is the size of the cell adjacent to `old` in the scroll
    /// direction, so one wheel notch moves roughly one row/column whatever
    /// the local sizing. The result is clamped to `[0, max]`.
    pub fn scroll_by_delta(&self, old: f64, cell_delta: i32, max: f64) -> f64 {
        let step = if cell_delta >= 0 {
            self.size(self.index_containing(old))
        } else {
            let previous = self.index_from_pixel(old) - 1;
            if previous < self.first {
                0.0
            } else {
                self.size(previous)
            }
        };
        let target = old + f64::from(cell_delta) * step;
        clamp_scroll(target, max)
    }

    /// Smallest index in `[first, end]` whose edge satisfies `pred`; `end` if none.
    fn search(&self, pred: impl Fn(f64) -> bool) -> i32 {
        let (mut lo, mut hi) = (self.first, self.end());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(self.pixel_from_index(mid)) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }

    fn clamp_index(&self, index: i32) -> i32 {
        let last = (self.end() - 1).max(self.first);
        index.clamp(self.first, last)
    }
}

/// Clamp a scroll value to `[0, max]`, mapping NaN to 0.
pub fn clamp_scroll(value: f64, max: f64) -> f64 {
    let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::GridLayout;

    fn sample() -> GridLayout {
        GridLayout::from_sizes(vec![10.0, 20.0, 5.0, 40.0], vec![])
    }

    #[test]
    fn index_from_pixel_matches_reference_vectors() {
        let layout = sample();
        let mapper = ScrollCoordinateMapper::new(&layout, Axis::Vertical);
        assert_eq!(mapper.index_from_pixel(32.0), 3);
        assert_eq!(mapper.index_from_pixel(0.0), 0);
        assert_eq!(mapper.index_from_pixel(1000.0), 3);
        assert_eq!(mapper.index_from_pixel(10.0), 1);
        assert_eq!(mapper.index_from_pixel(-5.0), 0);
        assert_eq!(mapper.index_from_pixel(f64::NAN), 0);
    }

    #[test]
    fn index_containing_finds_partial_cell() {
        let layout = sample();
        let mapper = ScrollCoordinateMapper::new(&layout, Axis::Vertical);
        assert_eq!(mapper.index_containing(32.0), 2);
        assert_eq!(mapper.index_containing(30.0), 2);
        assert_eq!(mapper.index_containing(0.0), 0);
        assert_eq!(mapper.index_containing(500.0), 3);
    }

    #[test]
    fn empty_and_zero_sized_axes() {
        let empty = GridLayout::from_sizes(vec![], vec![]);
        let mapper = ScrollCoordinateMapper::new(&empty, Axis::Vertical);
        assert_eq!(mapper.index_from_pixel(100.0), 0);

        let zeros = GridLayout::from_sizes(vec![0.0; 1 << 16], vec![]);
        let mapper = ScrollCoordinateMapper::new(&zeros, Axis::Vertical);
        assert_eq!(mapper.index_from_pixel(0.0), 0);
        assert_eq!(mapper.index_from_pixel(1.0), (1 << 16) - 1);
    }

    #[test]
    fn scrollable_mapper_skips_fixed_region() {
        let mut layout = GridLayout::uniform(10, 10, 20.0, 80.0);
        layout.set_frozen(2, 1);
        let rows = ScrollCoordinateMapper::scrollable(&layout, Axis::Vertical);
        assert_eq!(rows.first(), 2);
        assert_eq!(rows.index_from_pixel(0.0), 2);
        assert_eq!(rows.index_from_pixel(20.0), 3);
        assert_eq!(rows.extent(), 160.0);
    }

    #[test]
    fn scroll_by_delta_uses_adjacent_size() {
        let layout = sample();
        let mapper = ScrollCoordinateMapper::new(&layout, Axis::Vertical);
        // At row 1's top edge, scrolling down steps by row 1's height
        assert_eq!(mapper.scroll_by_delta(10.0, 1, 1000.0), 30.0);
        // Scrolling up steps by the row above
        assert_eq!(mapper.scroll_by_delta(30.0, -1, 1000.0), 10.0);
        assert_eq!(mapper.scroll_by_delta(10.0, -1, 1000.0), 0.0);
        // Clamped at both ends
        assert_eq!(mapper.scroll_by_delta(0.0, -3, 1000.0), 0.0);
        assert_eq!(mapper.scroll_by_delta(35.0, 2, 50.0), 50.0);
    }

    #[test]
    fn clamp_scroll_handles_bad_input() {
        assert_eq!(clamp_scroll(f64::NAN, 10.0), 0.0);
        assert_eq!(clamp_scroll(5.0, -1.0), 0.0);
        assert_eq!(clamp_scroll(5.0, f64::INFINITY), 0.0);
        assert_eq!(clamp_scroll(15.0, 10.0), 10.0);
    }
}
