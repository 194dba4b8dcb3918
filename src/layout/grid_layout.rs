//! Pre-computed layout data for a grid.
//!
//! Row heights and column widths are turned into cumulative edge positions
//! once, and updated in place when a size changes, so position lookups are
//! O(1) and pixel-to-index lookups are O(log n).

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{GridError, Result};
use crate::model::{Axis, GridMetrics, SpanSource};
use crate::types::Point;

/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: f64 = 64.0;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Pre-computed layout data for a grid
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge)
    col_positions: Vec<f64>,
    /// Cumulative row positions (`row_positions[i]` = y of row i's top edge)
    row_positions: Vec<f64>,
    /// Column widths (0 for hidden columns)
    col_widths: Vec<f64>,
    /// Row heights (0 for hidden rows)
    row_heights: Vec<f64>,
    /// Height given to rows added by [`set_shape`](Self::set_shape)
    default_row_height: f64,
    /// Width given to columns added by [`set_shape`](Self::set_shape)
    default_col_width: f64,
    /// Merge info lookup by (column, row)
    merges: HashMap<(i32, i32), MergeInfo>,
    /// Number of frozen rows (0 = no frozen rows)
    pub frozen_rows: i32,
    /// Number of frozen columns (0 = no frozen columns)
    pub frozen_cols: i32,
}

/// Information about a merged cell region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MergeInfo {
    /// True if this cell is the top-left origin of the merge
    is_origin: bool,
    /// Top-left cell of the merge
    origin: Point,
    /// Number of rows in the merge
    row_span: i32,
    /// Number of columns in the merge
    col_span: i32,
}

impl GridLayout {
    /// Uniform sizes, no merges, no frozen panes.
    ///
    /// The sizes also become the defaults for rows and columns added later.
    pub fn uniform(row_count: i32, column_count: i32, row_height: f64, col_width: f64) -> Self {
        let row_height = sanitize_size(row_height);
        let col_width = sanitize_size(col_width);
        let row_heights = vec![row_height; usize::try_from(row_count).unwrap_or(0)];
        let col_widths = vec![col_width; usize::try_from(column_count).unwrap_or(0)];
        GridLayout {
            col_positions: prefix_sums(&col_widths),
            row_positions: prefix_sums(&row_heights),
            col_widths,
            row_heights,
            default_row_height: row_height,
            default_col_width: col_width,
            merges: HashMap::new(),
            frozen_rows: 0,
            frozen_cols: 0,
        }
    }

    /// Build from explicit per-index sizes.
    pub fn from_sizes(row_heights: Vec<f64>, col_widths: Vec<f64>) -> Self {
        let row_heights: Vec<f64> = row_heights.into_iter().map(sanitize_size).collect();
        let col_widths: Vec<f64> = col_widths.into_iter().map(sanitize_size).collect();
        GridLayout {
            col_positions: prefix_sums(&col_widths),
            row_positions: prefix_sums(&row_heights),
            col_widths,
            row_heights,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_col_width: DEFAULT_COL_WIDTH,
            merges: HashMap::new(),
            frozen_rows: 0,
            frozen_cols: 0,
        }
    }

    /// Set the frozen row/column counts, clamped to the shape.
    pub fn set_frozen(&mut self, frozen_rows: i32, frozen_cols: i32) {
        self.frozen_rows = frozen_rows.clamp(0, self.count(Axis::Vertical));
        self.frozen_cols = frozen_cols.clamp(0, self.count(Axis::Horizontal));
    }

    /// Change one row height; later row positions shift.
    pub fn set_row_height(&mut self, row: i32, height: f64) {
        Self::set_size(&mut self.row_heights, &mut self.row_positions, row, height);
    }

    /// Change one column width; later column positions shift.
    pub fn set_col_width(&mut self, col: i32, width: f64) {
        Self::set_size(&mut self.col_widths, &mut self.col_positions, col, width);
    }

    /// Grow or shrink the grid. New rows/columns take the layout's default sizes.
    pub fn set_shape(&mut self, row_count: i32, column_count: i32) {
        let rows = usize::try_from(row_count).unwrap_or(0);
        let cols = usize::try_from(column_count).unwrap_or(0);
        self.row_heights.resize(rows, self.default_row_height);
        self.col_widths.resize(cols, self.default_col_width);
        self.row_positions = prefix_sums(&self.row_heights);
        self.col_positions = prefix_sums(&self.col_widths);
        self.merges.retain(|_, info| {
            info.origin.y.saturating_add(info.row_span) <= row_count
                && info.origin.x.saturating_add(info.col_span) <= column_count
        });
        self.set_frozen(self.frozen_rows, self.frozen_cols);
        debug!(row_count, column_count, "grid shape changed");
    }

    /// Register a merge covering `cols` x `rows` cells from `(x, y)`.
    ///
    /// # Errors
    /// Returns an error if the merge leaves the grid or overlaps an existing merge.
    pub fn add_merge(&mut self, x: i32, y: i32, cols: i32, rows: i32) -> Result<()> {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let column_count = self.count(Axis::Horizontal);
        let row_count = self.count(Axis::Vertical);
        if x < 0 || x.saturating_add(cols) > column_count {
            return Err(GridError::OutOfBounds {
                index: x.saturating_add(cols - 1),
                count: column_count,
            });
        }
        if y < 0 || y.saturating_add(rows) > row_count {
            return Err(GridError::OutOfBounds {
                index: y.saturating_add(rows - 1),
                count: row_count,
            });
        }
        for cy in y..y + rows {
            for cx in x..x + cols {
                if self.merges.contains_key(&(cx, cy)) {
                    return Err(GridError::OverlappingMerge { x: cx, y: cy });
                }
            }
        }
        self.insert_merge(x, y, (cols - 1).unsigned_abs(), (rows - 1).unsigned_abs());
        Ok(())
    }

    /// Remove the merge covering `(x, y)`. Returns false if there was none.
    pub fn remove_merge(&mut self, x: i32, y: i32) -> bool {
        let Some(info) = self.merges.get(&(x, y)).copied() else {
            return false;
        };
        let origin = info.origin;
        self.merges.retain(|_, other| other.origin != origin);
        true
    }

    fn positions(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Horizontal => &self.col_positions,
            Axis::Vertical => &self.row_positions,
        }
    }

    fn sizes(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Horizontal => &self.col_widths,
            Axis::Vertical => &self.row_heights,
        }
    }

    fn set_size(sizes: &mut [f64], positions: &mut [f64], index: i32, size: f64) {
        let Ok(i) = usize::try_from(index) else {
            return;
        };
        let size = sanitize_size(size);
        let Some(slot) = sizes.get_mut(i) else {
            return;
        };
        let delta = size - *slot;
        *slot = size;
        if let Some(tail) = positions.get_mut(i + 1..) {
            for pos in tail {
                *pos += delta;
            }
        }
    }

    fn insert_merge(&mut self, x: i32, y: i32, extra_cols: u32, extra_rows: u32) {
        let col_span = i32::try_from(extra_cols).unwrap_or(i32::MAX - 1) + 1;
        let row_span = i32::try_from(extra_rows).unwrap_or(i32::MAX - 1) + 1;
        let origin = Point::new(x, y);
        for cy in y..y.saturating_add(row_span) {
            for cx in x..x.saturating_add(col_span) {
                self.merges.insert(
                    (cx, cy),
                    MergeInfo {
                        is_origin: cx == x && cy == y,
                        origin,
                        row_span,
                        col_span,
                    },
                );
            }
        }
    }
}

impl GridMetrics for GridLayout {
    fn count(&self, axis: Axis) -> i32 {
        i32::try_from(self.sizes(axis).len()).unwrap_or(i32::MAX)
    }

    fn fixed_count(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.frozen_cols,
            Axis::Vertical => self.frozen_rows,
        }
    }

    fn size(&self, axis: Axis, index: i32) -> f64 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.sizes(axis).get(i))
            .copied()
            .unwrap_or(0.0)
    }

    fn cumulative_size(&self, axis: Axis, index: i32) -> f64 {
        let positions = self.positions(axis);
        let clamped = usize::try_from(index).unwrap_or(0);
        positions
            .get(clamped)
            .or_else(|| positions.last())
            .copied()
            .unwrap_or(0.0)
    }
}

impl SpanSource for GridLayout {
    fn is_span_covered(&self, x: i32, y: i32) -> bool {
        self.merges.get(&(x, y)).is_some_and(|m| !m.is_origin)
    }

    fn row_span_length(&self, x: i32, y: i32) -> i32 {
        match self.merges.get(&(x, y)) {
            Some(m) if m.is_origin => m.row_span,
            _ => 1,
        }
    }

    fn column_span_length(&self, x: i32, y: i32) -> i32 {
        match self.merges.get(&(x, y)) {
            Some(m) if m.is_origin => m.col_span,
            _ => 1,
        }
    }

    fn span_origin(&self, x: i32, y: i32) -> Option<Point> {
        self.merges
            .get(&(x, y))
            .filter(|m| !m.is_origin)
            .map(|m| m.origin)
    }

    fn has_spans(&self) -> bool {
        !self.merges.is_empty()
    }
}

fn sanitize_size(size: f64) -> f64 {
    if size.is_finite() && size >= 0.0 {
        size
    } else {
        warn!(size, "invalid row/column size, using 0");
        0.0
    }
}

fn prefix_sums(sizes: &[f64]) -> Vec<f64> {
    let mut positions = Vec::with_capacity(sizes.len() + 1);
    let mut edge = 0.0;
    for size in sizes {
        positions.push(edge);
        edge += size;
    }
    positions.push(edge); // Final edge
    positions
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

    fn extent(layout: &GridLayout, axis: Axis) -> f64 {
        layout.cumulative_size(axis, layout.count(axis))
    }

    #[test]
    fn test_basic_layout() {
        let layout =
            GridLayout::from_sizes(vec![DEFAULT_ROW_HEIGHT; 10], vec![DEFAULT_COL_WIDTH; 5]);
        assert_eq!(layout.row_count(), 10);
        assert_eq!(layout.column_count(), 5);
        assert_eq!(extent(&layout, Axis::Horizontal), DEFAULT_COL_WIDTH * 5.0);
        assert_eq!(extent(&layout, Axis::Vertical), DEFAULT_ROW_HEIGHT * 10.0);
    }

    #[test]
    fn test_cumulative_size_is_leading_edge() {
        let layout = GridLayout::from_sizes(vec![10.0, 20.0, 5.0, 40.0], vec![]);
        let edges: Vec<f64> = (0..=4)
            .map(|i| layout.cumulative_size(Axis::Vertical, i))
            .collect();
        assert_eq!(edges, vec![0.0, 10.0, 30.0, 35.0, 75.0]);
        assert_eq!(layout.cumulative_size(Axis::Vertical, 99), 75.0);
        assert_eq!(layout.cumulative_size(Axis::Vertical, -3), 0.0);
        assert_eq!(layout.size(Axis::Vertical, 3), 40.0);
        assert_eq!(layout.size(Axis::Vertical, 4), 0.0);
    }

    #[test]
    fn test_hidden_and_custom_sizes() {
        let mut layout = GridLayout::uniform(2, 4, 20.0, 64.0);
        layout.set_col_width(1, 100.0);
        layout.set_col_width(2, 0.0);
        assert_eq!(layout.size(Axis::Horizontal, 1), 100.0);
        assert_eq!(layout.size(Axis::Horizontal, 2), 0.0);
        assert_eq!(extent(&layout, Axis::Horizontal), 64.0 * 2.0 + 100.0);
    }

    #[test]
    fn test_resize_shifts_positions() {
        let mut layout = GridLayout::uniform(5, 5, 20.0, 80.0);
        layout.set_row_height(1, 50.0);
        assert_eq!(layout.cumulative_size(Axis::Vertical, 1), 20.0);
        assert_eq!(layout.cumulative_size(Axis::Vertical, 2), 70.0);
        assert_eq!(extent(&layout, Axis::Vertical), 130.0);

        layout.set_col_width(0, f64::NAN);
        assert_eq!(layout.size(Axis::Horizontal, 0), 0.0);
        assert_eq!(extent(&layout, Axis::Horizontal), 320.0);
    }

    #[test]
    fn test_growing_shape_uses_layout_defaults() {
        let mut layout = GridLayout::uniform(10, 10, 30.0, 100.0);
        layout.set_shape(20, 20);
        assert_eq!(layout.size(Axis::Vertical, 15), 30.0);
        assert_eq!(layout.size(Axis::Horizontal, 15), 100.0);
        assert_eq!(extent(&layout, Axis::Vertical), 600.0);

        // Explicit per-index sizes fall back to the constants
        let mut layout = GridLayout::from_sizes(vec![5.0], vec![5.0]);
        layout.set_shape(2, 2);
        assert_eq!(layout.size(Axis::Vertical, 1), DEFAULT_ROW_HEIGHT);
        assert_eq!(layout.size(Axis::Horizontal, 1), DEFAULT_COL_WIDTH);
    }

    #[test]
    fn test_merged_cells() {
        // Merge A1:B2 (cols 0-1, rows 0-1)
        let mut layout = GridLayout::uniform(10, 5, 20.0, 64.0);
        layout.add_merge(0, 0, 2, 2).unwrap();
        assert!(!layout.is_span_covered(0, 0));
        assert_eq!(layout.row_span_length(0, 0), 2);
        assert_eq!(layout.column_span_length(0, 0), 2);
        assert!(layout.is_span_covered(1, 0));
        assert!(layout.is_span_covered(1, 1));
        assert_eq!(layout.span_origin(1, 1), Some(Point::new(0, 0)));
        assert_eq!(layout.row_span_length(1, 1), 1);
        assert!(!layout.is_span_covered(2, 0));
    }

    #[test]
    fn test_add_merge_rejects_overlap_and_out_of_bounds() {
        let mut layout = GridLayout::uniform(10, 5, 20.0, 64.0);
        layout.add_merge(1, 1, 2, 2).unwrap();
        assert!(matches!(
            layout.add_merge(2, 2, 2, 2),
            Err(GridError::OverlappingMerge { x: 2, y: 2 })
        ));
        assert!(matches!(
            layout.add_merge(4, 0, 2, 1),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(layout.remove_merge(2, 2));
        assert!(!layout.has_spans());
    }

    #[test]
    fn test_shrinking_shape_drops_merges() {
        let mut layout = GridLayout::uniform(10, 5, 20.0, 64.0);
        layout.add_merge(0, 8, 2, 2).unwrap();
        layout.set_frozen(2, 9);
        assert_eq!(layout.frozen_cols, 5);
        layout.set_shape(8, 5);
        assert!(!layout.has_spans());
        assert_eq!(layout.row_count(), 8);
    }
}
