//! Collaborator traits for the surrounding data layer.
//!
//! The selection and scrolling engine never owns row heights, column widths
//! or merge metadata. It queries them through these traits on every call, so
//! sizes may change between calls (resize, reorder, reload).

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Columns, scrolled left/right.
    Horizontal,
    /// Rows, scrolled up/down.
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];
}

/// Shape and size accessors for a grid.
pub trait GridMetrics {
    /// Number of rows (vertical) or columns (horizontal).
    fn count(&self, axis: Axis) -> i32;

    /// Number of leading rows/columns that never scroll.
    fn fixed_count(&self, axis: Axis) -> i32;

    /// Size in pixels of a single row/column. Out-of-range indices report 0.
    fn size(&self, axis: Axis, index: i32) -> f64;

    /// Leading edge of `index`: the sum of sizes of `[0, index)`.
    ///
    /// Must be monotonic in `index`; `cumulative_size(axis, count)` is the
    /// total extent of the axis.
    fn cumulative_size(&self, axis: Axis, index: i32) -> f64;

    fn row_count(&self) -> i32 {
        self.count(Axis::Vertical)
    }

    fn column_count(&self) -> i32 {
        self.count(Axis::Horizontal)
    }

    fn fixed_row_count(&self) -> i32 {
        self.fixed_count(Axis::Vertical)
    }

    fn fixed_column_count(&self) -> i32 {
        self.fixed_count(Axis::Horizontal)
    }
}

/// Merged-cell metadata.
///
/// A covered cell is any cell of a merge other than its origin (top-left).
/// Span lengths are reported by the origin cell; every other cell reports 1.
pub trait SpanSource {
    /// True if `(x, y)` is hidden under a span owned by another cell.
    fn is_span_covered(&self, x: i32, y: i32) -> bool;

    /// Number of rows spanned by the cell at `(x, y)` (at least 1).
    fn row_span_length(&self, x: i32, y: i32) -> i32;

    /// Number of columns spanned by the cell at `(x, y)` (at least 1).
    fn column_span_length(&self, x: i32, y: i32) -> i32;

    /// Origin of the span covering `(x, y)`, if the cell is covered.
    fn span_origin(&self, x: i32, y: i32) -> Option<Point>;

    /// Cheap shortcut: `false` means no cell has a span and normalization
    /// can be skipped entirely.
    fn has_spans(&self) -> bool {
        true
    }
}

/// Everything the engine needs from the data layer.
pub trait GridModel: GridMetrics + SpanSource {}

impl<T: GridMetrics + SpanSource> GridModel for T {}

/// A model with no spans, for callers that only need metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpans;

impl SpanSource for NoSpans {
    fn is_span_covered(&self, _x: i32, _y: i32) -> bool {
        false
    }

    fn row_span_length(&self, _x: i32, _y: i32) -> i32 {
        1
    }

    fn column_span_length(&self, _x: i32, _y: i32) -> i32 {
        1
    }

    fn span_origin(&self, _x: i32, _y: i32) -> Option<Point> {
        None
    }

    fn has_spans(&self) -> bool {
        false
    }
}
