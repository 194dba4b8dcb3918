//! Expands candidate selections so they never split a merged cell.

use tracing::trace;

use crate::model::SpanSource;
use crate::types::{Point, Rectangle};

/// Grows a rectangle edge by edge until no merge crosses its boundary.
///
/// Works in all four drag directions: the rectangle is normalized to
/// `x1 <= x2, y1 <= y2`, expanded, and then the drag direction is
/// restored so the anchor stays on the side the user started from.
#[derive(Debug)]
pub struct SpanNormalizer<'a, S: SpanSource + ?Sized> {
    spans: &'a S,
}

impl<'a, S: SpanSource + ?Sized> SpanNormalizer<'a, S> {
    pub fn new(spans: &'a S) -> Self {
        Self { spans }
    }

    /// Normalize `(ox, oy, ex, ey)` and return the adjusted `(ox, oy, ex, ey)`.
    pub fn normalize(&self, ox: i32, oy: i32, ex: i32, ey: i32) -> (i32, i32, i32, i32) {
        if !self.spans.has_spans() {
            return (ox, oy, ex, ey);
        }

        let x_swapped = ex < 0;
        let y_swapped = ey < 0;
        let cx = ox.saturating_add(ex);
        let cy = oy.saturating_add(ey);
        let (mut x1, mut x2) = (ox.min(cx), ox.max(cx));
        let (mut y1, mut y2) = (oy.min(cy), oy.max(cy));

        // Growing one edge can pull a new merge across another edge, so
        // repeat until all four edges are stable.
        loop {
            let before = (x1, y1, x2, y2);
            y1 = self.expand_top(x1, x2, y1);
            y2 = self.expand_bottom(x1, x2, y2);
            x1 = self.expand_left(y1, y2, x1);
            x2 = self.expand_right(y1, y2, x2);
            if before == (x1, y1, x2, y2) {
                break;
            }
        }

        let (ox, ex) = if x_swapped {
            (x2, x1 - x2)
        } else {
            (x1, x2 - x1)
        };
        let (oy, ey) = if y_swapped {
            (y2, y1 - y2)
        } else {
            (y1, y2 - y1)
        };
        trace!(ox, oy, ex, ey, "normalized selection for spans");
        (ox, oy, ex, ey)
    }

    /// Normalize a rectangle, keeping its recorded anchor.
    pub fn normalize_rect(&self, rect: &Rectangle) -> Rectangle {
        let (ox, oy, ex, ey) =
            self.normalize(rect.origin.x, rect.origin.y, rect.extent.x, rect.extent.y);
        Rectangle::with_anchor(ox, oy, ex, ey, rect.first_selected_cell)
    }

    fn expand_top(&self, x1: i32, x2: i32, mut y: i32) -> i32 {
        loop {
            let next = (x1..=x2)
                .filter(|&x| self.spans.is_span_covered(x, y))
                .map(|x| self.owner(x, y).y)
                .fold(y, i32::min)
                .max(0);
            if next >= y {
                return y;
            }
            y = next;
        }
    }

    fn expand_bottom(&self, x1: i32, x2: i32, mut y: i32) -> i32 {
        loop {
            let next = (x1..=x2)
                .map(|x| {
                    let owner = self.owner(x, y);
                    let rows = self.spans.row_span_length(owner.x, owner.y).max(1);
                    owner.y.saturating_add(rows - 1)
                })
                .fold(y, i32::max);
            if next <= y {
                return y;
            }
            y = next;
        }
    }

    fn expand_left(&self, y1: i32, y2: i32, mut x: i32) -> i32 {
        loop {
            let next = (y1..=y2)
                .filter(|&y| self.spans.is_span_covered(x, y))
                .map(|y| self.owner(x, y).x)
                .fold(x, i32::min)
                .max(0);
            if next >= x {
                return x;
            }
            x = next;
        }
    }

    fn expand_right(&self, y1: i32, y2: i32, mut x: i32) -> i32 {
        loop {
            let next = (y1..=y2)
                .map(|y| {
                    let owner = self.owner(x, y);
                    let cols = self.spans.column_span_length(owner.x, owner.y).max(1);
                    owner.x.saturating_add(cols - 1)
                })
                .fold(x, i32::max);
            if next <= x {
                return x;
            }
            x = next;
        }
    }

    /// Cell that owns the span at `(x, y)`; a cell with no span owns itself.
    fn owner(&self, x: i32, y: i32) -> Point {
        if self.spans.is_span_covered(x, y) {
            self.spans
                .span_origin(x, y)
                .unwrap_or_else(|| Point::new(x, y))
        } else {
            Point::new(x, y)
        }
    }
}
