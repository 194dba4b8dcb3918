//! Viewport state management for scrolling.
//!
//! Scroll values live in the scrollable region: 0 means the first non-fixed
//! row/column sits right after the frozen panes. Frozen rows and columns
//! render at fixed screen positions and are never scrolled.

use tracing::trace;

use super::mapper::{clamp_scroll, ScrollCoordinateMapper};
use crate::events::{ListenerId, Listeners, ScrollChanged};
use crate::model::{Axis, GridMetrics};
use crate::types::Point;

/// Scroll position and range along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisScroll {
    /// Current scroll offset in pixels
    pub value: f64,
    /// Offset before the most recent change
    pub previous: f64,
    /// Largest allowed offset
    pub max: f64,
}

/// Viewport state - the visible window onto the grid
#[derive(Debug)]
pub struct ViewportState {
    horizontal: AxisScroll,
    vertical: AxisScroll,
    /// Viewport width in pixels, frozen columns included
    pub width: f64,
    /// Viewport height in pixels, frozen rows included
    pub height: f64,
    listeners: Listeners<ScrollChanged>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl ViewportState {
    /// Create a viewport scrolled to the origin
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            horizontal: AxisScroll::default(),
            vertical: AxisScroll::default(),
            width: width.max(0.0),
            height: height.max(0.0),
            listeners: Listeners::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ScrollChanged) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn axis(&self, axis: Axis) -> &AxisScroll {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisScroll {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    pub fn scroll_value(&self, axis: Axis) -> f64 {
        self.axis(axis).value
    }

    pub fn previous_scroll_value(&self, axis: Axis) -> f64 {
        self.axis(axis).previous
    }

    pub fn max_scroll(&self, axis: Axis) -> f64 {
        self.axis(axis).max
    }

    /// Viewport size along `axis`, frozen region included.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Pixels available to scrolling cells along `axis`.
    pub fn scrollable_extent<M: GridMetrics + ?Sized>(&self, metrics: &M, axis: Axis) -> f64 {
        let fixed = metrics.cumulative_size(axis, metrics.fixed_count(axis));
        (self.extent(axis) - fixed).max(0.0)
    }

    /// Set an absolute scroll value, clamped to `[0, max]`.
    ///
    /// Fires a scroll-changed notification when the value actually moves.
    /// Returns the applied value.
    pub fn set_scroll_value(&mut self, axis: Axis, value: f64) -> f64 {
        let state = self.axis_mut(axis);
        let old = state.value;
        let new = clamp_scroll(value, state.max);
        if (new - old).abs() <= f64::EPSILON {
            return old;
        }
        state.previous = old;
        state.value = new;
        trace!(?axis, old, new, "scroll changed");
        self.listeners.emit(&ScrollChanged {
            axis,
            old_value: old,
            new_value: new,
        });
        new
    }

    /// Recompute both scroll ranges from the current shape and sizes, then
    /// re-clamp the current values.
    pub fn update_range<M: GridMetrics + ?Sized>(&mut self, metrics: &M) {
        for axis in Axis::ALL {
            let content = ScrollCoordinateMapper::scrollable(metrics, axis).extent();
            let visible = self.scrollable_extent(metrics, axis);
            self.axis_mut(axis).max = (content - visible).max(0.0);
            let current = self.scroll_value(axis);
            self.set_scroll_value(axis, current);
        }
    }

    /// Resize the viewport. Callers follow up with [`update_range`](Self::update_range).
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// First and last scrollable index at least partly visible along `axis`.
    pub fn visible_range<M: GridMetrics + ?Sized>(&self, metrics: &M, axis: Axis) -> (i32, i32) {
        let mapper = ScrollCoordinateMapper::scrollable(metrics, axis);
        let start = self.scroll_value(axis);
        let end = start + self.scrollable_extent(metrics, axis);
        let first = mapper.index_containing(start);
        // The cell ending exactly at the edge is the last visible one. Past
        // the content the lookup clamps, so the last index is taken as is.
        let last = if end >= mapper.extent() {
            mapper.end() - 1
        } else {
            mapper.index_from_pixel(end) - 1
        };
        (first, last.max(first))
    }

    /// Screen position of a cell's top-left corner, accounting for frozen panes.
    ///
    /// Cells in frozen rows/cols render at their natural layout position;
    /// scrollable cells render after the frozen region, shifted by scroll.
    pub fn to_screen<M: GridMetrics + ?Sized>(
        &self,
        metrics: &M,
        column: i32,
        row: i32,
    ) -> (f64, f64) {
        (
            self.screen_offset(metrics, Axis::Horizontal, column),
            self.screen_offset(metrics, Axis::Vertical, row),
        )
    }

    /// Cell under a screen position, or `None` outside the grid.
    pub fn cell_at<M: GridMetrics + ?Sized>(
        &self,
        metrics: &M,
        screen_x: f64,
        screen_y: f64,
    ) -> Option<Point> {
        let x = self.index_at(metrics, Axis::Horizontal, screen_x)?;
        let y = self.index_at(metrics, Axis::Vertical, screen_y)?;
        Some(Point::new(x, y))
    }

    fn screen_offset<M: GridMetrics + ?Sized>(&self, metrics: &M, axis: Axis, index: i32) -> f64 {
        let fixed_count = metrics.fixed_count(axis);
        let edge = metrics.cumulative_size(axis, index);
        if index < fixed_count {
            edge
        } else {
            let fixed = metrics.cumulative_size(axis, fixed_count);
            fixed + (edge - fixed) - self.scroll_value(axis)
        }
    }

    fn index_at<M: GridMetrics + ?Sized>(
        &self,
        metrics: &M,
        axis: Axis,
        screen: f64,
    ) -> Option<i32> {
        if screen < 0.0 || screen >= self.extent(axis) || metrics.count(axis) <= 0 {
            return None;
        }
        let fixed = metrics.cumulative_size(axis, metrics.fixed_count(axis));
        if screen < fixed {
            return Some(ScrollCoordinateMapper::new(metrics, axis).index_containing(screen));
        }
        let mapper = ScrollCoordinateMapper::scrollable(metrics, axis);
        let pixel = screen - fixed + self.scroll_value(axis);
        if pixel >= mapper.extent() {
            return None;
        }
        Some(mapper.index_containing(pixel))
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
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn update_range_accounts_for_frozen_panes() {
        let mut layout = GridLayout::uniform(100, 20, 20.0, 80.0);
        layout.set_frozen(2, 1);
        let mut viewport = ViewportState::new(800.0, 600.0);
        viewport.update_range(&layout);
        // 98 scrollable rows (1960px) in 560px of scrollable height
        assert_eq!(viewport.max_scroll(Axis::Vertical), 1400.0);
        // 19 scrollable columns (1520px) in 720px of scrollable width
        assert_eq!(viewport.max_scroll(Axis::Horizontal), 800.0);
    }

    #[test]
    fn set_scroll_value_clamps_and_notifies() {
        let layout = GridLayout::uniform(100, 5, 20.0, 80.0);
        let mut viewport = ViewportState::new(400.0, 200.0);
        viewport.update_range(&layout);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        viewport.subscribe(move |e: &ScrollChanged| sink.borrow_mut().push(*e));

        assert_eq!(viewport.set_scroll_value(Axis::Vertical, 5000.0), 1800.0);
        assert_eq!(viewport.previous_scroll_value(Axis::Vertical), 0.0);
        // No-op changes do not notify
        viewport.set_scroll_value(Axis::Vertical, 1800.0);
        viewport.set_scroll_value(Axis::Horizontal, -10.0);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].axis, Axis::Vertical);
        assert_eq!(events[0].old_value, 0.0);
        assert_eq!(events[0].new_value, 1800.0);
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut layout = GridLayout::uniform(100, 5, 20.0, 80.0);
        let mut viewport = ViewportState::new(400.0, 200.0);
        viewport.update_range(&layout);
        viewport.set_scroll_value(Axis::Vertical, 1000.0);

        layout.set_shape(20, 5);
        viewport.update_range(&layout);
        assert_eq!(viewport.max_scroll(Axis::Vertical), 200.0);
        assert_eq!(viewport.scroll_value(Axis::Vertical), 200.0);
    }

    #[test]
    fn visible_range_and_hit_testing() {
        let mut layout = GridLayout::uniform(100, 20, 20.0, 80.0);
        layout.set_frozen(1, 1);
        let mut viewport = ViewportState::new(400.0, 200.0);
        viewport.update_range(&layout);
        viewport.set_scroll_value(Axis::Vertical, 50.0);

        // Scrollable height 180px from pixel 50: rows 1+2 .. partially 1+11
        assert_eq!(viewport.visible_range(&layout, Axis::Vertical), (3, 12));

        // Frozen row stays put, scrollable rows shift up by the scroll value
        assert_eq!(viewport.to_screen(&layout, 0, 0), (0.0, 0.0));
        assert_eq!(viewport.to_screen(&layout, 1, 3), (80.0, 20.0 + 40.0 - 50.0));

        assert_eq!(viewport.cell_at(&layout, 10.0, 10.0), Some(Point::new(0, 0)));
        assert_eq!(viewport.cell_at(&layout, 90.0, 25.0), Some(Point::new(1, 3)));
        assert_eq!(viewport.cell_at(&layout, 90.0, 500.0), None);
    }

    #[test]
    fn visible_range_reaches_last_index_at_end_of_axis() {
        let layout = GridLayout::uniform(20, 5, 20.0, 80.0);
        let mut viewport = ViewportState::new(400.0, 200.0);
        viewport.update_range(&layout);
        viewport.set_scroll_value(Axis::Vertical, 1000.0);
        assert_eq!(viewport.visible_range(&layout, Axis::Vertical), (10, 19));
        // Five columns of 80px fill the 400px width exactly
        assert_eq!(viewport.visible_range(&layout, Axis::Horizontal), (0, 4));

        let short = GridLayout::uniform(5, 2, 20.0, 80.0);
        let mut viewport = ViewportState::new(400.0, 600.0);
        viewport.update_range(&short);
        assert_eq!(viewport.visible_range(&short, Axis::Vertical), (0, 4));
        assert_eq!(viewport.visible_range(&short, Axis::Horizontal), (0, 1));
    }
}
