//! Scroll-to-visible and page stepping.

use tracing::debug;

use super::mapper::{clamp_scroll, ScrollCoordinateMapper};
use super::viewport::ViewportState;
use crate::model::{Axis, GridMetrics};

/// Extra pixels added when scrolling down to reveal a row, so the row is not
/// clipped by the horizontal scrollbar.
pub const DEFAULT_VERTICAL_SLACK: f64 = 20.0;

/// Scroll policy on top of a [`ViewportState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportScroller {
    /// Thickness of the line drawn between cells, counted once per cell
    pub grid_line_width: f64,
    /// Slack added when scrolling down to a row
    pub vertical_slack: f64,
}

impl Default for ViewportScroller {
    fn default() -> Self {
        Self {
            grid_line_width: 0.0,
            vertical_slack: DEFAULT_VERTICAL_SLACK,
        }
    }
}

impl ViewportScroller {
    pub fn new(grid_line_width: f64, vertical_slack: f64) -> Self {
        Self {
            grid_line_width: grid_line_width.max(0.0),
            vertical_slack: vertical_slack.max(0.0),
        }
    }

    /// Scroll the minimum needed to show `(column, row)` in full.
    ///
    /// Targets in the frozen region are always visible and never scroll.
    /// Returns the resulting `(horizontal, vertical)` scroll values.
    pub fn scroll_to_make_visible<M: GridMetrics + ?Sized>(
        &self,
        viewport: &mut ViewportState,
        metrics: &M,
        column: i32,
        row: i32,
    ) -> (f64, f64) {
        for (axis, target) in [(Axis::Horizontal, column), (Axis::Vertical, row)] {
            if let Some(value) = self.offset_to_show(viewport, metrics, axis, target) {
                debug!(?axis, target, value, "scrolling to make visible");
                viewport.set_scroll_value(axis, value);
            }
        }
        (
            viewport.scroll_value(Axis::Horizontal),
            viewport.scroll_value(Axis::Vertical),
        )
    }

    /// Scroll value that brings `target` fully into view, or `None` if it is
    /// already visible (or frozen).
    pub fn offset_to_show<M: GridMetrics + ?Sized>(
        &self,
        viewport: &ViewportState,
        metrics: &M,
        axis: Axis,
        target: i32,
    ) -> Option<f64> {
        let mapper = ScrollCoordinateMapper::scrollable(metrics, axis);
        if target < mapper.first() || mapper.end() <= mapper.first() {
            return None;
        }
        let target = target.min(mapper.end() - 1);
        let old = viewport.scroll_value(axis);
        let view = viewport.scrollable_extent(metrics, axis);

        // First index whose leading edge is inside the window.
        let left = mapper.index_from_pixel(old);
        // First index that does not fit entirely inside the window.
        let right = if mapper.extent() <= old + view {
            mapper.end()
        } else {
            mapper.index_containing(old + view)
        };

        let new = if target < left {
            let cells = f64::from(left - target);
            let span = mapper.pixel_from_index(left) - mapper.pixel_from_index(target);
            let new = old - (span + cells * self.grid_line_width);
            // Avoid leaving a residual scroll smaller than the first cell.
            if new <= mapper.size(mapper.first()) {
                0.0
            } else {
                new
            }
        } else if target >= right {
            let cells = f64::from(target - right + 1);
            let span = mapper.pixel_from_index(target + 1) - mapper.pixel_from_index(right);
            let hidden_part = old + view - mapper.pixel_from_index(right);
            let slack = match axis {
                Axis::Vertical => self.vertical_slack,
                Axis::Horizontal => 0.0,
            };
            old + span + cells * self.grid_line_width - hidden_part + slack
        } else {
            return None;
        };

        Some(clamp_scroll(new, viewport.max_scroll(axis)))
    }

    pub fn page_down<M: GridMetrics + ?Sized>(
        &self,
        viewport: &mut ViewportState,
        metrics: &M,
    ) -> f64 {
        Self::page(viewport, metrics, Axis::Vertical, 1.0)
    }

    pub fn page_up<M: GridMetrics + ?Sized>(
        &self,
        viewport: &mut ViewportState,
        metrics: &M,
    ) -> f64 {
        Self::page(viewport, metrics, Axis::Vertical, -1.0)
    }

    pub fn page_right<M: GridMetrics + ?Sized>(
        &self,
        viewport: &mut ViewportState,
        metrics: &M,
    ) -> f64 {
        Self::page(viewport, metrics, Axis::Horizontal, 1.0)
    }

    pub fn page_left<M: GridMetrics + ?Sized>(
        &self,
        viewport: &mut ViewportState,
        metrics: &M,
    ) -> f64 {
        Self::page(viewport, metrics, Axis::Horizontal, -1.0)
    }

    /// Move by one scrollable viewport extent in `direction` (+1 or -1).
    fn page<M: GridMetrics + ?Sized>(
        viewport: &mut ViewportState,
        metrics: &M,
        axis: Axis,
        direction: f64,
    ) -> f64 {
        let step = viewport.scrollable_extent(metrics, axis);
        let target = viewport.scroll_value(axis) + direction * step;
        viewport.set_scroll_value(axis, target)
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

    fn setup(width: f64, height: f64) -> (GridLayout, ViewportState) {
        let layout = GridLayout::uniform(100, 50, 20.0, 80.0);
        let mut viewport = ViewportState::new(width, height);
        viewport.update_range(&layout);
        (layout, viewport)
    }

    #[test]
    fn visible_target_is_noop() {
        let (layout, mut viewport) = setup(400.0, 200.0);
        let scroller = ViewportScroller::default();
        assert_eq!(scroller.offset_to_show(&viewport, &layout, Axis::Vertical, 5), None);
        assert_eq!(scroller.offset_to_show(&viewport, &layout, Axis::Horizontal, 4), None);
        assert_eq!(
            scroller.scroll_to_make_visible(&mut viewport, &layout, 4, 9),
            (0.0, 0.0)
        );
    }

    #[test]
    fn scrolling_down_adds_slack_but_right_does_not() {
        let (layout, mut viewport) = setup(400.0, 200.0);
        let scroller = ViewportScroller::default();
        // Row 20 ends at 420; 200px window, +20 slack
        let (x, y) = scroller.scroll_to_make_visible(&mut viewport, &layout, 7, 20);
        assert_eq!(y, 420.0 - 200.0 + 20.0);
        // Column 7 ends at 640; 400px window, no slack
        assert_eq!(x, 640.0 - 400.0);
    }

    #[test]
    fn partially_visible_right_edge_scrolls_in() {
        let (layout, mut viewport) = setup(360.0, 200.0);
        let scroller = ViewportScroller::default();
        // Column 4 spans 320..400 and is cut off at 360
        let value = scroller.offset_to_show(&viewport, &layout, Axis::Horizontal, 4);
        assert_eq!(value, Some(40.0));
        scroller.scroll_to_make_visible(&mut viewport, &layout, 4, 0);
        assert_eq!(viewport.scroll_value(Axis::Horizontal), 40.0);
    }

    #[test]
    fn scrolling_back_left_and_up() {
        let (layout, mut viewport) = setup(400.0, 200.0);
        let scroller = ViewportScroller::new(1.0, 20.0);
        viewport.set_scroll_value(Axis::Horizontal, 800.0);
        viewport.set_scroll_value(Axis::Vertical, 600.0);

        // Column 6 starts at 480: 4 columns of 80 + 1px line each back from column 10
        let (x, y) = scroller.scroll_to_make_visible(&mut viewport, &layout, 6, 25);
        assert_eq!(x, 800.0 - 4.0 * 81.0);
        // Row 25 starts at 500: 5 rows of 21px back from row 30
        assert_eq!(y, 600.0 - 5.0 * 21.0);
    }

    #[test]
    fn small_residual_snaps_to_zero() {
        let (layout, mut viewport) = setup(400.0, 200.0);
        let scroller = ViewportScroller::default();
        viewport.set_scroll_value(Axis::Horizontal, 160.0);
        // Column 1 starts at 80, which is within the first column's width
        scroller.scroll_to_make_visible(&mut viewport, &layout, 1, 0);
        assert_eq!(viewport.scroll_value(Axis::Horizontal), 0.0);
    }

    #[test]
    fn frozen_targets_never_scroll() {
        let (mut layout, mut viewport) = setup(400.0, 200.0);
        layout.set_frozen(3, 2);
        viewport.update_range(&layout);
        viewport.set_scroll_value(Axis::Vertical, 300.0);
        let scroller = ViewportScroller::default();
        assert_eq!(scroller.offset_to_show(&viewport, &layout, Axis::Vertical, 2), None);
        assert_eq!(scroller.offset_to_show(&viewport, &layout, Axis::Horizontal, 0), None);
        scroller.scroll_to_make_visible(&mut viewport, &layout, 1, 1);
        assert_eq!(viewport.scroll_value(Axis::Vertical), 300.0);
    }

    #[test]
    fn paging_moves_one_viewport() {
        let (mut layout, mut viewport) = setup(400.0, 200.0);
        layout.set_frozen(1, 1);
        viewport.update_range(&layout);
        let scroller = ViewportScroller::default();
        assert_eq!(scroller.page_down(&mut viewport, &layout), 180.0);
        assert_eq!(scroller.page_down(&mut viewport, &layout), 360.0);
        assert_eq!(scroller.page_up(&mut viewport, &layout), 180.0);
        assert_eq!(scroller.page_right(&mut viewport, &layout), 320.0);
        assert_eq!(scroller.page_left(&mut viewport, &layout), 0.0);
        assert_eq!(scroller.page_left(&mut viewport, &layout), 0.0);
    }
}
