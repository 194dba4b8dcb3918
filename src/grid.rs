//! The grid: one model, one selection store, one viewport.
//!
//! [`Grid`] is the composition root. It owns the data model and the two
//! pieces of interaction state, and exposes thin delegating operations plus
//! the gestures that need both at once (keyboard extension, drag-select,
//! autoscroll). Every operation runs to completion before returning, and
//! listeners have already run by then.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cell_ref::format_range;
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::events::{ListenerId, ScrollChanged, SelectionChanged};
use crate::layout::{ScrollCoordinateMapper, ViewportScroller, ViewportState};
use crate::model::{Axis, GridModel};
use crate::selection::SelectionStore;
use crate::types::{Point, Rectangle, SelectionType};

/// Direction an autoscroll tick moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoscrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl AutoscrollDirection {
    pub fn axis(self) -> Axis {
        match self {
            AutoscrollDirection::Up | AutoscrollDirection::Down => Axis::Vertical,
            AutoscrollDirection::Left | AutoscrollDirection::Right => Axis::Horizontal,
        }
    }

    /// Cells moved per tick: -1 toward the origin, +1 away from it.
    pub fn delta(self) -> i32 {
        match self {
            AutoscrollDirection::Up | AutoscrollDirection::Left => -1,
            AutoscrollDirection::Down | AutoscrollDirection::Right => 1,
        }
    }
}

/// An in-progress drag-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Cell the drag started on
    pub anchor: Point,
    /// Cell currently under the pointer, clamped to the grid
    pub corner: Point,
}

/// Serializable view of the selection and scroll state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub selections: Vec<Rectangle>,
    /// The selections as A1 ranges, anchor first
    pub ranges: Vec<String>,
    pub selection_types: Vec<SelectionType>,
    pub selected_rows: Vec<i32>,
    pub selected_columns: Vec<i32>,
    pub all_rows_selected: bool,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub max_scroll_left: f64,
    pub max_scroll_top: f64,
}

/// A virtualized grid over model `M`.
#[derive(Debug)]
pub struct Grid<M: GridModel> {
    model: M,
    selection: SelectionStore,
    viewport: ViewportState,
    scroller: ViewportScroller,
    config: GridConfig,
    drag: Option<DragState>,
    autoscroll: Option<AutoscrollDirection>,
}

impl<M: GridModel> Grid<M> {
    pub fn new(model: M, config: GridConfig) -> Self {
        let mut viewport = ViewportState::new(config.viewport_width, config.viewport_height);
        viewport.update_range(&model);
        Self {
            model,
            selection: SelectionStore::new(config.multi_select),
            viewport,
            scroller: ViewportScroller::new(config.grid_line_width, config.vertical_scroll_slack),
            config,
            drag: None,
            autoscroll: None,
        }
    }

    pub fn with_defaults(model: M) -> Self {
        Self::new(model, GridConfig::default())
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model. Call [`model_changed`](Self::model_changed)
    /// after changing shape or sizes.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn set_multi_select(&mut self, multi_select: bool) {
        self.config.multi_select = multi_select;
        self.selection.set_multi_select(multi_select);
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn on_selection_changed(
        &mut self,
        listener: impl FnMut(&SelectionChanged) + 'static,
    ) -> ListenerId {
        self.selection.subscribe(listener)
    }

    pub fn on_scroll_changed(
        &mut self,
        listener: impl FnMut(&ScrollChanged) + 'static,
    ) -> ListenerId {
        self.viewport.subscribe(listener)
    }

    /// Remove a selection or scroll listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.selection.unsubscribe(id) || self.viewport.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select the rectangle from `(ox, oy)` spanning `(ex, ey)`.
    ///
    /// # Errors
    /// Returns `GridError::NegativeOrigin` for a negative origin; nothing changes.
    pub fn select(&mut self, ox: i32, oy: i32, ex: i32, ey: i32) -> Result<()> {
        check_origin(ox, oy)?;
        self.selection.select(&self.model, ox, oy, ex, ey);
        Ok(())
    }

    /// Like [`select`](Self::select), without notifying listeners.
    ///
    /// # Errors
    /// Returns `GridError::NegativeOrigin` for a negative origin.
    pub fn select_silently(&mut self, ox: i32, oy: i32, ex: i32, ey: i32) -> Result<()> {
        check_origin(ox, oy)?;
        self.selection.select_silently(&self.model, ox, oy, ex, ey);
        Ok(())
    }

    /// # Errors
    /// Returns `GridError::NegativeOrigin` for a negative origin.
    pub fn toggle_select(&mut self, ox: i32, oy: i32, ex: i32, ey: i32) -> Result<()> {
        check_origin(ox, oy)?;
        self.selection.toggle_select(&self.model, ox, oy, ex, ey);
        Ok(())
    }

    pub fn clear(&mut self, keep_row_selections: bool) {
        self.drag = None;
        self.selection.clear(keep_row_selections);
    }

    pub fn clear_most_recent_selection(&mut self, keep_row_selections: bool) {
        self.selection.clear_most_recent_selection(keep_row_selections);
    }

    pub fn select_row(&mut self, y1: i32, y2: i32) {
        self.selection.select_row(&self.model, y1, y2);
    }

    pub fn select_column(&mut self, x1: i32, x2: i32) {
        self.selection.select_column(&self.model, x1, x2);
    }

    pub fn select_all_rows(&mut self) {
        self.selection.select_all_rows();
    }

    pub fn deselect_row(&mut self, y1: i32, y2: i32) {
        self.selection.deselect_row(y1, y2);
    }

    pub fn deselect_column(&mut self, x1: i32, x2: i32) {
        self.selection.deselect_column(x1, x2);
    }

    pub fn is_selected(&self, x: i32, y: i32) -> bool {
        self.selection.is_selected(x, y)
    }

    pub fn is_cell_selected_in_row(&self, y: i32) -> bool {
        self.selection.is_cell_selected_in_row(y)
    }

    pub fn is_cell_selected_in_column(&self, x: i32) -> bool {
        self.selection.is_cell_selected_in_column(x)
    }

    pub fn is_row_selected(&self, y: i32) -> bool {
        self.selection.is_row_selected(y)
    }

    pub fn is_column_selected(&self, x: i32) -> bool {
        self.selection.is_column_selected(x)
    }

    pub fn selected_rows(&self) -> Vec<i32> {
        self.selection.selected_rows(self.model.row_count())
    }

    pub fn selected_columns(&self) -> Vec<i32> {
        self.selection.selected_columns(self.model.column_count())
    }

    pub fn selections(&self) -> &[Rectangle] {
        self.selection.selections()
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Collapse the selection to one cell, `(dx, dy)` away from the current
    /// anchor, and scroll it into view. With nothing selected the move starts
    /// from the top-left cell.
    ///
    /// Does nothing on an empty grid.
    pub fn move_selection(&mut self, dx: i32, dy: i32) {
        let Some(last) = self.last_cell() else {
            return;
        };
        let from = self
            .selection
            .last_selection()
            .map_or(Point::new(0, 0), |rect| rect.first_selected_cell);
        let target = clamp_to_grid(from.x.saturating_add(dx), from.y.saturating_add(dy), last);

        self.selection.select_only(&self.model, target.x, target.y, 0, 0);
        debug!(x = target.x, y = target.y, "moved selection");
        self.scroll_to_make_visible(target.x, target.y);
    }

    /// Grow or shrink the most recent cell selection by moving its far
    /// corner `(dx, dy)` while the anchor stays put.
    ///
    /// Row and column selections cannot be extended cell-wise; for those, and
    /// with nothing selected, this behaves like [`move_selection`](Self::move_selection).
    ///
    /// # Errors
    /// Returns `GridError::NegativeOrigin` if the stored anchor is negative.
    pub fn extend_selection(&mut self, dx: i32, dy: i32) -> Result<()> {
        let Some(last) = self.last_cell() else {
            return Ok(());
        };
        let extendable = self.selection.last_selection_type() == Some(SelectionType::CellRange);
        let Some(rect) = self.selection.last_selection().copied().filter(|_| extendable) else {
            self.move_selection(dx, dy);
            return Ok(());
        };

        let anchor = rect.first_selected_cell;
        check_origin(anchor.x, anchor.y)?;
        let corner = rect.last_selected_cell;
        let target = clamp_to_grid(corner.x.saturating_add(dx), corner.y.saturating_add(dy), last);
        self.selection.replace_most_recent(
            &self.model,
            anchor,
            target.x - anchor.x,
            target.y - anchor.y,
        );
        debug!(?anchor, ?target, "extended selection");
        self.scroll_to_make_visible(target.x, target.y);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Drag-select and autoscroll
    // ------------------------------------------------------------------

    /// Start a drag-select on `(x, y)`. In multi-select mode the new range
    /// is added to the existing ones.
    ///
    /// # Errors
    /// Returns `GridError::NegativeOrigin` for a gutter cell; no drag starts.
    pub fn begin_drag(&mut self, x: i32, y: i32) -> Result<()> {
        check_origin(x, y)?;
        self.selection.select(&self.model, x, y, 0, 0);
        let anchor = Point::new(x, y);
        self.drag = Some(DragState {
            anchor,
            corner: anchor,
        });
        trace!(x, y, "drag started");
        Ok(())
    }

    /// Move the drag corner to `(x, y)`, clamped to the grid.
    ///
    /// Returns true if the selection changed. Without an active drag this
    /// does nothing.
    pub fn drag_to(&mut self, x: i32, y: i32) -> bool {
        let (Some(drag), Some(last)) = (self.drag, self.last_cell()) else {
            return false;
        };
        let corner = clamp_to_grid(x, y, last);
        if corner == drag.corner {
            return false;
        }
        self.selection.replace_most_recent(
            &self.model,
            drag.anchor,
            corner.x - drag.anchor.x,
            corner.y - drag.anchor.y,
        );
        self.drag = Some(DragState { corner, ..drag });
        true
    }

    /// Finish the drag and stop any autoscroll. Returns the dragged rectangle.
    pub fn end_drag(&mut self) -> Option<Rectangle> {
        self.autoscroll = None;
        self.drag.take()?;
        self.selection.last_selection().copied()
    }

    pub fn drag_state(&self) -> Option<DragState> {
        self.drag
    }

    /// Arm autoscroll. The host calls [`autoscroll_tick`](Self::autoscroll_tick)
    /// from its timer until [`cancel_autoscroll`](Self::cancel_autoscroll).
    pub fn set_autoscroll(&mut self, direction: AutoscrollDirection) {
        self.autoscroll = Some(direction);
    }

    pub fn cancel_autoscroll(&mut self) {
        self.autoscroll = None;
    }

    pub fn autoscroll_direction(&self) -> Option<AutoscrollDirection> {
        self.autoscroll
    }

    /// Scroll one cell in the armed direction and, while dragging, pull the
    /// drag corner to the newly exposed edge.
    ///
    /// Returns false when disarmed or already at the scroll limit.
    pub fn autoscroll_tick(&mut self) -> bool {
        let Some(direction) = self.autoscroll else {
            return false;
        };
        let axis = direction.axis();
        let old = self.viewport.scroll_value(axis);
        let new = self.scroll_by_delta(axis, direction.delta());
        if (new - old).abs() <= f64::EPSILON {
            trace!(?direction, "autoscroll at limit");
            return false;
        }

        if let Some(drag) = self.drag {
            let (first, last) = self.viewport.visible_range(&self.model, axis);
            let edge = if direction.delta() < 0 { first } else { last };
            let (x, y) = match axis {
                Axis::Horizontal => (edge, drag.corner.y),
                Axis::Vertical => (drag.corner.x, edge),
            };
            self.drag_to(x, y);
        }
        true
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    /// Set an absolute scroll value, clamped. Returns the applied value.
    pub fn set_scroll_value(&mut self, axis: Axis, value: f64) -> f64 {
        self.viewport.set_scroll_value(axis, value)
    }

    pub fn scroll_value(&self, axis: Axis) -> f64 {
        self.viewport.scroll_value(axis)
    }

    pub fn max_scroll(&self, axis: Axis) -> f64 {
        self.viewport.max_scroll(axis)
    }

    /// Scroll by whole cells, as one wheel notch or arrow-button click would.
    pub fn scroll_by_delta(&mut self, axis: Axis, cells: i32) -> f64 {
        let old = self.viewport.scroll_value(axis);
        let max = self.viewport.max_scroll(axis);
        let mapper = ScrollCoordinateMapper::scrollable(&self.model, axis);
        let new = mapper.scroll_by_delta(old, cells, max);
        self.viewport.set_scroll_value(axis, new)
    }

    /// Scroll the minimum needed to show `(column, row)`. Returns the
    /// resulting `(horizontal, vertical)` scroll values.
    pub fn scroll_to_make_visible(&mut self, column: i32, row: i32) -> (f64, f64) {
        self.scroller
            .scroll_to_make_visible(&mut self.viewport, &self.model, column, row)
    }

    pub fn page_up(&mut self) -> f64 {
        self.scroller.page_up(&mut self.viewport, &self.model)
    }

    pub fn page_down(&mut self) -> f64 {
        self.scroller.page_down(&mut self.viewport, &self.model)
    }

    pub fn page_left(&mut self) -> f64 {
        self.scroller.page_left(&mut self.viewport, &self.model)
    }

    pub fn page_right(&mut self) -> f64 {
        self.scroller.page_right(&mut self.viewport, &self.model)
    }

    /// First and last scrollable index at least partly visible along `axis`.
    pub fn visible_range(&self, axis: Axis) -> (i32, i32) {
        self.viewport.visible_range(&self.model, axis)
    }

    /// Cell under a viewport-relative pixel position.
    pub fn cell_at(&self, screen_x: f64, screen_y: f64) -> Option<Point> {
        self.viewport.cell_at(&self.model, screen_x, screen_y)
    }

    // ------------------------------------------------------------------
    // Shape changes
    // ------------------------------------------------------------------

    /// The model's shape or sizes changed: recompute scroll ranges and
    /// re-clamp the scroll values.
    pub fn model_changed(&mut self) {
        self.viewport.update_range(&self.model);
        if let (Some(drag), Some(last)) = (self.drag, self.last_cell()) {
            let corner = clamp_to_grid(drag.corner.x, drag.corner.y, last);
            self.drag = Some(DragState { corner, ..drag });
        }
        debug!(
            rows = self.model.row_count(),
            columns = self.model.column_count(),
            "model changed"
        );
    }

    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.viewport.update_range(&self.model);
        self.config.viewport_width = self.viewport.width;
        self.config.viewport_height = self.viewport.height;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            selections: self.selection.selections().to_vec(),
            ranges: self.selection.selections().iter().map(format_range).collect(),
            selection_types: self.selection.selection_types().to_vec(),
            selected_rows: self.selected_rows(),
            selected_columns: self.selected_columns(),
            all_rows_selected: self.selection.are_all_rows_selected(),
            scroll_left: self.viewport.scroll_value(Axis::Horizontal),
            scroll_top: self.viewport.scroll_value(Axis::Vertical),
            max_scroll_left: self.viewport.max_scroll(Axis::Horizontal),
            max_scroll_top: self.viewport.max_scroll(Axis::Vertical),
        }
    }

    /// Bottom-right cell, or `None` for an empty grid.
    fn last_cell(&self) -> Option<Point> {
        let columns = self.model.column_count();
        let rows = self.model.row_count();
        (columns > 0 && rows > 0).then(|| Point::new(columns - 1, rows - 1))
    }
}

fn clamp_to_grid(x: i32, y: i32, last: Point) -> Point {
    Point::new(x.clamp(0, last.x), y.clamp(0, last.y))
}

fn check_origin(x: i32, y: i32) -> Result<()> {
    if x < 0 || y < 0 {
        debug!(x, y, "rejected negative selection origin");
        return Err(GridError::NegativeOrigin { x, y });
    }
    Ok(())
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

    fn grid(multi_select: bool) -> Grid<GridLayout> {
        let config = GridConfig {
            multi_select,
            viewport_width: 400.0,
            viewport_height: 200.0,
            ..GridConfig::default()
        };
        Grid::new(GridLayout::uniform(100, 20, 20.0, 80.0), config)
    }

    #[test]
    fn negative_origin_is_rejected_without_side_effects() {
        let mut grid = grid(true);
        grid.select(1, 1, 0, 0).unwrap();
        let err = grid.select(-1, 3, 2, 2).unwrap_err();
        assert!(matches!(err, GridError::NegativeOrigin { x: -1, y: 3 }));
        assert!(grid.toggle_select(0, -1, 0, 0).is_err());
        assert!(grid.begin_drag(-1, -1).is_err());
        assert_eq!(grid.selections().len(), 1);
        assert!(grid.drag_state().is_none());
    }

    #[test]
    fn move_selection_clamps_and_collapses() {
        let mut grid = grid(true);
        grid.select(2, 2, 3, 3).unwrap();
        grid.select(8, 8, 0, 0).unwrap();
        grid.move_selection(-20, 1);
        assert_eq!(grid.selections().len(), 1);
        assert!(grid.is_selected(0, 9));
    }

    #[test]
    fn extend_keeps_anchor() {
        let mut grid = grid(false);
        grid.select(5, 5, 0, 0).unwrap();
        grid.extend_selection(2, 0).unwrap();
        grid.extend_selection(0, -3).unwrap();
        let rect = grid.selections()[0];
        assert_eq!(rect.first_selected_cell, Point::new(5, 5));
        assert_eq!(rect.last_selected_cell, Point::new(7, 2));
        assert_eq!(rect.bounds(), (5, 2, 7, 5));
    }

    #[test]
    fn drag_replaces_in_place() {
        let mut grid = grid(true);
        grid.select(0, 0, 0, 0).unwrap();
        grid.begin_drag(3, 3).unwrap();
        assert!(grid.drag_to(5, 6));
        assert!(!grid.drag_to(5, 6));
        assert!(grid.drag_to(1, 1));
        let rect = grid.end_drag().unwrap();
        assert_eq!(rect.bounds(), (1, 1, 3, 3));
        assert_eq!(grid.selections().len(), 2);
        assert!(!grid.drag_to(9, 9));
    }

    #[test]
    fn autoscroll_extends_drag_to_exposed_edge() {
        let mut grid = grid(false);
        grid.begin_drag(0, 0).unwrap();
        grid.set_autoscroll(AutoscrollDirection::Down);
        assert!(grid.autoscroll_tick());
        assert_eq!(grid.scroll_value(Axis::Vertical), 20.0);
        // Rows 1..=10 are visible after one row of scroll
        assert_eq!(grid.drag_state().unwrap().corner, Point::new(0, 10));
        assert!(grid.is_selected(0, 10));

        grid.cancel_autoscroll();
        assert!(!grid.autoscroll_tick());
    }

    #[test]
    fn resize_viewport_reclamps() {
        let mut grid = grid(false);
        grid.set_scroll_value(Axis::Vertical, 1800.0);
        grid.resize_viewport(400.0, 1000.0);
        assert_eq!(grid.max_scroll(Axis::Vertical), 1000.0);
        assert_eq!(grid.scroll_value(Axis::Vertical), 1000.0);
    }
}
