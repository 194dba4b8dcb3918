//! `GridView` - the JavaScript-facing grid.
//!
//! This module provides the WASM-exported `GridView` struct that handles:
//! - Building and reshaping the in-memory layout (sizes, frozen panes, merges)
//! - Cell, row and column selection with host-supplied (possibly NaN) extents
//! - Scroll state, scroll-to-visible and paging
//! - Keyboard extension, drag-select and autoscroll ticks
//!
//! Painting and DOM event wiring stay on the JavaScript side; the host reads
//! state back through the query methods or registered callbacks.

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::config::GridConfig;
use crate::grid::{AutoscrollDirection, Grid};
use crate::layout::GridLayout;
use crate::model::{Axis, GridMetrics};
use crate::types::coerce_extent;

/// The grid exported to JavaScript
#[wasm_bindgen]
pub struct GridView {
    grid: Grid<GridLayout>,
}

#[wasm_bindgen]
impl GridView {
    /// Create a grid of `row_count` x `column_count` cells.
    ///
    /// `config_json` is an optional camelCase [`GridConfig`] document.
    #[wasm_bindgen(constructor)]
    pub fn new(
        row_count: i32,
        column_count: i32,
        config_json: Option<String>,
    ) -> Result<GridView, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config = match config_json.as_deref() {
            Some(json) => {
                GridConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            None => GridConfig::default(),
        };
        let layout = GridLayout::uniform(
            row_count,
            column_count,
            config.default_row_height,
            config.default_column_width,
        );
        Ok(GridView {
            grid: Grid::new(layout, config),
        })
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    #[wasm_bindgen]
    pub fn row_count(&self) -> i32 {
        self.grid.model().row_count()
    }

    #[wasm_bindgen]
    pub fn column_count(&self) -> i32 {
        self.grid.model().column_count()
    }

    #[wasm_bindgen]
    pub fn set_shape(&mut self, row_count: i32, column_count: i32) {
        self.grid.model_mut().set_shape(row_count, column_count);
        self.grid.model_changed();
    }

    #[wasm_bindgen]
    pub fn set_frozen(&mut self, frozen_rows: i32, frozen_cols: i32) {
        self.grid.model_mut().set_frozen(frozen_rows, frozen_cols);
        self.grid.model_changed();
    }

    #[wasm_bindgen]
    pub fn set_row_height(&mut self, row: i32, height: f64) {
        self.grid.model_mut().set_row_height(row, height);
        self.grid.model_changed();
    }

    #[wasm_bindgen]
    pub fn set_column_width(&mut self, col: i32, width: f64) {
        self.grid.model_mut().set_col_width(col, width);
        self.grid.model_changed();
    }

    /// Merge `cols` x `rows` cells starting at `(x, y)`.
    #[wasm_bindgen]
    pub fn add_merge(&mut self, x: i32, y: i32, cols: i32, rows: i32) -> Result<(), JsValue> {
        self.grid
            .model_mut()
            .add_merge(x, y, cols, rows)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn remove_merge(&mut self, x: i32, y: i32) -> bool {
        self.grid.model_mut().remove_merge(x, y)
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: f64, height: f64) {
        self.grid.resize_viewport(width, height);
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select from `(ox, oy)` spanning `(ex, ey)`. Returns false for a
    /// negative (gutter) origin.
    #[wasm_bindgen]
    pub fn select(&mut self, ox: i32, oy: i32, ex: f64, ey: f64) -> bool {
        self.grid
            .select(ox, oy, coerce_extent(ex), coerce_extent(ey))
            .is_ok()
    }

    #[wasm_bindgen]
    pub fn select_silently(&mut self, ox: i32, oy: i32, ex: f64, ey: f64) -> bool {
        self.grid
            .select_silently(ox, oy, coerce_extent(ex), coerce_extent(ey))
            .is_ok()
    }

    #[wasm_bindgen]
    pub fn toggle_select(&mut self, ox: i32, oy: i32, ex: f64, ey: f64) -> bool {
        self.grid
            .toggle_select(ox, oy, coerce_extent(ex), coerce_extent(ey))
            .is_ok()
    }

    #[wasm_bindgen]
    pub fn clear(&mut self, keep_row_selections: bool) {
        self.grid.clear(keep_row_selections);
    }

    #[wasm_bindgen]
    pub fn clear_most_recent_selection(&mut self, keep_row_selections: bool) {
        self.grid.clear_most_recent_selection(keep_row_selections);
    }

    #[wasm_bindgen]
    pub fn select_row(&mut self, y1: i32, y2: i32) {
        self.grid.select_row(y1, y2);
    }

    #[wasm_bindgen]
    pub fn select_column(&mut self, x1: i32, x2: i32) {
        self.grid.select_column(x1, x2);
    }

    #[wasm_bindgen]
    pub fn select_all_rows(&mut self) {
        self.grid.select_all_rows();
    }

    #[wasm_bindgen]
    pub fn deselect_row(&mut self, y1: i32, y2: i32) {
        self.grid.deselect_row(y1, y2);
    }

    #[wasm_bindgen]
    pub fn deselect_column(&mut self, x1: i32, x2: i32) {
        self.grid.deselect_column(x1, x2);
    }

    #[wasm_bindgen]
    pub fn is_selected(&self, x: i32, y: i32) -> bool {
        self.grid.is_selected(x, y)
    }

    #[wasm_bindgen]
    pub fn is_cell_selected_in_row(&self, y: i32) -> bool {
        self.grid.is_cell_selected_in_row(y)
    }

    #[wasm_bindgen]
    pub fn is_cell_selected_in_column(&self, x: i32) -> bool {
        self.grid.is_cell_selected_in_column(x)
    }

    #[wasm_bindgen]
    pub fn is_row_selected(&self, y: i32) -> bool {
        self.grid.is_row_selected(y)
    }

    #[wasm_bindgen]
    pub fn is_column_selected(&self, x: i32) -> bool {
        self.grid.is_column_selected(x)
    }

    #[wasm_bindgen]
    pub fn selected_rows(&self) -> Vec<i32> {
        self.grid.selected_rows()
    }

    #[wasm_bindgen]
    pub fn selected_columns(&self) -> Vec<i32> {
        self.grid.selected_columns()
    }

    /// Selection rectangles as a JSON array.
    #[wasm_bindgen]
    pub fn selections_json(&self) -> String {
        serde_json::to_string(self.grid.selections()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Selection and scroll state as a JSON object.
    #[wasm_bindgen]
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.grid.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    // ------------------------------------------------------------------
    // Keyboard and pointer
    // ------------------------------------------------------------------

    #[wasm_bindgen]
    pub fn move_selection(&mut self, dx: i32, dy: i32) {
        self.grid.move_selection(dx, dy);
    }

    #[wasm_bindgen]
    pub fn extend_selection(&mut self, dx: i32, dy: i32) -> bool {
        self.grid.extend_selection(dx, dy).is_ok()
    }

    /// Start a drag on the cell under a viewport pixel position.
    /// Returns false if the position is outside the grid.
    #[wasm_bindgen]
    pub fn mouse_down(&mut self, screen_x: f64, screen_y: f64) -> bool {
        match self.grid.cell_at(screen_x, screen_y) {
            Some(cell) => self.grid.begin_drag(cell.x, cell.y).is_ok(),
            None => false,
        }
    }

    /// Continue a drag. Pointer positions past a viewport edge arm
    /// autoscroll in that direction; positions inside disarm it.
    #[wasm_bindgen]
    pub fn mouse_move(&mut self, screen_x: f64, screen_y: f64) -> bool {
        if self.grid.drag_state().is_none() {
            return false;
        }
        let viewport = self.grid.viewport();
        match edge_direction(viewport.width, viewport.height, screen_x, screen_y) {
            Some(direction) => self.grid.set_autoscroll(direction),
            None => self.grid.cancel_autoscroll(),
        }
        match self.grid.cell_at(screen_x, screen_y) {
            Some(cell) => self.grid.drag_to(cell.x, cell.y),
            None => false,
        }
    }

    #[wasm_bindgen]
    pub fn mouse_up(&mut self) {
        self.grid.end_drag();
    }

    /// Arm autoscroll: "up", "down", "left" or "right". Anything else disarms.
    #[wasm_bindgen]
    pub fn set_autoscroll(&mut self, direction: &str) {
        let direction = match direction {
            "up" => Some(AutoscrollDirection::Up),
            "down" => Some(AutoscrollDirection::Down),
            "left" => Some(AutoscrollDirection::Left),
            "right" => Some(AutoscrollDirection::Right),
            _ => None,
        };
        match direction {
            Some(direction) => self.grid.set_autoscroll(direction),
            None => self.grid.cancel_autoscroll(),
        }
    }

    /// Called from the host timer while autoscroll is armed.
    #[wasm_bindgen]
    pub fn autoscroll_tick(&mut self) -> bool {
        self.grid.autoscroll_tick()
    }

    /// `[column, row]` under a viewport pixel position, or empty.
    #[wasm_bindgen]
    pub fn cell_at(&self, screen_x: f64, screen_y: f64) -> Vec<i32> {
        self.grid
            .cell_at(screen_x, screen_y)
            .map_or_else(Vec::new, |cell| vec![cell.x, cell.y])
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    #[wasm_bindgen]
    pub fn scroll_left(&self) -> f64 {
        self.grid.scroll_value(Axis::Horizontal)
    }

    #[wasm_bindgen]
    pub fn scroll_top(&self) -> f64 {
        self.grid.scroll_value(Axis::Vertical)
    }

    #[wasm_bindgen]
    pub fn set_scroll_left(&mut self, value: f64) -> f64 {
        self.grid.set_scroll_value(Axis::Horizontal, value)
    }

    #[wasm_bindgen]
    pub fn set_scroll_top(&mut self, value: f64) -> f64 {
        self.grid.set_scroll_value(Axis::Vertical, value)
    }

    /// Wheel scroll by whole rows.
    #[wasm_bindgen]
    pub fn scroll_rows(&mut self, cells: i32) -> f64 {
        self.grid.scroll_by_delta(Axis::Vertical, cells)
    }

    /// Wheel scroll by whole columns.
    #[wasm_bindgen]
    pub fn scroll_columns(&mut self, cells: i32) -> f64 {
        self.grid.scroll_by_delta(Axis::Horizontal, cells)
    }

    /// Returns `[scroll_left, scroll_top]` after scrolling.
    #[wasm_bindgen]
    pub fn scroll_to_make_visible(&mut self, column: i32, row: i32) -> Vec<f64> {
        let (x, y) = self.grid.scroll_to_make_visible(column, row);
        vec![x, y]
    }

    #[wasm_bindgen]
    pub fn page_up(&mut self) -> f64 {
        self.grid.page_up()
    }

    #[wasm_bindgen]
    pub fn page_down(&mut self) -> f64 {
        self.grid.page_down()
    }

    #[wasm_bindgen]
    pub fn page_left(&mut self) -> f64 {
        self.grid.page_left()
    }

    #[wasm_bindgen]
    pub fn page_right(&mut self) -> f64 {
        self.grid.page_right()
    }
}

// ============================================================================
// WASM32 callbacks
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl GridView {
    /// Selection rectangles as JS objects.
    #[wasm_bindgen]
    pub fn selections(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.grid.selections())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Register a callback receiving `{ change, selectionCount }` after
    /// every selection mutation.
    #[wasm_bindgen]
    pub fn on_selection_changed(&mut self, callback: Function) {
        self.grid.on_selection_changed(move |event| {
            if let Ok(value) = serde_wasm_bindgen::to_value(event) {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
        });
    }

    /// Register a callback receiving `{ axis, oldValue, newValue }` whenever
    /// a scroll value moves.
    #[wasm_bindgen]
    pub fn on_scroll_changed(&mut self, callback: Function) {
        self.grid.on_scroll_changed(move |event| {
            if let Ok(value) = serde_wasm_bindgen::to_value(event) {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
        });
    }
}

/// Autoscroll direction for a pointer outside the viewport, vertical first.
fn edge_direction(width: f64, height: f64, x: f64, y: f64) -> Option<AutoscrollDirection> {
    if y < 0.0 {
        Some(AutoscrollDirection::Up)
    } else if y >= height {
        Some(AutoscrollDirection::Down)
    } else if x < 0.0 {
        Some(AutoscrollDirection::Left)
    } else if x >= width {
        Some(AutoscrollDirection::Right)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    fn view() -> GridView {
        let config = r#"{"viewportWidth": 400, "viewportHeight": 200, "defaultColumnWidth": 80}"#;
        GridView::new(100, 20, Some(config.to_string())).unwrap()
    }

    #[test]
    fn nan_extents_select_a_single_cell() {
        let mut view = view();
        assert!(view.select(3, 4, f64::NAN, f64::NAN));
        assert!(view.is_selected(3, 4));
        assert!(!view.is_selected(4, 4));
        assert!(!view.select(-1, 0, 0.0, 0.0));
    }

    #[test]
    fn pointer_drag_selects_range() {
        let mut view = view();
        assert!(view.mouse_down(10.0, 10.0));
        assert!(view.mouse_move(170.0, 50.0));
        view.mouse_up();
        assert!(view.is_selected(2, 2));
        assert!(!view.is_selected(3, 2));
        assert!(!view.mouse_move(250.0, 50.0));
    }

    #[test]
    fn dragging_below_the_viewport_arms_autoscroll() {
        let mut view = view();
        view.mouse_down(10.0, 10.0);
        view.mouse_move(10.0, 250.0);
        assert!(view.autoscroll_tick());
        assert_eq!(view.scroll_top(), 20.0);
        view.mouse_up();
        assert!(!view.autoscroll_tick());
    }

    #[test]
    fn snapshot_reports_scroll_and_selection() {
        let mut view = view();
        view.select_row(2, 3);
        view.scroll_to_make_visible(0, 50);
        let snapshot: serde_json::Value = serde_json::from_str(&view.snapshot_json()).unwrap();
        assert_eq!(snapshot["selectedRows"], serde_json::json!([2, 3]));
        assert_eq!(snapshot["scrollTop"], serde_json::json!(840.0));
    }

    #[test]
    fn reshaping_uses_configured_sizes() {
        let config = r#"{"defaultRowHeight": 30, "defaultColumnWidth": 100}"#;
        let mut view = GridView::new(10, 10, Some(config.to_string())).unwrap();
        view.set_shape(20, 20);
        assert_eq!(view.row_count(), 20);
        assert_eq!(view.grid.model().size(Axis::Vertical, 15), 30.0);
        assert_eq!(view.grid.model().size(Axis::Horizontal, 15), 100.0);
    }
}
