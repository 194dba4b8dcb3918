//! Common test utilities and assertion helpers.
//!
//! Provides a builder for grids with sizes, frozen panes and merges, plus
//! recorders that capture selection and scroll notifications.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridview::{Grid, GridConfig, GridLayout, Rectangle, ScrollChanged, SelectionChanged};

// ============================================================================
// Grid Builder
// ============================================================================

/// Builder for a [`Grid`] over a [`GridLayout`].
#[derive(Debug, Clone)]
pub struct GridBuilder {
    rows: i32,
    columns: i32,
    row_height: f64,
    column_width: f64,
    row_heights: Vec<(i32, f64)>,
    column_widths: Vec<(i32, f64)>,
    frozen: (i32, i32),
    merges: Vec<(i32, i32, i32, i32)>,
    config: GridConfig,
}

impl GridBuilder {
    /// A `rows` x `columns` grid of 20px rows and 80px columns.
    pub fn new(rows: i32, columns: i32) -> Self {
        Self {
            rows,
            columns,
            row_height: 20.0,
            column_width: 80.0,
            row_heights: Vec::new(),
            column_widths: Vec::new(),
            frozen: (0, 0),
            merges: Vec::new(),
            config: GridConfig::default(),
        }
    }

    pub fn sizes(mut self, row_height: f64, column_width: f64) -> Self {
        self.row_height = row_height;
        self.column_width = column_width;
        self
    }

    pub fn row_height(mut self, row: i32, height: f64) -> Self {
        self.row_heights.push((row, height));
        self
    }

    pub fn column_width(mut self, col: i32, width: f64) -> Self {
        self.column_widths.push((col, width));
        self
    }

    pub fn frozen(mut self, rows: i32, columns: i32) -> Self {
        self.frozen = (rows, columns);
        self
    }

    /// Merge `cols` x `rows` cells from `(x, y)`.
    pub fn merge(mut self, x: i32, y: i32, cols: i32, rows: i32) -> Self {
        self.merges.push((x, y, cols, rows));
        self
    }

    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn multi_select(mut self) -> Self {
        self.config.multi_select = true;
        self
    }

    pub fn grid_lines(mut self, width: f64) -> Self {
        self.config.grid_line_width = width;
        self
    }

    pub fn layout(&self) -> GridLayout {
        let mut layout =
            GridLayout::uniform(self.rows, self.columns, self.row_height, self.column_width);
        for &(row, height) in &self.row_heights {
            layout.set_row_height(row, height);
        }
        for &(col, width) in &self.column_widths {
            layout.set_col_width(col, width);
        }
        for &(x, y, cols, rows) in &self.merges {
            layout.add_merge(x, y, cols, rows).expect("merge fits the grid");
        }
        layout.set_frozen(self.frozen.0, self.frozen.1);
        layout
    }

    pub fn build(self) -> Grid<GridLayout> {
        let layout = self.layout();
        Grid::new(layout, self.config)
    }
}

// ============================================================================
// Notification Recorders
// ============================================================================

/// Shared log of notifications, filled by listeners.
pub type Log<E> = Rc<RefCell<Vec<E>>>;

pub fn record_selection(grid: &mut Grid<GridLayout>) -> Log<SelectionChanged> {
    let log: Log<SelectionChanged> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    grid.on_selection_changed(move |event| sink.borrow_mut().push(*event));
    log
}

pub fn record_scroll(grid: &mut Grid<GridLayout>) -> Log<ScrollChanged> {
    let log: Log<ScrollChanged> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    grid.on_scroll_changed(move |event| sink.borrow_mut().push(*event));
    log
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert that exactly the cells of `left..=right` x `top..=bottom` are
/// selected inside a window one cell larger on every side.
pub fn assert_selected_exactly(
    grid: &Grid<GridLayout>,
    (left, top, right, bottom): (i32, i32, i32, i32),
) {
    for y in (top - 1).max(0)..=bottom + 1 {
        for x in (left - 1).max(0)..=right + 1 {
            let expected = (left..=right).contains(&x) && (top..=bottom).contains(&y);
            assert_eq!(
                grid.is_selected(x, y),
                expected,
                "cell ({x}, {y}) selected state, expected bounds {:?}",
                (left, top, right, bottom)
            );
        }
    }
}

/// Assert the three parallel selection vectors have the same length.
pub fn assert_parallel(grid: &Grid<GridLayout>) {
    let store = grid.selection();
    assert_eq!(store.selections().len(), store.flattened_x().len());
    assert_eq!(store.selections().len(), store.flattened_y().len());
    assert_eq!(store.selections().len(), store.selection_types().len());
}

pub fn last_rect(grid: &Grid<GridLayout>) -> Rectangle {
    *grid.selections().last().expect("at least one selection")
}
