//! gridview - selection and viewport engine for virtualized data grids
//!
//! Tracks rectangular, row and column selections over a sparse logical grid
//! and converts between pixel scroll offsets and row/column indices when
//! sizes are non-uniform:
//! - Multiple overlapping selections with O(selections) hit tests
//! - Merged cells are never split by a selection boundary
//! - Binary-search scroll mapping over mutable row heights and column widths
//! - Frozen panes, scroll-to-visible, paging, drag-select and autoscroll
//!
//! # Usage (Rust)
//!
//! ```
//! use gridview::{Grid, GridConfig, GridLayout};
//!
//! let layout = GridLayout::uniform(1_000, 26, 20.0, 64.0);
//! let mut grid = Grid::new(layout, GridConfig::default());
//! grid.select(2, 3, 4, 5).unwrap();
//! assert!(grid.is_selected(6, 8));
//! grid.scroll_to_make_visible(0, 500);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'gridview';
//! await init();
//! const view = new GridView(1000, 26, JSON.stringify({ multiSelect: true }));
//! view.on_selection_changed((e) => repaint());
//! view.select(2, 3, 4, 5);
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod model;
pub mod scenario;
pub mod selection;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use events::{ListenerId, ScrollChanged, SelectionChange, SelectionChanged};
pub use grid::{AutoscrollDirection, DragState, Grid, GridSnapshot};
pub use layout::{GridLayout, ScrollCoordinateMapper, ViewportScroller, ViewportState};
pub use model::{Axis, GridMetrics, GridModel, NoSpans, SpanSource};
pub use selection::{RangeSet, SelectionStore, SpanNormalizer};
pub use viewer::GridView;

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
