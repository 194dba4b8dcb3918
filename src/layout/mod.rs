//! Layout engine for cell positions, scroll coordinates and viewport management.
//!
//! This module handles:
//! - Pre-computing cell positions from column widths and row heights
//! - Binary search between pixel offsets and row/column indices
//! - Managing viewport state (scroll position, scroll range, visible range)
//! - Scroll-to-visible and page stepping around frozen panes
//! - Merge range handling

mod grid_layout;
mod mapper;
mod scroller;
mod viewport;

pub use grid_layout::{GridLayout, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
pub use mapper::{clamp_scroll, ScrollCoordinateMapper};
pub use scroller::{ViewportScroller, DEFAULT_VERTICAL_SLACK};
pub use viewport::{AxisScroll, ViewportState};
