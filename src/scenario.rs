//! Scripted interaction replay.
//!
//! A scenario is a JSON document describing a grid (shape, sizes, frozen
//! panes, merges), a [`GridConfig`] and a list of actions. Replaying it
//! yields a [`GridSnapshot`]. Cells are written as A1 references.
//!
//! ```json
//! {
//!   "config": { "multiSelect": true, "viewportWidth": 400 },
//!   "layout": { "rows": 100, "columns": 20, "frozenRows": 1, "merges": ["B2:C3"] },
//!   "actions": [
//!     { "op": "select", "range": "B2:D4" },
//!     { "op": "scrollTo", "cell": "T90" }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cell_ref::{parse_cell_range, parse_cell_ref, parse_ranges};
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::grid::{AutoscrollDirection, Grid, GridSnapshot};
use crate::layout::GridLayout;
use crate::model::Axis;
use crate::types::{Point, Rectangle};

/// Shape and sizing of the scenario grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSettings {
    pub rows: i32,
    pub columns: i32,
    /// Row index to height, for rows that differ from the default
    pub row_heights: HashMap<i32, f64>,
    /// Column index to width, for columns that differ from the default
    pub column_widths: HashMap<i32, f64>,
    pub hidden_rows: HashSet<i32>,
    pub hidden_columns: HashSet<i32>,
    pub frozen_rows: i32,
    pub frozen_columns: i32,
    /// Merged ranges as A1 ranges ("B2:C3")
    pub merges: Vec<String>,
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    Select { range: String },
    SelectSilently { range: String },
    ToggleSelect { range: String },
    /// Select each range of a comma or space separated list, in order
    SelectRanges { ranges: String },
    Clear {
        #[serde(default)]
        keep_rows: bool,
    },
    ClearMostRecent {
        #[serde(default)]
        keep_rows: bool,
    },
    SelectRows { from: i32, to: i32 },
    SelectColumns { from: i32, to: i32 },
    SelectAllRows,
    DeselectRows { from: i32, to: i32 },
    DeselectColumns { from: i32, to: i32 },
    Move { dx: i32, dy: i32 },
    Extend { dx: i32, dy: i32 },
    Drag { from: String, to: String },
    Autoscroll {
        direction: AutoscrollDirection,
        ticks: u32,
    },
    SetScroll { axis: Axis, value: f64 },
    ScrollBy { axis: Axis, cells: i32 },
    ScrollTo { cell: String },
    PageUp,
    PageDown,
    PageLeft,
    PageRight,
    Resize { width: f64, height: f64 },
}

/// A grid plus a list of actions to replay on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    pub config: GridConfig,
    pub layout: LayoutSettings,
    pub actions: Vec<Action>,
}

impl Scenario {
    /// Parse a scenario document.
    ///
    /// # Errors
    /// Returns `GridError::Config` for malformed JSON or unknown actions.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scenario file.
    ///
    /// # Errors
    /// Returns `GridError::Io` if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build the grid described by `layout` and `config`.
    ///
    /// # Errors
    /// Returns an error for malformed, out-of-bounds or overlapping merges.
    pub fn build_grid(&self) -> Result<Grid<GridLayout>> {
        let shape = &self.layout;
        let merges = shape
            .merges
            .iter()
            .map(|range| parse_range(range))
            .collect::<Result<Vec<_>>>()?;

        let mut layout = GridLayout::uniform(
            shape.rows,
            shape.columns,
            self.config.default_row_height,
            self.config.default_column_width,
        );
        for (&row, &height) in &shape.row_heights {
            layout.set_row_height(row, height);
        }
        for (&col, &width) in &shape.column_widths {
            layout.set_col_width(col, width);
        }
        for &row in &shape.hidden_rows {
            layout.set_row_height(row, 0.0);
        }
        for &col in &shape.hidden_columns {
            layout.set_col_width(col, 0.0);
        }
        for rect in merges {
            let (left, top, right, bottom) = rect.bounds();
            layout.add_merge(left, top, right - left + 1, bottom - top + 1)?;
        }
        layout.set_frozen(shape.frozen_rows, shape.frozen_columns);

        Ok(Grid::new(layout, self.config))
    }

    /// Build the grid, replay every action and snapshot the result.
    ///
    /// # Errors
    /// Stops at the first action that fails (bad cell reference, negative origin).
    pub fn run(&self) -> Result<GridSnapshot> {
        let mut grid = self.build_grid()?;
        for (step, action) in self.actions.iter().enumerate() {
            debug!(step, ?action, "replaying action");
            apply(&mut grid, action)?;
        }
        info!(actions = self.actions.len(), "scenario replayed");
        Ok(grid.snapshot())
    }
}

/// Apply one action to `grid`.
///
/// # Errors
/// Returns an error for a malformed cell reference or a rejected selection.
pub fn apply(grid: &mut Grid<GridLayout>, action: &Action) -> Result<()> {
    match action {
        Action::Select { range } => {
            let rect = parse_range(range)?;
            grid.select(rect.origin.x, rect.origin.y, rect.extent.x, rect.extent.y)?;
        }
        Action::SelectSilently { range } => {
            let rect = parse_range(range)?;
            grid.select_silently(rect.origin.x, rect.origin.y, rect.extent.x, rect.extent.y)?;
        }
        Action::ToggleSelect { range } => {
            let rect = parse_range(range)?;
            grid.toggle_select(rect.origin.x, rect.origin.y, rect.extent.x, rect.extent.y)?;
        }
        Action::SelectRanges { ranges } => {
            for rect in parse_ranges(ranges) {
                grid.select(rect.origin.x, rect.origin.y, rect.extent.x, rect.extent.y)?;
            }
        }
        Action::Clear { keep_rows } => grid.clear(*keep_rows),
        Action::ClearMostRecent { keep_rows } => grid.clear_most_recent_selection(*keep_rows),
        Action::SelectRows { from, to } => grid.select_row(*from, *to),
        Action::SelectColumns { from, to } => grid.select_column(*from, *to),
        Action::SelectAllRows => grid.select_all_rows(),
        Action::DeselectRows { from, to } => grid.deselect_row(*from, *to),
        Action::DeselectColumns { from, to } => grid.deselect_column(*from, *to),
        Action::Move { dx, dy } => grid.move_selection(*dx, *dy),
        Action::Extend { dx, dy } => grid.extend_selection(*dx, *dy)?,
        Action::Drag { from, to } => {
            let from = parse_cell(from)?;
            let to = parse_cell(to)?;
            grid.begin_drag(from.x, from.y)?;
            grid.drag_to(to.x, to.y);
            grid.end_drag();
        }
        Action::Autoscroll { direction, ticks } => {
            grid.set_autoscroll(*direction);
            for _ in 0..*ticks {
                if !grid.autoscroll_tick() {
                    break;
                }
            }
            grid.cancel_autoscroll();
        }
        Action::SetScroll { axis, value } => {
            grid.set_scroll_value(*axis, *value);
        }
        Action::ScrollBy { axis, cells } => {
            grid.scroll_by_delta(*axis, *cells);
        }
        Action::ScrollTo { cell } => {
            let cell = parse_cell(cell)?;
            grid.scroll_to_make_visible(cell.x, cell.y);
        }
        Action::PageUp => {
            grid.page_up();
        }
        Action::PageDown => {
            grid.page_down();
        }
        Action::PageLeft => {
            grid.page_left();
        }
        Action::PageRight => {
            grid.page_right();
        }
        Action::Resize { width, height } => grid.resize_viewport(*width, *height),
    }
    Ok(())
}

fn parse_cell(cell: &str) -> Result<Point> {
    parse_cell_ref(cell).ok_or_else(|| GridError::from(format!("invalid cell reference: {cell}")))
}

fn parse_range(range: &str) -> Result<Rectangle> {
    parse_cell_range(range).ok_or_else(|| GridError::from(format!("invalid range: {range}")))
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

    #[test]
    fn parses_tagged_actions() {
        let scenario = Scenario::from_json(
            r#"{
                "layout": { "rows": 10, "columns": 5 },
                "actions": [
                    { "op": "select", "range": "A1:B2" },
                    { "op": "clear", "keepRows": true },
                    { "op": "autoscroll", "direction": "down", "ticks": 3 },
                    { "op": "pageDown" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.actions.len(), 4);
        assert_eq!(scenario.actions[1], Action::Clear { keep_rows: true });
        assert_eq!(scenario.actions[3], Action::PageDown);
        assert_eq!(scenario.config, GridConfig::default());
    }

    #[test]
    fn merges_expand_replayed_selections() {
        let scenario = Scenario::from_json(
            r#"{
                "layout": { "rows": 10, "columns": 10, "merges": ["C3:D5"] },
                "actions": [{ "op": "select", "range": "B2:C3" }]
            }"#,
        )
        .unwrap();
        let snapshot = scenario.run().unwrap();
        assert_eq!(snapshot.selections[0].bounds(), (1, 1, 3, 4));
    }

    #[test]
    fn overlapping_merges_are_rejected() {
        let scenario = Scenario::from_json(
            r#"{ "layout": { "rows": 10, "columns": 10, "merges": ["A1:B2", "B2:C3"] } }"#,
        )
        .unwrap();
        let err = scenario.build_grid().unwrap_err();
        assert!(matches!(err, GridError::OverlappingMerge { x: 1, y: 1 }));
    }

    #[test]
    fn bad_cell_reference_stops_replay() {
        let scenario = Scenario::from_json(
            r#"{
                "layout": { "rows": 10, "columns": 10 },
                "actions": [{ "op": "scrollTo", "cell": "nope" }]
            }"#,
        )
        .unwrap();
        assert!(matches!(scenario.run(), Err(GridError::Other(_))));
    }
}
