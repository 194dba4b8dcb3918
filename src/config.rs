//! Grid configuration.
//!
//! Loaded from camelCase JSON; any missing key takes its default.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT, DEFAULT_VERTICAL_SLACK};

/// Tunables for a [`Grid`](crate::grid::Grid).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Allow more than one rectangle at a time
    pub multi_select: bool,
    /// Thickness of the line between cells, added per cell when scrolling
    pub grid_line_width: f64,
    /// Extra pixels when scrolling down to reveal a row
    pub vertical_scroll_slack: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub default_row_height: f64,
    pub default_column_width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            multi_select: false,
            grid_line_width: 0.0,
            vertical_scroll_slack: DEFAULT_VERTICAL_SLACK,
            viewport_width: 800.0,
            viewport_height: 600.0,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COL_WIDTH,
        }
    }
}

impl GridConfig {
    /// Parse a JSON config.
    ///
    /// # Errors
    /// Returns `GridError::Config` if the JSON is malformed or a key has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    /// Returns `GridError::Config` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
