//! Scenario replay tests for gridview
//!
//! End-to-end runs of JSON scenarios: layout building, action replay and
//! the resulting snapshot, plus configuration loading.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::scenario::Scenario;
use gridview::{GridConfig, GridError};

fn run(json: &str) -> gridview::GridSnapshot {
    Scenario::from_json(json)
        .expect("scenario parses")
        .run()
        .expect("scenario replays")
}

// ============================================================================
// REPLAY
// ============================================================================

#[test]
fn select_ranges_then_scroll_to_far_corner() {
    let snapshot = run(r#"{
        "config": {
            "multiSelect": true,
            "viewportWidth": 400,
            "viewportHeight": 200,
            "defaultRowHeight": 20,
            "defaultColumnWidth": 80
        },
        "layout": { "rows": 100, "columns": 20, "frozenRows": 1 },
        "actions": [
            { "op": "select", "range": "B2:D4" },
            { "op": "selectRanges", "ranges": "F6, H8:G7" },
            { "op": "scrollTo", "cell": "T90" }
        ]
    }"#);

    assert_eq!(snapshot.ranges, vec!["B2:D4", "F6", "H8:G7"]);
    assert_eq!(snapshot.selections[2].bounds(), (6, 6, 7, 7));
    // Row 90 ends 1780px into the scrollable rows; 180px visible plus slack
    assert_eq!(snapshot.scroll_top, 1780.0 - 180.0 + 20.0);
    assert_eq!(snapshot.scroll_left, 1200.0);
    assert_eq!(snapshot.max_scroll_top, 1800.0);
}

#[test]
fn drag_then_autoscroll_without_drag_only_scrolls() {
    let snapshot = run(r#"{
        "config": { "viewportWidth": 400, "viewportHeight": 200, "defaultColumnWidth": 80 },
        "layout": { "rows": 100, "columns": 20 },
        "actions": [
            { "op": "drag", "from": "A1", "to": "B3" },
            { "op": "autoscroll", "direction": "down", "ticks": 3 }
        ]
    }"#);
    assert_eq!(snapshot.ranges, vec!["A1:B3"]);
    assert_eq!(snapshot.scroll_top, 60.0);
}

#[test]
fn keyboard_actions_follow_the_anchor() {
    let snapshot = run(r#"{
        "layout": { "rows": 50, "columns": 10 },
        "actions": [
            { "op": "select", "range": "C3" },
            { "op": "move", "dx": 1, "dy": 1 },
            { "op": "extend", "dx": 2, "dy": 0 },
            { "op": "extend", "dx": 0, "dy": -2 }
        ]
    }"#);
    assert_eq!(snapshot.ranges, vec!["D4:F2"]);
    assert_eq!(snapshot.selections[0].bounds(), (3, 1, 5, 3));
}

#[test]
fn row_ranges_and_all_rows() {
    let snapshot = run(r#"{
        "config": { "multiSelect": true },
        "layout": { "rows": 10, "columns": 4 },
        "actions": [
            { "op": "selectRows", "from": 2, "to": 4 },
            { "op": "deselectRows", "from": 3, "to": 3 },
            { "op": "selectColumns", "from": 1, "to": 1 }
        ]
    }"#);
    assert_eq!(snapshot.selected_rows, vec![2, 4]);
    assert_eq!(snapshot.selected_columns, vec![1]);
    assert!(!snapshot.all_rows_selected);

    let snapshot = run(r#"{
        "layout": { "rows": 10, "columns": 4 },
        "actions": [{ "op": "selectAllRows" }]
    }"#);
    assert!(snapshot.all_rows_selected);
    assert_eq!(snapshot.selected_rows.len(), 10);
    assert!(snapshot.selections.is_empty());
}

#[test]
fn hidden_rows_take_no_space() {
    let snapshot = run(r#"{
        "config": { "viewportHeight": 200, "defaultRowHeight": 20 },
        "layout": { "rows": 20, "columns": 2, "hiddenRows": [1, 2] }
    }"#);
    assert_eq!(snapshot.max_scroll_top, 18.0 * 20.0 - 200.0);
}

#[test]
fn zero_slack_scrolls_to_exact_edge() {
    let snapshot = run(r#"{
        "config": { "viewportHeight": 200, "defaultRowHeight": 20, "verticalScrollSlack": 0 },
        "layout": { "rows": 100, "columns": 2 },
        "actions": [{ "op": "scrollTo", "cell": "A11" }]
    }"#);
    assert_eq!(snapshot.scroll_top, 20.0);
}

#[test]
fn paging_and_resize_reclamp() {
    let snapshot = run(r#"{
        "config": { "viewportHeight": 200, "defaultRowHeight": 20 },
        "layout": { "rows": 30, "columns": 2 },
        "actions": [
            { "op": "pageDown" },
            { "op": "pageDown" },
            { "op": "resize", "width": 800, "height": 500 }
        ]
    }"#);
    assert_eq!(snapshot.max_scroll_top, 100.0);
    assert_eq!(snapshot.scroll_top, 100.0);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn unknown_action_is_a_config_error() {
    let err = Scenario::from_json(r#"{ "actions": [{ "op": "explode" }] }"#).unwrap_err();
    assert!(matches!(err, GridError::Config(_)));
}

#[test]
fn merge_outside_grid_is_rejected() {
    let scenario =
        Scenario::from_json(r#"{ "layout": { "rows": 5, "columns": 5, "merges": ["D4:F6"] } }"#)
            .unwrap();
    assert!(matches!(
        scenario.run(),
        Err(GridError::OutOfBounds { .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Scenario::from_path("/nonexistent/gridview/scenario.json").unwrap_err();
    assert!(matches!(err, GridError::Io(_)));
}

// ============================================================================
// CONFIG
// ============================================================================

#[test]
fn config_round_trips_through_json() {
    let config = GridConfig {
        multi_select: true,
        grid_line_width: 1.0,
        ..GridConfig::default()
    };
    let json = config.to_json().unwrap();
    assert!(json.contains("\"gridLineWidth\""));
    assert_eq!(GridConfig::from_json(&json).unwrap(), config);
}

#[test]
fn config_defaults() {
    let config = GridConfig::default();
    assert!(!config.multi_select);
    assert_eq!(config.vertical_scroll_slack, 20.0);
    assert_eq!((config.viewport_width, config.viewport_height), (800.0, 600.0));
}
