//! Merged-cell tests for gridview
//!
//! Selections that clip a merge grow to cover it, in every drag direction,
//! and keyboard or drag extension never leaves half a merge selected.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_selected_exactly, last_rect, GridBuilder};
use gridview::{GridError, GridLayout, Point, SpanNormalizer, SpanSource};
use test_case::test_case;

// ============================================================================
// LAYOUT MERGE METADATA
// ============================================================================

#[test]
fn merge_reports_spans_from_origin_only() {
    let layout = GridBuilder::new(10, 10).merge(2, 3, 3, 2).layout();
    assert!(!layout.is_span_covered(2, 3));
    assert_eq!(layout.column_span_length(2, 3), 3);
    assert_eq!(layout.row_span_length(2, 3), 2);

    assert!(layout.is_span_covered(4, 4));
    assert_eq!(layout.column_span_length(4, 4), 1);
    assert_eq!(layout.span_origin(4, 4), Some(Point::new(2, 3)));
    assert!(!layout.is_span_covered(5, 4));
}

#[test]
fn merges_must_fit_and_not_overlap() {
    let mut layout = GridLayout::uniform(10, 10, 20.0, 80.0);
    layout.add_merge(0, 0, 2, 2).unwrap();
    assert!(matches!(
        layout.add_merge(1, 1, 2, 2),
        Err(GridError::OverlappingMerge { x: 1, y: 1 })
    ));
    assert!(matches!(
        layout.add_merge(9, 0, 2, 1),
        Err(GridError::OutOfBounds { .. })
    ));
    assert!(layout.remove_merge(1, 1));
    assert!(layout.add_merge(1, 1, 2, 2).is_ok());
}

// ============================================================================
// NORMALIZATION THROUGH THE GRID
// ============================================================================

#[test_case(1, 1, 1, 1, (1, 1, 3, 4) ; "drag down right into merge")]
#[test_case(4, 5, -1, -1, (2, 2, 4, 5) ; "drag up left from below merge")]
#[test_case(3, 4, 0, 0, (2, 2, 3, 4) ; "click on covered cell")]
#[test_case(0, 3, 5, 0, (0, 2, 5, 4) ; "row strip through merge")]
fn selection_covers_whole_merge(ox: i32, oy: i32, ex: i32, ey: i32, bounds: (i32, i32, i32, i32)) {
    // Merge covers C3:D5
    let mut grid = GridBuilder::new(10, 10).merge(2, 2, 2, 3).build();
    grid.select(ox, oy, ex, ey).unwrap();
    assert_eq!(last_rect(&grid).bounds(), bounds);
    assert_selected_exactly(&grid, bounds);
}

#[test]
fn drag_direction_survives_expansion() {
    let mut grid = GridBuilder::new(10, 10).merge(2, 2, 2, 3).build();
    grid.select(4, 5, -1, -1).unwrap();
    let rect = last_rect(&grid);
    assert!(rect.extent.x < 0);
    assert!(rect.extent.y < 0);
    assert_eq!(rect.first_selected_cell, Point::new(4, 5));
}

#[test]
fn normalization_is_idempotent() {
    let layout = GridBuilder::new(12, 12)
        .merge(2, 2, 2, 3)
        .merge(4, 0, 1, 3)
        .merge(0, 5, 3, 1)
        .layout();
    let normalizer = SpanNormalizer::new(&layout);
    for &(ox, oy, ex, ey) in &[(3, 3, 1, 0), (5, 6, -2, -4), (0, 0, 0, 0), (4, 4, 0, 0)] {
        let once = normalizer.normalize(ox, oy, ex, ey);
        let twice = normalizer.normalize(once.0, once.1, once.2, once.3);
        assert_eq!(once, twice, "input ({ox}, {oy}, {ex}, {ey})");
    }
}

#[test]
fn chained_merges_are_all_pulled_in() {
    // C3:D5 and E1:E3 touch through row 2; A6:C6 sits under C3:D5
    let layout = GridBuilder::new(12, 12)
        .merge(2, 2, 2, 3)
        .merge(4, 0, 1, 3)
        .merge(0, 5, 3, 1)
        .layout();
    let normalizer = SpanNormalizer::new(&layout);
    // Selecting D3:E3 pulls in C3:D5 and E1:E3
    assert_eq!(normalizer.normalize(3, 2, 1, 0), (2, 0, 2, 4));
    // Selecting C5:C6 pulls in C3:D5 and A6:C6
    assert_eq!(normalizer.normalize(2, 4, 0, 1), (0, 2, 3, 3));
}

// ============================================================================
// EXTENSION OVER MERGES
// ============================================================================

#[test]
fn keyboard_extension_steps_over_merge() {
    let mut grid = GridBuilder::new(10, 10).merge(2, 1, 2, 2).build();
    grid.select(1, 1, 0, 0).unwrap();
    grid.extend_selection(1, 0).unwrap();
    // Extending into C2 pulls in the whole C2:D3 merge
    assert_eq!(last_rect(&grid).bounds(), (1, 1, 3, 2));
    assert_eq!(last_rect(&grid).last_selected_cell, Point::new(3, 2));

    grid.extend_selection(1, 0).unwrap();
    assert_eq!(last_rect(&grid).bounds(), (1, 1, 4, 2));
    assert_eq!(last_rect(&grid).first_selected_cell, Point::new(1, 1));
}

#[test]
fn drag_over_merge_selects_it_whole() {
    let mut grid = GridBuilder::new(10, 10).merge(3, 3, 2, 2).build();
    grid.begin_drag(1, 1).unwrap();
    grid.drag_to(3, 3);
    grid.end_drag();
    assert_selected_exactly(&grid, (1, 1, 4, 4));
}
