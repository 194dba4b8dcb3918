//! Interaction tests for gridview
//!
//! Keyboard navigation and extension, drag-select, autoscroll ticks and
//! the ordering of selection and scroll notifications.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{assert_selected_exactly, last_rect, record_scroll, record_selection, GridBuilder};
use gridview::{AutoscrollDirection, Axis, Point, SelectionChange, SelectionType};

// ============================================================================
// KEYBOARD
// ============================================================================

#[test]
fn arrow_keys_walk_and_scroll() {
    let mut grid = GridBuilder::new(100, 20).viewport(400.0, 200.0).build();
    grid.select(0, 8, 0, 0).unwrap();
    grid.move_selection(0, 1);
    assert_selected_exactly(&grid, (0, 9, 0, 9));
    assert_eq!(grid.scroll_value(Axis::Vertical), 0.0);

    // Row 10 is the first one not fully inside 200px
    grid.move_selection(0, 1);
    assert_eq!(grid.scroll_value(Axis::Vertical), 220.0 - 200.0 + 20.0);
}

#[test]
fn arrow_keys_clamp_at_edges() {
    let mut grid = GridBuilder::new(5, 5).build();
    grid.select(0, 0, 0, 0).unwrap();
    grid.move_selection(-1, -1);
    assert_selected_exactly(&grid, (0, 0, 0, 0));
    grid.move_selection(50, 50);
    assert_eq!(last_rect(&grid).origin, Point::new(4, 4));
}

#[test]
fn first_arrow_key_selects_from_origin() {
    let mut grid = GridBuilder::new(5, 5).build();
    grid.move_selection(1, 0);
    assert_selected_exactly(&grid, (1, 0, 1, 0));
}

#[test]
fn empty_grid_ignores_keyboard() {
    let mut grid = GridBuilder::new(0, 0).build();
    grid.move_selection(1, 1);
    grid.extend_selection(1, 1).unwrap();
    assert!(grid.selections().is_empty());
}

#[test]
fn shift_arrow_grows_then_shrinks() {
    let mut grid = GridBuilder::new(20, 20).build();
    grid.select(5, 5, 0, 0).unwrap();
    grid.extend_selection(0, 2).unwrap();
    grid.extend_selection(0, 2).unwrap();
    assert_selected_exactly(&grid, (5, 5, 5, 9));
    grid.extend_selection(0, -6).unwrap();
    assert_selected_exactly(&grid, (5, 3, 5, 5));
    assert_eq!(grid.selections().len(), 1);
}

#[test]
fn shift_arrow_after_row_select_moves_instead() {
    let mut grid = GridBuilder::new(20, 20).build();
    grid.select_row(3, 3);
    grid.extend_selection(1, 0).unwrap();
    assert!(!grid.is_row_selected(3));
    assert_eq!(
        grid.selection().last_selection_type(),
        Some(SelectionType::CellRange)
    );
    assert_selected_exactly(&grid, (1, 3, 1, 3));
}

#[test]
fn extension_replaces_only_the_latest_rectangle() {
    let mut grid = GridBuilder::new(20, 20).multi_select().build();
    grid.select(0, 0, 0, 0).unwrap();
    grid.select(10, 10, 0, 0).unwrap();
    grid.extend_selection(2, 2).unwrap();
    assert_eq!(grid.selections().len(), 2);
    assert!(grid.is_selected(0, 0));
    assert_eq!(last_rect(&grid).bounds(), (10, 10, 12, 12));
}

// ============================================================================
// DRAG AND AUTOSCROLL
// ============================================================================

#[test]
fn drag_notifies_once_per_corner_move() {
    let mut grid = GridBuilder::new(20, 20).build();
    let log = record_selection(&mut grid);
    grid.begin_drag(2, 2).unwrap();
    grid.drag_to(4, 4);
    grid.drag_to(4, 4);
    grid.drag_to(-3, 4);
    let rect = grid.end_drag().unwrap();

    assert_eq!(rect.bounds(), (0, 2, 2, 4));
    assert_eq!(rect.first_selected_cell, Point::new(2, 2));
    assert_eq!(log.borrow().len(), 3);
    assert!(log
        .borrow()
        .iter()
        .all(|e| e.change == SelectionChange::Selected(SelectionType::CellRange)));
}

#[test]
fn autoscroll_up_and_left_pull_drag_to_leading_edge() {
    let mut grid = GridBuilder::new(100, 20).viewport(400.0, 200.0).build();
    grid.set_scroll_value(Axis::Vertical, 400.0);
    grid.set_scroll_value(Axis::Horizontal, 800.0);
    grid.begin_drag(12, 25).unwrap();

    grid.set_autoscroll(AutoscrollDirection::Up);
    assert!(grid.autoscroll_tick());
    assert_eq!(grid.scroll_value(Axis::Vertical), 380.0);
    assert_eq!(grid.drag_state().unwrap().corner, Point::new(12, 19));

    grid.set_autoscroll(AutoscrollDirection::Left);
    assert!(grid.autoscroll_tick());
    assert_eq!(grid.scroll_value(Axis::Horizontal), 720.0);
    assert_eq!(grid.drag_state().unwrap().corner, Point::new(9, 19));
    assert_selected_exactly(&grid, (9, 19, 12, 25));
}

#[test]
fn autoscroll_stops_at_the_limit() {
    let mut grid = GridBuilder::new(12, 5).viewport(400.0, 200.0).build();
    grid.set_autoscroll(AutoscrollDirection::Down);
    assert!(grid.autoscroll_tick());
    assert!(grid.autoscroll_tick());
    assert!(!grid.autoscroll_tick());
    assert_eq!(grid.scroll_value(Axis::Vertical), 40.0);
    // Armed but idle: no drag, no selection
    assert!(grid.selections().is_empty());
}

#[test]
fn autoscroll_drags_to_the_final_row() {
    let mut grid = GridBuilder::new(20, 5).viewport(400.0, 200.0).build();
    grid.begin_drag(0, 0).unwrap();
    grid.set_autoscroll(AutoscrollDirection::Down);

    let mut ticks = 0;
    while grid.autoscroll_tick() {
        ticks += 1;
    }
    assert_eq!(ticks, 10);
    assert_eq!(grid.scroll_value(Axis::Vertical), 200.0);
    assert_eq!(grid.drag_state().unwrap().corner, Point::new(0, 19));
    assert!(grid.is_selected(0, 19));
    assert_eq!(grid.visible_range(Axis::Vertical), (10, 19));
}

#[test]
fn end_drag_disarms_autoscroll() {
    let mut grid = GridBuilder::new(100, 20).viewport(400.0, 200.0).build();
    grid.begin_drag(0, 0).unwrap();
    grid.set_autoscroll(AutoscrollDirection::Right);
    grid.end_drag();
    assert_eq!(grid.autoscroll_direction(), None);
    assert!(!grid.autoscroll_tick());
}

#[test]
fn shrinking_model_clamps_drag_corner() {
    let mut grid = GridBuilder::new(50, 20).build();
    grid.begin_drag(1, 1).unwrap();
    grid.drag_to(15, 40);
    grid.model_mut().set_shape(10, 10);
    grid.model_changed();
    assert_eq!(grid.drag_state().unwrap().corner, Point::new(9, 9));
}

// ============================================================================
// NOTIFICATION ORDERING
// ============================================================================

#[test]
fn selection_fires_before_scroll_on_keyboard_move() {
    let mut grid = GridBuilder::new(100, 20).viewport(400.0, 200.0).build();
    let order = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&order);
    grid.on_selection_changed(move |_| sink.borrow_mut().push("selection"));
    let sink = Rc::clone(&order);
    grid.on_scroll_changed(move |_| sink.borrow_mut().push("scroll"));

    grid.select(0, 0, 0, 0).unwrap();
    grid.move_selection(0, 30);
    assert_eq!(*order.borrow(), vec!["selection", "selection", "scroll"]);
}

#[test]
fn listener_sees_post_mutation_state() {
    let mut grid = GridBuilder::new(100, 20).viewport(400.0, 200.0).build();
    let log = record_scroll(&mut grid);
    let applied = grid.page_down();
    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].new_value, applied);
    assert_eq!(log[0].old_value, 0.0);
}

#[test]
fn unsubscribing_scroll_listener_leaves_selection_listener() {
    let mut grid = GridBuilder::new(100, 20).viewport(400.0, 200.0).build();
    let selections = record_selection(&mut grid);
    let scroll_id = grid.on_scroll_changed(|_| {});
    assert!(grid.unsubscribe(scroll_id));
    grid.select(1, 1, 0, 0).unwrap();
    assert_eq!(selections.borrow().len(), 1);
}
