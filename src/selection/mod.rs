//! Selection state for the grid.
//!
//! [`SelectionStore`] owns every rectangular selection plus the row and
//! column range sets. Each rectangle has two flattened projections kept in
//! parallel vectors: `flattened_x` collapses it to a single row (column
//! membership only) and `flattened_y` to a single column (row membership
//! only). That lets header highlighting ask "does any selection touch this
//! row" in O(selections) without a 2D containment test.
//!
//! All cell-level mutation runs the candidate through [`SpanNormalizer`]
//! first, so a merged cell is never split by a selection boundary.
//!
//! The store does not reject negative origins; callers are expected to
//! filter gutter clicks before calling [`SelectionStore::select`].

mod range_set;
mod span;

pub use range_set::RangeSet;
pub use span::SpanNormalizer;

use tracing::debug;

use crate::events::{ListenerId, Listeners, SelectionChange, SelectionChanged};
use crate::model::{GridMetrics, SpanSource};
use crate::types::{Point, Rectangle, SelectionType};

/// Upper bound used when the all-rows shortcut has to become a real interval.
const FULL_RANGE_END: i32 = i32::MAX;

#[derive(Debug, Default)]
pub struct SelectionStore {
    selections: Vec<Rectangle>,
    kinds: Vec<SelectionType>,
    flattened_x: Vec<Rectangle>,
    flattened_y: Vec<Rectangle>,
    row_selection: RangeSet,
    column_selection: RangeSet,
    all_rows_selected: bool,
    multi_select: bool,
    last_selection_type: Option<SelectionType>,
    listeners: Listeners<SelectionChanged>,
}

impl SelectionStore {
    pub fn new(multi_select: bool) -> Self {
        Self {
            multi_select,
            ..Self::default()
        }
    }

    pub fn multi_select(&self) -> bool {
        self.multi_select
    }

    /// Switching to single-select keeps only the most recent rectangle.
    pub fn set_multi_select(&mut self, multi_select: bool) {
        self.multi_select = multi_select;
        if !multi_select && self.selections.len() > 1 {
            let keep_from = self.selections.len() - 1;
            self.selections.drain(..keep_from);
            self.kinds.drain(..keep_from);
            self.flattened_x.drain(..keep_from);
            self.flattened_y.drain(..keep_from);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SelectionChanged) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Cell selection
    // ------------------------------------------------------------------

    /// Select the rectangle from `(ox, oy)` spanning `(ex, ey)` and notify.
    pub fn select<S: SpanSource + ?Sized>(
        &mut self,
        spans: &S,
        ox: i32,
        oy: i32,
        ex: i32,
        ey: i32,
    ) {
        self.select_inner(spans, ox, oy, ex, ey);
        self.notify(SelectionChange::Selected(SelectionType::CellRange));
    }

    /// Same as [`select`](Self::select) without firing a notification.
    pub fn select_silently<S: SpanSource + ?Sized>(
        &mut self,
        spans: &S,
        ox: i32,
        oy: i32,
        ex: i32,
        ey: i32,
    ) {
        self.select_inner(spans, ox, oy, ex, ey);
    }

    /// Drop everything, row and column ranges included, and select a single
    /// rectangle. Notifies once.
    pub fn select_only<S: SpanSource + ?Sized>(
        &mut self,
        spans: &S,
        ox: i32,
        oy: i32,
        ex: i32,
        ey: i32,
    ) {
        self.clear_quietly(false);
        self.select_inner(spans, ox, oy, ex, ey);
        self.notify(SelectionChange::Selected(SelectionType::CellRange));
    }

    /// Replace the most recent rectangle with a new one, notifying once.
    ///
    /// Used by drag and keyboard extension, which keep re-selecting the same
    /// logical range. The anchor passed in is kept as `first_selected_cell`.
    pub fn replace_most_recent<S: SpanSource + ?Sized>(
        &mut self,
        spans: &S,
        anchor: Point,
        ex: i32,
        ey: i32,
    ) {
        self.pop_entry();
        let rect = Self::normalized(spans, anchor.x, anchor.y, ex, ey);
        self.commit(rect, SelectionType::CellRange);
        self.notify(SelectionChange::Selected(SelectionType::CellRange));
    }

    /// Remove an identical rectangle if one exists, otherwise select it.
    pub fn toggle_select<S: SpanSource + ?Sized>(
        &mut self,
        spans: &S,
        ox: i32,
        oy: i32,
        ex: i32,
        ey: i32,
    ) {
        let candidate = Self::normalized(spans, ox, oy, ex, ey);
        let existing = self
            .selections
            .iter()
            .position(|rect| rect.same_bounds(&candidate));

        match existing {
            Some(index) => {
                if let Some((rect, kind)) = self.remove_entry(index) {
                    self.forget_range(&rect, kind);
                }
                debug!(index, "toggled selection off");
                self.notify(SelectionChange::Toggled);
            }
            None => self.select(spans, ox, oy, ex, ey),
        }
    }

    /// Drop every rectangle and the column range set; rows survive if asked.
    pub fn clear(&mut self, keep_row_selections: bool) {
        self.clear_quietly(keep_row_selections);
        self.notify(SelectionChange::Cleared);
    }

    /// Drop the most recent rectangle.
    ///
    /// Without `keep_row_selections` the row range set and every row
    /// rectangle are dropped as well.
    pub fn clear_most_recent_selection(&mut self, keep_row_selections: bool) {
        if let Some((rect, kind)) = self.pop_entry() {
            if kind == SelectionType::ColumnRange {
                self.forget_range(&rect, kind);
            }
        }
        if !keep_row_selections {
            self.all_rows_selected = false;
            self.row_selection.clear();
            self.drop_kind(SelectionType::RowRange);
        }
        self.last_selection_type = self.kinds.last().copied();
        self.notify(SelectionChange::ClearedMostRecent);
    }

    // ------------------------------------------------------------------
    // Row / column selection
    // ------------------------------------------------------------------

    /// Select rows `y1..=y2` (either order) as a range and as a full-width rectangle.
    pub fn select_row<M: GridMetrics + SpanSource + ?Sized>(
        &mut self,
        model: &M,
        y1: i32,
        y2: i32,
    ) {
        if !self.multi_select {
            self.clear_quietly(false);
        }
        self.row_selection.select(y1, y2);
        let last_column = (model.column_count() - 1).max(0);
        let rect = Self::normalized(model, 0, y1, last_column, y2.saturating_sub(y1));
        self.commit(rect, SelectionType::RowRange);
        debug!(y1, y2, "selected rows");
        self.notify(SelectionChange::Selected(SelectionType::RowRange));
    }

    /// Select columns `x1..=x2` (either order) as a range and as a full-height rectangle.
    pub fn select_column<M: GridMetrics + SpanSource + ?Sized>(
        &mut self,
        model: &M,
        x1: i32,
        x2: i32,
    ) {
        if !self.multi_select {
            self.clear_quietly(false);
        }
        self.column_selection.select(x1, x2);
        let last_row = (model.row_count() - 1).max(0);
        let rect = Self::normalized(model, x1, 0, x2.saturating_sub(x1), last_row);
        self.commit(rect, SelectionType::ColumnRange);
        debug!(x1, x2, "selected columns");
        self.notify(SelectionChange::Selected(SelectionType::ColumnRange));
    }

    /// Mark every row selected without materializing an interval.
    pub fn select_all_rows(&mut self) {
        self.clear_quietly(false);
        self.all_rows_selected = true;
        self.last_selection_type = Some(SelectionType::All);
        debug!("selected all rows");
        self.notify(SelectionChange::Selected(SelectionType::All));
    }

    /// Deselect rows `y1..=y2`.
    ///
    /// While the all-rows shortcut is active it is first replaced by a
    /// concrete `[0, i32::MAX]` interval, which is then split.
    pub fn deselect_row(&mut self, y1: i32, y2: i32) {
        if self.all_rows_selected {
            self.all_rows_selected = false;
            self.row_selection.select(0, FULL_RANGE_END);
        }
        self.row_selection.deselect(y1, y2);
        self.split_full_span(SelectionType::RowRange, y1.min(y2), y1.max(y2));
        self.notify(SelectionChange::RowsDeselected);
    }

    /// Deselect columns `x1..=x2`.
    pub fn deselect_column(&mut self, x1: i32, x2: i32) {
        self.column_selection.deselect(x1, x2);
        self.split_full_span(SelectionType::ColumnRange, x1.min(x2), x1.max(x2));
        self.notify(SelectionChange::ColumnsDeselected);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_selected(&self, x: i32, y: i32) -> bool {
        self.is_column_selected(x)
            || self.is_row_selected(y)
            || self.selections.iter().any(|rect| rect.contains(x, y))
    }

    /// True if any selection touches row `y`, wherever its columns are.
    pub fn is_cell_selected_in_row(&self, y: i32) -> bool {
        self.flattened_y.iter().any(|rect| rect.contains(0, y))
    }

    /// True if any selection touches column `x`, wherever its rows are.
    pub fn is_cell_selected_in_column(&self, x: i32) -> bool {
        self.flattened_x.iter().any(|rect| rect.contains(x, 0))
    }

    pub fn is_row_selected(&self, y: i32) -> bool {
        self.all_rows_selected || self.row_selection.is_selected(y)
    }

    pub fn is_column_selected(&self, x: i32) -> bool {
        self.column_selection.is_selected(x)
    }

    pub fn are_all_rows_selected(&self) -> bool {
        self.all_rows_selected
    }

    /// Selected row indices below `row_count`, ascending.
    pub fn selected_rows(&self, row_count: i32) -> Vec<i32> {
        if self.all_rows_selected {
            return (0..row_count.max(0)).collect();
        }
        self.row_selection
            .iter()
            .skip_while(|&y| y < 0)
            .take_while(|&y| y < row_count)
            .collect()
    }

    /// Selected column indices below `column_count`, ascending.
    pub fn selected_columns(&self, column_count: i32) -> Vec<i32> {
        self.column_selection
            .iter()
            .skip_while(|&x| x < 0)
            .take_while(|&x| x < column_count)
            .collect()
    }

    pub fn selections(&self) -> &[Rectangle] {
        &self.selections
    }

    pub fn selection_types(&self) -> &[SelectionType] {
        &self.kinds
    }

    pub fn flattened_x(&self) -> &[Rectangle] {
        &self.flattened_x
    }

    pub fn flattened_y(&self) -> &[Rectangle] {
        &self.flattened_y
    }

    pub fn row_selection(&self) -> &RangeSet {
        &self.row_selection
    }

    pub fn column_selection(&self) -> &RangeSet {
        &self.column_selection
    }

    pub fn last_selection(&self) -> Option<&Rectangle> {
        self.selections.last()
    }

    pub fn last_selection_type(&self) -> Option<SelectionType> {
        self.last_selection_type
    }

    pub fn has_selections(&self) -> bool {
        !self.selections.is_empty()
    }

    pub fn has_row_selections(&self) -> bool {
        self.all_rows_selected || !self.row_selection.is_empty()
    }

    pub fn has_column_selections(&self) -> bool {
        !self.column_selection.is_empty()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn normalized<S: SpanSource + ?Sized>(
        spans: &S,
        ox: i32,
        oy: i32,
        ex: i32,
        ey: i32,
    ) -> Rectangle {
        let (nx, ny, nex, ney) = SpanNormalizer::new(spans).normalize(ox, oy, ex, ey);
        Rectangle::with_anchor(nx, ny, nex, ney, Point::new(ox, oy))
    }

    fn select_inner<S: SpanSource + ?Sized>(
        &mut self,
        spans: &S,
        ox: i32,
        oy: i32,
        ex: i32,
        ey: i32,
    ) {
        let rect = Self::normalized(spans, ox, oy, ex, ey);
        if !self.multi_select {
            self.clear_quietly(true);
        }
        self.commit(rect, SelectionType::CellRange);
        debug!(ox, oy, ex, ey, count = self.selections.len(), "selected cells");
    }

    /// Append the rectangle and its projections. Single-select callers clear first.
    fn commit(&mut self, rect: Rectangle, kind: SelectionType) {
        self.flattened_x.push(rect.flatten_x_at(0));
        self.flattened_y.push(rect.flatten_y_at(0));
        self.selections.push(rect);
        self.kinds.push(kind);
        self.last_selection_type = Some(kind);
    }

    fn pop_entry(&mut self) -> Option<(Rectangle, SelectionType)> {
        self.flattened_x.pop();
        self.flattened_y.pop();
        let kind = self.kinds.pop();
        self.selections.pop().zip(kind)
    }

    fn remove_entry(&mut self, index: usize) -> Option<(Rectangle, SelectionType)> {
        if index >= self.selections.len() {
            return None;
        }
        self.flattened_x.remove(index);
        self.flattened_y.remove(index);
        let kind = self.kinds.remove(index);
        let rect = self.selections.remove(index);
        self.last_selection_type = self.kinds.last().copied();
        Some((rect, kind))
    }

    /// Keep row/column range sets in step with a removed full-span rectangle.
    ///
    /// Indices still covered by a remaining rectangle of the same kind stay
    /// in the set.
    fn forget_range(&mut self, rect: &Rectangle, kind: SelectionType) {
        let (set, lo, hi) = match kind {
            SelectionType::RowRange => (&mut self.row_selection, rect.top(), rect.bottom()),
            SelectionType::ColumnRange => (&mut self.column_selection, rect.left(), rect.right()),
            SelectionType::CellRange | SelectionType::All => return,
        };
        set.deselect(lo, hi);
        for (other, &other_kind) in self.selections.iter().zip(&self.kinds) {
            if other_kind != kind {
                continue;
            }
            let (start, end) = match kind {
                SelectionType::RowRange => (other.top(), other.bottom()),
                _ => (other.left(), other.right()),
            };
            if start <= hi && end >= lo {
                set.select(start.max(lo), end.min(hi));
            }
        }
    }

    /// Remove every rectangle of `kind`, keeping the others in order.
    fn drop_kind(&mut self, kind: SelectionType) {
        let old = std::mem::take(&mut self.selections);
        let old_kinds = std::mem::take(&mut self.kinds);
        self.flattened_x.clear();
        self.flattened_y.clear();
        for (rect, rect_kind) in old.into_iter().zip(old_kinds) {
            if rect_kind != kind {
                self.commit(rect, rect_kind);
            }
        }
        self.last_selection_type = self.kinds.last().copied();
    }

    fn clear_quietly(&mut self, keep_row_selections: bool) {
        self.selections.clear();
        self.kinds.clear();
        self.flattened_x.clear();
        self.flattened_y.clear();
        self.column_selection.clear();
        if !keep_row_selections {
            self.all_rows_selected = false;
            self.row_selection.clear();
        }
        self.last_selection_type = None;
    }

    /// Cut `[lo, hi]` out of every full-span rectangle of `kind`, in place.
    fn split_full_span(&mut self, kind: SelectionType, lo: i32, hi: i32) {
        let old = std::mem::take(&mut self.selections);
        let old_kinds = std::mem::take(&mut self.kinds);
        self.flattened_x.clear();
        self.flattened_y.clear();

        for (rect, rect_kind) in old.into_iter().zip(old_kinds) {
            if rect_kind != kind {
                self.commit(rect, rect_kind);
                continue;
            }
            let (start, end) = match kind {
                SelectionType::RowRange => (rect.top(), rect.bottom()),
                _ => (rect.left(), rect.right()),
            };
            if end < lo || start > hi {
                self.commit(rect, rect_kind);
                continue;
            }
            let mut pieces = Vec::with_capacity(2);
            if start < lo {
                pieces.push((start, lo - 1));
            }
            if end > hi {
                pieces.push((hi + 1, end));
            }
            for (a, b) in pieces {
                let piece = match kind {
                    SelectionType::RowRange => {
                        Rectangle::new(rect.left(), a, rect.right() - rect.left(), b - a)
                    }
                    _ => Rectangle::new(a, rect.top(), b - a, rect.bottom() - rect.top()),
                };
                self.commit(piece, rect_kind);
            }
        }
        self.last_selection_type = self.kinds.last().copied().or(if self.all_rows_selected {
            Some(SelectionType::All)
        } else {
            None
        });
    }

    fn notify(&mut self, change: SelectionChange) {
        let event = SelectionChanged {
            change,
            selection_count: self.selections.len(),
        };
        self.listeners.emit(&event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::model::{Axis, NoSpans};

    struct Shape(i32, i32);

    impl GridMetrics for Shape {
        fn count(&self, axis: Axis) -> i32 {
            match axis {
                Axis::Horizontal => self.0,
                Axis::Vertical => self.1,
            }
        }
        fn fixed_count(&self, _axis: Axis) -> i32 {
            0
        }
        fn size(&self, _axis: Axis, _index: i32) -> f64 {
            10.0
        }
        fn cumulative_size(&self, _axis: Axis, index: i32) -> f64 {
            f64::from(index) * 10.0
        }
    }

    impl SpanSource for Shape {
        fn is_span_covered(&self, x: i32, y: i32) -> bool {
            NoSpans.is_span_covered(x, y)
        }
        fn row_span_length(&self, _x: i32, _y: i32) -> i32 {
            1
        }
        fn column_span_length(&self, _x: i32, _y: i32) -> i32 {
            1
        }
        fn span_origin(&self, _x: i32, _y: i32) -> Option<Point> {
            None
        }
        fn has_spans(&self) -> bool {
            false
        }
    }

    fn assert_parallel(store: &SelectionStore) {
        assert_eq!(store.selections().len(), store.flattened_x().len());
        assert_eq!(store.selections().len(), store.flattened_y().len());
        assert_eq!(store.selections().len(), store.selection_types().len());
    }

    #[test]
    fn single_select_replaces() {
        let mut store = SelectionStore::new(false);
        store.select(&NoSpans, 1, 1, 0, 0);
        store.select(&NoSpans, 4, 4, 1, 1);
        assert_eq!(store.selections().len(), 1);
        assert!(!store.is_selected(1, 1));
        assert!(store.is_selected(5, 5));
        assert_parallel(&store);
    }

    #[test]
    fn multi_select_appends_and_toggles() {
        let mut store = SelectionStore::new(true);
        store.select(&NoSpans, 1, 1, 0, 0);
        store.select(&NoSpans, 4, 4, 1, 1);
        assert_eq!(store.selections().len(), 2);

        // Same cells, opposite drag direction
        store.toggle_select(&NoSpans, 5, 5, -1, -1);
        assert_eq!(store.selections().len(), 1);
        assert!(!store.is_selected(4, 4));
        assert_parallel(&store);

        store.toggle_select(&NoSpans, 7, 7, 0, 0);
        assert_eq!(store.selections().len(), 2);
        assert!(store.is_selected(7, 7));
    }

    #[test]
    fn projections_answer_header_queries() {
        let mut store = SelectionStore::new(true);
        store.select(&NoSpans, 10, 20, 2, 3);
        assert!(store.is_cell_selected_in_row(21));
        assert!(!store.is_cell_selected_in_row(24));
        assert!(store.is_cell_selected_in_column(12));
        assert!(!store.is_cell_selected_in_column(9));
    }

    #[test]
    fn select_row_pushes_full_width_rectangle() {
        let shape = Shape(8, 100);
        let mut store = SelectionStore::new(true);
        store.select_row(&shape, 5, 3);
        assert!(store.is_row_selected(3));
        assert!(store.is_row_selected(5));
        assert!(!store.is_row_selected(6));
        let rect = store.last_selection().unwrap();
        assert_eq!(rect.bounds(), (0, 3, 7, 5));
        assert_eq!(store.last_selection_type(), Some(SelectionType::RowRange));
    }

    #[test]
    fn deselect_row_splits_row_rectangle() {
        let shape = Shape(8, 100);
        let mut store = SelectionStore::new(true);
        store.select_row(&shape, 2, 6);
        store.deselect_row(4, 4);
        assert!(!store.is_selected(3, 4));
        assert!(store.is_selected(3, 3));
        assert!(store.is_selected(3, 5));
        assert_eq!(store.selections().len(), 2);
        assert_parallel(&store);
    }

    #[test]
    fn all_rows_shortcut_materializes_on_deselect() {
        let mut store = SelectionStore::new(true);
        store.select_all_rows();
        assert!(store.is_row_selected(i32::MAX));
        assert!(store.row_selection().is_empty());

        store.deselect_row(2, 2);
        assert!(!store.is_row_selected(2));
        assert!(store.is_row_selected(0));
        assert!(store.is_row_selected(1000));
        assert_eq!(store.selected_rows(5), vec![0, 1, 3, 4]);
    }

    #[test]
    fn clear_most_recent_respects_keep_rows() {
        let shape = Shape(8, 100);
        let mut store = SelectionStore::new(true);
        store.select_row(&shape, 1, 1);
        store.select(&NoSpans, 3, 3, 0, 0);
        store.clear_most_recent_selection(true);
        assert!(store.is_row_selected(1));
        assert_eq!(store.selections().len(), 1);

        store.clear_most_recent_selection(false);
        assert!(!store.is_row_selected(1));
        assert!(!store.has_selections());
        assert_parallel(&store);
    }

    #[test]
    fn removing_one_of_overlapping_column_ranges_keeps_the_other() {
        let shape = Shape(10, 100);
        let mut store = SelectionStore::new(true);
        store.select_column(&shape, 2, 5);
        store.select_column(&shape, 4, 8);
        store.clear_most_recent_selection(true);
        assert_eq!(store.selected_columns(10), vec![2, 3, 4, 5]);
        assert!(store.is_column_selected(4));
        assert!(store.selections()[0].contains(4, 3));
        assert_parallel(&store);
    }

    #[test]
    fn toggling_off_one_of_overlapping_row_ranges_keeps_the_other() {
        let shape = Shape(8, 100);
        let mut store = SelectionStore::new(true);
        store.select_row(&shape, 1, 4);
        store.select_row(&shape, 3, 6);
        store.toggle_select(&NoSpans, 0, 3, 7, 3);
        assert_eq!(store.selections().len(), 1);
        assert_eq!(store.selected_rows(10), vec![1, 2, 3, 4]);
        assert!(!store.is_row_selected(5));
    }

    #[test]
    fn clearing_rows_drops_row_rectangles() {
        let shape = Shape(8, 100);
        let mut store = SelectionStore::new(true);
        store.select_row(&shape, 1, 2);
        store.select(&NoSpans, 5, 50, 0, 0);
        store.select_column(&shape, 3, 3);
        store.clear_most_recent_selection(false);

        assert!(!store.is_row_selected(1));
        assert!(!store.is_selected(0, 1));
        assert!(store.is_selected(5, 50));
        assert!(!store.is_column_selected(3));
        assert_eq!(store.selections().len(), 1);
        assert_eq!(store.last_selection_type(), Some(SelectionType::CellRange));
        assert_parallel(&store);
    }

    #[test]
    fn column_selection_is_cleared_by_clear() {
        let shape = Shape(8, 100);
        let mut store = SelectionStore::new(true);
        store.select_column(&shape, 2, 3);
        store.select_row(&shape, 7, 7);
        assert!(store.is_selected(2, 50));
        store.clear(true);
        assert!(!store.is_column_selected(2));
        assert!(store.is_row_selected(7));
        assert!(!store.has_selections());
    }

    #[test]
    fn silent_select_skips_listeners() {
        use std::cell::Cell;
        use std::rc::Rc;

        let fired = Rc::new(Cell::new(0));
        let mut store = SelectionStore::new(false);
        let counter = Rc::clone(&fired);
        store.subscribe(move |_| counter.set(counter.get() + 1));

        store.select_silently(&NoSpans, 0, 0, 1, 1);
        assert_eq!(fired.get(), 0);
        store.select(&NoSpans, 0, 0, 1, 1);
        assert_eq!(fired.get(), 1);
    }
}
