//! Listener registries for selection and scroll notifications.
//!
//! Emission is synchronous: listeners run after the mutation is applied and
//! before the mutating call returns, so a listener reading grid state sees
//! the new values.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::model::Axis;
use crate::types::SelectionType;

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
///
/// Ids are unique across every registry in the process, so one id never
/// matches a listener in a different registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);

/// Ordered set of callbacks for one event type.
pub struct Listeners<E> {
    entries: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Callbacks run in registration order.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What kind of mutation changed the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionChange {
    /// A rectangle was added or replaced.
    Selected(SelectionType),
    /// A duplicate rectangle was removed by a toggle.
    Toggled,
    /// The most recent rectangle was removed.
    ClearedMostRecent,
    /// Everything was cleared.
    Cleared,
    /// Rows were deselected.
    RowsDeselected,
    /// Columns were deselected.
    ColumnsDeselected,
}

/// Fired after every committed selection mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionChanged {
    pub change: SelectionChange,
    /// Number of rectangles after the change.
    pub selection_count: usize,
}

/// Fired when a scroll value actually moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollChanged {
    pub axis: Axis,
    pub old_value: f64,
    pub new_value: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_run_in_order_until_unsubscribed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::<u32>::new();

        let first = Rc::clone(&log);
        let a = listeners.subscribe(move |v| first.borrow_mut().push(("a", *v)));
        let second = Rc::clone(&log);
        listeners.subscribe(move |v| second.borrow_mut().push(("b", *v)));

        listeners.emit(&1);
        assert!(listeners.unsubscribe(a));
        assert!(!listeners.unsubscribe(a));
        listeners.emit(&2);

        assert_eq!(*log.borrow(), vec![("a", 1), ("b", 1), ("b", 2)]);
        assert_eq!(listeners.len(), 1);
    }
}
