//! Disjoint sorted set of closed integer intervals.
//!
//! Used for row and column selections. Intervals are kept merged: two
//! intervals that overlap or touch (`a.1 + 1 == b.0`) are stored as one.

use serde::{Deserialize, Serialize};

/// Union of disjoint closed intervals, sorted by start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSet {
    ranges: Vec<(i32, i32)>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `[lo, hi]`. Reversed bounds are swapped.
    pub fn select(&mut self, lo: i32, hi: i32) {
        let (lo, hi) = ordered(lo, hi);

        // First interval that could touch [lo, hi]: its end reaches lo - 1.
        let start = self
            .ranges
            .partition_point(|&(_, end)| end.saturating_add(1) < lo);
        // One past the last interval that could touch: its start is at most hi + 1.
        let stop = self
            .ranges
            .partition_point(|&(begin, _)| begin <= hi.saturating_add(1));

        let mut merged = (lo, hi);
        if start < stop {
            if let (Some(first), Some(last)) = (self.ranges.get(start), self.ranges.get(stop - 1)) {
                merged = (lo.min(first.0), hi.max(last.1));
            }
            self.ranges.drain(start..stop);
        }
        self.ranges.insert(start, merged);
    }

    /// Remove `[lo, hi]`, splitting an interval if needed. Reversed bounds are swapped.
    pub fn deselect(&mut self, lo: i32, hi: i32) {
        let (lo, hi) = ordered(lo, hi);

        let start = self.ranges.partition_point(|&(_, end)| end < lo);
        let stop = self.ranges.partition_point(|&(begin, _)| begin <= hi);
        if start >= stop {
            return;
        }

        let mut kept = Vec::with_capacity(2);
        if let Some(&(begin, _)) = self.ranges.get(start) {
            if begin < lo {
                kept.push((begin, lo - 1));
            }
        }
        if let Some(&(_, end)) = self.ranges.get(stop - 1) {
            if end > hi {
                kept.push((hi + 1, end));
            }
        }
        self.ranges.splice(start..stop, kept);
    }

    /// Binary search over interval starts.
    pub fn is_selected(&self, index: i32) -> bool {
        let after = self.ranges.partition_point(|&(begin, _)| begin <= index);
        after
            .checked_sub(1)
            .and_then(|i| self.ranges.get(i))
            .is_some_and(|&(_, end)| index <= end)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// The stored intervals, sorted and disjoint.
    pub fn ranges(&self) -> &[(i32, i32)] {
        &self.ranges
    }

    /// Total number of selected indices.
    pub fn len(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| u64::from(hi.abs_diff(lo)) + 1)
            .sum()
    }

    /// Lazily enumerate every selected index in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.ranges.iter().flat_map(|&(lo, hi)| lo..=hi)
    }

    /// True if any index of `[lo, hi]` is selected.
    pub fn intersects(&self, lo: i32, hi: i32) -> bool {
        let (lo, hi) = ordered(lo, hi);
        let start = self.ranges.partition_point(|&(_, end)| end < lo);
        self.ranges.get(start).is_some_and(|&(begin, _)| begin <= hi)
    }
}

fn ordered(lo: i32, hi: i32) -> (i32, i32) {
    if lo > hi {
        (hi, lo)
    } else {
        (lo, hi)
    }
}
