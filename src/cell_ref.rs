//! Utilities for parsing A1-style cell references and ranges.
//!
//! Columns are letters (`A` = 0, `Z` = 25, `AA` = 26), rows are 1-based
//! numbers. `$` markers are accepted and ignored.

use crate::types::{Point, Rectangle};

/// Parse a cell reference like "B3" into a 0-indexed point (`x` = column).
///
/// Returns `None` for malformed references, row 0, or values beyond `i32`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<Point> {
    let cell_ref = cell_ref.trim();
    let digits_at = cell_ref.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell_ref.split_at(digits_at);

    let mut col: i32 = 0;
    let mut saw_col = false;
    for ch in letters.chars().filter(|&c| c != '$') {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let byte = u8::try_from(ch.to_ascii_uppercase()).ok()?;
        let value = i32::from(byte - b'A') + 1;
        col = col.checked_mul(26)?.checked_add(value)?;
        saw_col = true;
    }

    let mut row: i32 = 0;
    for ch in digits.chars() {
        let value = i32::try_from(ch.to_digit(10)?).ok()?;
        row = row.checked_mul(10)?.checked_add(value)?;
    }

    if !saw_col || row == 0 {
        return None;
    }
    Some(Point::new(col - 1, row - 1))
}

/// Parse a range like "A1:C4" (or a single cell) into a rectangle.
///
/// The first reference becomes the anchor, so "C4:A1" yields a rectangle
/// with a negative extent dragged up and to the left.
pub fn parse_cell_range(range: &str) -> Option<Rectangle> {
    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (parse_cell_ref(start)?, parse_cell_ref(end)?),
        None => {
            let cell = parse_cell_ref(range)?;
            (cell, cell)
        }
    };
    Some(Rectangle::new(
        start.x,
        start.y,
        end.x.checked_sub(start.x)?,
        end.y.checked_sub(start.y)?,
    ))
}

/// Parse a whitespace or comma separated list of ranges, skipping bad entries.
pub fn parse_ranges(list: &str) -> Vec<Rectangle> {
    list.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .filter_map(parse_cell_range)
        .collect()
}

/// Column letters for a 0-indexed column ("A", "Z", "AA", ...).
pub fn column_name(col: i32) -> String {
    let mut n = i64::from(col.max(0)) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Format a point as an A1 reference.
pub fn format_cell_ref(point: Point) -> String {
    format!("{}{}", column_name(point.x), i64::from(point.y.max(0)) + 1)
}

/// Format a rectangle as an A1 range from its anchor to the opposite corner,
/// so "C4:A1" survives a parse/format cycle. Single cells print as "B2".
pub fn format_range(rect: &Rectangle) -> String {
    let (first, last) = (rect.first_selected_cell, rect.last_selected_cell);
    if first == last {
        format_cell_ref(first)
    } else {
        format!("{}:{}", format_cell_ref(first), format_cell_ref(last))
    }
}
