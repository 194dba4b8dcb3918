use serde::{Deserialize, Serialize};

/// What kind of gesture produced a selection rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    /// Standard cell selection (default)
    #[default]
    CellRange,
    /// Entire row(s) selected
    RowRange,
    /// Entire column(s) selected
    ColumnRange,
    /// All rows selected (corner click)
    All,
}

impl SelectionType {
    /// True for selections that span a full axis.
    pub fn is_full_span(self) -> bool {
        !matches!(self, SelectionType::CellRange)
    }
}
