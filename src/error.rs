//! Structured error types for gridview.
//!
//! Most grid operations clamp instead of failing; the variants here cover the
//! few boundaries where the caller has to know something was refused.

/// All errors that can surface from gridview.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A cell selection was requested with a negative origin (gutter click).
    #[error("Selection origin ({x}, {y}) is negative")]
    NegativeOrigin { x: i32, y: i32 },

    /// Configuration or scenario JSON could not be decoded.
    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),

    /// A merge overlaps one that is already registered.
    #[error("Merge at ({x}, {y}) overlaps an existing merge")]
    OverlappingMerge { x: i32, y: i32 },

    /// An index lies outside the grid shape.
    #[error("Index {index} out of bounds (count {count})")]
    OutOfBounds { index: i32, count: i32 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
