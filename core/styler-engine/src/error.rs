//! FILENAME: core/styler-engine/src/error.rs

use table_source::FormatError;
use thiserror::Error;

/// Raised by sort configuration. The previous ordering stays in effect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("sort column {column} is out of range (table has {column_count} columns)")]
    SortColumnOutOfRange { column: usize, column_count: usize },

    #[error("got {flags} ascending flags for {columns} sort columns")]
    SortFlagsMismatch { columns: usize, flags: usize },
}

/// A styling rule failed on a valid chunk.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("style function returned a {actual_rows}x{actual_cols} result for a {expected_rows}x{expected_cols} operand")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("{0}")]
    Failed(String),
}

impl StyleError {
    pub fn failed(msg: impl Into<String>) -> Self {
        StyleError::Failed(msg.into())
    }

    pub(crate) fn invalid_arg(name: &str, reason: impl Into<String>) -> Self {
        StyleError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Fatal render failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("formatting failed: {0}")]
    Formatting(#[from] FormatError),
}
