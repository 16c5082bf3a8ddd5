//! FILENAME: core/table-source/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("an index needs at least one level")]
    NoLevels,

    #[error("expected {expected} levels, got {actual}")]
    LevelMismatch { expected: usize, actual: usize },

    #[error("column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: usize,
        expected: usize,
        actual: usize,
    },

    #[error("index has {actual} labels, table has {expected} rows")]
    IndexLengthMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("cell ({row}, {col}) is outside of the table")]
    OutOfBounds { row: usize, col: usize },

    #[error("cannot format value of column {col}: {reason}")]
    Unformattable { col: usize, reason: String },
}
