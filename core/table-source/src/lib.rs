//! FILENAME: core/table-source/src/lib.rs
//! Source table abstraction for the chunked styler.
//!
//! The styler treats the tabular store as an external collaborator. This
//! crate defines what it needs from that store and ships a small in-memory
//! implementation.
//!
//! Layers:
//! - `value`: scalar values and dtypes
//! - `index`: row/column labels with optional levels
//! - `table`: the `SourceTable` trait and `DataTable`
//! - `format`: native cell formatting
//! - `sort`: stable multi-key sort over row positions

pub mod error;
pub mod format;
pub mod index;
pub mod sort;
pub mod table;
pub mod value;

pub use error::{FormatError, TableError};
pub use format::{format_label_value, format_value, format_value_with_precision, DEFAULT_PRECISION};
pub use index::{Index, Label};
pub use sort::{sort_rows, SortKey};
pub use table::{DataTable, DataTableBuilder, SourceTable};
pub use value::{float_to_string, DType, Value};
