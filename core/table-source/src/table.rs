//! FILENAME: core/table-source/src/table.rs
//! PURPOSE: The `SourceTable` abstraction and an in-memory implementation.
//! CONTEXT: The styler never owns the data it renders. It reads through
//! `SourceTable`, which offers positional cell access, labels for both axes,
//! per-column dtypes and native formatting. `DataTable` is a column-major
//! store used by tests, benchmarks and hosts without their own table type.

use crate::error::{FormatError, TableError};
use crate::format::format_value;
use crate::index::{Index, Label};
use crate::value::{DType, Value};

/// Read-only access to an externally owned table.
/// Row and column positions are 0-based source positions.
pub trait SourceTable: std::fmt::Debug {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Row labels.
    fn index(&self) -> &Index;

    /// Column labels.
    fn columns(&self) -> &Index;

    fn dtype(&self, col: usize) -> DType;

    /// Cell value at a source position. Out-of-range positions are a programming error.
    fn value(&self, row: usize, col: usize) -> Value;

    /// Native display string of a cell.
    fn format_value(&self, row: usize, col: usize) -> Result<String, FormatError> {
        if row >= self.row_count() || col >= self.column_count() {
            return Err(FormatError::OutOfBounds { row, col });
        }
        Ok(format_value(&self.value(row, col), self.dtype(col)))
    }
}

#[derive(Debug, Clone)]
struct ColumnData {
    dtype: DType,
    values: Vec<Value>,
}

/// Column-major in-memory table.
#[derive(Debug, Clone)]
pub struct DataTable {
    index: Index,
    columns: Index,
    data: Vec<ColumnData>,
}

impl DataTable {
    pub fn builder() -> DataTableBuilder {
        DataTableBuilder::default()
    }

    /// Builds a table from row-major data with a default range index and
    /// `0..n` column labels. Dtypes are inferred per column.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Result<Self, TableError> {
        let col_count = rows.first().map_or(0, |r| r.len());
        let mut builder = DataTable::builder();
        for col in 0..col_count {
            let mut values = Vec::with_capacity(rows.len());
            for (row_idx, row) in rows.iter().enumerate() {
                let v = row.get(col).cloned().ok_or(TableError::LengthMismatch {
                    column: col,
                    expected: col_count,
                    actual: row_idx,
                })?;
                values.push(v);
            }
            builder = builder.column(col as i64, values);
        }
        builder.build()
    }

    /// Replaces the row index.
    pub fn with_index(mut self, index: Index) -> Result<Self, TableError> {
        if index.len() != self.row_count() {
            return Err(TableError::IndexLengthMismatch {
                expected: self.row_count(),
                actual: index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    /// Replaces the column index.
    pub fn with_columns(mut self, columns: Index) -> Result<Self, TableError> {
        if columns.len() != self.data.len() {
            return Err(TableError::IndexLengthMismatch {
                expected: self.data.len(),
                actual: columns.len(),
            });
        }
        self.columns = columns;
        Ok(self)
    }
}

impl SourceTable for DataTable {
    fn row_count(&self) -> usize {
        self.index.len()
    }

    fn column_count(&self) -> usize {
        self.data.len()
    }

    fn index(&self) -> &Index {
        &self.index
    }

    fn columns(&self) -> &Index {
        &self.columns
    }

    fn dtype(&self, col: usize) -> DType {
        self.data[col].dtype
    }

    fn value(&self, row: usize, col: usize) -> Value {
        self.data[col].values[row].clone()
    }
}

/// Incremental builder for [`DataTable`].
#[derive(Debug, Default)]
pub struct DataTableBuilder {
    labels: Vec<Label>,
    columns: Vec<ColumnData>,
    column_names: Option<Vec<Option<String>>>,
    index: Option<Index>,
}

impl DataTableBuilder {
    /// Adds a single-level column; the dtype is inferred from the values.
    pub fn column<L: Into<Value>>(self, label: L, values: Vec<Value>) -> Self {
        let dtype = DType::infer(&values);
        self.typed_column(Label::from_iter([label.into()]), dtype, values)
    }

    /// Adds a column with an explicit (possibly multi-level) label and dtype.
    pub fn typed_column(mut self, label: Label, dtype: DType, values: Vec<Value>) -> Self {
        self.labels.push(label);
        self.columns.push(ColumnData { dtype, values });
        self
    }

    /// Names for the column index levels.
    pub fn column_names(mut self, names: Vec<Option<String>>) -> Self {
        self.column_names = Some(names);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.index = Some(index);
        self
    }

    pub fn build(self) -> Result<DataTable, TableError> {
        let rows = self
            .index
            .as_ref()
            .map(Index::len)
            .or_else(|| self.columns.first().map(|c| c.values.len()))
            .unwrap_or(0);

        for (i, col) in self.columns.iter().enumerate() {
            if col.values.len() != rows {
                return Err(TableError::LengthMismatch {
                    column: i,
                    expected: rows,
                    actual: col.values.len(),
                });
            }
        }

        let levels = self.labels.first().map_or(1, |l| l.len());
        let names = self.column_names.unwrap_or_else(|| vec![None; levels]);
        let columns = Index::from_tuples(names, self.labels)?;
        let index = self.index.unwrap_or_else(|| Index::range(rows));

        Ok(DataTable {
            index,
            columns,
            data: self.columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label;

    fn sample() -> DataTable {
        DataTable::builder()
            .column("col_0", vec![0.into(), 1.into(), 2.into()])
            .column("col_1", vec![3.into(), 4.into(), 5.into()])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_infers_dtypes_and_labels() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.dtype(1), DType::Int64);
        assert_eq!(*table.columns().label(1), label!["col_1"]);
        assert_eq!(table.value(2, 1), Value::Int(5));
    }

    #[test]
    fn test_builder_rejects_ragged_columns() {
        let result = DataTable::builder()
            .column("a", vec![1.into(), 2.into()])
            .column("b", vec![1.into()])
            .build();
        assert!(matches!(result, Err(TableError::LengthMismatch { column: 1, .. })));
    }

    #[test]
    fn test_from_rows() {
        let table = DataTable::from_rows(vec![
            vec![0.into(), 3.into()],
            vec![1.into(), 4.into()],
        ])
        .unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(*table.columns().label(0), label![0]);
        assert_eq!(table.value(1, 0), Value::Int(1));
    }

    #[test]
    fn test_format_value_out_of_bounds() {
        let table = sample();
        assert_eq!(table.format_value(0, 1).unwrap(), "3");
        assert_eq!(
            table.format_value(7, 0),
            Err(FormatError::OutOfBounds { row: 7, col: 0 })
        );
    }

    #[test]
    fn test_with_index_checks_length() {
        let table = sample();
        assert!(table.clone().with_index(Index::range(2)).is_err());
        assert!(table.with_index(Index::from_values(["a", "b", "c"])).is_ok());
    }
}
