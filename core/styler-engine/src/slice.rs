//! FILENAME: core/styler-engine/src/slice.rs
//! PURPOSE: Labeled 2-D slice handed to styling callbacks.
//! CONTEXT: Styling callbacks never see the `SourceTable` directly. They get a
//! `StyleSlice`: a small row-major copy of the addressed cells together with
//! their row labels, column labels and dtypes. A slice is what a chunk
//! materializes through `Chunk::to_frame` and what a parent subset caches.

use table_source::{DType, Label, SourceTable, Value};

use crate::definition::StyleMatrix;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSlice {
    row_labels: Vec<Label>,
    col_labels: Vec<Label>,
    dtypes: Vec<DType>,
    values: Vec<Vec<Value>>,
}

impl StyleSlice {
    pub fn new(
        row_labels: Vec<Label>,
        col_labels: Vec<Label>,
        dtypes: Vec<DType>,
        values: Vec<Vec<Value>>,
    ) -> Self {
        debug_assert_eq!(values.len(), row_labels.len());
        debug_assert_eq!(dtypes.len(), col_labels.len());
        debug_assert!(values.iter().all(|r| r.len() == col_labels.len()));
        StyleSlice {
            row_labels,
            col_labels,
            dtypes,
            values,
        }
    }

    /// Copies the cells at the given source positions, in the given order.
    pub fn from_source(source: &dyn SourceTable, rows: &[usize], cols: &[usize]) -> Self {
        let index = source.index();
        let columns = source.columns();
        StyleSlice {
            row_labels: rows.iter().map(|&r| index.label(r).clone()).collect(),
            col_labels: cols.iter().map(|&c| columns.label(c).clone()).collect(),
            dtypes: cols.iter().map(|&c| source.dtype(c)).collect(),
            values: rows
                .iter()
                .map(|&r| cols.iter().map(|&c| source.value(r, c)).collect())
                .collect(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_cols() == 0
    }

    pub fn row_labels(&self) -> &[Label] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[Label] {
        &self.col_labels
    }

    pub fn dtypes(&self) -> &[DType] {
        &self.dtypes
    }

    pub fn values(&self) -> &[Vec<Value>] {
        &self.values
    }

    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.values[row][col]
    }

    /// Numeric cells in row-major order; nulls and non-numbers are skipped.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().filter_map(Value::as_f64)
    }

    /// Sub-slice at local positions.
    pub fn select(&self, rows: &[usize], cols: &[usize]) -> StyleSlice {
        StyleSlice {
            row_labels: rows.iter().map(|&r| self.row_labels[r].clone()).collect(),
            col_labels: cols.iter().map(|&c| self.col_labels[c].clone()).collect(),
            dtypes: cols.iter().map(|&c| self.dtypes[c]).collect(),
            values: rows
                .iter()
                .map(|&r| cols.iter().map(|&c| self.values[r][c].clone()).collect())
                .collect(),
        }
    }

    /// Single column as an n x 1 slice.
    pub fn column(&self, col: usize) -> StyleSlice {
        let rows: Vec<usize> = (0..self.n_rows()).collect();
        self.select(&rows, &[col])
    }

    /// Single row as a 1 x m slice.
    pub fn row(&self, row: usize) -> StyleSlice {
        let cols: Vec<usize> = (0..self.n_cols()).collect();
        self.select(&[row], &cols)
    }

    /// A style matrix of this slice's shape with no styles set.
    pub fn empty_styles(&self) -> StyleMatrix {
        vec![vec![None; self.n_cols()]; self.n_rows()]
    }

    pub fn row_position(&self, label: &Label) -> Option<usize> {
        self.row_labels.iter().position(|l| l == label)
    }

    pub fn col_position(&self, label: &Label) -> Option<usize> {
        self.col_labels.iter().position(|l| l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_source::{label, DataTable, Index};

    #[test]
    fn test_from_source_follows_given_order() {
        let t = DataTable::builder()
            .column("a", vec![1.into(), 2.into(), 3.into()])
            .column("b", vec!["x".into(), "y".into(), "z".into()])
            .build()
            .unwrap()
            .with_index(Index::from_values(["r0", "r1", "r2"]))
            .unwrap();
        let slice = StyleSlice::from_source(&t, &[2, 0], &[1, 0]);
        assert_eq!(slice.n_rows(), 2);
        assert_eq!(slice.row_labels()[0], label!["r2"]);
        assert_eq!(slice.col_labels()[0], label!["b"]);
        assert_eq!(*slice.value(0, 1), Value::Int(3));
        assert_eq!(slice.dtypes(), &[DType::Object, DType::Int64]);
    }

    #[test]
    fn test_column_and_row_projection() {
        let t = DataTable::from_rows(vec![
            vec![1.into(), 2.into()],
            vec![3.into(), Value::Null],
        ])
        .unwrap();
        let slice = StyleSlice::from_source(&t, &[0, 1], &[0, 1]);
        let col = slice.column(1);
        assert_eq!((col.n_rows(), col.n_cols()), (2, 1));
        assert_eq!(col.numbers().collect::<Vec<_>>(), vec![2.0]);
        let row = slice.row(1);
        assert_eq!((row.n_rows(), row.n_cols()), (1, 2));
        assert_eq!(slice.empty_styles(), vec![vec![None, None], vec![None, None]]);
    }
}
