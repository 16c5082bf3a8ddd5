//! FILENAME: core/styler-engine/src/apply.rs
//! PURPOSE: Applies a styling callback to a labeled slice along an axis.
//! CONTEXT: This is the execution primitive behind every rule. It splits the
//! operand into the parts the axis asks for, calls the callback on each part,
//! checks the shape of what comes back and stitches the pieces into one
//! style matrix shaped like the operand.

use table_source::Value;

use crate::definition::{Axis, StyleMatrix};
use crate::error::StyleError;
use crate::slice::StyleSlice;

/// Which part of the operand a callback invocation receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// Local column of the operand.
    Column(usize),
    /// Local row of the operand.
    Row(usize),
    Whole,
}

/// Runs `f` once per column (`Axis::Rows`), once per row (`Axis::Cols`) or
/// once on the whole operand (`Axis::Both`/`Axis::None`).
pub fn apply_along_axis<F>(operand: &StyleSlice, axis: Axis, mut f: F) -> Result<StyleMatrix, StyleError>
where
    F: FnMut(&StyleSlice, Line) -> Result<StyleMatrix, StyleError>,
{
    if operand.is_empty() {
        return Ok(operand.empty_styles());
    }

    match axis {
        Axis::Both | Axis::None => {
            let styles = f(operand, Line::Whole)?;
            check_shape(&styles, operand.n_rows(), operand.n_cols())?;
            Ok(styles)
        }
        Axis::Rows => {
            let mut result = operand.empty_styles();
            for c in 0..operand.n_cols() {
                let part = operand.column(c);
                let styles = f(&part, Line::Column(c))?;
                check_shape(&styles, operand.n_rows(), 1)?;
                for (r, mut row) in styles.into_iter().enumerate() {
                    result[r][c] = row.pop().flatten();
                }
            }
            Ok(result)
        }
        Axis::Cols => {
            let mut result = Vec::with_capacity(operand.n_rows());
            for r in 0..operand.n_rows() {
                let part = operand.row(r);
                let mut styles = f(&part, Line::Row(r))?;
                check_shape(&styles, 1, operand.n_cols())?;
                result.push(styles.pop().unwrap_or_default());
            }
            Ok(result)
        }
    }
}

/// Runs `f` on every cell.
pub fn map_elements<F>(operand: &StyleSlice, mut f: F) -> Result<StyleMatrix, StyleError>
where
    F: FnMut(&Value) -> Result<Option<String>, StyleError>,
{
    operand
        .values()
        .iter()
        .map(|row| row.iter().map(&mut f).collect())
        .collect()
}

fn check_shape(styles: &StyleMatrix, rows: usize, cols: usize) -> Result<(), StyleError> {
    let actual_cols = styles.first().map_or(0, Vec::len);
    let ragged = styles.iter().any(|r| r.len() != actual_cols);
    if styles.len() != rows || actual_cols != cols || ragged {
        return Err(StyleError::ShapeMismatch {
            expected_rows: rows,
            expected_cols: cols,
            actual_rows: styles.len(),
            actual_cols,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_source::DataTable;

    fn operand() -> StyleSlice {
        let t = DataTable::from_rows(vec![
            vec![1.into(), 2.into(), 3.into()],
            vec![4.into(), 5.into(), 6.into()],
        ])
        .unwrap();
        StyleSlice::from_source(&t, &[0, 1], &[0, 1, 2])
    }

    fn mark_first(part: &StyleSlice) -> StyleMatrix {
        let mut styles = part.empty_styles();
        styles[0][0] = Some("x".into());
        styles
    }

    #[test]
    fn test_axis_rows_runs_per_column() {
        let mut lines = Vec::new();
        let styles = apply_along_axis(&operand(), Axis::Rows, |part, line| {
            lines.push(line);
            Ok(mark_first(part))
        })
        .unwrap();
        assert_eq!(lines, vec![Line::Column(0), Line::Column(1), Line::Column(2)]);
        assert!(styles[0].iter().all(Option::is_some));
        assert!(styles[1].iter().all(Option::is_none));
    }

    #[test]
    fn test_axis_cols_runs_per_row() {
        let styles = apply_along_axis(&operand(), Axis::Cols, |part, _| Ok(mark_first(part))).unwrap();
        assert_eq!(styles[0][0].as_deref(), Some("x"));
        assert_eq!(styles[1][0].as_deref(), Some("x"));
        assert_eq!(styles[1][1], None);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let err = apply_along_axis(&operand(), Axis::Both, |_, _| Ok(vec![vec![None]])).unwrap_err();
        assert_eq!(
            err,
            StyleError::ShapeMismatch { expected_rows: 2, expected_cols: 3, actual_rows: 1, actual_cols: 1 }
        );
    }

    #[test]
    fn test_empty_operand_skips_callback() {
        let empty = operand().select(&[], &[0]);
        let styles = apply_along_axis(&empty, Axis::Rows, |_, _| Err(StyleError::failed("called"))).unwrap();
        assert!(styles.is_empty());
    }
}
