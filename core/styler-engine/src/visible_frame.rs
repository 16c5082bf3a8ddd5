//! FILENAME: core/styler-engine/src/visible_frame.rs
//! PURPOSE: The ordered row/column projection of a source table.
//! CONTEXT: A `VisibleFrame` is built once per request from the hide state
//! and the sort criteria. It never copies cell data; it only stores which
//! source rows and columns are visible and in which order. Everything that
//! addresses "visible" coordinates goes through `row_order`/`col_order`.

use serde::{Deserialize, Serialize};
use table_source::{sort_rows, SortKey, SourceTable};

use crate::chunk::Chunk;
use crate::config::StyleConfig;
use crate::error::FrameError;
use crate::region::Region;

/// Ordered sort keys applied when building a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriteria {
    keys: Vec<SortKey>,
}

impl SortCriteria {
    /// Validates and builds sort criteria. An empty `ascending` list means
    /// every column sorts ascending.
    pub fn new(
        column_positions: &[usize],
        ascending: &[bool],
        column_count: usize,
    ) -> Result<Self, FrameError> {
        if !ascending.is_empty() && ascending.len() != column_positions.len() {
            return Err(FrameError::SortFlagsMismatch {
                columns: column_positions.len(),
                flags: ascending.len(),
            });
        }
        if let Some(&column) = column_positions.iter().find(|&&c| c >= column_count) {
            return Err(FrameError::SortColumnOutOfRange { column, column_count });
        }

        let keys = column_positions
            .iter()
            .enumerate()
            .map(|(i, &column)| SortKey {
                column,
                ascending: ascending.get(i).copied().unwrap_or(true),
            })
            .collect();
        Ok(SortCriteria { keys })
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Visible rows and columns of a source table, in display order.
#[derive(Debug, Clone)]
pub struct VisibleFrame<'a> {
    source: &'a dyn SourceTable,
    row_order: Vec<usize>,
    col_order: Vec<usize>,
    region: Region,
}

impl<'a> VisibleFrame<'a> {
    /// Builds the frame: drops hidden rows/columns, then sorts the rows.
    pub fn new(source: &'a dyn SourceTable, config: &StyleConfig, sort: &SortCriteria) -> Self {
        let mut row_order: Vec<usize> = (0..source.row_count())
            .filter(|r| !config.hidden_rows.contains(r))
            .collect();
        let col_order: Vec<usize> = (0..source.column_count())
            .filter(|c| !config.hidden_columns.contains(c))
            .collect();

        sort_rows(source, &mut row_order, sort.keys());

        Self::from_orders(source, row_order, col_order)
    }

    /// Frame over explicit source positions. Each position must appear at most once.
    pub fn from_orders(source: &'a dyn SourceTable, row_order: Vec<usize>, col_order: Vec<usize>) -> Self {
        debug_assert!(row_order.iter().all(|&r| r < source.row_count()));
        debug_assert!(col_order.iter().all(|&c| c < source.column_count()));
        let region = Region::new(0, 0, row_order.len(), col_order.len());
        VisibleFrame {
            source,
            row_order,
            col_order,
            region,
        }
    }

    pub fn source(&self) -> &'a dyn SourceTable {
        self.source
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn row_count(&self) -> usize {
        self.row_order.len()
    }

    pub fn column_count(&self) -> usize {
        self.col_order.len()
    }

    pub fn row_order(&self) -> &[usize] {
        &self.row_order
    }

    pub fn col_order(&self) -> &[usize] {
        &self.col_order
    }

    /// Source row of a visible row.
    pub fn source_row(&self, visible_row: usize) -> usize {
        self.row_order[visible_row]
    }

    /// Source column of a visible column.
    pub fn source_col(&self, visible_col: usize) -> usize {
        self.col_order[visible_col]
    }

    /// True if visible row `i` is source row `i` for every visible row.
    pub fn has_identity_rows(&self) -> bool {
        is_identity(&self.row_order)
    }

    /// True if visible column `i` is source column `i` for every visible column.
    pub fn has_identity_cols(&self) -> bool {
        is_identity(&self.col_order)
    }

    pub fn get_bounded_region(&self, region: &Region) -> Region {
        self.region.get_bounded_region(region)
    }

    /// Chunk over `region` (clamped), or over the whole frame.
    pub fn get_chunk(&self, region: Option<Region>) -> Chunk<'_, 'a> {
        let region = match region {
            Some(r) => self.get_bounded_region(&r),
            None => self.region,
        };
        Chunk::new(self, region)
    }

    /// Up to `max_columns` source column positions, starting at visible column `part_start`.
    pub fn column_indices(&self, part_start: usize, max_columns: usize) -> Vec<usize> {
        self.col_order
            .iter()
            .skip(part_start)
            .take(max_columns)
            .copied()
            .collect()
    }
}

fn is_identity(order: &[usize]) -> bool {
    order.iter().enumerate().all(|(i, &pos)| i == pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_source::{DataTable, Value};

    fn table() -> DataTable {
        DataTable::builder()
            .column("a", vec![3.into(), 1.into(), 2.into(), 1.into()])
            .column("b", vec![0.into(), 1.into(), 2.into(), 3.into()])
            .column("c", vec![Value::Null, 5.into(), 6.into(), 7.into()])
            .build()
            .unwrap()
    }

    #[test]
    fn test_hidden_positions_are_excluded() {
        let t = table();
        let config = StyleConfig::new().hide_rows([1]).hide_columns([0]);
        let frame = VisibleFrame::new(&t, &config, &SortCriteria::default());
        assert_eq!(frame.row_order(), &[0, 2, 3]);
        assert_eq!(frame.col_order(), &[1, 2]);
        assert_eq!(frame.region(), Region::new(0, 0, 3, 2));
        assert!(!frame.has_identity_rows());
        assert!(!frame.has_identity_cols());
    }

    #[test]
    fn test_trailing_hidden_row_keeps_identity() {
        let t = table();
        let config = StyleConfig::new().hide_rows([3]);
        let frame = VisibleFrame::new(&t, &config, &SortCriteria::default());
        assert!(frame.has_identity_rows());
        assert!(frame.has_identity_cols());
    }

    #[test]
    fn test_sort_applies_after_hiding() {
        let t = table();
        let config = StyleConfig::new().hide_rows([2]);
        let sort = SortCriteria::new(&[0], &[true], 3).unwrap();
        let frame = VisibleFrame::new(&t, &config, &sort);
        assert_eq!(frame.row_order(), &[1, 3, 0]);
        assert!(!frame.has_identity_rows());
    }

    #[test]
    fn test_sort_criteria_validation() {
        assert_eq!(
            SortCriteria::new(&[5], &[], 3),
            Err(FrameError::SortColumnOutOfRange { column: 5, column_count: 3 })
        );
        assert_eq!(
            SortCriteria::new(&[0, 1], &[true], 3),
            Err(FrameError::SortFlagsMismatch { columns: 2, flags: 1 })
        );
        let defaulted = SortCriteria::new(&[0, 1], &[], 3).unwrap();
        assert!(defaulted.keys().iter().all(|k| k.ascending));
    }

    #[test]
    fn test_column_indices_pagination() {
        let t = table();
        let config = StyleConfig::new().hide_columns([1]);
        let frame = VisibleFrame::new(&t, &config, &SortCriteria::default());
        assert_eq!(frame.column_indices(0, 1), vec![0]);
        assert_eq!(frame.column_indices(1, 5), vec![2]);
        assert!(frame.column_indices(4, 2).is_empty());
    }

    #[test]
    fn test_get_chunk_clamps_region() {
        let t = table();
        let frame = VisibleFrame::new(&t, &StyleConfig::new(), &SortCriteria::default());
        let chunk = frame.get_chunk(Some(Region::new(3, 1, 10, 10)));
        assert_eq!(chunk.region(), Region::new(3, 1, 1, 2));
        let empty = frame.get_chunk(Some(Region::new(9, 9, 1, 1)));
        assert!(empty.region().is_empty());
    }
}
