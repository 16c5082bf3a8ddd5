//! FILENAME: core/styler-engine/src/region.rs
//! PURPOSE: Rectangular windows over the visible frame.

use serde::{Deserialize, Serialize};

/// A rectangle in visible (sorted/filtered) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    pub first_row: usize,
    pub first_col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Region {
    pub fn new(first_row: usize, first_col: usize, rows: usize, cols: usize) -> Self {
        Region { first_row, first_col, rows, cols }
    }

    /// Builds a region from untrusted signed offsets; negative values become 0.
    pub fn from_signed(first_row: i64, first_col: i64, rows: i64, cols: i64) -> Self {
        let clamp = |v: i64| usize::try_from(v).unwrap_or(0);
        Region::new(clamp(first_row), clamp(first_col), clamp(rows), clamp(cols))
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn last_row_exclusive(&self) -> usize {
        self.first_row + self.rows
    }

    pub fn last_col_exclusive(&self) -> usize {
        self.first_col + self.cols
    }

    /// Clamps `other` to lie within `self`. Never fails; an out-of-range
    /// region collapses to an empty one at the boundary.
    pub fn get_bounded_region(&self, other: &Region) -> Region {
        let first_row = other.first_row.clamp(self.first_row, self.last_row_exclusive());
        let first_col = other.first_col.clamp(self.first_col, self.last_col_exclusive());
        let rows = other
            .rows
            .min(self.last_row_exclusive() - first_row);
        let cols = other
            .cols
            .min(self.last_col_exclusive() - first_col);
        Region::new(first_row, first_col, rows, cols)
    }

    /// Splits the region into a grid of sub-regions, row band by row band.
    /// The last band of each axis may be smaller. Sizes of 0 count as 1.
    pub fn iterate_chunkwise(&self, rows_per_chunk: usize, cols_per_chunk: usize) -> Vec<Region> {
        if self.is_empty() {
            return Vec::new();
        }
        let rows_per_chunk = rows_per_chunk.max(1);
        let cols_per_chunk = cols_per_chunk.max(1);

        let mut result = Vec::new();
        let mut row = self.first_row;
        while row < self.last_row_exclusive() {
            let rows = rows_per_chunk.min(self.last_row_exclusive() - row);
            let mut col = self.first_col;
            while col < self.last_col_exclusive() {
                let cols = cols_per_chunk.min(self.last_col_exclusive() - col);
                result.push(Region::new(row, col, rows, cols));
                col += cols;
            }
            row += rows;
        }
        result
    }
}
