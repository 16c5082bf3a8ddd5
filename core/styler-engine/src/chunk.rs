//! FILENAME: core/styler-engine/src/chunk.rs
//! PURPOSE: A rectangular window into a visible frame.
//! CONTEXT: A `Chunk` never stores data. Local offsets (0-based inside the
//! chunk) are mapped through the frame's row/column order onto source
//! positions. Out-of-range offsets are a programming error and panic.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use table_source::{float_to_string, DType, FormatError, Label, Value};

use crate::region::Region;
use crate::slice::StyleSlice;
use crate::visible_frame::VisibleFrame;

/// Values longer than this are cut in column descriptions.
pub const DESCRIBE_MAX_LEN: usize = 120;

/// Summary statistics of one column, or the reason they are undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnDescription {
    Stats(Vec<(String, String)>),
    Error(String),
}

impl ColumnDescription {
    /// Looks up a single statistic by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            ColumnDescription::Stats(stats) => stats
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            ColumnDescription::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Chunk<'f, 'a> {
    frame: &'f VisibleFrame<'a>,
    region: Region,
}

impl<'f, 'a> Chunk<'f, 'a> {
    pub fn new(frame: &'f VisibleFrame<'a>, region: Region) -> Self {
        Chunk { frame, region }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn frame(&self) -> &'f VisibleFrame<'a> {
        self.frame
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Source positions of the chunk's rows, in display order.
    pub fn source_rows(&self) -> &'f [usize] {
        &self.frame.row_order()[self.region.first_row..self.region.last_row_exclusive()]
    }

    /// Source positions of the chunk's columns, in display order.
    pub fn source_cols(&self) -> &'f [usize] {
        &self.frame.col_order()[self.region.first_col..self.region.last_col_exclusive()]
    }

    /// Maps a local (row, col) offset to source (row, col) positions.
    pub fn translate_to_source(&self, row_offset: usize, col_offset: usize) -> (usize, usize) {
        assert!(row_offset < self.region.rows && col_offset < self.region.cols);
        (
            self.frame.source_row(self.region.first_row + row_offset),
            self.frame.source_col(self.region.first_col + col_offset),
        )
    }

    fn source_col_at(&self, col_offset: usize) -> usize {
        assert!(col_offset < self.region.cols);
        self.frame.source_col(self.region.first_col + col_offset)
    }

    fn source_row_at(&self, row_offset: usize) -> usize {
        assert!(row_offset < self.region.rows);
        self.frame.source_row(self.region.first_row + row_offset)
    }

    pub fn cell_value_at(&self, row_offset: usize, col_offset: usize) -> Value {
        let (row, col) = self.translate_to_source(row_offset, col_offset);
        self.frame.source().value(row, col)
    }

    /// Display string of a cell, formatted by the source table.
    pub fn format_value_at(&self, row_offset: usize, col_offset: usize) -> Result<String, FormatError> {
        let (row, col) = self.translate_to_source(row_offset, col_offset);
        self.frame.source().format_value(row, col)
    }

    pub fn dtype_at(&self, col_offset: usize) -> DType {
        self.frame.source().dtype(self.source_col_at(col_offset))
    }

    /// Row label of a local row.
    pub fn label_at(&self, row_offset: usize) -> &'a Label {
        self.frame.source().index().label(self.source_row_at(row_offset))
    }

    /// Column label of a local column.
    pub fn column_at(&self, col_offset: usize) -> &'a Label {
        self.frame.source().columns().label(self.source_col_at(col_offset))
    }

    pub fn index_names(&self) -> &'a [Option<String>] {
        self.frame.source().index().names()
    }

    pub fn column_names(&self) -> &'a [Option<String>] {
        self.frame.source().columns().names()
    }

    /// Materializes the chunk as a standalone labeled slice.
    pub fn to_frame(&self) -> StyleSlice {
        StyleSlice::from_source(self.frame.source(), self.source_rows(), self.source_cols())
    }

    /// Summary statistics of a column over the chunk's rows.
    pub fn describe_at(&self, col_offset: usize) -> ColumnDescription {
        let dtype = self.dtype_at(col_offset);
        let values: Vec<Value> = (0..self.region.rows)
            .map(|r| self.cell_value_at(r, col_offset))
            .collect();

        let stats = if dtype.is_numeric() {
            describe_numeric(&values)
        } else {
            match describe_categorical(&values) {
                Ok(stats) => stats,
                Err(reason) => return ColumnDescription::Error(reason),
            }
        };

        ColumnDescription::Stats(
            stats
                .into_iter()
                .map(|(k, v)| (k.to_string(), truncate(v)))
                .collect(),
        )
    }
}

fn truncate(value: String) -> String {
    if value.chars().count() <= DESCRIBE_MAX_LEN {
        return value;
    }
    let mut cut: String = value.chars().take(DESCRIBE_MAX_LEN).collect();
    cut.push('…');
    cut
}

/// Linear interpolation between closest ranks, on sorted input.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn describe_numeric(values: &[Value]) -> Vec<(&'static str, String)> {
    let mut nums: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    nums.sort_by(f64::total_cmp);

    let n = nums.len();
    let mean = if n == 0 {
        f64::NAN
    } else {
        nums.iter().sum::<f64>() / n as f64
    };
    let std = if n < 2 {
        f64::NAN
    } else {
        let var = nums.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    };

    vec![
        ("count", float_to_string(n as f64)),
        ("mean", float_to_string(mean)),
        ("std", float_to_string(std)),
        ("min", float_to_string(nums.first().copied().unwrap_or(f64::NAN))),
        ("25%", float_to_string(quantile(&nums, 0.25))),
        ("50%", float_to_string(quantile(&nums, 0.5))),
        ("75%", float_to_string(quantile(&nums, 0.75))),
        ("max", float_to_string(nums.last().copied().unwrap_or(f64::NAN))),
    ]
}

fn describe_categorical(values: &[Value]) -> Result<Vec<(&'static str, String)>, String> {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();
    if present.iter().any(|v| matches!(v, Value::List(_))) {
        return Err("unhashable type: 'list'".to_string());
    }

    // first-seen order decides ties for "top"
    let mut counts: FxHashMap<&Value, (usize, usize)> = FxHashMap::default();
    for (pos, v) in present.iter().enumerate() {
        counts.entry(*v).or_insert((0, pos)).0 += 1;
    }
    let top = counts
        .iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(v, (c, _))| (v.to_string(), c.to_string()));

    let (top, freq) = top.unwrap_or_else(|| ("nan".to_string(), "nan".to_string()));
    Ok(vec![
        ("count", present.len().to_string()),
        ("unique", counts.len().to_string()),
        ("top", top),
        ("freq", freq),
    ])
}
