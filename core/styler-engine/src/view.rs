//! FILENAME: core/styler-engine/src/view.rs
//! PURPOSE: The rendered result handed back to the host.
//! CONTEXT: These types are plain data, serialized as-is for the viewer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFrameCell {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BTreeMap<String, String>>,
}

impl TableFrameCell {
    pub fn new(value: impl Into<String>) -> Self {
        TableFrameCell {
            value: value.into(),
            style: None,
        }
    }

    pub fn styled(value: impl Into<String>, style: &[(&str, &str)]) -> Self {
        TableFrameCell {
            value: value.into(),
            style: Some(
                style
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFrameColumn {
    pub dtype: String,
    /// One entry per visible column level.
    pub labels: Vec<String>,
}

impl TableFrameColumn {
    pub fn new(dtype: impl Into<String>, labels: &[&str]) -> Self {
        TableFrameColumn {
            dtype: dtype.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Names of the visible index and column levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFrameLegend {
    pub index: Vec<String>,
    pub column: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFrame {
    pub index_labels: Vec<Vec<String>>,
    pub column_labels: Vec<TableFrameColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<TableFrameLegend>,
    pub cells: Vec<Vec<TableFrameCell>>,
}

/// Shape summary of a styled table, as seen by the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStructure {
    pub total_rows: usize,
    pub total_cols: usize,
    pub visible_rows: usize,
    pub visible_cols: usize,
    pub index_level_count: usize,
    pub column_level_count: usize,
    pub row_header_hidden: bool,
    pub column_header_hidden: bool,
}
