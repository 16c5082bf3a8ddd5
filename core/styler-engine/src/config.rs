//! FILENAME: core/styler-engine/src/config.rs
//! PURPOSE: Serializable configuration for a styled table and a viewer session.
//! CONTEXT: `StyleConfig` describes what is hidden (rows, columns, header
//! levels) and is an immutable snapshot once handed to a session.
//! `SessionConfig` holds the host's defaults for chunked rendering.

use serde::{Deserialize, Serialize};

use crate::validator::ValidationStrategy;

/// Hide state of a styled table. Positions refer to the source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Source row positions excluded from rendering.
    pub hidden_rows: Vec<usize>,

    /// Source column positions excluded from rendering.
    pub hidden_columns: Vec<usize>,

    /// Row index levels excluded from every row label.
    pub hidden_index_levels: Vec<usize>,

    /// Column index levels excluded from every column label.
    pub hidden_column_levels: Vec<usize>,

    /// Hides the whole row header (all index levels).
    pub index_hidden: bool,

    /// Hides the whole column header (all column levels).
    pub columns_hidden: bool,
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.hidden_rows.extend(rows);
        self
    }

    pub fn hide_columns(mut self, cols: impl IntoIterator<Item = usize>) -> Self {
        self.hidden_columns.extend(cols);
        self
    }

    pub fn hide_index(mut self) -> Self {
        self.index_hidden = true;
        self
    }

    pub fn hide_column_header(mut self) -> Self {
        self.columns_hidden = true;
        self
    }

    pub fn hide_index_level(mut self, level: usize) -> Self {
        self.hidden_index_levels.push(level);
        self
    }

    pub fn hide_column_level(mut self, level: usize) -> Self {
        self.hidden_column_levels.push(level);
        self
    }

    /// Visible row index levels, given the index depth.
    pub fn visible_index_levels(&self, nlevels: usize) -> Vec<usize> {
        visible_levels(nlevels, self.index_hidden, &self.hidden_index_levels)
    }

    /// Visible column index levels, given the column index depth.
    pub fn visible_column_levels(&self, nlevels: usize) -> Vec<usize> {
        visible_levels(nlevels, self.columns_hidden, &self.hidden_column_levels)
    }
}

fn visible_levels(nlevels: usize, all_hidden: bool, hidden: &[usize]) -> Vec<usize> {
    if all_hidden {
        return Vec::new();
    }
    (0..nlevels).filter(|l| !hidden.contains(l)).collect()
}

/// Host defaults for a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub rows_per_chunk: usize,
    pub cols_per_chunk: usize,
    pub validation_strategy: ValidationStrategy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            rows_per_chunk: 60,
            cols_per_chunk: 20,
            validation_strategy: ValidationStrategy::Fast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_levels() {
        let config = StyleConfig::new().hide_index_level(1);
        assert_eq!(config.visible_index_levels(3), vec![0, 2]);
        assert_eq!(config.visible_column_levels(2), vec![0, 1]);

        let hidden = StyleConfig::new().hide_column_header();
        assert!(hidden.visible_column_levels(2).is_empty());
    }

    #[test]
    fn test_session_config_defaults_from_partial_json() {
        let config: SessionConfig = serde_json::from_str(r#"{"rows_per_chunk": 10}"#).unwrap();
        assert_eq!(config.rows_per_chunk, 10);
        assert_eq!(config.cols_per_chunk, 20);
        assert_eq!(config.validation_strategy, ValidationStrategy::Fast);
    }

    #[test]
    fn test_style_config_roundtrips_through_json() {
        let config = StyleConfig::new().hide_rows([1, 3]).hide_index();
        let json = serde_json::to_string(&config).unwrap();
        let back: StyleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
