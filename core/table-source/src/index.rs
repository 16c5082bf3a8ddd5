//! FILENAME: core/table-source/src/index.rs
//! PURPOSE: Row and column indexes with optional hierarchical levels.
//! CONTEXT: An `Index` stores one `Label` (tuple of values, one per level)
//! per row or column plus an optional name per level. Lookups are by label
//! prefix, so a level-0 label selects every column below it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::TableError;
use crate::value::Value;

/// A row or column label: one value per index level.
pub type Label = SmallVec<[Value; 2]>;

/// Builds a [`Label`] from a list of values.
///
/// `label!["A", "col_0"]` creates a two-level label.
#[macro_export]
macro_rules! label {
    ($($v:expr),+ $(,)?) => {
        $crate::Label::from_iter([$($crate::Value::from($v)),+])
    };
}

/// Ordered, possibly hierarchical labels for one axis of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    names: Vec<Option<String>>,
    labels: Vec<Label>,
}

impl Index {
    /// Default positional index `0..len` with a single unnamed level.
    pub fn range(len: usize) -> Self {
        Index {
            names: vec![None],
            labels: (0..len)
                .map(|i| Label::from_iter([Value::Int(i as i64)]))
                .collect(),
        }
    }

    /// Single-level index from plain values.
    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Index {
            names: vec![None],
            labels: values
                .into_iter()
                .map(|v| Label::from_iter([v.into()]))
                .collect(),
        }
    }

    /// Multi-level index from label tuples. Every tuple needs one value per name.
    pub fn from_tuples(names: Vec<Option<String>>, tuples: Vec<Label>) -> Result<Self, TableError> {
        if names.is_empty() {
            return Err(TableError::NoLevels);
        }
        if let Some(bad) = tuples.iter().find(|t| t.len() != names.len()) {
            return Err(TableError::LevelMismatch {
                expected: names.len(),
                actual: bad.len(),
            });
        }
        Ok(Index { names, labels: tuples })
    }

    /// Cartesian product of the level values, first level varying slowest.
    pub fn from_product(names: Vec<Option<String>>, levels: Vec<Vec<Value>>) -> Result<Self, TableError> {
        if levels.len() != names.len() {
            return Err(TableError::LevelMismatch {
                expected: names.len(),
                actual: levels.len(),
            });
        }
        let mut tuples: Vec<Label> = vec![Label::new()];
        for level in &levels {
            let mut next = Vec::with_capacity(tuples.len() * level.len());
            for prefix in &tuples {
                for v in level {
                    let mut t = prefix.clone();
                    t.push(v.clone());
                    next.push(t);
                }
            }
            tuples = next;
        }
        Index::from_tuples(names, tuples)
    }

    /// Replaces the level names. Extra or missing names are an error.
    pub fn with_names(mut self, names: Vec<Option<String>>) -> Result<Self, TableError> {
        if names.len() != self.names.len() {
            return Err(TableError::LevelMismatch {
                expected: self.names.len(),
                actual: names.len(),
            });
        }
        self.names = names;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn nlevels(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label at a position. Out-of-range positions are a programming error.
    pub fn label(&self, pos: usize) -> &Label {
        &self.labels[pos]
    }

    /// All positions whose label starts with `prefix`, in index order.
    pub fn positions_matching(&self, prefix: &[Value]) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.len() >= prefix.len() && l[..prefix.len()] == *prefix)
            .map(|(i, _)| i)
            .collect()
    }

    /// Inclusive label slice: from the first match of `start` to the last match of `end`.
    /// Returns an empty list if either bound is missing or the bounds are reversed.
    pub fn slice_positions(&self, start: &[Value], end: &[Value]) -> Vec<usize> {
        let first = self.positions_matching(start).first().copied();
        let last = self.positions_matching(end).last().copied();
        match (first, last) {
            (Some(a), Some(b)) if a <= b => (a..=b).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_index() {
        let idx = Index::range(3);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.nlevels(), 1);
        assert_eq!(idx.label(2)[0], Value::Int(2));
    }

    #[test]
    fn test_from_product_orders_first_level_slowest() {
        let idx = Index::from_product(
            vec![Some("char".into()), Some("color".into())],
            vec![
                vec!["X".into(), "Y".into()],
                vec!["green".into(), "purple".into()],
            ],
        )
        .unwrap();
        assert_eq!(idx.len(), 4);
        assert_eq!(*idx.label(1), label!["X", "purple"]);
        assert_eq!(*idx.label(2), label!["Y", "green"]);
    }

    #[test]
    fn test_from_tuples_rejects_ragged_labels() {
        let result = Index::from_tuples(vec![None, None], vec![label!["A"]]);
        assert_eq!(
            result,
            Err(TableError::LevelMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_prefix_lookup_selects_sub_levels() {
        let idx = Index::from_tuples(
            vec![None, None],
            vec![label!["A", "x"], label!["B", "y"], label!["A", "z"]],
        )
        .unwrap();
        assert_eq!(idx.positions_matching(&label!["A"]), vec![0, 2]);
        assert_eq!(idx.positions_matching(&label!["B", "y"]), vec![1]);
    }

    #[test]
    fn test_slice_positions_inclusive() {
        let idx = Index::range(5);
        assert_eq!(idx.slice_positions(&label![1], &label![3]), vec![1, 2, 3]);
        assert!(idx.slice_positions(&label![3], &label![1]).is_empty());
        assert!(idx.slice_positions(&label![9], &label![1]).is_empty());
    }
}
