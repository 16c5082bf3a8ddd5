//! FILENAME: core/styler-engine/src/definition.rs
//! Styling Rule Definition - What the host configures.
//!
//! A `StylingRule` is an immutable description of one styling step:
//! - a callback that annotates cells of a labeled slice with CSS text
//! - the axis along which the callback is applied
//! - the declared subset (row/column selectors) it is restricted to
//! - keyword arguments bound at configuration time
//!
//! Rules are built once and shared between requests. Per-chunk behaviour is
//! never expressed by mutating a rule; see `scope.rs`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use table_source::{Index, Label, Value};

use crate::error::StyleError;
use crate::slice::StyleSlice;

/// One optional CSS string per cell of the operand, row-major.
pub type StyleMatrix = Vec<Vec<Option<String>>>;

/// Keyword arguments bound to a rule.
pub type StyleArgs = BTreeMap<String, StyleArg>;

// ============================================================================
// AXIS
// ============================================================================

/// How a callback is applied to its subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Down the rows: the callback runs once per column.
    #[default]
    Rows,
    /// Across the columns: the callback runs once per row.
    Cols,
    /// The callback runs once on the whole 2-D subset.
    Both,
    /// Element-wise.
    None,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::Rows => "rows",
            Axis::Cols => "cols",
            Axis::Both => "both",
            Axis::None => "none",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// ARGUMENTS
// ============================================================================

/// A bound keyword argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleArg {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// 1-D numbers aligned with the operand's only column or row.
    Array(Vec<f64>),
    /// 2-D numbers aligned with the operand.
    Matrix(Vec<Vec<f64>>),
}

impl StyleArg {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleArg::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleArg::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleArg::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Array-shaped arguments are the ones re-projected per chunk.
    pub fn is_array_like(&self) -> bool {
        matches!(self, StyleArg::Array(_) | StyleArg::Matrix(_))
    }
}

impl From<f64> for StyleArg {
    fn from(value: f64) -> Self {
        StyleArg::Number(value)
    }
}

impl From<i64> for StyleArg {
    fn from(value: i64) -> Self {
        StyleArg::Number(value as f64)
    }
}

impl From<bool> for StyleArg {
    fn from(value: bool) -> Self {
        StyleArg::Bool(value)
    }
}

impl From<&str> for StyleArg {
    fn from(value: &str) -> Self {
        StyleArg::Str(value.to_string())
    }
}

impl From<String> for StyleArg {
    fn from(value: String) -> Self {
        StyleArg::Str(value)
    }
}

impl From<Vec<f64>> for StyleArg {
    fn from(value: Vec<f64>) -> Self {
        StyleArg::Array(value)
    }
}

impl From<Vec<Vec<f64>>> for StyleArg {
    fn from(value: Vec<Vec<f64>>) -> Self {
        StyleArg::Matrix(value)
    }
}

// ============================================================================
// CALLBACKS
// ============================================================================

pub type ApplyFn = dyn Fn(&StyleSlice, &StyleArgs) -> Result<StyleMatrix, StyleError> + Send + Sync;

/// Receives the chunk operand, then the matching slice of the parent subset.
pub type ApplyWithParentFn =
    dyn Fn(&StyleSlice, &StyleSlice, &StyleArgs) -> Result<StyleMatrix, StyleError> + Send + Sync;

pub type MapFn = dyn Fn(&Value, &StyleArgs) -> Result<Option<String>, StyleError> + Send + Sync;

#[derive(Clone)]
pub enum StyleCallback {
    Apply(Arc<ApplyFn>),
    ApplyWithParent(Arc<ApplyWithParentFn>),
    Map(Arc<MapFn>),
}

impl fmt::Debug for StyleCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleCallback::Apply(_) => write!(f, "Apply(..)"),
            StyleCallback::ApplyWithParent(_) => write!(f, "ApplyWithParent(..)"),
            StyleCallback::Map(_) => write!(f, "Map(..)"),
        }
    }
}

// ============================================================================
// SUBSET
// ============================================================================

/// Selects positions along one axis of the source table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Selector {
    #[default]
    All,
    /// Labels or label prefixes; a level-0 value selects every entry below it.
    Labels(Vec<Label>),
    /// Inclusive label range.
    LabelRange { start: Label, end: Label },
    /// Source positions; out-of-range positions are ignored.
    Positions(Vec<usize>),
}

impl Selector {
    /// Source positions selected in `index`, without duplicates.
    pub fn resolve(&self, index: &Index) -> Vec<usize> {
        let positions = match self {
            Selector::All => return (0..index.len()).collect(),
            Selector::Labels(labels) => labels
                .iter()
                .flat_map(|l| index.positions_matching(l))
                .collect::<Vec<_>>(),
            Selector::LabelRange { start, end } => index.slice_positions(start, end),
            Selector::Positions(positions) => positions
                .iter()
                .copied()
                .filter(|&p| p < index.len())
                .collect(),
        };

        let mut seen = rustc_hash::FxHashSet::default();
        positions.into_iter().filter(|p| seen.insert(*p)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subset {
    pub rows: Selector,
    pub cols: Selector,
}

impl Subset {
    pub fn new(rows: Selector, cols: Selector) -> Self {
        Subset { rows, cols }
    }

    pub fn columns(cols: Selector) -> Self {
        Subset { rows: Selector::All, cols }
    }
}

// ============================================================================
// RULE
// ============================================================================

/// A configured styling rule.
#[derive(Debug, Clone)]
pub struct StylingRule {
    /// Stable identity, e.g. `styler::highlight_max` or `app::my_rule`.
    pub qualified_name: String,
    /// Whether the rule is one of the shipped builtins.
    pub builtin: bool,
    pub callback: StyleCallback,
    pub axis: Axis,
    pub subset: Subset,
    pub kwargs: StyleArgs,
}

impl StylingRule {
    /// A table-wise rule. `axis` must not be `Axis::None`; use [`StylingRule::map`].
    pub fn apply<F>(qualified_name: impl Into<String>, axis: Axis, f: F) -> Self
    where
        F: Fn(&StyleSlice, &StyleArgs) -> Result<StyleMatrix, StyleError> + Send + Sync + 'static,
    {
        Self::with_callback(qualified_name, axis, StyleCallback::Apply(Arc::new(f)))
    }

    /// A table-wise rule that also receives the parent subset.
    pub fn apply_with_parent<F>(qualified_name: impl Into<String>, axis: Axis, f: F) -> Self
    where
        F: Fn(&StyleSlice, &StyleSlice, &StyleArgs) -> Result<StyleMatrix, StyleError>
            + Send
            + Sync
            + 'static,
    {
        Self::with_callback(qualified_name, axis, StyleCallback::ApplyWithParent(Arc::new(f)))
    }

    /// An element-wise rule.
    pub fn map<F>(qualified_name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &StyleArgs) -> Result<Option<String>, StyleError> + Send + Sync + 'static,
    {
        Self::with_callback(qualified_name, Axis::None, StyleCallback::Map(Arc::new(f)))
    }

    fn with_callback(qualified_name: impl Into<String>, axis: Axis, callback: StyleCallback) -> Self {
        StylingRule {
            qualified_name: qualified_name.into(),
            builtin: false,
            callback,
            axis,
            subset: Subset::default(),
            kwargs: StyleArgs::new(),
        }
    }

    pub fn with_subset(mut self, subset: Subset) -> Self {
        self.subset = subset;
        self
    }

    pub fn with_arg(mut self, name: &str, value: impl Into<StyleArg>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }

    pub(crate) fn as_builtin(mut self) -> Self {
        self.builtin = true;
        self
    }

    pub fn arg(&self, name: &str) -> Option<&StyleArg> {
        self.kwargs.get(name)
    }
}
