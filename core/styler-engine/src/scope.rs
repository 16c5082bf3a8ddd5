//! FILENAME: core/styler-engine/src/scope.rs
//! PURPOSE: Rebuilds a styling rule for one chunk.
//! CONTEXT: A rule is configured against the whole table. When only a chunk
//! is rendered, the rule has to see the chunk's share of its declared subset
//! and, for rules that compare a cell against its neighbours, the values of
//! the whole subset. This module provides both:
//!
//! - `ParentSubset` resolves the declared subset once per request and lazily
//!   caches the parent view (the un-chunked slice the rule was meant for).
//! - `ScopedStylingRule` is the per-chunk rule: the chunk-local rows/cols it
//!   applies to plus the strategy that feeds global context to the callback.
//!
//! Intersections and re-projections are done by label, never by position, so
//! they stay correct under sorting and hiding.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use rustc_hash::{FxHashMap, FxHashSet};
use table_source::{Label, SourceTable};

use crate::apply::{apply_along_axis, map_elements, Line};
use crate::builtins::{extent, gradient_data};
use crate::chunk::Chunk;
use crate::definition::{StyleArg, StyleArgs, StyleCallback, StyleMatrix};
use crate::error::StyleError;
use crate::logging::log_debug;
use crate::registry::{Extremum, RegisteredRule, StyleFunctionKind};
use crate::slice::StyleSlice;

/// One computed style of a chunk-local cell.
pub type CellStyle = (usize, usize, String);

// ============================================================================
// PARENT SUBSET
// ============================================================================

/// The declared subset of one rule, resolved against the source table.
/// Lives for one request; the parent view is built on first use.
pub struct ParentSubset<'a> {
    source: &'a dyn SourceTable,
    rows: Vec<usize>,
    cols: Vec<usize>,
    /// `None` when every row is selected.
    row_labels: Option<FxHashSet<Label>>,
    col_labels: Option<FxHashSet<Label>>,
    view: OnceCell<ParentView>,
}

impl<'a> ParentSubset<'a> {
    pub fn resolve(source: &'a dyn SourceTable, rule: &RegisteredRule) -> Self {
        let subset = &rule.rule.subset;
        let rows = subset.rows.resolve(source.index());
        let cols = subset.cols.resolve(source.columns());

        let label_set = |positions: &[usize], all: usize, index: &table_source::Index| {
            (positions.len() != all)
                .then(|| positions.iter().map(|&p| index.label(p).clone()).collect::<FxHashSet<_>>())
        };
        let row_labels = label_set(&rows, source.row_count(), source.index());
        let col_labels = label_set(&cols, source.column_count(), source.columns());

        ParentSubset {
            source,
            rows,
            cols,
            row_labels,
            col_labels,
            view: OnceCell::new(),
        }
    }

    pub fn contains_row(&self, label: &Label) -> bool {
        self.row_labels.as_ref().map_or(true, |s| s.contains(label))
    }

    pub fn contains_col(&self, label: &Label) -> bool {
        self.col_labels.as_ref().map_or(true, |s| s.contains(label))
    }

    /// The un-chunked slice of the declared subset.
    pub fn view(&self) -> &ParentView {
        self.view.get_or_init(|| {
            log_debug!(
                "STYLE",
                "building parent view {}x{}",
                self.rows.len(),
                self.cols.len()
            );
            ParentView::new(StyleSlice::from_source(self.source, &self.rows, &self.cols))
        })
    }
}

/// A part of the parent view handed to one callback invocation, together
/// with its cached value extent.
pub struct ParentLine {
    pub slice: StyleSlice,
    extent: OnceCell<Option<(f64, f64)>>,
}

impl ParentLine {
    fn extent_with<F>(&self, compute: F) -> Result<Option<(f64, f64)>, StyleError>
    where
        F: FnOnce(&StyleSlice) -> Result<Option<(f64, f64)>, StyleError>,
    {
        self.extent.get_or_try_init(|| compute(&self.slice)).copied()
    }
}

pub struct ParentView {
    slice: StyleSlice,
    row_pos: FxHashMap<Label, usize>,
    col_pos: FxHashMap<Label, usize>,
    /// First repeated label per axis. An axis with repeats cannot be
    /// addressed by label at all.
    dup_row: Option<Label>,
    dup_col: Option<Label>,
    lines: RefCell<FxHashMap<Line, Rc<ParentLine>>>,
}

impl ParentView {
    fn new(slice: StyleSlice) -> Self {
        let positions = |labels: &[Label]| {
            let mut map = FxHashMap::default();
            let mut dup = None;
            for (i, l) in labels.iter().enumerate() {
                if map.insert(l.clone(), i).is_some() && dup.is_none() {
                    dup = Some(l.clone());
                }
            }
            (map, dup)
        };
        let (row_pos, dup_row) = positions(slice.row_labels());
        let (col_pos, dup_col) = positions(slice.col_labels());
        ParentView {
            row_pos,
            col_pos,
            dup_row,
            dup_col,
            slice,
            lines: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn slice(&self) -> &StyleSlice {
        &self.slice
    }

    /// The parent part matching an operand part: same-labelled column,
    /// same-labelled row, or the whole view.
    fn line_for(&self, part: &StyleSlice, line: Line) -> Result<Rc<ParentLine>, StyleError> {
        let key = match line {
            Line::Whole => Line::Whole,
            Line::Column(_) => {
                let label = &part.col_labels()[0];
                Line::Column(self.col_position(label)?)
            }
            Line::Row(_) => {
                let label = &part.row_labels()[0];
                Line::Row(self.row_position(label)?)
            }
        };

        if let Some(cached) = self.lines.borrow().get(&key) {
            return Ok(Rc::clone(cached));
        }
        let slice = match key {
            Line::Whole => self.slice.clone(),
            Line::Column(c) => self.slice.column(c),
            Line::Row(r) => self.slice.row(r),
        };
        let entry = Rc::new(ParentLine {
            slice,
            extent: OnceCell::new(),
        });
        self.lines.borrow_mut().insert(key, Rc::clone(&entry));
        Ok(entry)
    }

    fn row_position(&self, label: &Label) -> Result<usize, StyleError> {
        if let Some(dup) = &self.dup_row {
            return Err(ambiguous(dup));
        }
        self.row_pos.get(label).copied().ok_or_else(|| missing(label))
    }

    fn col_position(&self, label: &Label) -> Result<usize, StyleError> {
        if let Some(dup) = &self.dup_col {
            return Err(ambiguous(dup));
        }
        self.col_pos.get(label).copied().ok_or_else(|| missing(label))
    }

    fn locate_row(&self, within: &StyleSlice, label: &Label) -> Result<usize, StyleError> {
        if within.n_rows() == self.slice.n_rows() {
            self.row_position(label)
        } else {
            within.row_position(label).ok_or_else(|| missing(label))
        }
    }

    fn locate_col(&self, within: &StyleSlice, label: &Label) -> Result<usize, StyleError> {
        if within.n_cols() == self.slice.n_cols() {
            self.col_position(label)
        } else {
            within.col_position(label).ok_or_else(|| missing(label))
        }
    }

    /// Re-projects an array-shaped argument from parent shape to `part`.
    /// Arrays follow the parent line, matrices the whole parent view.
    fn reproject(
        &self,
        name: &str,
        arg: &StyleArg,
        parent: &StyleSlice,
        part: &StyleSlice,
    ) -> Result<StyleArg, StyleError> {
        match arg {
            StyleArg::Array(values) => {
                if parent.n_cols() == 1 && values.len() == parent.n_rows() {
                    part.row_labels()
                        .iter()
                        .map(|l| self.locate_row(parent, l).map(|p| values[p]))
                        .collect::<Result<Vec<_>, _>>()
                        .map(StyleArg::Array)
                } else if parent.n_rows() == 1 && values.len() == parent.n_cols() {
                    part.col_labels()
                        .iter()
                        .map(|l| self.locate_col(parent, l).map(|p| values[p]))
                        .collect::<Result<Vec<_>, _>>()
                        .map(StyleArg::Array)
                } else {
                    Err(StyleError::invalid_arg(
                        name,
                        format!(
                            "array of length {} does not align with the {}x{} subset",
                            values.len(),
                            parent.n_rows(),
                            parent.n_cols()
                        ),
                    ))
                }
            }
            StyleArg::Matrix(matrix) => {
                let (rows, cols) = (self.slice.n_rows(), self.slice.n_cols());
                if matrix.len() != rows || matrix.iter().any(|r| r.len() != cols) {
                    return Err(StyleError::invalid_arg(
                        name,
                        format!("matrix shape does not match the {}x{} subset", rows, cols),
                    ));
                }
                let row_pos = part
                    .row_labels()
                    .iter()
                    .map(|l| self.row_position(l))
                    .collect::<Result<Vec<_>, _>>()?;
                let col_pos = part
                    .col_labels()
                    .iter()
                    .map(|l| self.col_position(l))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(StyleArg::Matrix(
                    row_pos
                        .iter()
                        .map(|&r| col_pos.iter().map(|&c| matrix[r][c]).collect())
                        .collect(),
                ))
            }
            other => Ok(other.clone()),
        }
    }

    fn reproject_all(
        &self,
        args: &StyleArgs,
        names: Option<&[&str]>,
        parent: &StyleSlice,
        part: &StyleSlice,
    ) -> Result<StyleArgs, StyleError> {
        args.iter()
            .map(|(name, arg)| {
                let selected = names.map_or(true, |n| n.contains(&name.as_str()));
                let arg = if selected && arg.is_array_like() {
                    self.reproject(name, arg, parent, part)?
                } else {
                    arg.clone()
                };
                Ok((name.clone(), arg))
            })
            .collect()
    }
}

fn missing(label: &Label) -> StyleError {
    StyleError::failed(format!("label {:?} is not part of the parent subset", label.as_slice()))
}

fn ambiguous(label: &Label) -> StyleError {
    StyleError::failed(format!("label {:?} is not unique in the parent subset", label.as_slice()))
}

// ============================================================================
// SCOPED RULE
// ============================================================================

/// A rule rebuilt for one chunk.
pub struct ScopedStylingRule<'r> {
    rule: &'r RegisteredRule,
    /// Chunk-local rows in the declared subset, in chunk order.
    rows: Vec<usize>,
    /// Chunk-local columns in the declared subset, in chunk order.
    cols: Vec<usize>,
    parent: Option<&'r ParentView>,
}

impl<'r> ScopedStylingRule<'r> {
    /// Scopes `rule` to `chunk`. Unsupported rules are never scoped.
    pub fn build(rule: &'r RegisteredRule, parent: &'r ParentSubset<'_>, chunk: &Chunk<'_, '_>) -> Option<Self> {
        if !rule.supported {
            return None;
        }
        let region = chunk.region();
        let rows = (0..region.rows)
            .filter(|&r| parent.contains_row(chunk.label_at(r)))
            .collect();
        let cols = (0..region.cols)
            .filter(|&c| parent.contains_col(chunk.column_at(c)))
            .collect();

        Some(ScopedStylingRule {
            rule,
            rows,
            cols,
            parent: rule.needs_parent_context.then(|| parent.view()),
        })
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Runs the rule on its share of `chunk_slice` and returns the styles in
    /// chunk-local coordinates.
    pub fn compute(&self, chunk_slice: &StyleSlice) -> Result<Vec<CellStyle>, StyleError> {
        let operand = chunk_slice.select(&self.rows, &self.cols);
        let styles = self.invoke(&operand)?;

        let mut result = Vec::new();
        for (i, row) in styles.into_iter().enumerate() {
            for (j, style) in row.into_iter().enumerate() {
                if let Some(css) = style {
                    result.push((self.rows[i], self.cols[j], css));
                }
            }
        }
        Ok(result)
    }

    /// Invokes the callback on an operand. Empty operands are returned
    /// unstyled without calling through.
    pub fn invoke(&self, operand: &StyleSlice) -> Result<StyleMatrix, StyleError> {
        if operand.is_empty() {
            return Ok(operand.empty_styles());
        }
        let rule = &self.rule.rule;

        match &rule.callback {
            StyleCallback::Map(f) => map_elements(operand, |v| f(v, &rule.kwargs)),
            StyleCallback::Apply(f) => apply_along_axis(operand, rule.axis, |part, line| match self.parent {
                None => f(part, &rule.kwargs),
                Some(view) => {
                    let parent = view.line_for(part, line)?;
                    let args = self.scoped_args(view, &parent, part)?;
                    f(part, &args)
                }
            }),
            StyleCallback::ApplyWithParent(f) => apply_along_axis(operand, rule.axis, |part, line| {
                let view = self
                    .parent
                    .ok_or_else(|| StyleError::failed("parent subset was not resolved"))?;
                let parent = view.line_for(part, line)?;
                let args = view.reproject_all(&rule.kwargs, None, &parent.slice, part)?;
                f(part, &parent.slice, &args)
            }),
        }
    }

    /// Keyword arguments for one invocation, with global context filled in.
    fn scoped_args(&self, view: &ParentView, parent: &ParentLine, part: &StyleSlice) -> Result<StyleArgs, StyleError> {
        let kwargs = &self.rule.rule.kwargs;

        match self.rule.kind {
            StyleFunctionKind::Gradient(_) => {
                let mut args = view.reproject_all(kwargs, Some(&["gmap"]), &parent.slice, part)?;
                let bound = |name: &str| matches!(kwargs.get(name), Some(StyleArg::Number(_)));
                if !bound("vmin") || !bound("vmax") {
                    let range = parent.extent_with(|s| {
                        let parent_args = view.reproject_all(kwargs, Some(&["gmap"]), s, s)?;
                        Ok(extent(&gradient_data(s, &parent_args)?))
                    })?;
                    if let Some((lo, hi)) = range {
                        if !bound("vmin") {
                            args.insert("vmin".to_string(), StyleArg::Number(lo));
                        }
                        if !bound("vmax") {
                            args.insert("vmax".to_string(), StyleArg::Number(hi));
                        }
                    }
                }
                Ok(args)
            }
            StyleFunctionKind::ExtremaHighlight(extremum) => {
                let range = parent.extent_with(|s| {
                    Ok(s.numbers().fold(None::<(f64, f64)>, |acc, x| match acc {
                        None => Some((x, x)),
                        Some((lo, hi)) => Some((f64::min(lo, x), f64::max(hi, x))),
                    }))
                })?;
                let value = match (range, extremum) {
                    (Some((_, hi)), Extremum::Max) => StyleArg::Number(hi),
                    (Some((lo, _)), Extremum::Min) => StyleArg::Number(lo),
                    (None, _) => StyleArg::Null,
                };
                let mut args = kwargs.clone();
                args.insert("value".to_string(), value);
                Ok(args)
            }
            StyleFunctionKind::RangeHighlight => {
                view.reproject_all(kwargs, Some(&["left", "right"]), &parent.slice, part)
            }
            StyleFunctionKind::NullHighlight | StyleFunctionKind::FixedProperties | StyleFunctionKind::Custom => {
                Ok(kwargs.clone())
            }
        }
    }
}
