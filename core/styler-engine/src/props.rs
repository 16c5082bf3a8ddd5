//! FILENAME: core/styler-engine/src/props.rs
//! PURPOSE: Render properties of one chunk.
//! CONTEXT: `ChunkProps` is what per-chunk style computation produces before
//! anything is merged: header rows (`head`), body rows with row headings and
//! data cells (`body`) and the computed CSS grouped by declaration list
//! (`cellstyle`). Every positional identifier in here is chunk-local until
//! the `CoordinateTranslator` rewrites it.

use serde::{Deserialize, Serialize};

use table_source::format_label_value;

use crate::chunk::Chunk;
use crate::config::StyleConfig;
use crate::error::RenderError;
use crate::scope::CellStyle;

/// A single CSS declaration, `(property, value)`.
pub type CssDeclaration = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Blank,
    ColHeading,
    RowHeading,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub id: Option<String>,
    pub class: String,
    pub value: String,
}

/// Cells sharing one declaration list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyleEntry {
    pub props: Vec<CssDeclaration>,
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkProps {
    /// One row per visible column level.
    pub head: Vec<Vec<Element>>,
    /// One row per chunk row: row headings first, then data cells.
    pub body: Vec<Vec<Element>>,
    pub cellstyle: Vec<CellStyleEntry>,
}

/// Splits CSS text into declarations. Empty and malformed parts are skipped.
pub fn parse_css(css: &str) -> Vec<CssDeclaration> {
    css.split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let (prop, value) = (prop.trim(), value.trim());
            (!prop.is_empty()).then(|| (prop.to_string(), value.to_string()))
        })
        .collect()
}

pub fn data_id(row: usize, col: usize) -> String {
    format!("row{}_col{}", row, col)
}

/// Builds the chunk's props from its cells and the styles computed by each
/// rule, in rule order.
pub fn build_chunk_props(
    chunk: &Chunk<'_, '_>,
    config: &StyleConfig,
    rule_styles: &[Vec<CellStyle>],
) -> Result<ChunkProps, RenderError> {
    let region = chunk.region();
    let source = chunk.frame().source();
    let index_levels = config.visible_index_levels(source.index().nlevels());
    let column_levels = config.visible_column_levels(source.columns().nlevels());

    let head = column_levels
        .iter()
        .map(|&k| {
            let blanks = index_levels.iter().map(|_| Element {
                kind: ElementKind::Blank,
                id: None,
                class: format!("blank level{}", k),
                value: String::new(),
            });
            let headings = (0..region.cols).map(|c| Element {
                kind: ElementKind::ColHeading,
                id: Some(format!("level{}_col{}", k, c)),
                class: format!("col_heading level{} col{}", k, c),
                value: format_label_value(&chunk.column_at(c)[k]),
            });
            blanks.chain(headings).collect()
        })
        .collect();

    let mut body = Vec::with_capacity(region.rows);
    for r in 0..region.rows {
        let label = chunk.label_at(r);
        let mut row: Vec<Element> = index_levels
            .iter()
            .map(|&k| Element {
                kind: ElementKind::RowHeading,
                id: Some(format!("level{}_row{}", k, r)),
                class: format!("row_heading level{} row{}", k, r),
                value: format_label_value(&label[k]),
            })
            .collect();
        for c in 0..region.cols {
            row.push(Element {
                kind: ElementKind::Data,
                id: Some(data_id(r, c)),
                class: format!("data row{} col{}", r, c),
                value: chunk.format_value_at(r, c)?,
            });
        }
        body.push(row);
    }

    Ok(ChunkProps {
        head,
        body,
        cellstyle: group_cell_styles(region.rows, region.cols, rule_styles),
    })
}

/// Concatenates the declarations of all rules per cell, then groups cells
/// with identical declaration lists (row-major, first seen first).
fn group_cell_styles(rows: usize, cols: usize, rule_styles: &[Vec<CellStyle>]) -> Vec<CellStyleEntry> {
    let mut per_cell: Vec<Vec<CssDeclaration>> = vec![Vec::new(); rows * cols];
    for styles in rule_styles {
        for (r, c, css) in styles {
            per_cell[r * cols + c].extend(parse_css(css));
        }
    }

    let mut entries: Vec<CellStyleEntry> = Vec::new();
    for (pos, props) in per_cell.into_iter().enumerate() {
        if props.is_empty() {
            continue;
        }
        let selector = data_id(pos / cols, pos % cols);
        match entries.iter_mut().find(|e| e.props == props) {
            Some(entry) => entry.selectors.push(selector),
            None => entries.push(CellStyleEntry {
                props,
                selectors: vec![selector],
            }),
        }
    }
    entries
}
