//! FILENAME: core/styler-engine/src/generator.rs
//! PURPOSE: Builds a `TableFrame` from chunk props.
//! CONTEXT: The visible region is partitioned into a grid of chunks. Every
//! chunk is computed independently through the render context; its props
//! come back with global ids, so merging is a matter of concatenating bands
//! and resolving each cell's style by its global id at the end. The
//! unchunked path is the same pipeline with a single chunk, which is what
//! keeps the chunk size out of the result.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::context::{RenderContext, RuleSelection};
use crate::error::RenderError;
use crate::logging::{log_enter, log_exit};
use crate::props::{CssDeclaration, ElementKind};
use crate::region::Region;
use crate::view::{TableFrame, TableFrameCell, TableFrameColumn, TableFrameLegend};

pub struct TableFrameGenerator<'c, 'a> {
    ctx: &'c RenderContext<'a>,
}

impl<'c, 'a> TableFrameGenerator<'c, 'a> {
    pub fn new(ctx: &'c RenderContext<'a>) -> Self {
        TableFrameGenerator { ctx }
    }

    /// Renders `region` (or the whole frame) as a single chunk.
    pub fn generate(&self, region: Option<Region>) -> Result<TableFrame, RenderError> {
        let region = self.bounded(region);
        self.combine(region, region.rows, region.cols)
    }

    /// Renders the whole frame chunk by chunk. Sizes of 0 count as 1.
    pub fn generate_by_combining_chunks(
        &self,
        rows_per_chunk: usize,
        cols_per_chunk: usize,
    ) -> Result<TableFrame, RenderError> {
        let region = self.ctx.frame().region();
        self.combine(region, rows_per_chunk, cols_per_chunk)
    }

    fn bounded(&self, region: Option<Region>) -> Region {
        let frame = self.ctx.frame();
        region.map_or(frame.region(), |r| frame.get_bounded_region(&r))
    }

    fn combine(&self, region: Region, rows_per_chunk: usize, cols_per_chunk: usize) -> Result<TableFrame, RenderError> {
        log_enter!(
            "CHUNK",
            "combine",
            "{:?} in {}x{} chunks",
            region,
            rows_per_chunk,
            cols_per_chunk
        );
        let frame = self.ctx.frame();

        let mut index_labels: Vec<Vec<String>> = Vec::new();
        let mut column_labels: Vec<TableFrameColumn> = Vec::new();
        // an empty region has no cells at all, matching the collapsed structure
        let body_rows = if region.is_empty() { 0 } else { region.rows };
        let mut cells: Vec<Vec<(String, String)>> = vec![Vec::new(); body_rows];
        let mut styles: FxHashMap<String, Vec<CssDeclaration>> = FxHashMap::default();
        let mut failures = Vec::new();

        let chunks = region.iterate_chunkwise(rows_per_chunk, cols_per_chunk);
        for chunk_region in &chunks {
            let props = self
                .ctx
                .compute_chunk_props(*chunk_region, RuleSelection::All, &mut failures)?;

            if chunk_region.first_row == region.first_row && !props.head.is_empty() {
                let chunk = frame.get_chunk(Some(*chunk_region));
                for c in 0..chunk_region.cols {
                    let labels = props
                        .head
                        .iter()
                        .map(|level| {
                            level
                                .iter()
                                .filter(|e| e.kind == ElementKind::ColHeading)
                                .nth(c)
                                .map(|e| e.value.clone())
                                .unwrap_or_default()
                        })
                        .collect();
                    column_labels.push(TableFrameColumn {
                        dtype: chunk.dtype_at(c).to_string(),
                        labels,
                    });
                }
            }

            let band_row = chunk_region.first_row - region.first_row;
            for (r, row) in props.body.into_iter().enumerate() {
                let mut headings = Vec::new();
                for element in row {
                    match element.kind {
                        ElementKind::RowHeading => headings.push(element.value),
                        ElementKind::Data => {
                            cells[band_row + r].push((element.id.unwrap_or_default(), element.value))
                        }
                        ElementKind::Blank | ElementKind::ColHeading => {}
                    }
                }
                if chunk_region.first_col == region.first_col && !headings.is_empty() {
                    index_labels.push(headings);
                }
            }

            for entry in props.cellstyle {
                for selector in entry.selectors {
                    styles.entry(selector).or_default().extend(entry.props.iter().cloned());
                }
            }
        }

        let cells = cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(id, value)| TableFrameCell {
                        value,
                        style: styles
                            .get(&id)
                            .map(|decls| decls.iter().cloned().collect::<BTreeMap<_, _>>()),
                    })
                    .collect()
            })
            .collect();

        log_exit!(
            "CHUNK",
            "combine",
            "{} chunks, {} rule failures",
            chunks.len(),
            failures.len()
        );
        Ok(TableFrame {
            index_labels,
            column_labels,
            legend: self.legend(),
            cells,
        })
    }

    fn legend(&self) -> Option<TableFrameLegend> {
        let config = self.ctx.config();
        let source = self.ctx.frame().source();
        let index = level_names(source.index().names(), &config.visible_index_levels(source.index().nlevels()));
        let column = level_names(
            source.columns().names(),
            &config.visible_column_levels(source.columns().nlevels()),
        );
        if index.is_empty() && column.is_empty() {
            None
        } else {
            Some(TableFrameLegend { index, column })
        }
    }
}

/// Names of the given levels; empty when none of them is named.
fn level_names(names: &[Option<String>], levels: &[usize]) -> Vec<String> {
    if levels.iter().all(|&l| names.get(l).map_or(true, Option::is_none)) {
        return Vec::new();
    }
    levels
        .iter()
        .map(|&l| names.get(l).cloned().flatten().unwrap_or_default())
        .collect()
}
