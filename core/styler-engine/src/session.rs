//! FILENAME: core/styler-engine/src/session.rs
//! PURPOSE: The host-facing API of a styled table.
//! CONTEXT: A `ViewerSession` holds the shared, immutable inputs (source
//! table, hide state, classified rules, session defaults) plus the current
//! sort criteria. Every call builds a fresh `RenderContext`; nothing is
//! cached between calls, so each call reflects the live source table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use table_source::SourceTable;

use crate::chunk::ColumnDescription;
use crate::config::{SessionConfig, StyleConfig};
use crate::context::{RenderContext, RuleSelection};
use crate::definition::{Axis, StylingRule};
use crate::error::{FrameError, RenderError};
use crate::generator::TableFrameGenerator;
use crate::logging::{log_info, log_warn};
use crate::props::ChunkProps;
use crate::region::Region;
use crate::registry::StyleFunctionRegistry;
use crate::validator::{StyleFunctionsValidator, ValidationProblem, ValidationStrategy};
use crate::view::{TableFrame, TableStructure};
use crate::visible_frame::SortCriteria;

/// Diagnostic description of one configured rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleFunctionDetails {
    pub index: usize,
    pub qualified_name: String,
    pub display_name: String,
    pub axis: Axis,
    pub is_builtin: bool,
    pub is_supported: bool,
    pub needs_parent_context: bool,
}

pub struct ViewerSession {
    source: Arc<dyn SourceTable + Send + Sync>,
    style_config: StyleConfig,
    registry: StyleFunctionRegistry,
    sort: SortCriteria,
    config: SessionConfig,
}

impl ViewerSession {
    pub fn new(source: Arc<dyn SourceTable + Send + Sync>, style_config: StyleConfig, rules: Vec<StylingRule>) -> Self {
        let registry = StyleFunctionRegistry::new(rules);
        log_info!(
            "SESSION",
            "session over {}x{} table with {} styling rules",
            source.row_count(),
            source.column_count(),
            registry.len()
        );
        ViewerSession {
            source,
            style_config,
            registry,
            sort: SortCriteria::default(),
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn style_config(&self) -> &StyleConfig {
        &self.style_config
    }

    pub fn sort_criteria(&self) -> &SortCriteria {
        &self.sort
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::new(&*self.source, &self.style_config, &self.sort, &self.registry)
    }

    pub fn get_table_structure(&self) -> TableStructure {
        let ctx = self.context();
        let frame = ctx.frame();
        let (mut visible_rows, mut visible_cols) = (frame.row_count(), frame.column_count());
        if visible_rows == 0 || visible_cols == 0 {
            visible_rows = 0;
            visible_cols = 0;
        }

        TableStructure {
            total_rows: self.source.row_count(),
            total_cols: self.source.column_count(),
            visible_rows,
            visible_cols,
            index_level_count: self
                .style_config
                .visible_index_levels(self.source.index().nlevels())
                .len(),
            column_level_count: self
                .style_config
                .visible_column_levels(self.source.columns().nlevels())
                .len(),
            row_header_hidden: self.style_config.index_hidden,
            column_header_hidden: self.style_config.columns_hidden,
        }
    }

    /// Renders `region` (or everything) without chunking.
    pub fn generate(&self, region: Option<Region>) -> Result<TableFrame, RenderError> {
        let ctx = self.context();
        TableFrameGenerator::new(&ctx).generate(region)
    }

    pub fn generate_by_combining_chunks(
        &self,
        rows_per_chunk: usize,
        cols_per_chunk: usize,
    ) -> Result<TableFrame, RenderError> {
        let ctx = self.context();
        TableFrameGenerator::new(&ctx).generate_by_combining_chunks(rows_per_chunk, cols_per_chunk)
    }

    /// Renders everything using the session's chunk sizes.
    pub fn render(&self) -> Result<TableFrame, RenderError> {
        self.generate_by_combining_chunks(self.config.rows_per_chunk, self.config.cols_per_chunk)
    }

    /// Replaces the sort criteria. On error the previous criteria stay active.
    pub fn set_sort_criteria(&mut self, column_positions: &[usize], ascending: &[bool]) -> Result<(), FrameError> {
        match SortCriteria::new(column_positions, ascending, self.source.column_count()) {
            Ok(sort) => {
                log_info!("SESSION", "sort criteria set to {:?}", sort.keys());
                self.sort = sort;
                Ok(())
            }
            Err(e) => {
                log_warn!("SESSION", "rejected sort criteria: {}", e);
                Err(e)
            }
        }
    }

    pub fn get_style_function_details(&self) -> Vec<StyleFunctionDetails> {
        self.registry
            .rules()
            .iter()
            .map(|r| StyleFunctionDetails {
                index: r.index,
                qualified_name: r.rule.qualified_name.clone(),
                display_name: r.display_name.clone(),
                axis: r.rule.axis,
                is_builtin: r.rule.builtin,
                is_supported: r.supported,
                needs_parent_context: r.needs_parent_context,
            })
            .collect()
    }

    /// Checks every rule for chunk-dependent output. Without a strategy the
    /// session default is used.
    pub fn validate_style_functions(
        &self,
        region: Region,
        strategy: Option<ValidationStrategy>,
    ) -> Result<Vec<ValidationProblem>, RenderError> {
        let ctx = self.context();
        let strategy = strategy.unwrap_or(self.config.validation_strategy);
        StyleFunctionsValidator::new(&ctx).validate(region, strategy)
    }

    /// Source positions of up to `max_columns` visible columns from `part_start`.
    pub fn get_column_indices(&self, part_start: usize, max_columns: usize) -> Vec<usize> {
        self.context().frame().column_indices(part_start, max_columns)
    }

    /// Summary statistics of a visible column over all visible rows.
    pub fn describe_column(&self, col: usize) -> ColumnDescription {
        let ctx = self.context();
        let chunk = ctx.frame().get_chunk(None);
        if col >= chunk.region().cols {
            return ColumnDescription::Error(format!("column {} is out of range", col));
        }
        chunk.describe_at(col)
    }

    /// Translated props of one region, for hosts that merge chunks themselves.
    pub fn compute_chunk_props(&self, region: Region) -> Result<ChunkProps, RenderError> {
        let ctx = self.context();
        let mut failures = Vec::new();
        ctx.compute_chunk_props(region, RuleSelection::All, &mut failures)
    }
}
