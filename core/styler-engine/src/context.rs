//! FILENAME: core/styler-engine/src/context.rs
//! PURPOSE: Per-request render state.
//! CONTEXT: A `RenderContext` is built fresh for every request. It owns the
//! visible frame, the per-rule parent subsets and the translator strategies,
//! and borrows the shared, immutable configuration. Nothing computed here is
//! ever stored on the source table or on the rules, so concurrent requests
//! against the same table cannot see each other's scratch state.

use table_source::SourceTable;

use crate::chunk::Chunk;
use crate::config::StyleConfig;
use crate::error::{RenderError, StyleError};
use crate::logging::{log_debug, log_warn};
use crate::props::{build_chunk_props, ChunkProps};
use crate::region::Region;
use crate::registry::{RegisteredRule, StyleFunctionRegistry};
use crate::scope::{CellStyle, ParentSubset, ScopedStylingRule};
use crate::translator::{CoordinateTranslator, TranslatorStrategy};
use crate::visible_frame::{SortCriteria, VisibleFrame};

/// A rule that failed on one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    pub rule_index: usize,
    pub error: StyleError,
}

/// Which configured rules take part in a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSelection {
    All,
    Only(usize),
}

impl RuleSelection {
    fn includes(&self, index: usize) -> bool {
        match self {
            RuleSelection::All => true,
            RuleSelection::Only(i) => *i == index,
        }
    }
}

pub struct RenderContext<'a> {
    frame: VisibleFrame<'a>,
    config: &'a StyleConfig,
    rules: &'a [RegisteredRule],
    parents: Vec<ParentSubset<'a>>,
    row_strategy: TranslatorStrategy,
    col_strategy: TranslatorStrategy,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        source: &'a dyn SourceTable,
        config: &'a StyleConfig,
        sort: &SortCriteria,
        registry: &'a StyleFunctionRegistry,
    ) -> Self {
        let frame = VisibleFrame::new(source, config, sort);
        let row_strategy = TranslatorStrategy::select(frame.has_identity_rows());
        let col_strategy = TranslatorStrategy::select(frame.has_identity_cols());
        log_debug!(
            "FRAME",
            "visible {}x{} of {}x{}, translators rows={:?} cols={:?}",
            frame.row_count(),
            frame.column_count(),
            source.row_count(),
            source.column_count(),
            row_strategy,
            col_strategy
        );

        let parents = registry
            .rules()
            .iter()
            .map(|rule| ParentSubset::resolve(source, rule))
            .collect();

        RenderContext {
            frame,
            config,
            rules: registry.rules(),
            parents,
            row_strategy,
            col_strategy,
        }
    }

    pub fn frame(&self) -> &VisibleFrame<'a> {
        &self.frame
    }

    pub fn config(&self) -> &StyleConfig {
        self.config
    }

    pub fn rules(&self) -> &[RegisteredRule] {
        self.rules
    }

    /// Styles of every selected rule on `chunk`, in chunk-local coordinates.
    /// A failing rule contributes nothing and is recorded in `failures`.
    pub fn compute_styles(
        &self,
        chunk: &Chunk<'_, 'a>,
        selection: RuleSelection,
        failures: &mut Vec<RuleFailure>,
    ) -> Vec<Vec<CellStyle>> {
        if chunk.is_empty() {
            return Vec::new();
        }
        let slice = chunk.to_frame();
        let mut result = Vec::new();

        for (rule, parent) in self.rules.iter().zip(self.parents.iter()) {
            if !selection.includes(rule.index) {
                continue;
            }
            let Some(scoped) = ScopedStylingRule::build(rule, parent, chunk) else {
                continue;
            };
            match scoped.compute(&slice) {
                Ok(styles) => result.push(styles),
                Err(error) => {
                    log_warn!(
                        "STYLE",
                        "rule {} ({}) failed on {:?}: {}",
                        rule.index,
                        rule.display_name,
                        chunk.region(),
                        error
                    );
                    failures.push(RuleFailure {
                        rule_index: rule.index,
                        error,
                    });
                }
            }
        }
        result
    }

    /// Props of one region, with every positional id already translated to
    /// global (source) positions.
    pub fn compute_chunk_props(
        &self,
        region: Region,
        selection: RuleSelection,
        failures: &mut Vec<RuleFailure>,
    ) -> Result<ChunkProps, RenderError> {
        let chunk = self.frame.get_chunk(Some(region));
        let styles = self.compute_styles(&chunk, selection, failures);
        let mut props = build_chunk_props(&chunk, self.config, &styles)?;
        CoordinateTranslator::for_chunk(&chunk, self.row_strategy, self.col_strategy).adjust(&mut props);
        Ok(props)
    }
}
