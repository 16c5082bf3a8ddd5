//! FILENAME: core/styler-engine/src/validator.rs
//! PURPOSE: Detects styling rules whose output depends on chunk boundaries.
//! CONTEXT: Each rule is re-run in isolation over the same region twice,
//! once as a single chunk and once split into smaller chunks, and the
//! translated per-cell styles are compared. Read-only: nothing rendered is
//! touched.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::context::{RenderContext, RuleSelection};
use crate::error::RenderError;
use crate::logging::{log_info, log_warn};
use crate::props::CssDeclaration;
use crate::region::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStrategy {
    /// Whole region against a 2x2 split.
    #[default]
    Fast,
    /// Whole region against 1x1 chunks.
    Precision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationReason {
    NotEqual,
    Exception(String),
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProblem {
    pub rule_index: usize,
    pub rule_name: String,
    pub reason: ValidationReason,
}

type StyleMap = FxHashMap<String, Vec<CssDeclaration>>;

pub struct StyleFunctionsValidator<'c, 'a> {
    ctx: &'c RenderContext<'a>,
}

impl<'c, 'a> StyleFunctionsValidator<'c, 'a> {
    pub fn new(ctx: &'c RenderContext<'a>) -> Self {
        StyleFunctionsValidator { ctx }
    }

    pub fn validate(
        &self,
        region: Region,
        strategy: ValidationStrategy,
    ) -> Result<Vec<ValidationProblem>, RenderError> {
        let region = self.ctx.frame().get_bounded_region(&region);
        let split = match strategy {
            ValidationStrategy::Fast => region.iterate_chunkwise(region.rows.div_ceil(2), region.cols.div_ceil(2)),
            ValidationStrategy::Precision => region.iterate_chunkwise(1, 1),
        };
        log_info!(
            "VALIDATE",
            "validating {} rules on {:?} ({:?}, {} chunks)",
            self.ctx.rules().len(),
            region,
            strategy,
            split.len()
        );

        let mut problems = Vec::new();
        for rule in self.ctx.rules() {
            let reason = if !rule.supported {
                Some(ValidationReason::Unsupported)
            } else {
                let whole = self.styles_over(&[region], rule.index)?;
                let parts = self.styles_over(&split, rule.index)?;
                match (whole, parts) {
                    (Err(msg), _) | (_, Err(msg)) => Some(ValidationReason::Exception(msg)),
                    (Ok(a), Ok(b)) if a != b => Some(ValidationReason::NotEqual),
                    _ => None,
                }
            };

            if let Some(reason) = reason {
                log_warn!("VALIDATE", "rule {} ({}): {:?}", rule.index, rule.display_name, reason);
                problems.push(ValidationProblem {
                    rule_index: rule.index,
                    rule_name: rule.display_name.clone(),
                    reason,
                });
            }
        }
        Ok(problems)
    }

    /// Global styles of one rule over the given chunks, or the first error
    /// the rule raised.
    fn styles_over(&self, regions: &[Region], rule_index: usize) -> Result<Result<StyleMap, String>, RenderError> {
        let mut styles = StyleMap::default();
        let mut failures = Vec::new();
        for region in regions {
            let props = self
                .ctx
                .compute_chunk_props(*region, RuleSelection::Only(rule_index), &mut failures)?;
            if let Some(failure) = failures.first() {
                return Ok(Err(failure.error.to_string()));
            }
            for entry in props.cellstyle {
                for selector in entry.selectors {
                    styles.entry(selector).or_default().extend(entry.props.iter().cloned());
                }
            }
        }
        Ok(Ok(styles))
    }
}
