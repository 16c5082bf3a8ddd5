//! FILENAME: core/styler-engine/src/translator.rs
//! PURPOSE: Rewrites chunk-local positional identifiers to global ones.
//! CONTEXT: Per-chunk props number rows and columns from 0. Before props of
//! different chunks can be merged, every `row<N>` / `col<N>` token in ids,
//! classes and cellstyle selectors is rewritten to the source position of
//! that row or column. Ids and selectors are split on `_`, classes on
//! whitespace; all other tokens are left untouched.

use crate::chunk::Chunk;
use crate::props::ChunkProps;

/// Maps a chunk-local position on one axis to its global position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTranslator {
    /// `global = local + offset`.
    Offset(usize),
    /// `global = positions[local]`.
    Lookup(Vec<usize>),
}

impl IndexTranslator {
    pub fn translate(&self, local: usize) -> usize {
        match self {
            IndexTranslator::Offset(offset) => local + offset,
            IndexTranslator::Lookup(positions) => positions[local],
        }
    }
}

/// Which translator an axis uses for a whole request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorStrategy {
    /// Visible order is the identity slice of the source.
    Offset,
    Lookup,
}

impl TranslatorStrategy {
    pub fn select(identity: bool) -> Self {
        if identity {
            TranslatorStrategy::Offset
        } else {
            TranslatorStrategy::Lookup
        }
    }

    fn build(&self, first_visible: usize, source_positions: &[usize]) -> IndexTranslator {
        match self {
            TranslatorStrategy::Offset => IndexTranslator::Offset(first_visible),
            TranslatorStrategy::Lookup => IndexTranslator::Lookup(source_positions.to_vec()),
        }
    }
}

pub struct CoordinateTranslator {
    rows: IndexTranslator,
    cols: IndexTranslator,
}

impl CoordinateTranslator {
    pub fn new(rows: IndexTranslator, cols: IndexTranslator) -> Self {
        CoordinateTranslator { rows, cols }
    }

    pub fn for_chunk(chunk: &Chunk<'_, '_>, rows: TranslatorStrategy, cols: TranslatorStrategy) -> Self {
        let region = chunk.region();
        CoordinateTranslator {
            rows: rows.build(region.first_row, chunk.source_rows()),
            cols: cols.build(region.first_col, chunk.source_cols()),
        }
    }

    pub fn adjust(&self, props: &mut ChunkProps) {
        for element in props.head.iter_mut().chain(props.body.iter_mut()).flatten() {
            if let Some(id) = element.id.as_mut() {
                *id = self.rewrite(id, '_');
            }
            element.class = self.rewrite(&element.class, ' ');
        }
        for entry in props.cellstyle.iter_mut() {
            for selector in entry.selectors.iter_mut() {
                *selector = self.rewrite(selector, '_');
            }
        }
    }

    fn rewrite(&self, text: &str, delimiter: char) -> String {
        let parts: Vec<String> = if delimiter == ' ' {
            text.split_whitespace().map(|t| self.rewrite_token(t)).collect()
        } else {
            text.split(delimiter).map(|t| self.rewrite_token(t)).collect()
        };
        parts.join(&delimiter.to_string())
    }

    fn rewrite_token(&self, token: &str) -> String {
        if let Some(n) = positional(token, "row") {
            format!("row{}", self.rows.translate(n))
        } else if let Some(n) = positional(token, "col") {
            format!("col{}", self.cols.translate(n))
        } else {
            token.to_string()
        }
    }
}

/// `row12` -> `Some(12)` for prefix `row`; anything else -> `None`.
fn positional(token: &str, prefix: &str) -> Option<usize> {
    let digits = token.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
