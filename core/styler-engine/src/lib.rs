//! FILENAME: core/styler-engine/src/lib.rs
//! Chunked rendering and styling-scope engine.
//!
//! Renders a large source table for a viewer one rectangular chunk at a
//! time, while styling rules that need global context (column extremes,
//! gradients, ranged highlights) still see the values of their whole subset.
//! Chunk size is a performance knob only; it never shows up in the result.
//!
//! Layers:
//! - `visible_frame` / `chunk` / `region`: which source cells are shown, and where
//! - `definition` / `builtins`: styling rules (WHAT the host configures)
//! - `registry` / `scope` / `apply`: how a rule is classified and run per chunk
//! - `props` / `translator`: per-chunk output and its global ids
//! - `context` / `generator` / `validator`: one request, end to end
//! - `session`: the host-facing API

pub mod logging;

pub mod apply;
pub mod builtins;
pub mod chunk;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod generator;
pub mod props;
pub mod region;
pub mod registry;
pub mod scope;
pub mod session;
pub mod slice;
pub mod translator;
pub mod validator;
pub mod view;
pub mod visible_frame;

pub use chunk::{Chunk, ColumnDescription};
pub use config::{SessionConfig, StyleConfig};
pub use context::{RenderContext, RuleFailure, RuleSelection};
pub use definition::*;
pub use error::{FrameError, RenderError, StyleError};
pub use generator::TableFrameGenerator;
pub use props::{CellStyleEntry, ChunkProps, Element, ElementKind};
pub use region::Region;
pub use registry::{Extremum, GradientTarget, RegisteredRule, StyleFunctionKind, StyleFunctionRegistry};
pub use session::{StyleFunctionDetails, ViewerSession};
pub use slice::StyleSlice;
pub use translator::{CoordinateTranslator, IndexTranslator, TranslatorStrategy};
pub use validator::{StyleFunctionsValidator, ValidationProblem, ValidationReason, ValidationStrategy};
pub use view::{TableFrame, TableFrameCell, TableFrameColumn, TableFrameLegend, TableStructure};
pub use visible_frame::{SortCriteria, VisibleFrame};
