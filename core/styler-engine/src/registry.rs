//! FILENAME: core/styler-engine/src/registry.rs
//! PURPOSE: Classifies configured styling rules into a closed set of kinds.
//! CONTEXT: Classification runs once, when a session is configured. The kind
//! decides how a rule is scoped to a chunk, its display name and whether it
//! is supported at all. Nothing here executes a rule.

use serde::{Deserialize, Serialize};

use crate::builtins;
use crate::definition::{StyleArg, StyleCallback, StylingRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradientTarget {
    Background,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extremum {
    Max,
    Min,
}

impl Extremum {
    pub fn op(&self) -> &'static str {
        match self {
            Extremum::Max => "max",
            Extremum::Min => "min",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleFunctionKind {
    Gradient(GradientTarget),
    ExtremaHighlight(Extremum),
    NullHighlight,
    RangeHighlight,
    FixedProperties,
    Custom,
}

impl StyleFunctionKind {
    /// Kinds whose result depends on values outside the chunk.
    pub fn needs_parent_context(&self) -> bool {
        matches!(
            self,
            StyleFunctionKind::Gradient(_)
                | StyleFunctionKind::ExtremaHighlight(_)
                | StyleFunctionKind::RangeHighlight
        )
    }
}

/// A rule together with everything derived from it at configuration time.
#[derive(Debug, Clone)]
pub struct RegisteredRule {
    pub index: usize,
    pub rule: StylingRule,
    pub kind: StyleFunctionKind,
    pub display_name: String,
    pub supported: bool,
    pub needs_parent_context: bool,
}

impl RegisteredRule {
    pub fn new(index: usize, rule: StylingRule) -> Self {
        let (kind, supported) = classify(&rule);
        let display_name = display_name(&rule, kind);
        let with_parent = matches!(rule.callback, StyleCallback::ApplyWithParent(_));
        let is_map = matches!(rule.callback, StyleCallback::Map(_));
        let needs_parent_context = !is_map && (kind.needs_parent_context() || with_parent);

        RegisteredRule {
            index,
            rule,
            kind,
            display_name,
            supported,
            needs_parent_context,
        }
    }
}

fn classify(rule: &StylingRule) -> (StyleFunctionKind, bool) {
    if !rule.builtin {
        return (StyleFunctionKind::Custom, true);
    }

    let kind = match rule.qualified_name.as_str() {
        builtins::BACKGROUND_GRADIENT => {
            let text_only = rule.arg("text_only").and_then(StyleArg::as_bool).unwrap_or(false);
            StyleFunctionKind::Gradient(if text_only {
                GradientTarget::Text
            } else {
                GradientTarget::Background
            })
        }
        builtins::HIGHLIGHT_VALUE => match rule.arg("op").and_then(StyleArg::as_str) {
            Some("max") => StyleFunctionKind::ExtremaHighlight(Extremum::Max),
            Some("min") => StyleFunctionKind::ExtremaHighlight(Extremum::Min),
            _ => return (StyleFunctionKind::Custom, false),
        },
        builtins::HIGHLIGHT_NULL => StyleFunctionKind::NullHighlight,
        builtins::HIGHLIGHT_BETWEEN => StyleFunctionKind::RangeHighlight,
        builtins::SET_PROPERTIES => StyleFunctionKind::FixedProperties,
        _ => return (StyleFunctionKind::Custom, false),
    };
    (kind, true)
}

fn display_name(rule: &StylingRule, kind: StyleFunctionKind) -> String {
    let name = match kind {
        StyleFunctionKind::Gradient(GradientTarget::Background) => "background_gradient",
        StyleFunctionKind::Gradient(GradientTarget::Text) => "text_gradient",
        StyleFunctionKind::ExtremaHighlight(Extremum::Max) => "highlight_max",
        StyleFunctionKind::ExtremaHighlight(Extremum::Min) => "highlight_min",
        StyleFunctionKind::NullHighlight => "highlight_null",
        StyleFunctionKind::RangeHighlight => "highlight_between",
        StyleFunctionKind::FixedProperties => "set_properties",
        StyleFunctionKind::Custom => {
            return rule
                .qualified_name
                .rsplit("::")
                .next()
                .unwrap_or(&rule.qualified_name)
                .to_string();
        }
    };
    name.to_string()
}

/// The classified rules of one styled table, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct StyleFunctionRegistry {
    rules: Vec<RegisteredRule>,
}

impl StyleFunctionRegistry {
    pub fn new(rules: Vec<StylingRule>) -> Self {
        StyleFunctionRegistry {
            rules: rules
                .into_iter()
                .enumerate()
                .map(|(i, r)| RegisteredRule::new(i, r))
                .collect(),
        }
    }

    pub fn rules(&self) -> &[RegisteredRule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&RegisteredRule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
