//! The three request stages
//!
//! Each stage is a plain function over an immutable [`Context`]. The driver
//! runs [`STAGES`] in order and stops at the first [`Rejection`].

mod business;
mod presence;
mod types;

use crate::outcome::{Rejection, Stage};
use crate::predicate::Predicate;
use crate::rule_set::{RuleSet, Source};
use layerone_core::FieldMap;
use serde_json::Value;

/// Per-request view the stages read from.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Bound rule set
    pub rules: &'a RuleSet,
    /// Field map extracted from the selected source
    pub fields: &'a FieldMap,
    /// Selected source
    pub source: Source,
}

impl<'a> Context<'a> {
    /// Create a context over a rule set and extracted fields.
    pub fn new(rules: &'a RuleSet, fields: &'a FieldMap) -> Self {
        Self {
            rules,
            fields,
            source: rules.source(),
        }
    }
}

/// A stage function
pub type StageFn = fn(&Context<'_>) -> Result<(), Rejection>;

/// Stages in execution order
pub const STAGES: &[(Stage, StageFn)] = &[
    (Stage::Presence, presence::check),
    (Stage::Type, types::check),
    (Stage::Business, business::check),
];

/// View a value as a sequence of items: itself if it is an array, otherwise
/// a single-item slice.
pub(crate) fn items(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

/// Non-empty and every item satisfies the predicate.
pub(crate) fn every_item(value: &Value, predicate: &Predicate) -> bool {
    let items = items(value);
    !items.is_empty() && items.iter().all(|item| predicate.test(item))
}
