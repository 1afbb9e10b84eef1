//! Structural checks over bound rule sets
//!
//! Every failure here is an operator error: the rule set itself is wrong, not
//! the request. The pipeline turns these into the fatal outcome and logs the
//! message below.

use crate::predicate::Predicate;
use crate::rule::Rule;
use crate::rule_set::RuleSet;
use serde_json::{json, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// Keys a rule declaration may carry
pub const RULE_KEYS: &[&str] = &["prop", "type", "biz", "optional"];

/// Malformed rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The declaration is neither a rule object nor a sequence of them
    #[error("Rules must be an object or an array of objects, found {found}")]
    NotARuleSet { found: String },

    /// `prop` is absent or empty
    #[error("The 'prop' property is mandatory")]
    MissingProp,

    /// `prop` is present but not a string
    #[error("The 'prop' property of '{found}' must be a string")]
    PropNotString { found: String },

    /// A rule declares a key outside `prop`, `type`, `biz`, `optional`
    #[error("Prohibited property '{key}' on '{prop}'. Allowed: prop, type, biz, optional")]
    DisallowedKey { prop: String, key: String },

    /// The rule collection carries a property besides its rules and source
    #[error("Multiple rules must be on an array; unexpected property '{key}'")]
    StrayProperty { key: String },

    /// `type` or `biz` does not resolve to a predicate
    #[error("The '{key}' property of '{prop}' must be a function")]
    NotCallable { prop: String, key: String },

    /// `optional` is present but not a boolean
    #[error("The 'optional' property of '{prop}' must be a boolean")]
    OptionalNotBool { prop: String },

    /// The type predicate accepts every sentinel value
    #[error(
        "Ensure that the 'type' property of '{prop}' is checked for its type. \
         For example: `type: |v| v.is_string()`. \
         Hint: Perform the test on the individual item, not the entire array."
    )]
    TypeAcceptsSentinels { prop: String },

    /// A predicate panicked while being evaluated
    #[error("The '{key}' predicate of '{prop}' panicked: {message}")]
    PredicatePanicked {
        prop: String,
        key: String,
        message: String,
    },

    /// The source selector is not `body`, `params` or `query`
    #[error("Unknown source '{name}'. Allowed: body, params, query")]
    UnknownSource { name: String },

    /// The body source requires a JSON content type
    #[error("Set the headers {{ 'Content-Type': 'application/json' }} (found {})", .found.as_deref().unwrap_or("none"))]
    ContentType { found: Option<String> },
}

/// Values a per-item type predicate is expected to reject at least one of.
pub fn sentinels() -> [Value; 4] {
    [json!(""), json!(0), json!(false), json!({})]
}

/// Check the structural legality of a rule set.
///
/// Runs at bind time and again on every request.
pub fn check(rules: &RuleSet) -> Result<(), ConfigError> {
    rules.iter().try_for_each(check_rule)
}

fn check_rule(rule: &Rule) -> Result<(), ConfigError> {
    if rule.prop.is_empty() {
        return Err(ConfigError::MissingProp);
    }

    if let Some(ty) = &rule.ty {
        check_sentinels(&rule.prop, ty)?;
    }
    Ok(())
}

/// Reject a type predicate that accepts `""`, `0`, `false` and `{}` alike.
///
/// Such a predicate was almost certainly written against the whole collection
/// instead of one item.
fn check_sentinels(prop: &str, ty: &Predicate) -> Result<(), ConfigError> {
    for sentinel in sentinels() {
        if !evaluate(prop, "type", ty, &sentinel)? {
            return Ok(());
        }
    }
    Err(ConfigError::TypeAcceptsSentinels {
        prop: prop.to_string(),
    })
}

/// Evaluate a predicate, turning a panic into a [`ConfigError`].
pub(crate) fn evaluate(
    prop: &str,
    key: &str,
    predicate: &Predicate,
    value: &Value,
) -> Result<bool, ConfigError> {
    catch_unwind(AssertUnwindSafe(|| predicate.test(value))).map_err(|payload| {
        ConfigError::PredicatePanicked {
            prop: prop.to_string(),
            key: key.to_string(),
            message: panic_message(payload.as_ref()),
        }
    })
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates;

    #[test]
    fn accepts_well_formed_rules() {
        let rules: RuleSet = vec![
            Rule::new("id")
                .of_type(predicates::is_number)
                .biz(predicates::is_positive_integer),
            Rule::new("username").of_type(predicates::is_string).optional(),
        ]
        .into();
        assert_eq!(check(&rules), Ok(()));
    }

    #[test]
    fn empty_prop_is_missing() {
        let rules = RuleSet::from(Rule::new(""));
        assert_eq!(check(&rules), Err(ConfigError::MissingProp));
    }

    #[test]
    fn type_accepting_every_sentinel_is_rejected() {
        let rules = RuleSet::from(Rule::new("values").of_type(|_: &Value| true));
        let err = check(&rules).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TypeAcceptsSentinels {
                prop: "values".into()
            }
        );
        assert!(err.to_string().contains("'values'"));
        assert!(err.to_string().contains("not the entire array"));
    }

    #[test]
    fn type_rejecting_one_sentinel_passes() {
        // Accepts "", 0 and false but not {}.
        let scalar = |v: &Value| !v.is_object();
        assert!(check(&RuleSet::from(Rule::new("x").of_type(scalar))).is_ok());
    }

    #[test]
    fn panicking_type_predicate_is_reported() {
        let rules = RuleSet::from(Rule::new("values").of_type(|v: &Value| {
            v.as_array().expect("an array").is_empty()
        }));
        match check(&rules) {
            Err(ConfigError::PredicatePanicked { prop, key, message }) => {
                assert_eq!(prop, "values");
                assert_eq!(key, "type");
                assert!(message.contains("an array"));
            }
            other => panic!("expected a panic fault, got {:?}", other),
        }
    }

    #[test]
    fn business_predicates_skip_the_sentinel_check() {
        let rules = RuleSet::from(Rule::new("values").biz(|_: &Value| true));
        assert!(check(&rules).is_ok());
    }

    #[test]
    fn content_type_message_names_the_header() {
        let err = ConfigError::ContentType { found: None };
        assert_eq!(
            err.to_string(),
            "Set the headers { 'Content-Type': 'application/json' } (found none)"
        );
    }
}
