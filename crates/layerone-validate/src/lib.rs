//! # layerone Validation
//!
//! Declarative request validation. A [`RuleSet`] describes the fields one
//! request source (body, path parameters or query string) must carry; a bound
//! [`Validator`] checks every request against it before the handler runs.
//!
//! ## Example
//!
//! ```rust,ignore
//! use layerone_validate::prelude::*;
//!
//! let validator = Validator::body(vec![
//!     Rule::new("id").of_type(predicates::is_number).biz(predicates::is_positive_integer),
//!     Rule::new("username").of_type(predicates::is_string).biz(predicates::is_username),
//! ])?;
//!
//! let stack = LayerStack::new().layer(validator.into_layer());
//! ```
//!
//! ## Stages
//!
//! Each request runs through the transport guard (body only), the rule set
//! check, field extraction and then three stages, stopping at the first
//! failure:
//!
//! | Stage | Fails when | Status |
//! |-------|------------|--------|
//! | Presence | a required field is missing or an undeclared field is sent | 400 |
//! | Type | an item fails the `type` predicate, or a sequence is empty | 400 |
//! | Business | the `biz` predicate rejects the value (whole or per item) | 422 |
//!
//! Configuration problems, a missing JSON content type and panicking
//! predicates answer 500 with a fixed message; the details go to the logs.
//!
//! ## Error Format
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "input-fields :: Miss match",
//!   "fail": "username",
//!   "fields": { "missing": [], "extra": ["username"] },
//!   "layer": "body"
//! }
//! ```

mod config;
mod declare;
mod extract;
mod guard;
mod outcome;
mod pipeline;
mod predicate;
pub mod predicates;
mod rule;
mod rule_set;
mod settings;
pub mod stages;
mod validator;

pub use config::{check as check_rules, sentinels, ConfigError, RULE_KEYS};
pub use declare::PredicateRegistry;
pub use outcome::{messages, Failure, FailurePayload, FieldDiff, Outcome, Rejection, Stage};
pub use pipeline::{run, Fault};
pub use predicate::Predicate;
pub use rule::Rule;
pub use rule_set::{RuleSet, Source};
pub use settings::{Settings, SettingsError, ENV_PREFIX};
pub use validator::{ValidationLayer, Validator};

/// Prelude module for validation
pub mod prelude {
    pub use crate::predicates;
    pub use crate::{
        ConfigError, Outcome, Predicate, PredicateRegistry, Rule, RuleSet, Settings, Source,
        ValidationLayer, Validator,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use layerone_core::TestRequest;
    use serde_json::json;

    #[test]
    fn prelude_covers_a_full_binding() {
        let validator = Validator::body(vec![
            Rule::new("id")
                .of_type(predicates::is_number)
                .biz(predicates::is_positive_integer),
            Rule::new("username")
                .of_type(predicates::is_string)
                .biz(predicates::is_username),
        ])
        .unwrap();

        let req = TestRequest::post("/user")
            .json(&json!({ "id": 3, "username": "vikcch" }))
            .build();
        assert_eq!(validator.check(&req), Outcome::Pass);
    }
}
