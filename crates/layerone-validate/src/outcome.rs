//! Pipeline outcomes and failure payloads
//!
//! A request either passes every stage or stops at the first failure. The
//! failure carries the status code and the JSON payload sent to the caller.

use crate::rule_set::Source;
use http::StatusCode;
use layerone_core::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure messages sent to callers
pub mod messages {
    /// Presence stage failure
    pub const FIELDS: &str = "input-fields :: Miss match";
    /// Type stage failure
    pub const TYPE: &str = "input-types";
    /// Suffix added to type failures on sequence values
    pub const ARRAY_HINT: &str = "Tip: Test the item, not the array.";
    /// Business stage failure
    pub const BIZ: &str = "biz";
    /// Configuration or internal fault
    pub const FATAL: &str = "If you own the server, check the logs";
    /// Separator between message parts
    pub const SEPARATOR: &str = " :: ";
}

/// Pipeline step at which a request stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Transport guard (content type)
    Guard,
    /// Rule set configuration check
    Config,
    /// Field map extraction
    Extract,
    /// Presence of required and absence of undeclared fields
    Presence,
    /// Per-item type predicates
    Type,
    /// Business predicates
    Business,
}

impl Stage {
    /// Lowercase stage name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Guard => "guard",
            Stage::Config => "config",
            Stage::Extract => "extract",
            Stage::Presence => "presence",
            Stage::Type => "type",
            Stage::Business => "business",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that is well-formed enough to inspect but violates the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Required fields are absent or undeclared fields are present
    Presence {
        /// Required props absent from the request, in declaration order
        missing: Vec<String>,
        /// Request keys no rule declares, in request order
        extra: Vec<String>,
    },
    /// A type predicate rejected the value (or the sequence was empty)
    Type {
        /// Offending prop
        prop: String,
        /// Whether the request value was a sequence
        collection: bool,
    },
    /// A business predicate rejected the value
    Business {
        /// Offending prop
        prop: String,
    },
}

impl Rejection {
    /// Stage that produced the rejection
    pub fn stage(&self) -> Stage {
        match self {
            Rejection::Presence { .. } => Stage::Presence,
            Rejection::Type { .. } => Stage::Type,
            Rejection::Business { .. } => Stage::Business,
        }
    }

    /// HTTP status of the rejection
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::Presence { .. } | Rejection::Type { .. } => StatusCode::BAD_REQUEST,
            Rejection::Business { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Caller-facing message
    pub fn message(&self) -> String {
        match self {
            Rejection::Presence { .. } => messages::FIELDS.to_string(),
            Rejection::Type {
                collection: true, ..
            } => format!(
                "{}{}{}",
                messages::TYPE,
                messages::SEPARATOR,
                messages::ARRAY_HINT
            ),
            Rejection::Type { .. } => messages::TYPE.to_string(),
            Rejection::Business { .. } => messages::BIZ.to_string(),
        }
    }

    /// Prop reported in the `fail` field.
    ///
    /// For presence failures this is the first missing prop, or the first
    /// extra key when nothing is missing.
    pub fn fail(&self) -> Option<&str> {
        match self {
            Rejection::Presence { missing, extra } => {
                missing.first().or_else(|| extra.first()).map(String::as_str)
            }
            Rejection::Type { prop, .. } | Rejection::Business { prop } => Some(prop.as_str()),
        }
    }

    /// Build the caller-facing payload.
    pub fn payload(&self, layer: Source) -> FailurePayload {
        let fields = match self {
            Rejection::Presence { missing, extra } => Some(FieldDiff {
                missing: missing.clone(),
                extra: extra.clone(),
            }),
            _ => None,
        };

        FailurePayload {
            success: false,
            message: self.message(),
            fail: self.fail().map(str::to_string),
            fields,
            layer: Some(layer),
        }
    }
}

/// Presence stage set differences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    /// Required props absent from the request
    pub missing: Vec<String>,
    /// Request keys no rule declares
    pub extra: Vec<String>,
}

/// JSON body of a failed validation.
///
/// ```json
/// {
///   "success": false,
///   "message": "input-fields :: Miss match",
///   "fail": "username",
///   "fields": { "missing": [], "extra": ["username"] },
///   "layer": "body"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePayload {
    /// Always `false`
    pub success: bool,
    /// Stage message, or the fatal message for faults
    pub message: String,
    /// First offending prop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<String>,
    /// Presence set differences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldDiff>,
    /// Source the rule set reads from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Source>,
}

impl FailurePayload {
    /// Payload of the fatal outcome. Fault details never reach the caller.
    pub fn fatal(layer: Source) -> Self {
        Self {
            success: false,
            message: messages::FATAL.to_string(),
            fail: None,
            fields: None,
            layer: Some(layer),
        }
    }

    /// Payload as a JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "success": false, "message": messages::FATAL })
        })
    }
}

/// A terminal failure: where, with which status, and what to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Stage that stopped the request
    pub stage: Stage,
    /// HTTP status sent to the caller
    pub status: StatusCode,
    /// JSON body sent to the caller
    pub payload: FailurePayload,
}

impl Failure {
    /// Failure produced by a rejecting stage.
    pub fn rejected(rejection: &Rejection, layer: Source) -> Self {
        Self {
            stage: rejection.stage(),
            status: rejection.status(),
            payload: rejection.payload(layer),
        }
    }

    /// Fatal failure (500) at a pre-stage step.
    pub fn fatal(stage: Stage, layer: Source) -> Self {
        Self {
            stage,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            payload: FailurePayload::fatal(layer),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(self.payload)).into_response()
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every stage passed; the continuation runs
    Pass,
    /// The request stopped
    Fail(Failure),
}

impl Outcome {
    /// Whether the request passed
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Pass => None,
            Outcome::Fail(failure) => Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn presence_payload_reports_both_differences() {
        let rejection = Rejection::Presence {
            missing: vec![],
            extra: vec!["username".into()],
        };
        let failure = Failure::rejected(&rejection, Source::Body);

        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.stage, Stage::Presence);
        assert_eq!(
            failure.payload.to_value(),
            json!({
                "success": false,
                "message": "input-fields :: Miss match",
                "fail": "username",
                "fields": { "missing": [], "extra": ["username"] },
                "layer": "body"
            })
        );
    }

    #[test]
    fn presence_fail_prefers_missing_over_extra() {
        let rejection = Rejection::Presence {
            missing: vec!["id".into()],
            extra: vec!["name".into()],
        };
        assert_eq!(rejection.fail(), Some("id"));
    }

    #[test]
    fn type_message_hints_at_collections() {
        let scalar = Rejection::Type {
            prop: "id".into(),
            collection: false,
        };
        let sequence = Rejection::Type {
            prop: "values".into(),
            collection: true,
        };
        assert_eq!(scalar.message(), "input-types");
        assert_eq!(
            sequence.message(),
            "input-types :: Tip: Test the item, not the array."
        );
    }

    #[test]
    fn business_is_unprocessable() {
        let failure = Failure::rejected(&Rejection::Business { prop: "values".into() }, Source::Query);
        assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            failure.payload.to_value(),
            json!({ "success": false, "message": "biz", "fail": "values", "layer": "query" })
        );
    }

    #[test]
    fn fatal_payload_hides_details() {
        let failure = Failure::fatal(Stage::Config, Source::Params);
        assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            failure.payload.to_value(),
            json!({
                "success": false,
                "message": "If you own the server, check the logs",
                "layer": "params"
            })
        );
    }

    #[test]
    fn payload_deserializes_without_optional_fields() {
        let payload: FailurePayload =
            serde_json::from_value(json!({ "success": false, "message": "biz" })).unwrap();
        assert_eq!(payload.fail, None);
        assert_eq!(payload.layer, None);
    }
}
