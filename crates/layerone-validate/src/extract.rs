//! Selects the field map a rule set reads from

use crate::rule_set::Source;
use layerone_core::{FieldMap, Request, Result};

/// Field map of `source`.
///
/// Fails when the body is not a JSON object or the query string is
/// malformed.
pub fn fields(req: &Request, source: Source) -> Result<FieldMap> {
    match source {
        Source::Body => req.body_fields(),
        Source::Params => Ok(req.params_fields()),
        Source::Query => req.query_fields(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerone_core::TestRequest;
    use serde_json::json;

    #[test]
    fn sources_are_independent() {
        let req = TestRequest::put("/user/7?username=vikcch")
            .param("id", "7")
            .json(&json!({ "id": 7, "username": "vikcch" }))
            .build();

        let body = fields(&req, Source::Body).unwrap();
        let params = fields(&req, Source::Params).unwrap();
        let query = fields(&req, Source::Query).unwrap();

        assert_eq!(body.len(), 2);
        assert_eq!(params.len(), 1);
        assert_eq!(params["id"], json!("7"));
        assert_eq!(query.len(), 1);
        assert_eq!(query["username"], json!("vikcch"));
    }

    #[test]
    fn repeated_query_keys_become_sequences() {
        let req = TestRequest::get("/user?id=1&id=2").build();
        let query = fields(&req, Source::Query).unwrap();
        assert_eq!(query["id"], json!(["1", "2"]));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let req = TestRequest::post("/user")
            .content_type("application/json")
            .body("{ not json")
            .build();
        assert!(fields(&req, Source::Body).is_err());
    }
}
