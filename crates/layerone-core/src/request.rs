//! Request types for layerone
//!
//! A [`Request`] wraps the HTTP parts handed over by the host router and exposes
//! the three field maps validators work against: the JSON body, the path
//! parameters and the query string.

use crate::error::{ApiError, Result};
use crate::path_params::PathParams;
use bytes::Bytes;
use http::{header, request::Parts, HeaderMap, Method, Uri};
use serde_json::Value;

/// Ordered key/value map of one request source.
///
/// Key order follows the request (JSON object order, query order, route
/// parameter order).
pub type FieldMap = serde_json::Map<String, Value>;

/// HTTP Request wrapper
///
/// Provides access to the headers and the field maps of an incoming request.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) body: Option<Bytes>,
    pub(crate) path_params: PathParams,
}

impl Request {
    /// Create a new request from parts, the buffered body and the path
    /// parameters captured by the router.
    pub fn new(parts: Parts, body: Bytes, path_params: PathParams) -> Self {
        Self {
            parts,
            body: Some(body),
            path_params,
        }
    }

    /// Create a request from a buffered `http::Request`.
    pub fn from_http(req: http::Request<Bytes>, path_params: PathParams) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body, path_params)
    }

    /// Get the HTTP method
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Get the URI
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Get the headers
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Get the query string
    pub fn query_string(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Get the `Content-Type` header, if present and valid UTF-8.
    ///
    /// Header names are case-insensitive; the value is returned as sent.
    pub fn content_type(&self) -> Option<&str> {
        self.parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Borrow the body bytes, if not yet taken.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Take the body bytes (can only be called once)
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }

    /// Get path parameters
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Parse the body into a field map.
    ///
    /// An empty (or already taken) body yields an empty map. A body that is
    /// not a JSON object is rejected.
    pub fn body_fields(&self) -> Result<FieldMap> {
        let bytes = match &self.body {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(FieldMap::new()),
        };

        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => Ok(map),
            other => Err(ApiError::bad_request("JSON body must be an object")
                .with_internal(format!("body is a JSON {}", json_kind(&other)))),
        }
    }

    /// Path parameters as a field map of string values.
    pub fn params_fields(&self) -> FieldMap {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    /// Parse the query string into a field map.
    ///
    /// Values are strings; a key repeated in the query string becomes an
    /// array of its values in query order.
    pub fn query_fields(&self) -> Result<FieldMap> {
        let query = self.query_string().unwrap_or("");
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;

        let mut fields = FieldMap::new();
        for (key, value) in pairs {
            match fields.get_mut(&key) {
                Some(Value::Array(values)) => values.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    fields.insert(key, Value::String(value));
                }
            }
        }
        Ok(fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("path_params", &self.path_params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(uri: &str, body: &'static str) -> Request {
        let req = http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("Content-Type", "application/json; charset=utf-8")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap();
        Request::from_http(req, PathParams::new())
    }

    #[test]
    fn body_fields_keep_request_order() {
        let req = request("/user", r#"{"username":"vik","id":3}"#);
        let fields = req.body_fields().unwrap();
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, vec!["username", "id"]);
        assert_eq!(fields["id"], json!(3));
    }

    #[test]
    fn empty_body_is_an_empty_map() {
        let req = request("/user", "");
        assert!(req.body_fields().unwrap().is_empty());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let req = request("/user", "[1,2]");
        let err = req.body_fields().unwrap_err();
        assert_eq!(err.status, http::StatusCode::BAD_REQUEST);
        assert_eq!(err.internal_details(), Some("body is a JSON array"));
    }

    #[test]
    fn malformed_body_is_rejected() {
        let req = request("/user", "{\"id\":");
        assert!(req.body_fields().is_err());
    }

    #[test]
    fn query_fields_are_strings() {
        let req = request("/user/query?id=3&username=vik", "");
        let fields = req.query_fields().unwrap();
        assert_eq!(fields["id"], json!("3"));
        assert_eq!(fields["username"], json!("vik"));
    }

    #[test]
    fn repeated_query_keys_become_arrays() {
        let req = request("/search?tag=a&page=1&tag=b&tag=c", "");
        let fields = req.query_fields().unwrap();
        assert_eq!(fields["tag"], json!(["a", "b", "c"]));
        assert_eq!(fields["page"], json!("1"));
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, vec!["tag", "page"]);
    }

    #[test]
    fn missing_query_is_an_empty_map() {
        let req = request("/user", "");
        assert!(req.query_fields().unwrap().is_empty());
    }

    #[test]
    fn params_fields_follow_route_order() {
        let req = http::Request::builder()
            .uri("/user/3/vik")
            .body(Bytes::new())
            .unwrap();
        let params: PathParams = [("id", "3"), ("username", "vik")].into_iter().collect();
        let req = Request::from_http(req, params);

        let fields = req.params_fields();
        assert_eq!(fields["id"], json!("3"));
        let keys: Vec<&String> = fields.keys().collect();
        assert_eq!(keys, vec!["id", "username"]);
    }

    #[test]
    fn content_type_lookup_is_case_insensitive() {
        let req = request("/user", "");
        assert_eq!(req.content_type(), Some("application/json; charset=utf-8"));
    }
}
