//! JSON content-type precondition for body rule sets

use crate::config::ConfigError;
use layerone_core::Request;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Require a `Content-Type` containing `application/json`.
///
/// The match is case-insensitive and tolerates parameters such as
/// `; charset=utf-8`. A missing header fails.
pub fn check(req: &Request) -> Result<(), ConfigError> {
    match req.content_type() {
        Some(value) if value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE) => Ok(()),
        found => Err(ConfigError::ContentType {
            found: found.map(str::to_string),
        }),
    }
}
