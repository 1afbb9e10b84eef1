//! Built-in predicates
//!
//! Shape tests (`is_*` over one item) suit `type`; the rest suit `biz`.
//! All of them are registered by name in
//! [`PredicateRegistry::with_builtins`](crate::PredicateRegistry::with_builtins).

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_REGEX.get_or_init(|| Regex::new(r"(?i)^[a-z]{4,8}$").unwrap())
}

/// JSON number
pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

/// JSON string
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// JSON boolean
pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

/// JSON object. Arrays and `null` are not objects.
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// JSON array
pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Array whose items are all objects
pub fn is_object_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_object))
}

/// Integral number greater than zero (`3` and `3.0`, not `"3"`)
pub fn is_positive_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(is_positive_integral),
        _ => false,
    }
}

/// Number or numeric string holding an integer greater than zero
pub fn can_be_positive_integer(value: &Value) -> bool {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.is_some_and(is_positive_integral)
}

fn is_positive_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n > 0.0
}

/// String of 4 to 8 ASCII letters, any case
pub fn is_username(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| username_regex().is_match(s))
}

/// Identifier: anything that can be a positive integer
pub fn is_id(value: &Value) -> bool {
    can_be_positive_integer(value)
}

/// Object whose `x` and `y` are positive integers
pub fn is_coords(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.get("x").is_some_and(is_positive_integer)
                && map.get("y").is_some_and(is_positive_integer)
        }
        _ => false,
    }
}

/// Non-empty array of [`is_coords`] items
pub fn is_coords_array(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| !items.is_empty() && items.iter().all(is_coords))
}
