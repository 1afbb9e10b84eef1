//! Rule sets declared as JSON documents
//!
//! A declaration names its predicates instead of holding them; names are
//! resolved against a [`PredicateRegistry`]. Three shapes are accepted:
//!
//! ```json
//! { "prop": "id", "type": "is_number", "biz": "is_positive_integer" }
//!
//! [
//!   { "prop": "id", "type": "is_number" },
//!   { "prop": "username", "type": "is_string", "optional": true }
//! ]
//!
//! { "source": "query", "rules": [{ "prop": "id", "biz": "is_id" }] }
//! ```

use crate::config::{ConfigError, RULE_KEYS};
use crate::predicate::Predicate;
use crate::predicates;
use crate::rule::Rule;
use crate::rule_set::{RuleSet, Source};
use serde_json::{Map, Value};
use std::collections::HashMap;

const ENVELOPE_KEYS: &[&str] = &["rules", "source"];

/// Named predicates available to declarations.
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Predicate>,
}

impl PredicateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every predicate of [`predicates`].
    pub fn with_builtins() -> Self {
        let builtins: [(&str, fn(&Value) -> bool); 12] = [
            ("is_number", predicates::is_number),
            ("is_string", predicates::is_string),
            ("is_boolean", predicates::is_boolean),
            ("is_object", predicates::is_object),
            ("is_array", predicates::is_array),
            ("is_object_array", predicates::is_object_array),
            ("is_positive_integer", predicates::is_positive_integer),
            ("can_be_positive_integer", predicates::can_be_positive_integer),
            ("is_username", predicates::is_username),
            ("is_id", predicates::is_id),
            ("is_coords", predicates::is_coords),
            ("is_coords_array", predicates::is_coords_array),
        ];

        builtins
            .into_iter()
            .fold(Self::new(), |registry, (name, test)| registry.with(name, test))
    }

    /// Register a predicate under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, test: F) -> &mut Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.predicates
            .insert(name.to_string(), Predicate::named(name, test));
        self
    }

    /// Builder-style [`PredicateRegistry::register`]
    pub fn with<F>(mut self, name: &str, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.register(name, test);
        self
    }

    /// Look up a predicate by name
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Number of registered predicates
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl RuleSet {
    /// Build a rule set from a JSON declaration.
    ///
    /// Structural problems (unknown keys, a non-string `prop`, a `type` or
    /// `biz` that names no registered predicate) are reported here; the
    /// remaining checks run when the set is bound.
    pub fn from_declaration(
        declaration: &Value,
        registry: &PredicateRegistry,
    ) -> Result<Self, ConfigError> {
        match declaration {
            Value::Object(map) if map.contains_key("rules") => parse_envelope(map, registry),
            Value::Object(_) => Ok(RuleSet::from(parse_rule(declaration, registry)?)),
            Value::Array(items) => parse_rules(items, registry),
            other => Err(not_a_rule_set(other)),
        }
    }
}

fn parse_envelope(
    map: &Map<String, Value>,
    registry: &PredicateRegistry,
) -> Result<RuleSet, ConfigError> {
    if let Some(key) = map.keys().find(|key| !ENVELOPE_KEYS.contains(&key.as_str())) {
        return Err(ConfigError::StrayProperty { key: key.clone() });
    }

    let rules = match map.get("rules") {
        Some(Value::Array(items)) => parse_rules(items, registry)?,
        Some(rule) if rule.is_object() => RuleSet::from(parse_rule(rule, registry)?),
        Some(other) => return Err(not_a_rule_set(other)),
        None => RuleSet::default(),
    };

    let source = match map.get("source") {
        None | Some(Value::Null) => Source::Body,
        Some(Value::String(name)) => {
            Source::parse(name).ok_or_else(|| ConfigError::UnknownSource { name: name.clone() })?
        }
        Some(other) => {
            return Err(ConfigError::UnknownSource {
                name: other.to_string(),
            })
        }
    };

    Ok(rules.with_source(source))
}

fn parse_rules(items: &[Value], registry: &PredicateRegistry) -> Result<RuleSet, ConfigError> {
    items.iter().map(|item| parse_rule(item, registry)).collect()
}

fn parse_rule(value: &Value, registry: &PredicateRegistry) -> Result<Rule, ConfigError> {
    let map = value.as_object().ok_or_else(|| not_a_rule_set(value))?;

    if let Some(key) = map.keys().find(|key| !RULE_KEYS.contains(&key.as_str())) {
        return Err(ConfigError::DisallowedKey {
            prop: map
                .get("prop")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            key: key.clone(),
        });
    }

    let prop = match map.get("prop") {
        None | Some(Value::Null) => return Err(ConfigError::MissingProp),
        Some(Value::String(prop)) if prop.is_empty() => return Err(ConfigError::MissingProp),
        Some(Value::String(prop)) => prop.as_str(),
        Some(other) => {
            return Err(ConfigError::PropNotString {
                found: other.to_string(),
            })
        }
    };

    let mut rule = Rule::new(prop);
    rule.ty = resolve(prop, "type", map.get("type"), registry)?;
    rule.biz = resolve(prop, "biz", map.get("biz"), registry)?;
    rule.optional = match map.get("optional") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(optional)) => *optional,
        Some(_) => {
            return Err(ConfigError::OptionalNotBool {
                prop: prop.to_string(),
            })
        }
    };
    Ok(rule)
}

fn resolve(
    prop: &str,
    key: &str,
    entry: Option<&Value>,
    registry: &PredicateRegistry,
) -> Result<Option<Predicate>, ConfigError> {
    match entry {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) => registry
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| not_callable(prop, key)),
        Some(_) => Err(not_callable(prop, key)),
    }
}

fn not_callable(prop: &str, key: &str) -> ConfigError {
    ConfigError::NotCallable {
        prop: prop.to_string(),
        key: key.to_string(),
    }
}

fn not_a_rule_set(value: &Value) -> ConfigError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    ConfigError::NotARuleSet {
        found: found.to_string(),
    }
}
