//! Ordered rules bound to one request source

use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which request field map supplies the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// JSON request body
    #[default]
    Body,
    /// Path parameters captured by the router
    Params,
    /// Query string
    Query,
}

impl Source {
    /// Lowercase name, as echoed in the `layer` field of failure payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Body => "body",
            Source::Params => "params",
            Source::Query => "query",
        }
    }

    /// Parse a lowercase source name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "body" => Some(Source::Body),
            "params" => Some(Source::Params),
            "query" => Some(Source::Query),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered sequence of [`Rule`]s plus the source they read from.
///
/// A single rule converts into a one-element set. Rule sets are immutable
/// once bound and are shared between requests.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    source: Source,
}

impl RuleSet {
    /// Create a rule set reading from the body.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            source: Source::Body,
        }
    }

    /// Replace the source selector.
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Append a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Source selector
    pub fn source(&self) -> Source {
        self.source
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Props that must be present, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|rule| !rule.optional)
            .map(|rule| rule.prop.as_str())
    }

    /// Whether `key` is declared by any rule.
    pub fn declares(&self, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.prop == key)
    }
}

impl From<Rule> for RuleSet {
    fn from(rule: Rule) -> Self {
        Self::new(vec![rule])
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl<const N: usize> From<[Rule; N]> for RuleSet {
    fn from(rules: [Rule; N]) -> Self {
        Self::new(rules.into())
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
