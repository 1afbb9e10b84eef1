//! Bound validators
//!
//! [`Validator::bind`] checks a rule set once and returns a cheap-to-clone
//! handle. The handle runs the pipeline per request, either through
//! [`Validator::handle`] with a response sink and a continuation, or as a
//! [`ValidationLayer`] inside a `LayerStack`.

use crate::config::{self, ConfigError};
use crate::declare::PredicateRegistry;
use crate::outcome::Outcome;
use crate::pipeline;
use crate::rule_set::{RuleSet, Source};
use crate::settings::Settings;
use layerone_core::middleware::ResponseFuture;
use layerone_core::{BoxedNext, IntoResponse, MiddlewareLayer, Request, ResponseSink};
use serde_json::Value;
use std::sync::Arc;

/// A rule set bound to its source, ready to validate requests.
///
/// # Example
///
/// ```rust,ignore
/// use layerone_validate::{predicates, Rule, Validator};
///
/// let validator = Validator::body(vec![
///     Rule::new("id").of_type(predicates::is_number).biz(predicates::is_positive_integer),
///     Rule::new("username").of_type(predicates::is_string).biz(predicates::is_username),
/// ])?;
///
/// let mut response = None;
/// validator.handle(&request, &mut response, || create_user(&request));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Arc<RuleSet>,
    settings: Settings,
}

impl Validator {
    /// Check `rules` and bind them, keeping their source selector.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn bind(rules: impl Into<RuleSet>) -> Result<Self, ConfigError> {
        let rules = rules.into();
        if let Err(err) = config::check(&rules) {
            tracing::error!(layer = %rules.source(), error = %err, "rule set rejected at bind time");
            return Err(err);
        }

        tracing::debug!(layer = %rules.source(), rules = rules.len(), "rule set bound");
        Ok(Self {
            rules: Arc::new(rules),
            settings: Settings::default(),
        })
    }

    /// Bind `rules` to the request body.
    pub fn body(rules: impl Into<RuleSet>) -> Result<Self, ConfigError> {
        Self::bind(rules.into().with_source(Source::Body))
    }

    /// Bind `rules` to the path parameters.
    pub fn params(rules: impl Into<RuleSet>) -> Result<Self, ConfigError> {
        Self::bind(rules.into().with_source(Source::Params))
    }

    /// Bind `rules` to the query string.
    pub fn query(rules: impl Into<RuleSet>) -> Result<Self, ConfigError> {
        Self::bind(rules.into().with_source(Source::Query))
    }

    /// Parse a JSON declaration against `registry` and bind it.
    pub fn from_declaration(
        declaration: &Value,
        registry: &PredicateRegistry,
    ) -> Result<Self, ConfigError> {
        Self::bind(RuleSet::from_declaration(declaration, registry)?)
    }

    /// Replace the runtime settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Bound rule set
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Source the rule set reads from
    pub fn source(&self) -> Source {
        self.rules.source()
    }

    /// Runtime settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the pipeline and return the outcome without responding.
    pub fn check(&self, req: &Request) -> Outcome {
        pipeline::run(&self.rules, req, &self.settings)
    }

    /// Run the pipeline: call `next` on pass, otherwise send the failure
    /// through `sink`. Exactly one of the two happens.
    pub fn handle<S, F>(&self, req: &Request, sink: &mut S, next: F)
    where
        S: ResponseSink + ?Sized,
        F: FnOnce(),
    {
        match self.check(req) {
            Outcome::Pass => next(),
            Outcome::Fail(failure) => sink.send(failure.status, failure.payload.to_value()),
        }
    }

    /// Wrap the validator as middleware.
    pub fn into_layer(self) -> ValidationLayer {
        ValidationLayer { validator: self }
    }
}

/// Middleware running a [`Validator`] before the rest of the chain.
///
/// A rejected request is answered directly and never reaches `next`.
#[derive(Debug, Clone)]
pub struct ValidationLayer {
    validator: Validator,
}

impl ValidationLayer {
    /// Wrapped validator
    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl From<Validator> for ValidationLayer {
    fn from(validator: Validator) -> Self {
        validator.into_layer()
    }
}

impl MiddlewareLayer for ValidationLayer {
    fn call(&self, req: Request, next: BoxedNext) -> ResponseFuture {
        match self.validator.check(&req) {
            Outcome::Pass => next(req),
            Outcome::Fail(failure) => Box::pin(async move { failure.into_response() }),
        }
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}
