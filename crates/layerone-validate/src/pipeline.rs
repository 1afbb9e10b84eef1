//! Pipeline driver
//!
//! `guard → config → extract → presence → type → business`, stopping at the
//! first failure. Faults in the pre-stage steps and panics inside predicates
//! are caught here, logged, and answered with the fatal outcome.

use crate::config::{self, panic_message, ConfigError};
use crate::extract;
use crate::guard;
use crate::outcome::{Failure, Outcome, Rejection, Stage};
use crate::rule_set::{RuleSet, Source};
use crate::settings::Settings;
use crate::stages::{Context, STAGES};
use layerone_core::{ApiError, FieldMap, Request};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// A failure that is not the caller's fault
#[derive(Debug, Error)]
pub enum Fault {
    /// Malformed rule set or missing JSON content type
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The selected field map could not be produced
    #[error("Cannot read the {layer} fields: {error}")]
    Extract {
        layer: Source,
        #[source]
        error: ApiError,
    },

    /// A predicate panicked while a stage ran
    #[error("A predicate panicked during the {stage} stage: {message}")]
    Panic { stage: Stage, message: String },
}

impl Fault {
    /// Step the fault happened at
    pub fn stage(&self) -> Stage {
        match self {
            Fault::Config(ConfigError::ContentType { .. }) => Stage::Guard,
            Fault::Config(_) => Stage::Config,
            Fault::Extract { .. } => Stage::Extract,
            Fault::Panic { stage, .. } => *stage,
        }
    }
}

/// Run the whole pipeline once for `req`.
pub fn run(rules: &RuleSet, req: &Request, settings: &Settings) -> Outcome {
    let layer = rules.source();

    let result = prepare(rules, req, settings)
        .and_then(|fields| evaluate(&Context::new(rules, &fields)));

    match result {
        Ok(None) => {
            tracing::debug!(layer = %layer, path = %req.path(), "request passed validation");
            Outcome::Pass
        }
        Ok(Some(rejection)) => {
            tracing::warn!(
                stage = %rejection.stage(),
                layer = %layer,
                prop = rejection.fail().unwrap_or_default(),
                status = rejection.status().as_u16(),
                "request rejected"
            );
            Outcome::Fail(Failure::rejected(&rejection, layer))
        }
        Err(fault) => {
            if settings.log_faults {
                tracing::error!(
                    stage = %fault.stage(),
                    layer = %layer,
                    error = %fault,
                    "validation fault"
                );
            }
            Outcome::Fail(Failure::fatal(fault.stage(), layer))
        }
    }
}

fn prepare(rules: &RuleSet, req: &Request, settings: &Settings) -> Result<FieldMap, Fault> {
    let layer = rules.source();

    if layer == Source::Body && !settings.skip_content_type_check {
        guard::check(req)?;
    }
    config::check(rules)?;

    extract::fields(req, layer).map_err(|error| Fault::Extract { layer, error })
}

/// Run the stages in order; `Ok(None)` means every stage passed.
fn evaluate(ctx: &Context<'_>) -> Result<Option<Rejection>, Fault> {
    for (stage, check) in STAGES {
        tracing::debug!(stage = %stage, layer = %ctx.source, "running stage");

        match catch_unwind(AssertUnwindSafe(|| check(ctx))) {
            Ok(Ok(())) => {}
            Ok(Err(rejection)) => return Ok(Some(rejection)),
            Err(payload) => {
                return Err(Fault::Panic {
                    stage: *stage,
                    message: panic_message(payload.as_ref()),
                })
            }
        }
    }
    Ok(None)
}
