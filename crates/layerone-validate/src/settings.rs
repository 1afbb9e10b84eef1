//! Runtime switches loaded from the environment.
//!
//! # Example
//!
//! ```ignore
//! use layerone_validate::{Settings, Validator};
//!
//! // Reads LAYERONE_SKIP_CONTENT_TYPE_CHECK and LAYERONE_LOG_FAULTS,
//! // after loading a `.env` file if one exists.
//! let settings = Settings::load()?;
//! let validator = Validator::bind(rules)?.with_settings(settings);
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LAYERONE_";

/// Error loading [`Settings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A variable is set but does not deserialize
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
}

/// Validator runtime settings.
///
/// `Default` never reads the environment: the content-type guard is on and
/// faults are logged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Skip the JSON content-type guard on body rule sets (test mode)
    pub skip_content_type_check: bool,
    /// Log configuration and internal faults with `tracing::error!`
    pub log_faults: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skip_content_type_check: false,
            log_faults: true,
        }
    }
}

impl Settings {
    /// Read `LAYERONE_*` variables from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Read `LAYERONE_*` variables from an explicit list of pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }

    /// Load a `.env` file if present, then read the environment.
    ///
    /// Existing variables take precedence over `.env` values and a missing
    /// file is not an error.
    pub fn load() -> Result<Self, SettingsError> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Test-mode settings: content-type guard off, fault logging off.
    pub fn test_mode() -> Self {
        Self {
            skip_content_type_check: true,
            log_faults: false,
        }
    }

    /// Set whether the content-type guard is skipped.
    pub fn skip_content_type_check(mut self, skip: bool) -> Self {
        self.skip_content_type_check = skip;
        self
    }

    /// Set whether faults are logged.
    pub fn log_faults(mut self, log: bool) -> Self {
        self.log_faults = log;
        self
    }
}
