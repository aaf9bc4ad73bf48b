//! Configuration loading from the environment.

use std::collections::HashMap;

use chrono::Duration;
use thiserror::Error;
use tracing::debug;

use spendcast_forecast::{EngineConfig, VarianceMode};

pub const ENV_HISTORY_GROWTH: &str = "SPENDCAST_HISTORY_MONTHLY_GROWTH";
pub const ENV_MAX_HISTORY_MONTHS: &str = "SPENDCAST_MAX_HISTORY_MONTHS";
pub const ENV_VARIANCE_BAND: &str = "SPENDCAST_VARIANCE_BAND";
pub const ENV_VARIANCE_SEED: &str = "SPENDCAST_VARIANCE_SEED";
pub const ENV_CREDENTIAL_TTL_SECS: &str = "SPENDCAST_CREDENTIAL_TTL_SECS";

const DEFAULT_CREDENTIAL_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Process-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub engine: EngineConfig,
    pub credential_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            credential_ttl: Duration::seconds(DEFAULT_CREDENTIAL_TTL_SECS),
        }
    }
}

impl Settings {
    /// Read `SPENDCAST_*` variables from the process environment.
    ///
    /// Unset variables keep their defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("SPENDCAST_"))
            .collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Same as [`Settings::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        let mut engine = settings.engine;

        if let Some(v) = lookup(ENV_HISTORY_GROWTH) {
            let growth = parse_f64(ENV_HISTORY_GROWTH, &v)?;
            if !(0.0..1.0).contains(&growth) {
                return Err(invalid(ENV_HISTORY_GROWTH, &v, "expected a monthly fraction in [0, 1)"));
            }
            engine = engine.with_history_monthly_growth(growth);
        }

        if let Some(v) = lookup(ENV_MAX_HISTORY_MONTHS) {
            let months: u32 = v
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_MAX_HISTORY_MONTHS, &v, "expected a whole number of months"))?;
            engine = engine.with_max_history_months(months);
        }

        if let Some(v) = lookup(ENV_VARIANCE_BAND) {
            let band = parse_f64(ENV_VARIANCE_BAND, &v)?;
            if !(0.0..=0.5).contains(&band) {
                return Err(invalid(ENV_VARIANCE_BAND, &v, "expected a fraction in [0, 0.5]"));
            }
            engine = engine.with_variance_band(band);
        }

        if let Some(v) = lookup(ENV_VARIANCE_SEED) {
            let seed: u64 = v
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_VARIANCE_SEED, &v, "expected an unsigned integer"))?;
            engine = engine.with_default_variance(VarianceMode::Seeded { seed });
        }

        if let Some(v) = lookup(ENV_CREDENTIAL_TTL_SECS) {
            let secs: i64 = v
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| invalid(ENV_CREDENTIAL_TTL_SECS, &v, "expected a positive number of seconds"))?;
            settings.credential_ttl = Duration::seconds(secs);
        }

        settings.engine = engine;
        debug!(?settings, "loaded settings");
        Ok(settings)
    }
}

fn parse_f64(var: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(var, value, "expected a number"))
}

fn invalid(var: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}
