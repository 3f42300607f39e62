use anyhow::{Context, Result};

use crate::error::{validate_rate, ClockError};

/// Environment variable overriding [`EngineConfig::default_rate`].
pub const ENV_DEFAULT_RATE: &str = "TICKCLOCK_DEFAULT_RATE";
/// Environment variable overriding [`EngineConfig::base_rate`].
pub const ENV_BASE_RATE: &str = "TICKCLOCK_BASE_RATE";

/// Clock engine configuration.
///
/// - `default_rate` is the applied tick rate a fresh session starts with.
/// - `base_rate` is the nominal source rate used to interpret "ticks" in skip
///   requests and to derive the tick-clock display time. It never changes
///   during a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub default_rate: f64,
    pub base_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rate: 60.0,
            base_rate: 60.0,
        }
    }
}

impl EngineConfig {
    pub fn default_rate(mut self, rate: f64) -> Self {
        self.default_rate = rate;
        self
    }

    pub fn base_rate(mut self, rate: f64) -> Self {
        self.base_rate = rate;
        self
    }

    /// Checks that both rates are finite and positive.
    pub fn validate(&self) -> Result<(), ClockError> {
        validate_rate(self.default_rate)?;
        validate_rate(self.base_rate)?;
        Ok(())
    }

    /// Builds a config from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DEFAULT_RATE) {
            config.default_rate = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DEFAULT_RATE}={raw:?} is not a number"))?;
        }
        if let Some(raw) = lookup(ENV_BASE_RATE) {
            config.base_rate = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_BASE_RATE}={raw:?} is not a number"))?;
        }

        config.validate().context("invalid engine configuration")?;
        Ok(config)
    }
}
