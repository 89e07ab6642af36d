//! Simulator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`SimulatorConfig::total_mb`].
pub const ENV_TOTAL_MB: &str = "MEMSIM_TOTAL_MB";
/// Environment variable overriding [`SimulatorConfig::tick_interval_ms`].
pub const ENV_TICK_INTERVAL_MS: &str = "MEMSIM_TICK_INTERVAL_MS";
/// Environment variable overriding [`SimulatorConfig::event_capacity`].
pub const ENV_EVENT_CAPACITY: &str = "MEMSIM_EVENT_CAPACITY";

/// Simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Memory pool capacity in megabytes.
    pub total_mb: u64,
    /// Lifecycle timer period in milliseconds. One period is one second of
    /// simulated runtime.
    pub tick_interval_ms: u64,
    /// Events buffered per observer before it starts lagging.
    pub event_capacity: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            total_mb: 1024,
            tick_interval_ms: 1000,
            event_capacity: 1024,
        }
    }
}

impl SimulatorConfig {
    /// Timer period as a `Duration`.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.total_mb == 0 {
            return Err("total_mb must be greater than 0".into());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be greater than 0".into());
        }
        if self.event_capacity == 0 {
            return Err("event_capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load defaults overridden by `MEMSIM_*` variables, reading a `.env`
    /// file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns a message for unparsable variables or invalid values.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, applying the same rules as
    /// [`from_env`](Self::from_env).
    ///
    /// # Errors
    ///
    /// Returns a message for unparsable values or invalid results.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_TOTAL_MB) {
            cfg.total_mb = parse_var(ENV_TOTAL_MB, &v)?;
        }
        if let Some(v) = lookup(ENV_TICK_INTERVAL_MS) {
            cfg.tick_interval_ms = parse_var(ENV_TICK_INTERVAL_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_EVENT_CAPACITY) {
            cfg.event_capacity = parse_var(ENV_EVENT_CAPACITY, &v)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| format!("{key}={value:?}: {e}"))
}
