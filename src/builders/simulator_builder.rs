//! Builder for schedulers and simulators.

use std::time::Duration;

use crate::config::SimulatorConfig;
use crate::core::{AdmissionScheduler, NotificationSink, SchedulerError};
use crate::infra::sink::FanoutSink;
#[cfg(feature = "tokio-runtime")]
use crate::runtime::Simulator;

/// Collects configuration and extra sinks, validates, then builds.
#[derive(Default)]
pub struct SimulatorBuilder {
    config: SimulatorConfig,
    sinks: FanoutSink,
}

impl SimulatorBuilder {
    /// Start from default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn from_config(config: SimulatorConfig) -> Self {
        Self {
            config,
            sinks: FanoutSink::new(),
        }
    }

    /// Set pool capacity.
    #[must_use]
    pub fn with_total_mb(mut self, total_mb: u64) -> Self {
        self.config.total_mb = total_mb;
        self
    }

    /// Set the timer period.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set per-observer event buffering.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Add a sink that receives every event alongside observers.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Configuration as currently set.
    #[must_use]
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Build a bare scheduler publishing to the registered sinks.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if validation fails.
    pub fn build_scheduler(self) -> Result<AdmissionScheduler, SchedulerError> {
        self.config
            .validate()
            .map_err(SchedulerError::InvalidConfig)?;
        Ok(AdmissionScheduler::new(
            self.config.total_mb,
            Box::new(self.sinks),
        ))
    }

    /// Build a simulator whose observers are fed by a broadcast channel in
    /// addition to the registered sinks. The clock is not started.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if validation fails.
    #[cfg(feature = "tokio-runtime")]
    pub fn build(self) -> Result<Simulator, SchedulerError> {
        self.config
            .validate()
            .map_err(SchedulerError::InvalidConfig)?;
        Ok(Simulator::from_parts(self.config, self.sinks))
    }
}
