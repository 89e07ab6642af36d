//! Error types for simulator operations.
//!
//! Only recoverable faults live here. Bookkeeping invariant breaks are
//! assertions, not variants.

use thiserror::Error;

/// Errors produced by simulator components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// An inbound command could not be decoded.
    #[error("malformed command: {0}")]
    MalformedCommand(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
