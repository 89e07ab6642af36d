//! Command-source request/response models.
//!
//! Commands arrive as adjacently tagged JSON, e.g.
//! `{"type":"process:cancel","payload":{"pid":3}}`, and every command gets
//! exactly one reply to its sender. State changes reach observers separately
//! through [`Simulator::subscribe`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::{Pid, Process, ProcessSpec, Quantity, SchedulerError};

use super::Simulator;

/// `process:create` payload: one spec or a list of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatePayload {
    /// Several processes in one command.
    Many(Vec<ProcessSpec>),
    /// A single process.
    One(ProcessSpec),
}

impl CreatePayload {
    /// Specs in submission order.
    #[must_use]
    pub fn into_specs(self) -> Vec<ProcessSpec> {
        match self {
            Self::Many(specs) => specs,
            Self::One(spec) => vec![spec],
        }
    }
}

/// `process:cancel` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// Target pid exactly as sent. Coerced leniently when looked up.
    #[serde(default)]
    pub pid: Value,
}

impl CancelRequest {
    /// The pid this request resolves to, if the value names one.
    #[must_use]
    pub fn target(&self) -> Option<Pid> {
        Quantity::deserialize(&self.pid)
            .ok()
            .and_then(Quantity::as_pid)
    }
}

/// Reply to a cancel command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAck {
    /// The request's pid, echoed unchanged.
    pub pid: Value,
    /// Whether a queued or running process was cancelled.
    pub ok: bool,
}

/// Inbound command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    /// Create one or more processes.
    #[serde(rename = "process:create")]
    Create(CreatePayload),
    /// Cancel a process by pid.
    #[serde(rename = "process:cancel")]
    Cancel(CancelRequest),
    /// Wipe the simulation.
    #[serde(rename = "sim:reset")]
    Reset,
}

/// Reply sent back to the command's sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Reply {
    /// Records created by a `process:create`.
    #[serde(rename = "process:created")]
    Created(Vec<Process>),
    /// Outcome of a `process:cancel`.
    #[serde(rename = "process:cancel:ack")]
    CancelAck(CancelAck),
    /// Acknowledgment of `sim:reset`.
    #[serde(rename = "sim:reset:ack")]
    ResetAck,
}

/// Decode a command from JSON text.
///
/// # Errors
///
/// Returns [`SchedulerError::MalformedCommand`] for invalid JSON or an
/// unknown command type.
pub fn parse_command(input: &str) -> Result<Command, SchedulerError> {
    serde_json::from_str(input).map_err(|e| SchedulerError::MalformedCommand(e.to_string()))
}

/// Apply a command to the simulator.
pub fn handle(sim: &Simulator, command: Command) -> Reply {
    match command {
        Command::Create(payload) => {
            let specs = payload.into_specs();
            debug!(count = specs.len(), "create command");
            Reply::Created(sim.submit_batch(&specs))
        }
        Command::Cancel(req) => {
            let target = req.target();
            let ok = target.is_some_and(|pid| sim.cancel(pid));
            debug!(?target, ok, "cancel command");
            Reply::CancelAck(CancelAck { pid: req.pid, ok })
        }
        Command::Reset => {
            sim.reset();
            Reply::ResetAck
        }
    }
}
