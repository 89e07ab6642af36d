//! Outbound notifications and the sink abstraction.
//!
//! Wire names match what observers already consume: `state`,
//! `process:created`, `process:finished`, `process:cancelled`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::process::{Pid, Process};

/// A running process as shown to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningView {
    /// Process id.
    pub pid: Pid,
    /// Display label.
    pub name: String,
    /// Reserved memory.
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    /// Total runtime.
    #[serde(rename = "durationSec")]
    pub duration_sec: u64,
    /// Seconds left before expiry.
    #[serde(rename = "remainingSec")]
    pub remaining_sec: u64,
    /// Admission time.
    #[serde(rename = "startedAt")]
    pub started_at: DateTime<Utc>,
}

/// Consistent projection of the whole scheduler state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateView {
    /// Pool capacity.
    #[serde(rename = "totalMB")]
    pub total_mb: u64,
    /// Unreserved memory.
    #[serde(rename = "freeMB")]
    pub free_mb: u64,
    /// Reserved memory.
    #[serde(rename = "usedMB")]
    pub used_mb: u64,
    /// Running processes in admission order.
    pub running: Vec<RunningView>,
    /// Waiting processes in FIFO order.
    pub queue: Vec<Process>,
}

impl StateView {
    /// Find a running process by pid.
    #[must_use]
    pub fn running_pid(&self, pid: Pid) -> Option<&RunningView> {
        self.running.iter().find(|r| r.pid == pid)
    }

    /// Whether `pid` is waiting.
    #[must_use]
    pub fn is_queued(&self, pid: Pid) -> bool {
        self.queue.iter().any(|q| q.pid == pid)
    }
}

/// Event delivered to every observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SimEvent {
    /// Full state after a committed mutation.
    #[serde(rename = "state")]
    State(StateView),
    /// Processes created by one submit call.
    #[serde(rename = "process:created")]
    Created(Vec<Process>),
    /// A process ran to completion.
    #[serde(rename = "process:finished")]
    Finished {
        /// Process id.
        pid: Pid,
        /// Display label.
        name: String,
        /// Expiry time.
        #[serde(rename = "finishedAt")]
        finished_at: DateTime<Utc>,
    },
    /// A running process was cancelled.
    #[serde(rename = "process:cancelled")]
    Cancelled {
        /// Process id.
        pid: Pid,
        /// Display label.
        name: String,
        /// Cancellation time.
        #[serde(rename = "cancelledAt")]
        cancelled_at: DateTime<Utc>,
    },
}

impl SimEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::State(_) => "state",
            Self::Created(_) => "process:created",
            Self::Finished { .. } => "process:finished",
            Self::Cancelled { .. } => "process:cancelled",
        }
    }

    /// Pid of a terminal event (`finished` or `cancelled`).
    #[must_use]
    pub const fn terminal_pid(&self) -> Option<Pid> {
        match self {
            Self::Finished { pid, .. } | Self::Cancelled { pid, .. } => Some(*pid),
            _ => None,
        }
    }
}

/// Destination for scheduler notifications.
///
/// Called inside the scheduler's serialization point, so implementations
/// must return promptly and never block on observers.
pub trait NotificationSink: Send + Sync {
    /// Deliver one event.
    fn publish(&mut self, event: SimEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = SimEvent::Finished {
            pid: 4,
            name: "job".into(),
            finished_at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "process:finished");
        assert_eq!(json["data"]["pid"], 4);
        assert!(json["data"]["finishedAt"].is_string());
        assert_eq!(event.terminal_pid(), Some(4));
    }

    #[test]
    fn test_state_wire_shape() {
        let view = StateView {
            total_mb: 1024,
            free_mb: 1000,
            used_mb: 24,
            running: Vec::new(),
            queue: Vec::new(),
        };
        let json = serde_json::to_value(SimEvent::State(view)).unwrap();
        assert_eq!(json["event"], "state");
        assert_eq!(json["data"]["totalMB"], 1024);
        assert_eq!(json["data"]["freeMB"], 1000);
        assert_eq!(json["data"]["usedMB"], 24);
    }
}
