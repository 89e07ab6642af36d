//! Sink that writes notifications to the tracing log.

use tracing::debug;

use crate::core::{NotificationSink, SimEvent};

/// Logs every event at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&mut self, event: SimEvent) {
        match &event {
            SimEvent::State(view) => debug!(
                free_mb = view.free_mb,
                running = view.running.len(),
                queued = view.queue.len(),
                "state"
            ),
            SimEvent::Created(created) => debug!(count = created.len(), "process:created"),
            SimEvent::Finished { pid, name, .. } => debug!(pid, %name, "process:finished"),
            SimEvent::Cancelled { pid, name, .. } => debug!(pid, %name, "process:cancelled"),
        }
    }
}
