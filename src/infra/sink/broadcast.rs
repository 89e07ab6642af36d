//! Fan-out to live observers over a tokio broadcast channel.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::core::{NotificationSink, SimEvent};

/// Broadcasts events to every subscribed receiver.
///
/// Sending never blocks. A receiver that falls more than the channel
/// capacity behind loses the oldest events and sees `Lagged`; the next state
/// snapshot brings it back in sync.
#[derive(Clone)]
pub struct BroadcastSink {
    sender: Arc<broadcast::Sender<SimEvent>>,
}

impl BroadcastSink {
    /// Create a broadcaster buffering up to `capacity` events per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Receive all events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SimEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl NotificationSink for BroadcastSink {
    fn publish(&mut self, event: SimEvent) {
        // no receivers is fine
        let _ = self.sender.send(event);
    }
}
