//! Notification sink backends.

#[cfg(feature = "tokio-runtime")]
pub mod broadcast;
pub mod log;
pub mod memory;

#[cfg(feature = "tokio-runtime")]
pub use broadcast::BroadcastSink;
pub use log::TracingSink;
pub use memory::InMemorySink;

use crate::core::{NotificationSink, SimEvent};

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn publish(&mut self, _event: SimEvent) {}
}

/// Forwards each event to several sinks in registration order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl FanoutSink {
    /// Create an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a downstream sink.
    #[must_use]
    pub fn with(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add a downstream sink in place.
    pub fn push(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    /// Number of downstream sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sinks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl NotificationSink for FanoutSink {
    fn publish(&mut self, event: SimEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.publish(event.clone());
        }
        last.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fanout_delivers_to_all() {
        let a = InMemorySink::new(8);
        let b = InMemorySink::new(8);
        let mut fanout = FanoutSink::new()
            .with(Box::new(a.clone()))
            .with(Box::new(b.clone()));
        assert_eq!(fanout.len(), 2);

        fanout.publish(SimEvent::Created(Vec::new()));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_empty_fanout_is_noop() {
        let mut fanout = FanoutSink::new();
        assert!(fanout.is_empty());
        fanout.publish(SimEvent::Created(Vec::new()));
    }
}
