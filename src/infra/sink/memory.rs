//! In-memory notification sink.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{NotificationSink, SimEvent};

/// Bounded ring buffer of events for testing and dev.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// scheduler and inspect the other.
#[derive(Clone)]
pub struct InMemorySink {
    events: Arc<Mutex<VecDeque<SimEvent>>>,
    max_events: usize,
}

impl InMemorySink {
    /// Create a sink that keeps at most `max_events`, dropping the oldest.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Copy of the buffered events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<SimEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Remove and return the buffered events.
    #[must_use]
    pub fn take(&self) -> Vec<SimEvent> {
        self.events.lock().drain(..).collect()
    }

    /// Discard buffered events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Count buffered events with the given wire name.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name() == name).count()
    }
}

impl NotificationSink for InMemorySink {
    fn publish(&mut self, event: SimEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}
