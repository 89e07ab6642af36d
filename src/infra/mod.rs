//! Infrastructure adapters for notification delivery.

pub mod sink;

pub use sink::{FanoutSink, InMemorySink, NullSink, TracingSink};
#[cfg(feature = "tokio-runtime")]
pub use sink::BroadcastSink;
