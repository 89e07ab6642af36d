//! Tests for builder modules

use std::time::Duration;

use mempool_sim::builders::SimulatorBuilder;
use mempool_sim::config::SimulatorConfig;
use mempool_sim::core::{ProcessSpec, SchedulerError};
use mempool_sim::infra::sink::InMemorySink;

#[test]
fn test_builder_defaults() {
    let builder = SimulatorBuilder::new();
    assert_eq!(builder.config(), &SimulatorConfig::default());
}

#[test]
fn test_builder_overrides() {
    let builder = SimulatorBuilder::new()
        .with_total_mb(4096)
        .with_tick_interval(Duration::from_millis(10))
        .with_event_capacity(8);
    assert_eq!(builder.config().total_mb, 4096);
    assert_eq!(builder.config().tick_interval_ms, 10);
    assert_eq!(builder.config().event_capacity, 8);
}

#[test]
fn test_build_rejects_invalid() {
    let result = SimulatorBuilder::new().with_event_capacity(0).build();
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_simulator_forwards_to_extra_sinks() {
    let sink = InMemorySink::new(32);
    let sim = SimulatorBuilder::new()
        .with_total_mb(10)
        .with_sink(Box::new(sink.clone()))
        .build()
        .unwrap();

    sim.submit(&ProcessSpec::anonymous(20u64, 1u64));
    assert_eq!(sink.count("process:created"), 1);
    assert_eq!(sim.snapshot().queue.len(), 1);
}
