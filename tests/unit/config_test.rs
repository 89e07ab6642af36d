//! Tests for configuration validation and loading

use std::collections::HashMap;

use mempool_sim::config::{
    SimulatorConfig, ENV_EVENT_CAPACITY, ENV_TICK_INTERVAL_MS, ENV_TOTAL_MB,
};

#[test]
fn test_defaults() {
    let config = SimulatorConfig::default();
    assert_eq!(config.total_mb, 1024);
    assert_eq!(config.tick_interval_ms, 1000);
    assert_eq!(config.tick_interval().as_secs(), 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_total() {
    let config = SimulatorConfig {
        total_mb: 0,
        ..SimulatorConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_tick_interval() {
    let config = SimulatorConfig {
        tick_interval_ms: 0,
        ..SimulatorConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_event_capacity() {
    let config = SimulatorConfig {
        event_capacity: 0,
        ..SimulatorConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_from_json_partial() {
    let config = SimulatorConfig::from_json_str(r#"{"total_mb": 2048}"#).unwrap();
    assert_eq!(config.total_mb, 2048);
    assert_eq!(config.tick_interval_ms, 1000);
}

#[test]
fn test_from_json_rejects_invalid() {
    assert!(SimulatorConfig::from_json_str(r#"{"total_mb": 0}"#).is_err());
    assert!(SimulatorConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_lookup() {
    let vars: HashMap<&str, &str> = [
        (ENV_TOTAL_MB, "512"),
        (ENV_TICK_INTERVAL_MS, " 250 "),
        (ENV_EVENT_CAPACITY, "64"),
    ]
    .into_iter()
    .collect();

    let config =
        SimulatorConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.total_mb, 512);
    assert_eq!(config.tick_interval_ms, 250);
    assert_eq!(config.event_capacity, 64);
}

#[test]
fn test_from_lookup_bad_number() {
    let err = SimulatorConfig::from_lookup(|key| {
        (key == ENV_TOTAL_MB).then(|| "plenty".to_string())
    })
    .unwrap_err();
    assert!(err.contains(ENV_TOTAL_MB));
}

#[test]
fn test_from_lookup_empty_uses_defaults() {
    let config = SimulatorConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config, SimulatorConfig::default());
}
