//! Tests for error types

use mempool_sim::core::SchedulerError;

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("total_mb must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: total_mb must be greater than 0"
    );
}

#[test]
fn test_malformed_command_error() {
    let err = SchedulerError::MalformedCommand("expected value".to_string());
    assert_eq!(format!("{}", err), "malformed command: expected value");
}

#[test]
fn test_converts_to_anyhow() {
    let result: mempool_sim::core::AppResult<()> =
        Err(SchedulerError::MalformedCommand("x".into()).into());
    assert!(result.unwrap_err().to_string().contains("malformed command"));
}
