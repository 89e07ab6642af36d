//! Tests for utility functions

use mempool_sim::util::{init_tracing, now};

#[test]
fn test_now_is_utc_and_monotone_enough() {
    let a = now();
    let b = now();
    assert!(b >= a);
    assert!(a.to_rfc3339().ends_with("+00:00"));
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialized twice without panicking");
}
