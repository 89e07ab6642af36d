//! Tests for command decoding and dispatch

use mempool_sim::builders::SimulatorBuilder;
use mempool_sim::core::SchedulerError;
use mempool_sim::runtime::{handle, parse_command, CancelAck, Command, Reply, Simulator};
use serde_json::json;

fn simulator() -> Simulator {
    SimulatorBuilder::new().with_total_mb(100).build().unwrap()
}

#[test]
fn test_parse_create_single() {
    let cmd = parse_command(
        r#"{"type":"process:create","payload":{"name":"db","memoryMB":40,"durationSec":3}}"#,
    )
    .unwrap();
    let Command::Create(payload) = cmd else {
        panic!("expected create");
    };
    let specs = payload.into_specs();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].name.as_deref(), Some("db"));
    assert_eq!(specs[0].memory_mb.normalize(), 40);
    assert_eq!(specs[0].duration_sec.normalize(), 3);
}

#[test]
fn test_parse_create_many_lenient() {
    let cmd = parse_command(
        r#"{"type":"process:create","payload":[
            {"memoryMB":"64","durationSec":2.9},
            {"memoryMB":-5,"durationSec":"soon"},
            {}
        ]}"#,
    )
    .unwrap();
    let Command::Create(payload) = cmd else {
        panic!("expected create");
    };
    let specs = payload.into_specs();
    let sizes: Vec<_> = specs
        .iter()
        .map(|s| (s.memory_mb.normalize(), s.duration_sec.normalize()))
        .collect();
    assert_eq!(sizes, vec![(64, 2), (1, 1), (1, 1)]);
}

#[test]
fn test_parse_cancel_string_pid() {
    let cmd = parse_command(r#"{"type":"process:cancel","payload":{"pid":"3"}}"#).unwrap();
    let Command::Cancel(req) = cmd else {
        panic!("expected cancel");
    };
    assert_eq!(req.target(), Some(3));
    assert_eq!(req.pid, json!("3"));
}

#[test]
fn test_parse_reset_without_payload() {
    assert!(matches!(
        parse_command(r#"{"type":"sim:reset"}"#).unwrap(),
        Command::Reset
    ));
    assert!(matches!(
        parse_command(r#"{"type":"sim:reset","payload":null}"#).unwrap(),
        Command::Reset
    ));
}

#[test]
fn test_parse_malformed() {
    for input in [
        "",
        "{",
        r#"{"type":"process:explode"}"#,
        r#"{"payload":{}}"#,
    ] {
        let err = parse_command(input).unwrap_err();
        assert!(matches!(err, SchedulerError::MalformedCommand(_)), "{input}");
    }
}

#[test]
fn test_handle_create_returns_records() {
    let sim = simulator();
    let cmd = parse_command(
        r#"{"type":"process:create","payload":[{"memoryMB":60,"durationSec":1},{"memoryMB":60,"durationSec":1}]}"#,
    )
    .unwrap();

    let Reply::Created(records) = handle(&sim, cmd) else {
        panic!("expected created reply");
    };
    assert_eq!(records.iter().map(|p| p.pid).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(records[1].name, "Process-2");

    let view = sim.snapshot();
    assert_eq!(view.running.len(), 1);
    assert_eq!(view.queue.len(), 1);
}

#[test]
fn test_handle_cancel_ack() {
    let sim = simulator();
    handle(
        &sim,
        parse_command(r#"{"type":"process:create","payload":{"memoryMB":10,"durationSec":5}}"#)
            .unwrap(),
    );

    let cancel = |raw: &str| handle(&sim, parse_command(raw).unwrap());
    assert_eq!(
        cancel(r#"{"type":"process:cancel","payload":{"pid":1}}"#),
        Reply::CancelAck(CancelAck {
            pid: json!(1),
            ok: true
        })
    );
    assert_eq!(
        cancel(r#"{"type":"process:cancel","payload":{"pid":1}}"#),
        Reply::CancelAck(CancelAck {
            pid: json!(1),
            ok: false
        })
    );
    assert_eq!(
        cancel(r#"{"type":"process:cancel","payload":{"pid":"abc"}}"#),
        Reply::CancelAck(CancelAck {
            pid: json!("abc"),
            ok: false
        })
    );
    assert_eq!(
        cancel(r#"{"type":"process:cancel","payload":{}}"#),
        Reply::CancelAck(CancelAck {
            pid: json!(null),
            ok: false
        })
    );
    assert_eq!(sim.snapshot().free_mb, 100);
}

#[test]
fn test_cancel_ack_echoes_string_pid() {
    let sim = simulator();
    sim.submit(&mempool_sim::core::ProcessSpec::anonymous(10u64, 5u64));

    let reply = handle(
        &sim,
        parse_command(r#"{"type":"process:cancel","payload":{"pid":" 1 "}}"#).unwrap(),
    );
    let json = serde_json::to_value(&reply).unwrap();
    assert_eq!(json["payload"]["pid"], " 1 ");
    assert_eq!(json["payload"]["ok"], true);
    assert!(sim.snapshot().running.is_empty());
}

#[test]
fn test_handle_reset_ack() {
    let sim = simulator();
    sim.submit(&mempool_sim::core::ProcessSpec::anonymous(50u64, 5u64));

    let reply = handle(&sim, Command::Reset);
    assert_eq!(reply, Reply::ResetAck);
    assert!(sim.snapshot().running.is_empty());
    assert_eq!(sim.stats().resets, 1);
}

#[test]
fn test_reply_wire_format() {
    let ack = Reply::CancelAck(CancelAck {
        pid: json!(7),
        ok: true,
    });
    let json = serde_json::to_value(&ack).unwrap();
    assert_eq!(json["type"], "process:cancel:ack");
    assert_eq!(json["payload"]["pid"], 7);
    assert_eq!(json["payload"]["ok"], true);

    let reset = serde_json::to_value(Reply::ResetAck).unwrap();
    assert_eq!(reset["type"], "sim:reset:ack");
}
