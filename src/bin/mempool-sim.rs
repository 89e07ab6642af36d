//! Line-oriented front end for the memory pool simulator.
//!
//! Reads one JSON command per line on stdin and writes JSON lines on stdout:
//! first the initial `state` event, then every event as it happens, with
//! command replies interleaved. Logs go to stderr (`RUST_LOG` controls them).
//!
//! Configuration comes from `MEMSIM_*` variables or a `.env` file.

use anyhow::Context;
use mempool_sim::builders::SimulatorBuilder;
use mempool_sim::config::SimulatorConfig;
use mempool_sim::core::{AppResult, SimEvent};
use mempool_sim::infra::TracingSink;
use mempool_sim::runtime::{self, TokioSpawner};
use mempool_sim::util::init_tracing;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

fn encode<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "failed to encode output");
            None
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    init_tracing();

    let config = SimulatorConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("loading configuration")?;
    let sim = SimulatorBuilder::from_config(config)
        .with_sink(Box::new(TracingSink))
        .build()?;
    sim.spawn_clock(&TokioSpawner::current());

    // one writer task keeps events and replies from interleaving mid-line
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                break;
            }
        }
    });

    let mut subscription = sim.subscribe();
    let initial = SimEvent::State(subscription.initial.clone());
    if let Some(line) = encode(&initial) {
        let _ = out_tx.send(line);
    }
    let events_tx = out_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            let Some(line) = encode(&event) else { continue };
            if events_tx.send(line).is_err() {
                break;
            }
        }
    });

    info!(total_mb = sim.config().total_mb, "reading commands from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match runtime::parse_command(&line) {
            Ok(command) => {
                let reply = runtime::handle(&sim, command);
                if let Some(encoded) = encode(&reply) {
                    let _ = out_tx.send(encoded);
                }
            }
            Err(e) => warn!(error = %e, "ignoring command"),
        }
    }

    info!("stdin closed, shutting down");
    sim.shutdown();
    drop(sim);
    let _ = forwarder.await;
    drop(out_tx);
    let _ = writer.await;
    Ok(())
}
