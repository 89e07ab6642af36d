//! # mempool_sim
//!
//! A simulator of one shared memory pool serving competing process requests.
//!
//! Processes ask for a fixed memory reservation and a fixed runtime. The
//! admission scheduler starts them as soon as the pool has room, otherwise
//! parks them in a FIFO queue. A running process holds its memory until its
//! countdown expires or it is cancelled; the release re-evaluates the queue.
//! Every committed change is published to observers as a full state
//! snapshot plus lifecycle events.
//!
//! ## Key Properties
//!
//! - **Pool invariant**: `free + sum(running memory) == total` after every
//!   mutation; a violation is a panic, not an error.
//! - **Strict FIFO**: the queue head must fit before anything behind it is
//!   considered (head-of-line blocking, no best fit, no preemption).
//! - **Single serialization point**: submit, cancel, reset and clock ticks
//!   are applied one at a time, so cancel racing expiry releases memory once.
//! - **Consistent observers**: a new observer gets one initial snapshot and
//!   then every later event, with nothing in between.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mempool_sim::builders::SimulatorBuilder;
//! use mempool_sim::core::ProcessSpec;
//! use mempool_sim::runtime::TokioSpawner;
//!
//! let sim = SimulatorBuilder::new().with_total_mb(1024).build()?;
//! sim.spawn_clock(&TokioSpawner::current());
//!
//! let mut observer = sim.subscribe();
//! let p = sim.submit(&ProcessSpec::new(Some("render"), 512u64, 3u64));
//! while let Some(event) = observer.recv().await {
//!     println!("{}", serde_json::to_string(&event)?);
//! }
//! ```
//!
//! The synchronous core ([`core::AdmissionScheduler`]) has no runtime
//! dependency and can be driven directly, one `tick()` per simulated second.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling state machine and capacity accounting.
pub mod core;
/// Configuration models for the simulator.
pub mod config;
/// Builders to construct schedulers and simulators from configuration.
pub mod builders;
/// Notification sink backends.
pub mod infra;
/// Tokio runtime adapter and command API surface.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
