//! Configuration models for the simulator.

pub mod simulator;

pub use simulator::{SimulatorConfig, ENV_EVENT_CAPACITY, ENV_TICK_INTERVAL_MS, ENV_TOTAL_MB};
