//! Builders to construct simulator components from configuration.

pub mod simulator_builder;

pub use simulator_builder::SimulatorBuilder;
