//! Tokio runtime adapter: the serialized simulator service, its clock, and
//! the command API surface.

pub mod api;
pub mod simulator;
pub mod tokio_spawner;

pub use api::{handle, parse_command, CancelAck, CancelRequest, Command, CreatePayload, Reply};
pub use simulator::{Simulator, Subscription};
pub use tokio_spawner::TokioSpawner;
