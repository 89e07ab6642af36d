//! Core scheduling state machine and capacity accounting.

pub mod error;
pub mod notify;
pub mod process;
pub mod resource_pool;
pub mod scheduler;
pub mod spawn;
pub mod timer;

pub use error::{AppResult, SchedulerError};
pub use notify::{NotificationSink, RunningView, SimEvent, StateView};
pub use process::{Pid, Process, ProcessSpec, ProcessState, Quantity};
pub use resource_pool::ResourcePool;
pub use scheduler::{AdmissionScheduler, SchedulerStats, FIRST_PID};
pub use spawn::Spawn;
pub use timer::{LifecycleTimer, TimerFire};
