//! The serialized simulator service.
//!
//! All mutations (commands and clock ticks) go through one write lock on
//! the [`AdmissionScheduler`], and events are published while that lock is
//! held. Observers therefore see a linear history and no half-applied
//! admission. Snapshot reads share the read side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SimulatorConfig;
use crate::core::{
    AdmissionScheduler, Pid, Process, ProcessSpec, SchedulerError, SchedulerStats, SimEvent,
    Spawn, StateView,
};
use crate::infra::sink::{BroadcastSink, FanoutSink};

/// An observer's view: the state at subscription time plus every event
/// committed after it.
pub struct Subscription {
    /// Snapshot taken atomically with subscribing.
    pub initial: StateView,
    events: broadcast::Receiver<SimEvent>,
}

impl Subscription {
    /// Wait for the next event. Returns `None` once the simulator is gone.
    ///
    /// Events lost to lag are skipped; the next `state` event resyncs.
    pub async fn recv(&mut self) -> Option<SimEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "observer lagging, events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next event if one is ready.
    pub fn try_recv(&mut self) -> Option<SimEvent> {
        loop {
            match self.events.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "observer lagging, events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

/// Memory pool simulator shared by any number of command sources and
/// observers.
pub struct Simulator {
    config: SimulatorConfig,
    state: Arc<RwLock<AdmissionScheduler>>,
    observers: BroadcastSink,
    clock_started: AtomicBool,
    shutdown: Arc<AtomicBool>,
}

impl Simulator {
    /// Create a simulator from configuration. The clock is not started.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if validation fails.
    pub fn new(config: SimulatorConfig) -> Result<Self, SchedulerError> {
        crate::builders::SimulatorBuilder::from_config(config).build()
    }

    pub(crate) fn from_parts(config: SimulatorConfig, sinks: FanoutSink) -> Self {
        let observers = BroadcastSink::new(config.event_capacity);
        let sink = sinks.with(Box::new(observers.clone()));
        let scheduler = AdmissionScheduler::new(config.total_mb, Box::new(sink));
        info!(
            total_mb = config.total_mb,
            tick_interval_ms = config.tick_interval_ms,
            "simulator initialized"
        );
        Self {
            config,
            state: Arc::new(RwLock::new(scheduler)),
            observers,
            clock_started: AtomicBool::new(false),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Submit one process.
    pub fn submit(&self, spec: &ProcessSpec) -> Process {
        self.state.write().submit(spec)
    }

    /// Submit several processes as one command.
    pub fn submit_batch(&self, specs: &[ProcessSpec]) -> Vec<Process> {
        self.state.write().submit_batch(specs)
    }

    /// Cancel a queued or running process.
    pub fn cancel(&self, pid: Pid) -> bool {
        self.state.write().cancel(pid)
    }

    /// Wipe all state. Any tick after this only sees post-reset processes.
    pub fn reset(&self) {
        self.state.write().reset();
    }

    /// Advance all timers by one period, as the clock does.
    pub fn tick(&self) -> Vec<Pid> {
        self.state.write().tick()
    }

    /// Expire a running process immediately. No-op if it is not running.
    pub fn expire(&self, pid: Pid) -> bool {
        self.state.write().on_expire(pid)
    }

    /// Settled snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StateView {
        self.state.read().snapshot()
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.state.read().stats()
    }

    /// Whether the pool bookkeeping equation currently holds.
    #[must_use]
    pub fn invariant_holds(&self) -> bool {
        self.state.read().invariant_holds()
    }

    /// Start observing. The initial snapshot and the receiver are taken under
    /// the same read lock, so no event falls between them.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let guard = self.state.read();
        let events = self.observers.subscribe();
        let initial = guard.snapshot();
        drop(guard);
        debug!(observers = self.observers.receiver_count(), "observer subscribed");
        Subscription { initial, events }
    }

    /// Number of live observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.receiver_count()
    }

    /// Start the periodic clock on `spawner`. Returns `false` if it was
    /// already started or the simulator is shut down.
    pub fn spawn_clock<S: Spawn>(&self, spawner: &S) -> bool {
        if self.shutdown.load(Ordering::Acquire) || self.clock_started.swap(true, Ordering::AcqRel)
        {
            return false;
        }

        let state = Arc::downgrade(&self.state);
        let shutdown = Arc::clone(&self.shutdown);
        let period = self.config.tick_interval();

        spawner.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if shutdown.load(Ordering::Acquire) {
                    break;
                }
                let Some(shared) = state.upgrade() else {
                    break;
                };
                let expired = shared.write().tick();
                if !expired.is_empty() {
                    debug!(?expired, "clock expired processes");
                }
            }
            debug!("simulator clock stopped");
        });

        info!(period_ms = self.config.tick_interval_ms, "simulator clock started");
        true
    }

    /// Whether the clock is ticking.
    #[must_use]
    pub fn is_clock_running(&self) -> bool {
        self.clock_started.load(Ordering::Acquire) && !self.shutdown.load(Ordering::Acquire)
    }

    /// Stop the clock. Idempotent; commands keep working afterwards.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("simulator shutting down");
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
    }
}
