//! FIFO admission scheduler over a shared memory pool.
//!
//! `AdmissionScheduler` is a plain state machine: every method takes
//! `&mut self` and runs to completion, so whoever owns it decides the
//! serialization point (the [`Simulator`](crate::runtime::Simulator) wraps it
//! in a lock). Per process the lifecycle is `Queued -> Running -> terminated`,
//! with termination by expiry or cancellation and no way back.
//!
//! Admission is strict FIFO with head-of-line blocking: the queue head must
//! fit before anything behind it is considered, even when a later entry
//! would fit on its own. A head that can never fit blocks the queue for
//! good.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::notify::{NotificationSink, RunningView, SimEvent, StateView};
use super::process::{Pid, Process, ProcessSpec, ProcessState};
use super::resource_pool::ResourcePool;
use super::timer::{LifecycleTimer, TimerFire};
use crate::util::clock::now;

/// First pid handed out after construction or reset.
pub const FIRST_PID: Pid = 1;

/// Lifetime counters. Reset does not clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Processes submitted.
    pub submitted: u64,
    /// Processes admitted to run.
    pub admitted: u64,
    /// Processes that ran to completion.
    pub finished: u64,
    /// Processes cancelled, queued or running.
    pub cancelled: u64,
    /// Resets performed.
    pub resets: u64,
}

struct RunningProcess {
    process: Process,
    started_at: DateTime<Utc>,
    timer: LifecycleTimer,
}

/// Owner of the waiting queue, the running set and the pool.
pub struct AdmissionScheduler {
    pool: ResourcePool,
    queue: VecDeque<Process>,
    // pids are monotonic and admission is FIFO, so key order is admission order
    running: BTreeMap<Pid, RunningProcess>,
    next_pid: Pid,
    stats: SchedulerStats,
    sink: Box<dyn NotificationSink>,
}

impl AdmissionScheduler {
    /// Create an empty scheduler over `total_mb` of memory.
    #[must_use]
    pub fn new(total_mb: u64, sink: Box<dyn NotificationSink>) -> Self {
        Self {
            pool: ResourcePool::new(total_mb),
            queue: VecDeque::new(),
            running: BTreeMap::new(),
            next_pid: FIRST_PID,
            stats: SchedulerStats::default(),
            sink,
        }
    }

    /// Submit one process. It is queued and then admitted if it fits.
    pub fn submit(&mut self, spec: &ProcessSpec) -> Process {
        let process = self.enqueue(spec);
        self.sink.publish(SimEvent::Created(vec![process.clone()]));
        process
    }

    /// Submit several processes in order, announcing them in one
    /// `process:created` event.
    pub fn submit_batch(&mut self, specs: &[ProcessSpec]) -> Vec<Process> {
        let created: Vec<Process> = specs.iter().map(|spec| self.enqueue(spec)).collect();
        if !created.is_empty() {
            self.sink.publish(SimEvent::Created(created.clone()));
        }
        created
    }

    fn enqueue(&mut self, spec: &ProcessSpec) -> Process {
        let pid = self.next_pid;
        self.next_pid += 1;
        let process = Process::from_spec(pid, spec, now());
        info!(
            pid,
            name = %process.name,
            memory_mb = process.memory_mb,
            duration_sec = process.duration_sec,
            "process submitted"
        );
        self.queue.push_back(process.clone());
        self.stats.submitted += 1;
        self.publish_state();
        self.try_admit();
        process
    }

    /// Admit queue heads while they fit. Returns how many were admitted.
    ///
    /// Publishes a single snapshot when anything was admitted.
    pub fn try_admit(&mut self) -> usize {
        let mut admitted = 0;
        while let Some(head) = self.queue.front() {
            if !self.pool.fits(head.memory_mb) {
                debug!(
                    pid = head.pid,
                    memory_mb = head.memory_mb,
                    free_mb = self.pool.free_mb(),
                    "queue head blocked"
                );
                break;
            }
            let Some(process) = self.queue.pop_front() else {
                break;
            };
            self.start(process);
            admitted += 1;
        }
        if admitted > 0 {
            self.publish_state();
        }
        self.debug_check();
        admitted
    }

    fn start(&mut self, process: Process) {
        self.pool.reserve(process.memory_mb);
        info!(
            pid = process.pid,
            memory_mb = process.memory_mb,
            free_mb = self.pool.free_mb(),
            "process admitted"
        );
        let timer = LifecycleTimer::start(process.pid, process.duration_sec);
        self.stats.admitted += 1;
        self.running.insert(
            process.pid,
            RunningProcess {
                process,
                started_at: now(),
                timer,
            },
        );
    }

    /// Finish a running process whose timer ran out.
    ///
    /// Returns `false` without side effects when `pid` is not running, which
    /// is how an expiry that lost a race with cancellation resolves.
    pub fn on_expire(&mut self, pid: Pid) -> bool {
        let Some(entry) = self.terminate(pid) else {
            debug!(pid, "expiry for process no longer running ignored");
            return false;
        };
        self.stats.finished += 1;
        info!(pid, free_mb = self.pool.free_mb(), "process finished");
        self.sink.publish(SimEvent::Finished {
            pid,
            name: entry.process.name,
            finished_at: now(),
        });
        self.publish_state();
        self.try_admit();
        true
    }

    /// Cancel a queued or running process. Returns `false` if `pid` is in
    /// neither set.
    ///
    /// Only a running cancel re-evaluates the queue. Removing a blocking
    /// queue head leaves the entries behind it waiting for the next release.
    pub fn cancel(&mut self, pid: Pid) -> bool {
        if let Some(idx) = self.queue.iter().position(|p| p.pid == pid) {
            if let Some(removed) = self.queue.remove(idx) {
                info!(pid, name = %removed.name, "queued process cancelled");
            }
            self.stats.cancelled += 1;
            // nothing was reserved, so nothing is released and nothing admitted
            self.publish_state();
            return true;
        }

        let Some(entry) = self.terminate(pid) else {
            debug!(pid, "cancel for unknown process");
            return false;
        };
        self.stats.cancelled += 1;
        info!(pid, free_mb = self.pool.free_mb(), "running process cancelled");
        self.sink.publish(SimEvent::Cancelled {
            pid,
            name: entry.process.name,
            cancelled_at: now(),
        });
        self.publish_state();
        self.try_admit();
        true
    }

    /// Remove a running process, stop its timer and release its memory.
    fn terminate(&mut self, pid: Pid) -> Option<RunningProcess> {
        let mut entry = self.running.remove(&pid)?;
        debug_assert_eq!(entry.timer.pid(), pid, "timer keyed under wrong pid");
        entry.timer.stop();
        self.pool.release(entry.process.memory_mb);
        Some(entry)
    }

    /// Wipe all state and restart pids from [`FIRST_PID`].
    pub fn reset(&mut self) {
        for entry in self.running.values_mut() {
            entry.timer.stop();
        }
        let dropped = self.running.len() + self.queue.len();
        self.running.clear();
        self.queue.clear();
        self.pool.restore();
        self.next_pid = FIRST_PID;
        self.stats.resets += 1;
        info!(dropped, "scheduler reset");
        self.publish_state();
    }

    /// Advance every running timer by one period.
    ///
    /// Only timers that were running when the tick began are advanced.
    /// Returns the pids that expired, in admission order.
    pub fn tick(&mut self) -> Vec<Pid> {
        let mut expired = Vec::new();
        let mut counting = 0usize;
        for (pid, entry) in &mut self.running {
            match entry.timer.fire() {
                TimerFire::Expired => expired.push(*pid),
                TimerFire::Tick { .. } => counting += 1,
            }
        }
        debug!(counting, expired = expired.len(), "tick");

        for pid in &expired {
            self.on_expire(*pid);
        }
        if expired.is_empty() && counting > 0 {
            self.publish_state();
        }
        expired
    }

    /// Read-only projection of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StateView {
        StateView {
            total_mb: self.pool.total_mb(),
            free_mb: self.pool.free_mb(),
            used_mb: self.pool.used_mb(),
            running: self
                .running
                .values()
                .map(|r| RunningView {
                    pid: r.process.pid,
                    name: r.process.name.clone(),
                    memory_mb: r.process.memory_mb,
                    duration_sec: r.process.duration_sec,
                    remaining_sec: r.timer.remaining_sec(),
                    started_at: r.started_at,
                })
                .collect(),
            queue: self.queue.iter().cloned().collect(),
        }
    }

    /// Where `pid` currently is, if anywhere.
    #[must_use]
    pub fn state_of(&self, pid: Pid) -> Option<ProcessState> {
        if let Some(r) = self.running.get(&pid) {
            return Some(ProcessState::Running {
                started_at: r.started_at,
                remaining_sec: r.timer.remaining_sec(),
            });
        }
        self.queue
            .iter()
            .any(|p| p.pid == pid)
            .then_some(ProcessState::Queued)
    }

    /// Pool bookkeeping.
    #[must_use]
    pub const fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats.clone()
    }

    /// Number of running processes.
    #[must_use]
    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    /// Number of waiting processes.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether `free + sum(running memory) == total` holds.
    #[must_use]
    pub fn invariant_holds(&self) -> bool {
        let reserved: u64 = self.running.values().map(|r| r.process.memory_mb).sum();
        self.pool.free_mb() + reserved == self.pool.total_mb()
    }

    fn debug_check(&self) {
        debug_assert!(
            self.invariant_holds(),
            "pool bookkeeping diverged from running set"
        );
    }

    fn publish_state(&mut self) {
        let view = self.snapshot();
        self.sink.publish(SimEvent::State(view));
    }
}
