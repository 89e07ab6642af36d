//! Per-process runtime countdown.
//!
//! A `LifecycleTimer` is owned by exactly one running process. It does not
//! schedule itself: the simulator clock calls [`LifecycleTimer::fire`] once
//! per period through the scheduler's serialized `tick`, which is what makes
//! stop and fire mutually exclusive.

use super::process::Pid;

/// Outcome of a single timer period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerFire {
    /// Still counting down.
    Tick {
        /// Seconds left after this period.
        remaining_sec: u64,
    },
    /// Countdown reached zero; the owner must expire the process.
    Expired,
}

/// Countdown for one running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleTimer {
    pid: Pid,
    remaining_sec: u64,
    stopped: bool,
}

impl LifecycleTimer {
    /// Arm a timer for `duration_sec` periods.
    #[must_use]
    pub const fn start(pid: Pid, duration_sec: u64) -> Self {
        Self {
            pid,
            remaining_sec: duration_sec,
            stopped: false,
        }
    }

    /// Owner pid.
    #[must_use]
    pub const fn pid(&self) -> Pid {
        self.pid
    }

    /// Seconds left.
    #[must_use]
    pub const fn remaining_sec(&self) -> u64 {
        self.remaining_sec
    }

    /// Whether [`stop`](Self::stop) has been called.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Advance one period.
    ///
    /// # Panics
    ///
    /// Panics if the timer was already stopped.
    pub fn fire(&mut self) -> TimerFire {
        assert!(!self.stopped, "timer for pid {} fired after stop", self.pid);
        self.remaining_sec = self.remaining_sec.saturating_sub(1);
        if self.remaining_sec == 0 {
            TimerFire::Expired
        } else {
            TimerFire::Tick {
                remaining_sec: self.remaining_sec,
            }
        }
    }

    /// Stop the timer permanently.
    ///
    /// # Panics
    ///
    /// Panics on a second stop.
    pub fn stop(&mut self) {
        assert!(!self.stopped, "timer for pid {} stopped twice", self.pid);
        self.stopped = true;
    }
}
