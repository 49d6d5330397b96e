//! Time sources for the quiet timer.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A source of monotonic timestamps, sampled once per input line.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The process's monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Lets tests replay a log with simulated arrival times instead of sleeping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    current: Cell<Instant>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            current: Cell::new(origin),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    /// Sets the clock to `offset` after its creation instant.
    ///
    /// Offsets earlier than the current reading are ignored.
    pub fn set_offset(&self, offset: Duration) {
        let target = self.origin + offset;
        if target > self.current.get() {
            self.current.set(target);
        }
    }

    /// Time elapsed since creation, as seen by this clock.
    pub fn offset(&self) -> Duration {
        self.current.get() - self.origin
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.current.get()
    }
}
