//! Fixed-period tick scheduling.
//!
//! The orb advances in whole ticks: rotation, emission and envelopes all
//! count ticks, never seconds. [`Clock`] turns wall-clock readings into a
//! number of due ticks so any host loop (a winit event loop, a test, a
//! benchmark) can drive it.
//!
//! # Example
//!
//! ```ignore
//! use energy_orb::time::Clock;
//! use std::time::{Duration, Instant};
//!
//! let mut clock = Clock::new(Duration::from_millis(16), 4);
//! clock.start(Instant::now());
//!
//! // In the host loop:
//! for _ in 0..clock.due(Instant::now()) {
//!     engine.tick();
//! }
//! ```
//!
//! The host's own timer resolution caps the real cadence; `Clock` only
//! guarantees that no more than one tick per period is reported on average
//! and that a stalled host catches up by at most `max_catch_up` ticks.

use std::time::{Duration, Instant};

/// Fixed-period tick clock with bounded catch-up.
#[derive(Debug, Clone)]
pub struct Clock {
    period: Duration,
    max_catch_up: u32,
    /// Deadline of the next tick while running.
    next: Option<Instant>,
    /// Total ticks reported since the last `start`.
    ticks: u64,
}

impl Clock {
    /// Create a stopped clock. A zero period is bumped to one microsecond.
    pub fn new(period: Duration, max_catch_up: u32) -> Self {
        Self {
            period: period.max(Duration::from_micros(1)),
            max_catch_up: max_catch_up.max(1),
            next: None,
            ticks: 0,
        }
    }

    /// Arm the clock. The first tick is due immediately.
    ///
    /// Starting a running clock re-bases its schedule to `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now);
        self.ticks = 0;
    }

    /// Disarm the clock. Safe to call any number of times.
    pub fn stop(&mut self) {
        self.next = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks reported since the last `start`.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// When the next tick is due, if running.
    #[inline]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Consume and return the number of ticks due at `now`.
    ///
    /// If the host fell more than `max_catch_up` periods behind, the backlog
    /// is dropped and the schedule restarts from `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(next) = self.next else {
            return 0;
        };
        if now < next {
            return 0;
        }

        let behind = now.duration_since(next);
        let owed = 1 + (behind.as_nanos() / self.period.as_nanos()) as u64;

        let count = if owed > u64::from(self.max_catch_up) {
            log::debug!("clock fell {owed} ticks behind, dropping backlog");
            self.next = Some(now + self.period);
            self.max_catch_up
        } else {
            self.next = Some(next + self.period * owed as u32);
            owed as u32
        };

        self.ticks += u64::from(count);
        count
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(Duration::from_millis(16), 4)
    }
}
