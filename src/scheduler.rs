//! Explicit fire-time timers for the single-threaded service loop
//!
//! Interval and timeout callbacks are modeled as stored fire times
//! polled from one event loop with a monotonic clock, preserving
//! strictly serial ordering. The caller sleeps until the nearest
//! deadline between polls.

use embassy_time::{Duration, Instant};

/// A repeating schedule with drift correction.
#[derive(Debug, Clone, Copy)]
pub struct PeriodicTimer {
    next: Instant,
    interval: Duration,
}

impl PeriodicTimer {
    /// Create a schedule whose first firing is one interval after
    /// `start`.
    pub fn new(start: Instant, interval: Duration) -> Self {
        Self {
            next: start + interval,
            interval,
        }
    }

    /// True when the schedule is due, advancing it to the next firing.
    ///
    /// If servicing has fallen behind by more than two intervals, the
    /// schedule resets to `now` instead of bursting through the backlog.
    pub fn poll(&mut self, now: Instant) -> bool {
        let max_drift_ms = self.interval.as_millis() * 2;
        if now.as_millis() > self.next.as_millis() + max_drift_ms {
            self.next = now;
        }

        if now.as_millis() < self.next.as_millis() {
            return false;
        }

        self.next += self.interval;
        true
    }

    /// The next scheduled firing.
    pub fn next_deadline(&self) -> Instant {
        self.next
    }
}

/// A one-shot deadline that can be re-armed or cancelled.
///
/// Re-arming replaces the pending deadline, so at most one firing is
/// ever outstanding.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeadlineTimer {
    fire_at: Option<Instant>,
}

impl DeadlineTimer {
    pub const fn new() -> Self {
        Self { fire_at: None }
    }

    /// Arm the deadline, replacing any pending one.
    pub fn arm(&mut self, at: Instant) {
        self.fire_at = Some(at);
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.fire_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.fire_at.is_some()
    }

    /// True exactly once when the armed deadline has passed.
    pub fn fired(&mut self, now: Instant) -> bool {
        match self.fire_at {
            Some(at) if now.as_millis() >= at.as_millis() => {
                self.fire_at = None;
                true
            }
            _ => false,
        }
    }

    /// The pending deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.fire_at
    }
}
