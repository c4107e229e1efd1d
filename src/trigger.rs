//! Level-advancing trigger state machine
//!
//! Counts debounced sensor detections and maps the counter onto scene
//! indices: every `step` detections advance one level, capped at the
//! last scene. A stretch of inactivity resets the show to the base
//! scene. The debounce lock and the inactivity deadline are
//! independent: the lock only gates re-sampling, the deadline only
//! resets the counter.

use embassy_time::{Duration, Instant};

use crate::scheduler::DeadlineTimer;

/// Timing and stepping parameters for the trigger machine.
#[derive(Debug, Clone, Copy)]
pub struct TriggerConfig {
    /// Sensor sampling interval.
    pub sample_interval: Duration,
    /// Lockout engaged after a detection, during which reads are
    /// skipped.
    pub debounce: Duration,
    /// Inactivity window after which the show resets to the base
    /// scene.
    pub inactivity: Duration,
    /// Detections per level advance.
    pub step: u32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(15),
            debounce: Duration::from_millis(3_000),
            inactivity: Duration::from_millis(20_000),
            step: 10,
        }
    }
}

/// Debounced, timed, level-advancing detection counter.
#[derive(Debug)]
pub struct TriggerMachine {
    debounce: Duration,
    inactivity: Duration,
    step: u32,
    top_level: u32,
    counter: u32,
    locked_until: Option<Instant>,
    reset: DeadlineTimer,
}

impl TriggerMachine {
    /// `scene_count` bounds the level: the counter stops advancing once
    /// it maps to the last scene.
    pub fn new(config: &TriggerConfig, scene_count: usize) -> Self {
        Self {
            debounce: config.debounce,
            inactivity: config.inactivity,
            step: config.step.max(1),
            top_level: scene_count.saturating_sub(1) as u32,
            counter: 0,
            locked_until: None,
            reset: DeadlineTimer::new(),
        }
    }

    /// Whether the sensor should be read at this sample.
    ///
    /// False while the debounce lock is engaged.
    pub fn ready(&self, now: Instant) -> bool {
        self.locked_until
            .is_none_or(|until| now.as_millis() >= until.as_millis())
    }

    /// Record a triggered sample.
    ///
    /// Engages the debounce lock, cancels and re-arms the inactivity
    /// deadline, and advances the counter unless the top level was
    /// already reached. Returns the new level exactly when the counter
    /// crosses a step boundary; sub-step detections accumulate
    /// silently.
    pub fn on_triggered(&mut self, now: Instant) -> Option<usize> {
        self.locked_until = Some(now + self.debounce);
        self.reset.cancel();

        let mut advanced = None;
        if self.counter / self.step < self.top_level {
            self.counter += 1;
            if self.counter % self.step == 0 {
                advanced = Some((self.counter / self.step) as usize);
            }
        }

        // Re-armed even when the counter is capped, so a busy room keeps
        // the show alive at the top level.
        self.reset.arm(now + self.inactivity);
        advanced
    }

    /// True exactly once when the inactivity deadline passes; the
    /// counter returns to zero.
    pub fn poll_reset(&mut self, now: Instant) -> bool {
        if self.reset.fired(now) {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Level implied by the counter, capped at the last scene.
    pub fn level(&self) -> usize {
        (self.counter / self.step).min(self.top_level) as usize
    }

    /// Deadline of the pending inactivity reset, if armed.
    pub fn reset_deadline(&self) -> Option<Instant> {
        self.reset.deadline()
    }
}
