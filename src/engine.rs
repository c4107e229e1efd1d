//! The engine: one service loop over scenes, sensor and intents
//!
//! Owns the hardware collaborators and every timer. The caller runs a
//! single loop: call [`Engine::service`] with the current time, then
//! sleep until the returned deadline. Pattern ticks, sensor sampling,
//! the debounce lock, the inactivity reset and intent processing all
//! happen inside `service`, strictly serialized - no locks, no
//! preemption.

use embassy_time::{Duration, Instant};

use crate::intent::{IntentReceiver, SceneIntent};
use crate::scene::{SceneError, SceneTable};
use crate::scheduler::PeriodicTimer;
use crate::trigger::{TriggerConfig, TriggerMachine};
use crate::{PwmOutput, SceneSink, TriggerInput};

/// Engine configuration, defaulting to the reference installation's
/// timing.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Waveform evaluation interval.
    pub tick_interval: Duration,
    /// PWM carrier frequency handed through to the output collaborator.
    pub pwm_frequency_hz: u32,
    /// Event name used for scene notifications.
    pub event_name: &'static str,
    /// Trigger machine parameters.
    pub trigger: TriggerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(15),
            pwm_frequency_hz: 64,
            event_name: "music",
            trigger: TriggerConfig::default(),
        }
    }
}

/// Timing information returned by [`Engine::service`].
#[derive(Debug, Clone, Copy)]
pub struct ServiceResult {
    /// The nearest pending deadline.
    pub next_deadline: Instant,
    /// How long to wait before calling `service` again. Zero when
    /// already behind schedule.
    pub sleep_duration: Duration,
}

/// The orchestrator: scene table, trigger machine, intent drain and
/// tick driver behind one `service` entry point.
///
/// # Type Parameters
/// * `O` - PWM output collaborator
/// * `D` - digital sensor collaborator
/// * `K` - scene notification sink
/// * `N` - scene table capacity
/// * `INTENTS` - intent queue capacity
pub struct Engine<'a, O, D, K, const N: usize, const INTENTS: usize>
where
    O: PwmOutput,
    D: TriggerInput,
    K: SceneSink,
{
    output: O,
    sensor: D,
    sink: K,
    scenes: SceneTable<N>,
    trigger: TriggerMachine,
    intents: IntentReceiver<'a, INTENTS>,
    pattern_timer: PeriodicTimer,
    sample_timer: PeriodicTimer,
    tick_interval: Duration,
    pwm_frequency_hz: u32,
    event_name: &'static str,
}

impl<'a, O, D, K, const N: usize, const INTENTS: usize> Engine<'a, O, D, K, N, INTENTS>
where
    O: PwmOutput,
    D: TriggerInput,
    K: SceneSink,
{
    /// Build the engine around a scene table and its collaborators.
    ///
    /// Timers start counting from `now`; nothing runs until the first
    /// `service` call.
    pub fn new(
        scenes: SceneTable<N>,
        intents: IntentReceiver<'a, INTENTS>,
        output: O,
        sensor: D,
        sink: K,
        config: &EngineConfig,
        now: Instant,
    ) -> Self {
        let scene_count = scenes.len();
        Self {
            trigger: TriggerMachine::new(&config.trigger, scene_count),
            pattern_timer: PeriodicTimer::new(now, config.tick_interval),
            sample_timer: PeriodicTimer::new(now, config.trigger.sample_interval),
            tick_interval: config.tick_interval,
            pwm_frequency_hz: config.pwm_frequency_hz,
            event_name: config.event_name,
            scenes,
            intents,
            output,
            sensor,
            sink,
        }
    }

    /// Run everything that is due at `now` and report when to wake up
    /// next.
    ///
    /// Order within one call: pending intents, sensor sampling,
    /// inactivity reset, pattern tick. A detection cancels the pending
    /// reset before the reset is polled, so a trigger arriving on the
    /// deadline wins.
    pub fn service(&mut self, now: Instant) -> ServiceResult {
        self.process_intents();

        if self.sample_timer.poll(now) {
            self.sample(now);
        }

        if self.trigger.poll_reset(now) {
            self.stop_scene();
        }

        if self.pattern_timer.poll(now) {
            self.scenes
                .service(&mut self.output, self.pwm_frequency_hz, self.tick_interval);
        }

        self.wake_hint(now)
    }

    /// Start scene `level` programmatically.
    ///
    /// Stops the active scene first and notifies subscribers with the
    /// new index. Exposed for the web layer; the trigger machine uses
    /// the same path.
    pub fn start(&mut self, level: usize) -> Result<(), SceneError> {
        self.start_scene(level)
    }

    /// Stop the active scene, zero both channels and notify
    /// subscribers with the base scene.
    pub fn stop(&mut self) {
        self.stop_scene();
    }

    /// Stop whatever is active before the hardware is released.
    ///
    /// Failed zero writes are reported through the failure counter but
    /// never prevent shutdown.
    pub fn shutdown(&mut self) {
        self.stop_scene();
    }

    /// Index of the active scene, if any.
    pub fn active_scene(&self) -> Option<usize> {
        self.scenes.active()
    }

    /// Level currently implied by the trigger counter.
    pub fn level(&self) -> usize {
        self.trigger.level()
    }

    /// Rejected channel writes observed so far.
    pub fn write_failures(&self) -> u32 {
        self.scenes.write_failures()
    }

    /// Get a reference to the output collaborator.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a reference to the notification sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get a reference to the scene table.
    pub fn scenes(&self) -> &SceneTable<N> {
        &self.scenes
    }

    /// Drain pending intents from the queue (non-blocking).
    fn process_intents(&mut self) {
        while let Some(intent) = self.intents.take() {
            match intent {
                SceneIntent::Start(index) => {
                    if self.start_scene(index).is_err() {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("ignoring intent for unknown scene {}", index);
                    }
                }
                SceneIntent::Stop => self.stop_scene(),
            }
        }
    }

    /// One sensor sample, gated by the debounce lock.
    fn sample(&mut self, now: Instant) {
        if !self.trigger.ready(now) {
            return;
        }

        let triggered = match self.sensor.read() {
            Ok(value) => value,
            Err(_err) => {
                // A failed read counts as "not triggered"; sampling
                // continues on the next interval.
                #[cfg(feature = "defmt")]
                defmt::warn!("sensor read failed");
                false
            }
        };
        if !triggered {
            return;
        }

        if let Some(level) = self.trigger.on_triggered(now) {
            self.stop_scene();
            if self.start_scene(level).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("trigger mapped to unknown scene {}", level);
            }
        }
    }

    fn start_scene(&mut self, index: usize) -> Result<(), SceneError> {
        self.scenes
            .start_scene(index, &mut self.output, self.pwm_frequency_hz)?;
        self.sink.notify(self.event_name, index as u8);
        Ok(())
    }

    fn stop_scene(&mut self) {
        self.scenes.stop_scene(&mut self.output, self.pwm_frequency_hz);
        self.sink.notify(self.event_name, 0);
    }

    fn wake_hint(&self, now: Instant) -> ServiceResult {
        let mut next = self.pattern_timer.next_deadline();

        let sample = self.sample_timer.next_deadline();
        if sample.as_millis() < next.as_millis() {
            next = sample;
        }

        if let Some(reset) = self.trigger.reset_deadline() {
            if reset.as_millis() < next.as_millis() {
                next = reset;
            }
        }

        let sleep_duration = if next.as_millis() > now.as_millis() {
            Duration::from_millis(next.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        ServiceResult {
            next_deadline: next,
            sleep_duration,
        }
    }
}
