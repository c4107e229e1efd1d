//! Pattern instances: a waveform bound to an output channel
//!
//! A player owns the phase clock for one channel. Players are created
//! once per scene definition and reused across start/stop cycles.

use embassy_time::Duration;
use libm::roundf;

use crate::waveform::{Shape, Waveform};
use crate::{Channel, OutputError, PwmOutput};

/// Parameter errors rejected at construction, before any timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    /// The period must be strictly positive.
    ZeroPeriod,
}

impl core::fmt::Display for PatternError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PatternError::ZeroPeriod => write!(f, "pattern period must be positive"),
        }
    }
}

/// A waveform bound to an output channel, with period, phase offset and
/// running state.
///
/// The phase only advances while running. Stopping abandons the clock
/// and forces a single zero write; restarting rewinds to the configured
/// offset.
#[derive(Debug, Clone)]
pub struct PatternPlayer {
    channel: Channel,
    waveform: Waveform,
    period: Duration,
    offset: Duration,
    phase: Duration,
    running: bool,
}

impl PatternPlayer {
    /// Bind `shape` to `channel` with the given period and phase offset.
    ///
    /// The offset is normalized modulo the period. Shapes that carry
    /// their own timeline (`Shape::Choreo`) override the caller's
    /// period.
    pub fn new(
        channel: Channel,
        shape: Shape,
        period: Duration,
        offset: Duration,
    ) -> Result<Self, PatternError> {
        let period = shape.fixed_period().unwrap_or(period);
        if period.as_millis() == 0 {
            return Err(PatternError::ZeroPeriod);
        }
        let offset = Duration::from_millis(offset.as_millis() % period.as_millis());

        Ok(Self {
            channel,
            waveform: shape.build(period),
            period,
            offset,
            phase: offset,
            running: false,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn shape(&self) -> Shape {
        self.waveform.shape()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin phase advancement from the configured offset.
    pub fn start(&mut self) {
        self.phase = self.offset;
        self.running = true;
    }

    /// Stop the player and force one zero write to its channel.
    ///
    /// Idempotent: stopping an already stopped player still writes zero
    /// and reports no error of its own.
    pub fn stop<O: PwmOutput>(
        &mut self,
        output: &mut O,
        frequency_hz: u32,
    ) -> Result<(), OutputError> {
        self.running = false;
        output.write(self.channel, frequency_hz, 0)
    }

    /// One tick: write the current level, then advance the phase clock.
    ///
    /// Does nothing when stopped. The phase advances even when the write
    /// is rejected, so the next tick retries at the next position.
    /// Periods that are not a multiple of the tick drift by the
    /// remainder on each wrap; known limitation.
    pub fn service<O: PwmOutput>(
        &mut self,
        output: &mut O,
        frequency_hz: u32,
        tick: Duration,
    ) -> Result<(), OutputError> {
        if !self.running {
            return Ok(());
        }

        let level = self.waveform.level_at(self.phase.as_millis() as f32);
        let result = output.write(self.channel, frequency_hz, roundf(level) as u32);

        self.phase = Duration::from_millis(
            (self.phase.as_millis() + tick.as_millis()) % self.period.as_millis(),
        );

        result
    }
}
