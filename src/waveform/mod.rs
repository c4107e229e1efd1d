//! Waveform library with compile-time known shape variants
//!
//! Each shape precomputes its per-period constants (slopes, window
//! boundaries) at construction, so per-tick evaluation is a handful of
//! float operations. All shapes are stored in an enum to avoid heap
//! allocations and virtual dispatch.

mod choreo;
mod curve;
mod linear;
mod pulse;

use embassy_time::Duration;

pub use choreo::Choreo;
pub use curve::{Arch, Sine, Valley};
pub use linear::{RampHold, Triangle};
pub use pulse::{HalfDuty, TripleFlash};

/// Maximum brightness intensity written to a channel.
///
/// Every shape evaluates to `[0.0, MAX_INTENSITY]` by construction.
pub const MAX_INTENSITY: f32 = 1_000_000.0;

/// Evaluation contract shared by all shapes.
pub trait Wave {
    /// Brightness at `time` milliseconds into the period.
    ///
    /// Pure given the shape's constants; callers keep `time` within
    /// `[0, period)`.
    fn level_at(&self, time: f32) -> f32;
}

/// Known shape identifiers that can be bound to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    /// Symmetric triangle: rises to the peak at half period, falls back.
    Triangle,
    /// Quarter-period ramp up, hold at peak, ramp down, dark quarter.
    RampHold,
    /// One full sine cycle per period, lifted into `[0, MAX_INTENSITY]`.
    Sine,
    /// Upward parabola, zero at both period ends, peak at half period.
    Arch,
    /// Downward-opening parabola, peak at both ends, zero at half period.
    Valley,
    /// Three brief square pulses early in the period, dark otherwise.
    TripleFlash,
    /// Square wave, on for the first half of the period.
    HalfDuty,
    /// Fixed hand-authored show choreography, about 163 seconds long.
    Choreo,
    /// Constant full intensity while running.
    On,
    /// Constant zero.
    Off,
}

impl Shape {
    /// Period imposed by the shape itself, if any.
    ///
    /// `Choreo` carries its own absolute timeline and ignores the
    /// caller's period.
    pub fn fixed_period(self) -> Option<Duration> {
        match self {
            Self::Choreo => Some(choreo::SHOW_PERIOD),
            _ => None,
        }
    }

    /// Build the evaluable waveform for the given period.
    pub(crate) fn build(self, period: Duration) -> Waveform {
        match self {
            Self::Triangle => Waveform::Triangle(Triangle::new(period)),
            Self::RampHold => Waveform::RampHold(RampHold::new(period)),
            Self::Sine => Waveform::Sine(Sine::new(period)),
            Self::Arch => Waveform::Arch(Arch::new(period)),
            Self::Valley => Waveform::Valley(Valley::new(period)),
            Self::TripleFlash => Waveform::TripleFlash(TripleFlash::new(period)),
            Self::HalfDuty => Waveform::HalfDuty(HalfDuty::new(period)),
            Self::Choreo => Waveform::Choreo(Choreo::new()),
            Self::On => Waveform::On,
            Self::Off => Waveform::Off,
        }
    }
}

/// A shape bound to its precomputed per-period constants.
#[derive(Debug, Clone)]
pub enum Waveform {
    Triangle(Triangle),
    RampHold(RampHold),
    Sine(Sine),
    Arch(Arch),
    Valley(Valley),
    TripleFlash(TripleFlash),
    HalfDuty(HalfDuty),
    Choreo(Choreo),
    On,
    Off,
}

impl Waveform {
    /// Evaluate the brightness at `time` milliseconds into the period.
    pub fn level_at(&self, time: f32) -> f32 {
        match self {
            Self::Triangle(w) => w.level_at(time),
            Self::RampHold(w) => w.level_at(time),
            Self::Sine(w) => w.level_at(time),
            Self::Arch(w) => w.level_at(time),
            Self::Valley(w) => w.level_at(time),
            Self::TripleFlash(w) => w.level_at(time),
            Self::HalfDuty(w) => w.level_at(time),
            Self::Choreo(w) => w.level_at(time),
            Self::On => MAX_INTENSITY,
            Self::Off => 0.0,
        }
    }

    /// The shape identifier this waveform was built from.
    pub fn shape(&self) -> Shape {
        match self {
            Self::Triangle(_) => Shape::Triangle,
            Self::RampHold(_) => Shape::RampHold,
            Self::Sine(_) => Shape::Sine,
            Self::Arch(_) => Shape::Arch,
            Self::Valley(_) => Shape::Valley,
            Self::TripleFlash(_) => Shape::TripleFlash,
            Self::HalfDuty(_) => Shape::HalfDuty,
            Self::Choreo(_) => Shape::Choreo,
            Self::On => Shape::On,
            Self::Off => Shape::Off,
        }
    }
}
