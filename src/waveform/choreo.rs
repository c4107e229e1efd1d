//! Hand-authored show choreography
//!
//! A fixed sequence of brightness segments on an absolute timeline,
//! composed from the primitive shapes at authored offsets. The window
//! boundaries are an opaque choreography table; they carry no timing
//! semantics beyond the values themselves.

use embassy_time::Duration;

use super::linear::Triangle;
use super::pulse::HalfDuty;
use super::{MAX_INTENSITY, Wave};

/// Length of one full show cycle.
pub(crate) const SHOW_PERIOD: Duration = Duration::from_millis(163_000);

const SWEEP_PERIOD_MS: u64 = 4_000;
const STROBE_PERIOD_MS: u64 = 200;
const FINALE_PERIOD_MS: u64 = 5_400;

/// The fixed show: dark intro, slow triangle sweeps, a strobe burst,
/// a faster sweep into the finale, then solid full intensity for the
/// rest of the cycle.
#[derive(Debug, Clone)]
pub struct Choreo {
    sweep: Triangle,
    strobe: HalfDuty,
    finale: Triangle,
}

impl Choreo {
    pub fn new() -> Self {
        Self {
            sweep: Triangle::new(Duration::from_millis(SWEEP_PERIOD_MS)),
            strobe: HalfDuty::new(Duration::from_millis(STROBE_PERIOD_MS)),
            finale: Triangle::new(Duration::from_millis(FINALE_PERIOD_MS)),
        }
    }
}

impl Default for Choreo {
    fn default() -> Self {
        Self::new()
    }
}

impl Wave for Choreo {
    fn level_at(&self, time: f32) -> f32 {
        if time < 3_600.0 {
            0.0
        } else if time < 11_600.0 {
            self.sweep.level_at((time - 3_600.0) % 4_000.0)
        } else if time < 14_000.0 {
            0.0
        } else if time < 16_000.0 {
            self.sweep.level_at((time - 14_000.0) % 4_000.0)
        } else if time < 18_500.0 {
            self.strobe.level_at((time - 16_000.0) % 200.0)
        } else if time < 20_500.0 {
            MAX_INTENSITY
        } else if time < 23_200.0 {
            // The finale sweep is anchored at 17.8 s so it enters this
            // window mid-phase.
            self.finale.level_at((time - 17_800.0) % 5_400.0)
        } else {
            MAX_INTENSITY
        }
    }
}
