//! Piecewise-linear shapes

use embassy_time::Duration;

use super::{MAX_INTENSITY, Wave};

/// Symmetric triangle wave.
///
/// Rises with slope `2 * MAX / period` over the first half period, then
/// falls back to zero with the mirrored slope. Peaks at `MAX_INTENSITY`
/// at half period.
#[derive(Debug, Clone)]
pub struct Triangle {
    half: f32,
    slope: f32,
}

impl Triangle {
    pub fn new(period: Duration) -> Self {
        let p = period.as_millis() as f32;
        Self {
            half: p / 2.0,
            slope: MAX_INTENSITY * 2.0 / p,
        }
    }
}

impl Wave for Triangle {
    fn level_at(&self, time: f32) -> f32 {
        if time < self.half {
            self.slope * time
        } else {
            MAX_INTENSITY * 2.0 - self.slope * time
        }
    }
}

/// Ramp-and-hold wave in four equal sub-periods.
///
/// Ramps up over the first quarter, holds the peak for the second,
/// ramps down over the third and stays dark for the last.
#[derive(Debug, Clone)]
pub struct RampHold {
    quarter: f32,
    slope: f32,
}

impl RampHold {
    pub fn new(period: Duration) -> Self {
        let quarter = period.as_millis() as f32 / 4.0;
        Self {
            quarter,
            slope: MAX_INTENSITY / quarter,
        }
    }
}

impl Wave for RampHold {
    fn level_at(&self, time: f32) -> f32 {
        if time < self.quarter {
            self.slope * time
        } else if time < self.quarter * 2.0 {
            MAX_INTENSITY
        } else if time < self.quarter * 3.0 {
            // Anchored so the down-ramp crosses MAX at the hold boundary
            // and zero at three quarters.
            MAX_INTENSITY * 3.0 - self.slope * time
        } else {
            0.0
        }
    }
}
