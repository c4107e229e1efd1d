//! Smooth curved shapes

use core::f32::consts::TAU;

use embassy_time::Duration;
use libm::sinf;

use super::{MAX_INTENSITY, Wave};

/// One full sine cycle per period, lifted from `[-1, 1]` into
/// `[0, MAX_INTENSITY]`.
#[derive(Debug, Clone)]
pub struct Sine {
    period: f32,
}

impl Sine {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.as_millis() as f32,
        }
    }
}

impl Wave for Sine {
    fn level_at(&self, time: f32) -> f32 {
        MAX_INTENSITY * (sinf(TAU * time / self.period) + 1.0) / 2.0
    }
}

/// Upward parabola through zero at both period ends, peaking at
/// `MAX_INTENSITY` at half period.
#[derive(Debug, Clone)]
pub struct Arch {
    period: f32,
    half_sq: f32,
}

impl Arch {
    pub fn new(period: Duration) -> Self {
        let p = period.as_millis() as f32;
        let half = p / 2.0;
        Self {
            period: p,
            half_sq: half * half,
        }
    }
}

impl Wave for Arch {
    fn level_at(&self, time: f32) -> f32 {
        -MAX_INTENSITY * time * (time - self.period) / self.half_sq
    }
}

/// Downward-opening parabola: `MAX_INTENSITY` at both period ends,
/// zero at half period.
#[derive(Debug, Clone)]
pub struct Valley {
    half: f32,
}

impl Valley {
    pub fn new(period: Duration) -> Self {
        Self {
            half: period.as_millis() as f32 / 2.0,
        }
    }
}

impl Wave for Valley {
    fn level_at(&self, time: f32) -> f32 {
        let x = time / self.half - 1.0;
        MAX_INTENSITY * x * x
    }
}
