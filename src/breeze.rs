//! Ambient wind.

use crate::float::Float;

/// Mean wind strength.
pub const BREEZE_BASE: f32 = 1.5;
/// Amplitude of the slow oscillation around the mean.
pub const BREEZE_VARIABILITY: f32 = 5.0;
/// Angular rate of the oscillation, radians per second.
pub const BREEZE_CYCLE_SPEED: f32 = 0.5;

/// Breeze strength at `elapsed` seconds: a slow sine swinging between
/// roughly -3.5 (blowing left) and 6.5 (blowing right).
pub fn breeze_strength<F: Float>(elapsed: F) -> F {
    F::from_f32(BREEZE_BASE)
        + F::from_f32(BREEZE_VARIABILITY) * (F::from_f32(BREEZE_CYCLE_SPEED) * elapsed).sin()
}
