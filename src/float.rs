//! Scalar type the simulation is generic over.

use core::cmp::PartialOrd;
use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// The handful of float operations branches, the player and contacts need.
///
/// `f32` is what a game ships with; `f64` is handy in tests. Math goes
/// through `libm` so the crate builds without `std`.
pub trait Float:
    Copy
    + PartialEq
    + PartialOrd
    + Default
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn half() -> Self;
    fn two() -> Self;
    fn pi() -> Self;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn abs(self) -> Self;
    fn floor(self) -> Self;
    /// Angle of `(x, y)` in radians, in `(-pi, pi]`.
    fn atan2(y: Self, x: Self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    fn is_finite(self) -> bool;

    /// Literal constants and tunables are written as `f32`.
    fn from_f32(v: f32) -> Self;
    fn to_f32(self) -> f32;

    fn from_usize(n: usize) -> Self {
        Self::from_f32(n as f32)
    }

    fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// `self + (other - self) * t`
    fn lerp(self, other: Self, t: Self) -> Self {
        self + (other - self) * t
    }

    /// Branch angles are authored in degrees.
    fn to_radians(self) -> Self {
        self * Self::pi() / Self::from_f32(180.0)
    }
}

macro_rules! impl_float {
    ($t:ident, $sqrt:path, $sin:path, $cos:path, $fabs:path, $floor:path, $atan2:path) => {
        impl Float for $t {
            #[inline] fn zero() -> Self { 0.0 }
            #[inline] fn one() -> Self { 1.0 }
            #[inline] fn half() -> Self { 0.5 }
            #[inline] fn two() -> Self { 2.0 }
            #[inline] fn pi() -> Self { core::$t::consts::PI }

            #[inline] fn sqrt(self) -> Self { $sqrt(self) }
            #[inline] fn sin(self) -> Self { $sin(self) }
            #[inline] fn cos(self) -> Self { $cos(self) }
            #[inline] fn abs(self) -> Self { $fabs(self) }
            #[inline] fn floor(self) -> Self { $floor(self) }
            #[inline] fn atan2(y: Self, x: Self) -> Self { $atan2(y, x) }
            #[inline] fn min(self, other: Self) -> Self { if other < self { other } else { self } }
            #[inline] fn max(self, other: Self) -> Self { if other > self { other } else { self } }
            #[inline] fn is_finite(self) -> bool { $t::is_finite(self) }

            #[inline] fn from_f32(v: f32) -> Self { v as $t }
            #[inline] fn to_f32(self) -> f32 { self as f32 }
        }
    };
}

impl_float!(f32, libm::sqrtf, libm::sinf, libm::cosf, libm::fabsf, libm::floorf, libm::atan2f);
impl_float!(f64, libm::sqrt, libm::sin, libm::cos, libm::fabs, libm::floor, libm::atan2);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_to_radians() {
        assert!((Float::to_radians(90.0f32) - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((Float::to_radians(180.0f64) - core::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn floor_of_scaled_stiffness() {
        assert_eq!(Float::floor(0.32f32 * 10.0), 3.0);
        assert_eq!(Float::floor(0.05f32 * 10.0), 0.0);
    }

    #[test]
    fn clamp_and_lerp() {
        assert_eq!(Float::clamp(1.5f32, 0.0, 1.0), 1.0);
        assert_eq!(Float::clamp(-0.5f64, 0.0, 1.0), 0.0);
        assert_eq!(Float::lerp(40.0f32, 10.0, 0.5), 25.0);
    }
}
