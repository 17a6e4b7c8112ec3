//! Planar vectors in screen space.

use crate::float::Float;
use core::fmt::Debug;
use core::ops::{Add, Neg, Sub};

/// What the node, constraint and contact code needs from a vector.
///
/// Only [`Vec2`] implements it; nodes and constraints are written against
/// the trait so they never reach into `x`/`y`.
pub trait Vec:
    Copy + PartialEq + Default + Debug + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self>
{
    type Scalar: Float;

    fn zero() -> Self;
    fn dot(self, other: Self) -> Self::Scalar;
    fn scale(self, s: Self::Scalar) -> Self;

    fn length_sq(self) -> Self::Scalar {
        self.dot(self)
    }

    fn length(self) -> Self::Scalar {
        self.length_sq().sqrt()
    }

    fn distance(self, other: Self) -> Self::Scalar {
        (other - self).length()
    }

    fn lerp(self, other: Self, t: Self::Scalar) -> Self {
        self + (other - self).scale(t)
    }

    /// Mirror about the unit vector `normal`: `v - 2 (v . n) n`.
    fn reflect(self, normal: Self) -> Self {
        self - normal.scale(Self::Scalar::two() * self.dot(normal))
    }
}

/// Screen-space vector: +x right, +y down.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Vec2 { x, y }
    }

    /// Pointing up the screen, `(0, -1)`.
    pub fn up() -> Self {
        Vec2::new(F::zero(), -F::one())
    }

    /// Unit vector `radians` clockwise from +x (clockwise because +y is down).
    pub fn from_angle(radians: F) -> Self {
        Vec2::new(radians.cos(), radians.sin())
    }

    /// Heading in radians, the inverse of [`Vec2::from_angle`].
    pub fn angle(self) -> F {
        F::atan2(self.y, self.x)
    }

    /// `self` turned a quarter turn: `(-y, x)`.
    pub fn perp(self) -> Self {
        Vec2::new(-self.y, self.x)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<F: Float> $trait for Vec2<F> {
            type Output = Self;
            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Vec2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Vec2::new(-self.x, -self.y)
    }
}

impl<F: Float> Vec for Vec2<F> {
    type Scalar = F;

    #[inline]
    fn zero() -> Self {
        Vec2::new(F::zero(), F::zero())
    }

    #[inline]
    fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    fn scale(self, s: F) -> Self {
        Vec2::new(self.x * s, self.y * s)
    }
}
