//! What a renderer needs to know about each simulated entity.
//!
//! Entities report their kind once through [`Drawable`]; the render loop
//! matches on [`EntityKind`] instead of downcasting per frame.

use crate::float::Float;
use crate::vec::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Branch,
    Platform,
    Hazard,
    Leaf,
}

/// Horizontal facing, used to flip sprites.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    pub fn sign<F: Float>(self) -> F {
        match self {
            Facing::Left => -F::one(),
            Facing::Right => F::one(),
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

pub trait Drawable<F: Float> {
    fn kind(&self) -> EntityKind;

    /// Anchor point for the sprite in world space.
    fn position(&self) -> Vec2<F>;

    /// Rotation in radians from +x.
    fn rotation(&self) -> F {
        F::zero()
    }

    fn facing(&self) -> Facing {
        Facing::Right
    }
}

/// A resolved draw request: everything a sprite blit needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawItem<F: Float> {
    pub kind: EntityKind,
    /// Index into the owning collection (branches, platforms, hazards, leaves).
    pub index: usize,
    pub position: Vec2<F>,
    pub rotation: F,
    pub facing: Facing,
}

impl<F: Float> DrawItem<F> {
    pub fn from_drawable<D: Drawable<F> + ?Sized>(index: usize, d: &D) -> Self {
        DrawItem {
            kind: d.kind(),
            index,
            position: d.position(),
            rotation: d.rotation(),
            facing: d.facing(),
        }
    }
}
