//! Falling leaves: background decoration that drifts with the breeze.
//!
//! Leaves never touch the player or the branches. They fall, sway on their
//! own slow oscillation, spin faster in a strong breeze, and respawn above
//! the field once they leave it.

use crate::drawable::{Drawable, EntityKind};
use crate::float::Float;
use crate::vec::Vec2;

/// Leaves a level scatters by default.
pub const LEAF_COUNT: usize = 50;
/// Number of palette entries a leaf's `tint` indexes.
pub const LEAF_TINTS: u8 = 8;
/// Height above the field's top edge where respawned leaves appear.
const RESPAWN_HEIGHT: f32 = 50.0;
/// Frame-rate factor: leaf speeds are authored per 60 Hz frame.
const FRAMES_PER_SECOND: f32 = 60.0;

/// Seeded PCG-XSH-RR generator for leaf scatter.
///
/// The same seed always produces the same leaves, so a stepped [`World`]
/// stays reproducible.
///
/// [`World`]: crate::world::World
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafRng {
    state: u64,
    inc: u64,
}

impl LeafRng {
    const MULTIPLIER: u64 = 6364136223846793005;

    pub fn new(seed: u64) -> Self {
        let mut rng = LeafRng { state: 0, inc: (seed << 1) | 1 };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(seed);
        rng.next_u32();
        rng
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(Self::MULTIPLIER).wrapping_add(self.inc);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        xorshifted.rotate_right((old >> 59) as u32)
    }

    /// Uniform in `[lo, hi)`.
    pub fn range<F: Float>(&mut self, lo: F, hi: F) -> F {
        // Top 23 bits, so `lo + (hi - lo) * unit` never rounds up to `hi`.
        let unit = (self.next_u32() >> 9) as f32 / (1u32 << 23) as f32;
        lo + (hi - lo) * F::from_f32(unit)
    }

    /// Uniform integer in `[lo, hi]`.
    pub fn int(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.next_u32() % (hi - lo + 1)
    }
}

/// One falling leaf. `position` is its centre in world space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leaf<F: Float> {
    pub position: Vec2<F>,
    /// Spin in degrees.
    pub angle: F,
    /// Degrees per frame, in `[-2, 2)`.
    pub rotation_speed: F,
    /// Units per frame, in `[1, 2)`.
    pub fall_speed: F,
    pub oscillation_phase: F,
    /// Radians per second, in `[1, 3)`.
    pub oscillation_speed: F,
    /// Sprite edge length, 5 to 15 units.
    pub size: F,
    /// Palette index below [`LEAF_TINTS`].
    pub tint: u8,
}

impl<F: Float> Leaf<F> {
    /// A leaf at `position` with randomised spin, fall and sway.
    pub fn new(position: Vec2<F>, rng: &mut LeafRng) -> Self {
        Leaf {
            position,
            angle: rng.range(F::zero(), F::from_f32(360.0)),
            rotation_speed: rng.range(-F::two(), F::two()),
            fall_speed: rng.range(F::one(), F::two()),
            oscillation_phase: rng.range(F::zero(), F::two() * F::pi()),
            oscillation_speed: rng.range(F::one(), F::from_f32(3.0)),
            size: F::from_f32(rng.int(5, 15) as f32),
            tint: rng.int(0, LEAF_TINTS as u32 - 1) as u8,
        }
    }

    /// Drift for `dt` seconds in a breeze of strength `breeze`.
    ///
    /// `field` is the width and height of the area leaves live in, with its
    /// top-left corner at the origin. A leaf that leaves it through either
    /// side or the bottom respawns just above the top.
    pub fn update(&mut self, breeze: F, dt: F, field: Vec2<F>, rng: &mut LeafRng) {
        let frames = dt * F::from_f32(FRAMES_PER_SECOND);
        let drift = breeze * F::from_f32(1.5) + self.oscillation_phase.sin() * F::half();
        self.oscillation_phase = self.oscillation_phase + self.oscillation_speed * dt;

        self.position.x = self.position.x + drift * dt * F::from_f32(10.0);
        self.position.y = self.position.y + self.fall_speed * frames;
        self.angle = self.angle + (self.rotation_speed + breeze * F::half()) * frames;

        if self.is_outside(field) {
            self.respawn(field.x, rng);
        }
    }

    fn is_outside(&self, field: Vec2<F>) -> bool {
        let half = self.size * F::half();
        self.position.x + half < F::zero()
            || self.position.x - half > field.x
            || self.position.y - half > field.y
    }

    /// Back above the field at a random column, with fresh spin and fall.
    /// Size, tint and sway are kept.
    pub fn respawn(&mut self, width: F, rng: &mut LeafRng) {
        self.position = Vec2::new(rng.range(F::zero(), width), -F::from_f32(RESPAWN_HEIGHT));
        self.angle = rng.range(F::zero(), F::from_f32(360.0));
        self.rotation_speed = rng.range(-F::two(), F::two());
        self.fall_speed = rng.range(F::one(), F::two());
    }
}

impl<F: Float> Drawable<F> for Leaf<F> {
    fn kind(&self) -> EntityKind {
        EntityKind::Leaf
    }

    fn position(&self) -> Vec2<F> {
        self.position
    }

    fn rotation(&self) -> F {
        self.angle.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm_leaf() -> Leaf<f64> {
        Leaf {
            position: Vec2::new(300.0, 100.0),
            angle: 0.0,
            rotation_speed: 0.0,
            fall_speed: 1.5,
            oscillation_phase: 0.0,
            oscillation_speed: 2.0,
            size: 10.0,
            tint: 0,
        }
    }

    const FIELD: Vec2<f64> = Vec2 { x: 600.0, y: 1200.0 };

    #[test]
    fn same_seed_same_leaves() {
        let a = Leaf::<f32>::new(Vec2::new(0.0, 0.0), &mut LeafRng::new(7));
        let b = Leaf::<f32>::new(Vec2::new(0.0, 0.0), &mut LeafRng::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn scatter_stays_in_range() {
        let mut rng = LeafRng::new(42);
        for _ in 0..200 {
            let leaf = Leaf::<f32>::new(Vec2::new(0.0, 0.0), &mut rng);
            assert!((-2.0..2.0).contains(&leaf.rotation_speed));
            assert!((1.0..2.0).contains(&leaf.fall_speed));
            assert!((1.0..3.0).contains(&leaf.oscillation_speed));
            assert!((5.0..=15.0).contains(&leaf.size));
            assert!(leaf.tint < LEAF_TINTS);
        }
    }

    #[test]
    fn drifts_downwind_and_falls() {
        let mut rng = LeafRng::new(1);
        let mut right = calm_leaf();
        let mut left = calm_leaf();
        right.update(4.0, 1.0 / 60.0, FIELD, &mut rng);
        left.update(-4.0, 1.0 / 60.0, FIELD, &mut rng);

        // sin(0) = 0, so only the breeze moves it sideways: 4 * 1.5 * dt * 10.
        assert!((right.position.x - (300.0 + 1.0)).abs() < 1e-9);
        assert!((left.position.x - (300.0 - 1.0)).abs() < 1e-9);
        // One frame of fall.
        assert!((right.position.y - 101.5).abs() < 1e-9);
        assert!((right.oscillation_phase - 2.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn breeze_spins_leaves() {
        let mut rng = LeafRng::new(1);
        let mut leaf = calm_leaf();
        leaf.update(2.0, 1.0 / 60.0, FIELD, &mut rng);
        // (0 + 2 * 0.5) degrees per frame.
        assert!((leaf.angle - 1.0).abs() < 1e-9);
        assert!((leaf.rotation() - 1.0f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn respawns_above_after_falling_out() {
        let mut rng = LeafRng::new(3);
        let mut leaf = calm_leaf();
        leaf.position.y = FIELD.y + 4.0;
        leaf.update(0.0, 1.0 / 60.0, FIELD, &mut rng);

        assert_eq!(leaf.position.y, -50.0);
        assert!((0.0..FIELD.x).contains(&leaf.position.x));
        assert_eq!(leaf.size, 10.0);
    }

    #[test]
    fn respawns_after_blowing_off_the_side() {
        let mut rng = LeafRng::new(3);
        let mut leaf = calm_leaf();
        leaf.position.x = FIELD.x + 4.0;
        leaf.update(6.0, 1.0 / 60.0, FIELD, &mut rng);
        assert_eq!(leaf.position.y, -50.0);
    }
}
