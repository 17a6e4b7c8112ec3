//! Static platforms: axis-aligned ledges and the ground.
//!
//! They do not deform. They sway with the breeze and catch the player only
//! when it drops onto them from above.

use crate::drawable::{Drawable, EntityKind};
use crate::float::Float;
use crate::vec::Vec2;

/// Axis-aligned rectangle, `(x, y)` at the top-left corner, +y down.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect<F: Float> {
    pub x: F,
    pub y: F,
    pub w: F,
    pub h: F,
}

impl<F: Float> Rect<F> {
    pub fn new(x: F, y: F, w: F, h: F) -> Self {
        Rect { x, y, w, h }
    }

    /// Rectangle of half extents `half` centred on `center`.
    pub fn from_center(center: Vec2<F>, half: Vec2<F>) -> Self {
        Rect { x: center.x - half.x, y: center.y - half.y, w: half.x * F::two(), h: half.y * F::two() }
    }

    pub fn left(&self) -> F { self.x }
    pub fn right(&self) -> F { self.x + self.w }
    pub fn top(&self) -> F { self.y }
    pub fn bottom(&self) -> F { self.y + self.h }

    pub fn origin(&self) -> Vec2<F> {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn intersects(&self, other: &Rect<F>) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect<F>) -> bool {
        self.x < other.x + other.w && self.x + self.w > other.x
    }
}

/// A rectangular platform with optional breeze sway.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticPlatform<F: Float> {
    pub rect: Rect<F>,
    pub prev_rect: Rect<F>,
    /// Rest position; sway offsets are measured from here.
    pub origin: Vec2<F>,
    /// Vertical bob phase, advanced by a fixed step each sway.
    pub phase: F,
    /// Phase offset for the horizontal sway.
    pub offset_phase: F,
    /// `phase` as constructed, restored by [`StaticPlatform::reset`].
    initial_phase: F,
    /// The ground never bobs vertically.
    pub is_ground: bool,
}

/// Phase advance of the vertical bob per `sway` call.
const BOB_STEP: f32 = 0.05;

impl<F: Float> StaticPlatform<F> {
    pub fn new(rect: Rect<F>) -> Self {
        StaticPlatform {
            rect,
            prev_rect: rect,
            origin: rect.origin(),
            phase: F::zero(),
            offset_phase: F::zero(),
            initial_phase: F::zero(),
            is_ground: false,
        }
    }

    /// Full-width ground strip whose top edge sits at `top`.
    pub fn ground(width: F, top: F, height: F) -> Self {
        StaticPlatform {
            is_ground: true,
            ..Self::new(Rect::new(F::zero(), top, width, height))
        }
    }

    /// Set the sway phases. Level generators usually randomise these so
    /// platforms do not move in lockstep.
    pub fn with_phases(mut self, phase: F, offset_phase: F) -> Self {
        self.phase = phase;
        self.initial_phase = phase;
        self.offset_phase = offset_phase;
        self
    }

    /// Back to the rest position with the bob phase it was built with.
    pub fn reset(&mut self) {
        self.rect = Rect::new(self.origin.x, self.origin.y, self.rect.w, self.rect.h);
        self.prev_rect = self.rect;
        self.phase = self.initial_phase;
    }

    /// Move with the breeze. Horizontal offset follows
    /// `breeze * sin(elapsed + offset_phase)`; non-ground platforms also
    /// bob by `breeze * sin(phase)`.
    pub fn sway(&mut self, breeze: F, elapsed: F) {
        self.prev_rect = self.rect;
        self.rect.x = self.origin.x + breeze * (elapsed + self.offset_phase).sin();
        if !self.is_ground {
            self.phase = self.phase + F::from_f32(BOB_STEP);
            self.rect.y = self.origin.y + breeze * self.phase.sin();
        }
    }

    /// How far the platform moved during the last `sway`.
    pub fn displacement(&self) -> Vec2<F> {
        self.rect.origin() - self.prev_rect.origin()
    }

    /// Whether a body falling with vertical speed `vy` lands here this tick.
    ///
    /// The body must be moving down (or still), have started the tick with
    /// its bottom at or above the platform's previous top, and now reach
    /// the platform's top while overlapping it horizontally.
    pub fn catches(&self, body: &Rect<F>, prev_bottom: F, vy: F) -> bool {
        vy >= F::zero()
            && prev_bottom <= self.prev_rect.top() + F::from_f32(LANDING_SLOP)
            && body.bottom() >= self.rect.top()
            && body.top() < self.rect.bottom()
            && body.overlaps_horizontally(&self.rect)
    }

    /// Whether a body resting with its bottom at `body.bottom()` is held up.
    pub fn supports(&self, body: &Rect<F>) -> bool {
        let gap = self.rect.top() - body.bottom();
        gap >= -F::from_f32(LANDING_SLOP)
            && gap <= F::from_f32(LANDING_SLOP)
            && body.overlaps_horizontally(&self.rect)
    }
}

impl<F: Float> Drawable<F> for StaticPlatform<F> {
    fn kind(&self) -> EntityKind {
        EntityKind::Platform
    }

    /// Top-left corner.
    fn position(&self) -> Vec2<F> {
        self.rect.origin()
    }
}

/// Vertical tolerance, in world units, for landing and support checks.
pub const LANDING_SLOP: f32 = 1.0;
