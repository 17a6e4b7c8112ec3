//! Patrolling hazards that pace along a platform's top edge.

use crate::drawable::{Drawable, EntityKind, Facing};
use crate::float::Float;
use crate::platform::{Rect, StaticPlatform};
use crate::vec::Vec2;

/// Distance a patroller keeps from either platform edge before turning.
const EDGE_MARGIN: f32 = 10.0;

/// A hazard walking back and forth on one static platform.
///
/// Its position is stored relative to the platform, so it rides along when
/// the platform sways.
#[derive(Clone, Debug, PartialEq)]
pub struct Patroller<F: Float> {
    /// Index of the platform it walks on.
    pub platform: usize,
    /// Horizontal offset of its centre from the platform's left edge.
    pub offset_x: F,
    /// Walking speed in world units per second.
    pub speed: F,
    pub direction: Facing,
    /// Width and height of its hit box.
    pub size: Vec2<F>,
    position: Vec2<F>,
}

impl<F: Float> Patroller<F> {
    /// Place a patroller near the middle of `on`.
    pub fn new(platform: usize, on: &StaticPlatform<F>, speed: F, direction: Facing) -> Self {
        let w = on.rect.w;
        let offset_x = (w * F::half())
            .min(w - F::from_f32(2.0 * EDGE_MARGIN))
            .max(F::from_f32(EDGE_MARGIN));
        let mut p = Patroller {
            platform,
            offset_x,
            speed,
            direction,
            size: Vec2::new(F::from_f32(100.0), F::from_f32(60.0)),
            position: Vec2::new(F::zero(), F::zero()),
        };
        p.follow(on);
        p
    }

    /// Walk for `dt` seconds, turning around at either margin.
    pub fn update(&mut self, dt: F, on: &StaticPlatform<F>) {
        let margin = F::from_f32(EDGE_MARGIN);
        let far = on.rect.w - margin;
        self.offset_x = self.offset_x + self.direction.sign::<F>() * self.speed * dt;
        if self.offset_x < margin {
            self.offset_x = margin;
            self.direction = self.direction.flipped();
        }
        if self.offset_x > far {
            self.offset_x = far;
            self.direction = self.direction.flipped();
        }
        self.follow(on);
    }

    /// Hit box, standing on the platform's top edge.
    pub fn rect(&self) -> Rect<F> {
        Rect::new(
            self.position.x - self.size.x * F::half(),
            self.position.y - self.size.y,
            self.size.x,
            self.size.y,
        )
    }

    pub fn hits(&self, body: &Rect<F>) -> bool {
        self.rect().intersects(body)
    }

    /// Re-anchor the feet position to the platform's current top edge.
    fn follow(&mut self, on: &StaticPlatform<F>) {
        self.position = Vec2::new(on.rect.left() + self.offset_x, on.rect.top());
    }
}

impl<F: Float> Drawable<F> for Patroller<F> {
    fn kind(&self) -> EntityKind {
        EntityKind::Hazard
    }

    /// Midpoint of the bottom edge.
    fn position(&self) -> Vec2<F> {
        self.position
    }

    fn facing(&self) -> Facing {
        self.direction
    }
}
