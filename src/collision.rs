//! Two-way contact between the player's round body and branch top rails.
//!
//! The player is treated as a circle of radius `r` around its centre. Every
//! top-rail segment closer than `r` is a contact, and each contact pushes
//! the rail nodes one way and the player the other. The rail nodes are
//! moved without touching `prev_pos`, so the push turns into branch velocity
//! on the next integration and the same tick's relaxation pass spreads it
//! through the truss.

use crate::branch::Branch;
use crate::config::SimulationConfig;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::vec::{Vec, Vec2};

/// A detected overlap between the player and one top-rail segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact<F: Float> {
    /// Index of the segment's first node in the top rail.
    pub segment: usize,
    /// Projection parameter along the segment, in [0, 1].
    pub t: F,
    pub closest: Vec2<F>,
    /// Unit vector from `closest` toward the player.
    pub normal: Vec2<F>,
    /// `radius - distance`, always positive.
    pub overlap: F,
}

/// Closest point on segment `a`-`b` to `p`, with its parameter `t`.
///
/// A zero-length segment reports `a` at `t = 0`.
pub fn closest_point_on_segment<F: Float>(p: Vec2<F>, a: Vec2<F>, b: Vec2<F>) -> (Vec2<F>, F) {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == F::zero() {
        return (a, F::zero());
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(F::zero(), F::one());
    (a.lerp(b, t), t)
}

/// Find the overlap between a circle at `position` and segment `a`-`b`.
pub fn segment_contact<F: Float>(
    position: Vec2<F>,
    radius: F,
    segment: usize,
    a: Vec2<F>,
    b: Vec2<F>,
) -> Option<Contact<F>> {
    let (closest, t) = closest_point_on_segment(position, a, b);
    let offset = position - closest;
    let dist = offset.length();
    if !(dist < radius) {
        return None;
    }
    let normal = if dist == F::zero() {
        Vec2::up()
    } else {
        offset.scale(F::one() / dist)
    };
    Some(Contact { segment, t, closest, normal, overlap: radius - dist })
}

/// Resolve every overlapping top-rail segment of `branch`, root to tip.
///
/// Per contact, with `k = mass * 0.5`:
/// * free node `i` moves by `-normal * overlap * k * (1 - t)`;
/// * free node `i + 1` moves by `-normal * overlap * k * t`;
/// * the player moves along `+normal` by whatever part of `overlap` the
///   rail did not take up at the contact point. With both nodes free and
///   the contact at an endpoint, that is `overlap * (1 - k)`;
/// * velocity is reflected about the normal and scaled by `restitution`.
///
/// Contacts are resolved one after another against the positions left by
/// the previous one, so a body sitting on a joint is pushed by both
/// segments. Returns the number of contacts.
pub fn resolve_branch_contacts<F: Float, O: StepObserver<F>>(
    position: &mut Vec2<F>,
    velocity: &mut Vec2<F>,
    radius: F,
    branch: &mut Branch<F>,
    config: &SimulationConfig<F>,
    observer: &mut O,
) -> usize {
    let mass_factor = config.mass * F::half();
    let mut count = 0;
    let rail = branch.top_rail_mut();

    for i in 0..rail.len().saturating_sub(1) {
        let contact = match segment_contact(*position, radius, i, rail[i].pos, rail[i + 1].pos) {
            Some(c) => c,
            None => continue,
        };
        observer.on_contact(&contact);

        let push = contact.overlap * mass_factor;
        let (w0, w1) = (F::one() - contact.t, contact.t);
        let mut absorbed = F::zero();
        if !rail[i].fixed {
            rail[i].displace(contact.normal.scale(-push * w0));
            absorbed = absorbed + w0 * w0;
        }
        if !rail[i + 1].fixed {
            rail[i + 1].displace(contact.normal.scale(-push * w1));
            absorbed = absorbed + w1 * w1;
        }

        let player_shift = contact.overlap - push * absorbed;
        *position = *position + contact.normal.scale(player_shift);

        if config.collision.reflect_separating || velocity.dot(contact.normal) < F::zero() {
            *velocity = velocity.reflect(contact.normal).scale(config.restitution);
        }
        count += 1;
    }

    count
}
