//! Truss nodes: point masses with position-based (Verlet) state.

use crate::vec::Vec;

/// A point mass in a branch truss. Velocity is implicit in `pos - prev_pos`.
#[derive(Clone, Debug)]
pub struct Node<V: Vec> {
    pub pos: V,
    pub prev_pos: V,
    /// Force accumulated since the last integration; cleared by `integrate`.
    pub force: V,
    pub fixed: bool,
}

impl<V: Vec> Node<V> {
    pub fn new(pos: V) -> Self {
        Node {
            pos,
            prev_pos: pos,
            force: V::zero(),
            fixed: false,
        }
    }

    pub fn fixed(pos: V) -> Self {
        Node {
            fixed: true,
            ..Node::new(pos)
        }
    }

    /// Accumulate `force`. Fixed nodes ignore it.
    pub fn apply_force(&mut self, force: V) {
        if !self.fixed {
            self.force = self.force + force;
        }
    }

    /// Damped Verlet step.
    ///
    /// `damping` scales the inferred velocity every call, so values below 1
    /// bleed energy out of the truss each substep.
    pub fn integrate(&mut self, dt: V::Scalar, damping: V::Scalar) {
        if self.fixed {
            return;
        }
        let velocity = (self.pos - self.prev_pos).scale(damping);
        self.prev_pos = self.pos;
        self.pos = self.pos + velocity + self.force.scale(dt * dt);
        self.force = V::zero();
    }

    /// Push the node by `offset` without touching `prev_pos`, so the push
    /// shows up as velocity on the next integration. No-op when fixed.
    pub fn displace(&mut self, offset: V) {
        if !self.fixed {
            self.pos = self.pos + offset;
        }
    }

    /// Per-step displacement, `pos - prev_pos`.
    pub fn velocity_raw(&self) -> V {
        self.pos - self.prev_pos
    }
}
