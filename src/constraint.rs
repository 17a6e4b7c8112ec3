//! Distance constraints between truss nodes.

use crate::float::Float;
use crate::vec::Vec;
use crate::node::Node;

/// Keeps nodes `a` and `b` at `rest_length` apart.
///
/// Endpoints are arena indices into the owning branch's node list.
/// `rest_length` is set at construction and never changes.
#[derive(Clone, Debug)]
pub struct DistanceConstraint<V: Vec> {
    pub a: usize,
    pub b: usize,
    pub rest_length: V::Scalar,
}

impl<V: Vec> DistanceConstraint<V> {
    pub fn new(a: usize, b: usize, rest_length: V::Scalar) -> Self {
        DistanceConstraint { a, b, rest_length }
    }

    /// Rest length taken from the nodes' current separation.
    pub fn from_nodes(a: usize, b: usize, nodes: &[Node<V>]) -> Self {
        let rest_length = nodes[a].pos.distance(nodes[b].pos);
        DistanceConstraint { a, b, rest_length }
    }

    /// Current separation of the two endpoints.
    pub fn current_length(&self, nodes: &[Node<V>]) -> V::Scalar {
        nodes[self.a].pos.distance(nodes[self.b].pos)
    }

    /// One relaxation of this constraint.
    ///
    /// Each free endpoint moves by half of `stiffness * error` along the
    /// connecting line. A fixed endpoint stays put; its half is not handed
    /// to the other side.
    pub fn solve(&self, nodes: &mut [Node<V>], stiffness: V::Scalar) {
        let delta = nodes[self.b].pos - nodes[self.a].pos;
        let dist = delta.length();
        if dist == V::Scalar::zero() {
            return; // coincident
        }

        let diff = (dist - self.rest_length) / dist;
        let offset = delta.scale(V::Scalar::half() * diff * stiffness);

        nodes[self.a].displace(offset);
        nodes[self.b].displace(-offset);
    }
}
