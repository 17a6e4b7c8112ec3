//! Tapered ladder truss: the swaying branch the player lands on.
//!
//! A branch is two rails of nodes (top and bottom) running from a fixed root
//! toward a free tip. A vertical brace joins the rails at every index, and
//! each bay between neighbouring indices gets longitudinal and crossed
//! diagonal braces. The diagonals are what give the truss shear stiffness;
//! without them it folds into a line under gravity.
//!
//! Nodes live in one arena. Indices `0..=n` are the top rail and
//! `n+1..=2n+1` the bottom rail, where `n` is the segment count.

use crate::config::SimulationConfig;
use crate::constraint::DistanceConstraint;
use crate::drawable::{Drawable, EntityKind};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::node::Node;
use crate::observer::StepObserver;
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// Construction parameters for a branch. Kept by the branch so it can be
/// rebuilt with a different segment count.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchSpec<F: Float> {
    /// World-space root; the centre line starts here.
    pub anchor: Vec2<F>,
    pub length: F,
    pub segment_count: usize,
    pub base_thickness: F,
    pub tip_thickness: F,
    /// Direction of extension, degrees from +x (screen space, +y down).
    pub angle_degrees: F,
}

impl<F: Float> BranchSpec<F> {
    pub fn new(
        anchor: Vec2<F>,
        length: F,
        segment_count: usize,
        base_thickness: F,
        tip_thickness: F,
        angle_degrees: F,
    ) -> Self {
        BranchSpec { anchor, length, segment_count, base_thickness, tip_thickness, angle_degrees }
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        if self.segment_count == 0 {
            return Err(PhysicsError::InsufficientSegments);
        }
        if !self.length.is_finite() || self.length <= F::zero() {
            return Err(PhysicsError::InvalidLength);
        }
        let thick_ok = |t: F| t.is_finite() && t >= F::zero();
        if !thick_ok(self.base_thickness) || !thick_ok(self.tip_thickness) {
            return Err(PhysicsError::InvalidThickness);
        }
        Ok(())
    }

    /// Unit direction along the branch.
    pub fn direction(&self) -> Vec2<F> {
        Vec2::from_angle(self.angle_degrees.to_radians())
    }

    /// Unit normal pointing from the top rail toward the bottom rail.
    /// Always faces down the screen (or right, for a vertical branch).
    pub fn normal(&self) -> Vec2<F> {
        let p = self.direction().perp();
        let flip = p.y < F::zero() || (p.y == F::zero() && p.x < F::zero());
        if flip { -p } else { p }
    }

    /// Thickness at rail index `i`, linear from base to tip.
    pub fn thickness_at(&self, i: usize) -> F {
        let t = F::from_usize(i) / F::from_usize(self.segment_count);
        self.base_thickness.lerp(self.tip_thickness, t)
    }
}

/// One drawable piece of the top rail, for rendering thick tapered lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailSegment<F: Float> {
    pub start: Vec2<F>,
    pub end: Vec2<F>,
    pub start_thickness: F,
    pub end_thickness: F,
}

/// A branch truss: node arena plus its brace constraints.
#[derive(Clone, Debug)]
pub struct Branch<F: Float> {
    spec: BranchSpec<F>,
    nodes: AllocVec<Node<Vec2<F>>>,
    constraints: AllocVec<DistanceConstraint<Vec2<F>>>,
    wind: Vec2<F>,
}

/// Shorthand for `Branch::new(BranchSpec::new(..))`.
pub fn create_branch<F: Float>(
    anchor: Vec2<F>,
    length: F,
    segment_count: usize,
    base_thickness: F,
    tip_thickness: F,
    angle_degrees: F,
) -> Result<Branch<F>, PhysicsError> {
    Branch::new(BranchSpec::new(
        anchor,
        length,
        segment_count,
        base_thickness,
        tip_thickness,
        angle_degrees,
    ))
}

impl<F: Float> Branch<F> {
    pub fn new(spec: BranchSpec<F>) -> Result<Self, PhysicsError> {
        spec.validate()?;
        let (nodes, constraints) = build_truss(&spec);
        Ok(Branch { spec, nodes, constraints, wind: Vec2::zero() })
    }

    /// Throw away all simulated state and rebuild at a new segment count.
    ///
    /// On error the branch is left untouched.
    pub fn rebuild(&mut self, segment_count: usize) -> Result<(), PhysicsError> {
        let spec = BranchSpec { segment_count, ..self.spec.clone() };
        spec.validate()?;
        let (nodes, constraints) = build_truss(&spec);
        self.spec = spec;
        self.nodes = nodes;
        self.constraints = constraints;
        Ok(())
    }

    /// Advance by `dt`, split into `config.substeps` substeps.
    ///
    /// Each substep applies gravity plus the current wind to every node,
    /// integrates, then runs `config.iterations()` relaxation passes over
    /// all constraints. The config is not validated here; callers keep it
    /// in range (see [`SimulationConfig::validate`]).
    pub fn update<O: StepObserver<F>>(
        &mut self,
        dt: F,
        config: &SimulationConfig<F>,
        observer: &mut O,
    ) {
        let sub_dt = dt / F::from_usize(config.substeps);
        let force = config.gravity_force() + self.wind;
        let iterations = config.iterations();

        for _sub in 0..config.substeps {
            for n in self.nodes.iter_mut() {
                n.apply_force(force);
            }

            for n in self.nodes.iter_mut() {
                n.integrate(sub_dt, config.damping);
            }
            observer.on_integrate();

            for i in 0..iterations {
                for c in self.constraints.iter() {
                    c.solve(&mut self.nodes, config.stiffness);
                }
                observer.on_constraint_iteration(i);
            }
        }

        observer.on_step_complete();
    }

    /// Run `iterations` relaxation passes with no integration.
    pub fn relax(&mut self, iterations: usize, stiffness: F) {
        for _ in 0..iterations {
            for c in self.constraints.iter() {
                c.solve(&mut self.nodes, stiffness);
            }
        }
    }

    /// Persistent sideways force applied every substep until changed.
    pub fn set_wind(&mut self, wind: Vec2<F>) {
        self.wind = wind;
    }

    pub fn wind(&self) -> Vec2<F> {
        self.wind
    }

    /// One-shot force on every node, consumed by the next substep.
    pub fn apply_force(&mut self, force: Vec2<F>) {
        for n in self.nodes.iter_mut() {
            n.apply_force(force);
        }
    }

    pub fn apply_force_at(&mut self, index: usize, force: Vec2<F>) -> Result<(), PhysicsError> {
        let count = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(PhysicsError::NodeOutOfBounds { index, count })?;
        node.apply_force(force);
        Ok(())
    }

    pub fn spec(&self) -> &BranchSpec<F> {
        &self.spec
    }

    pub fn segment_count(&self) -> usize {
        self.spec.segment_count
    }

    pub fn top_rail(&self) -> &[Node<Vec2<F>>] {
        &self.nodes[..=self.spec.segment_count]
    }

    pub fn bottom_rail(&self) -> &[Node<Vec2<F>>] {
        &self.nodes[self.spec.segment_count + 1..]
    }

    /// Mutable top rail, for contact response.
    pub fn top_rail_mut(&mut self) -> &mut [Node<Vec2<F>>] {
        let n = self.spec.segment_count;
        &mut self.nodes[..=n]
    }

    pub fn nodes(&self) -> &[Node<Vec2<F>>] {
        &self.nodes
    }

    pub fn node_mut(&mut self, index: usize) -> Result<&mut Node<Vec2<F>>, PhysicsError> {
        let count = self.nodes.len();
        self.nodes.get_mut(index).ok_or(PhysicsError::NodeOutOfBounds { index, count })
    }

    pub fn constraints(&self) -> &[DistanceConstraint<Vec2<F>>] {
        &self.constraints
    }

    /// Top-rail tip position.
    pub fn tip(&self) -> Vec2<F> {
        self.nodes[self.spec.segment_count].pos
    }

    /// Sum of `|pos - prev_pos|` over all nodes; zero when at rest.
    pub fn motion(&self) -> F {
        self.nodes
            .iter()
            .fold(F::zero(), |acc, n| acc + n.velocity_raw().length())
    }

    /// Largest `|current - rest|` over all constraints.
    pub fn max_constraint_error(&self) -> F {
        self.constraints.iter().fold(F::zero(), |acc, c| {
            acc.max((c.current_length(&self.nodes) - c.rest_length).abs())
        })
    }

    /// Top-rail segments with their end thicknesses, root first.
    pub fn rail_segments(&self) -> impl Iterator<Item = RailSegment<F>> + '_ {
        self.top_rail().windows(2).enumerate().map(move |(i, pair)| RailSegment {
            start: pair[0].pos,
            end: pair[1].pos,
            start_thickness: self.spec.thickness_at(i),
            end_thickness: self.spec.thickness_at(i + 1),
        })
    }
}

impl<F: Float> Drawable<F> for Branch<F> {
    fn kind(&self) -> EntityKind {
        EntityKind::Branch
    }

    fn position(&self) -> Vec2<F> {
        self.spec.anchor
    }

    /// Current root-to-tip heading of the centre line, so a single sprite
    /// can follow the sway.
    fn rotation(&self) -> F {
        let n = self.spec.segment_count;
        let root = self.nodes[0].pos.lerp(self.nodes[n + 1].pos, F::half());
        let tip = self.nodes[n].pos.lerp(self.nodes[2 * n + 1].pos, F::half());
        (tip - root).angle()
    }
}

fn build_truss<F: Float>(
    spec: &BranchSpec<F>,
) -> (AllocVec<Node<Vec2<F>>>, AllocVec<DistanceConstraint<Vec2<F>>>) {
    let n = spec.segment_count;
    let dir = spec.direction();
    let normal = spec.normal();
    let step = spec.length / F::from_usize(n);

    let mut nodes = AllocVec::with_capacity(2 * (n + 1));
    let rail = |side: F, nodes: &mut AllocVec<Node<Vec2<F>>>| {
        for i in 0..=n {
            let half = spec.thickness_at(i) * F::half();
            let base = spec.anchor + dir.scale(F::from_usize(i) * step);
            let pos = base + normal.scale(side * half);
            nodes.push(if i == 0 { Node::fixed(pos) } else { Node::new(pos) });
        }
    };
    rail(-F::one(), &mut nodes);
    rail(F::one(), &mut nodes);

    let top = |i: usize| i;
    let bottom = |i: usize| n + 1 + i;

    let mut constraints = AllocVec::with_capacity(5 * n + 1);
    for i in 0..=n {
        constraints.push(DistanceConstraint::from_nodes(top(i), bottom(i), &nodes));
        if i > 0 {
            constraints.push(DistanceConstraint::from_nodes(top(i - 1), top(i), &nodes));
            constraints.push(DistanceConstraint::from_nodes(bottom(i - 1), bottom(i), &nodes));
            constraints.push(DistanceConstraint::from_nodes(top(i), bottom(i - 1), &nodes));
            constraints.push(DistanceConstraint::from_nodes(bottom(i), top(i - 1), &nodes));
        }
    }

    (nodes, constraints)
}
