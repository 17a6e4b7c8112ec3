//! Runtime tunables for the branch solver, the player and contact response.
//!
//! Everything here is plain data passed into each update call; nothing is
//! global. A tuning UI can mutate a [`SimulationConfig`] between ticks and
//! the change takes effect on the next one, except `segment_count`, which
//! needs a branch rebuild.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec2;

/// Configuration for the truss solver and the shared world constants.
///
/// # Builder Pattern
/// ```
/// use canopy::config::SimulationConfig;
///
/// let config: SimulationConfig<f32> = SimulationConfig::new()
///     .with_gravity(0.89)
///     .with_stiffness(0.32)
///     .with_damping(0.99)
///     .with_substeps(16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig<F: Float> {
    /// World gravity constant, shared by branches and the player.
    pub gravity: F,
    /// Converts `gravity` into a per-node force (world units / s^2).
    pub gravity_scale: F,
    /// Inferred-velocity multiplier per substep, in (0, 1]. 1 = undamped.
    pub damping: F,
    /// Constraint correction strength; also sets the iteration count
    /// (`max(1, floor(stiffness * 10))`).
    pub stiffness: F,
    /// Integration substeps per tick. Must be at least 1.
    pub substeps: usize,
    /// Player mass. Half of it is the share of a contact the branch absorbs.
    pub mass: F,
    /// Velocity scale applied after reflecting off a branch.
    pub restitution: F,
    /// Segments per branch. Changing it requires a rebuild.
    pub segment_count: usize,
    /// Multiplier from breeze strength to sideways force on branch nodes.
    pub branch_wind_scale: F,
    pub player: PlayerConfig<F>,
    pub collision: CollisionConfig,
}

impl<F: Float> SimulationConfig<F> {
    pub fn new() -> Self {
        SimulationConfig {
            gravity: F::from_f32(0.89),
            gravity_scale: F::from_f32(1000.0),
            damping: F::from_f32(0.99),
            stiffness: F::from_f32(0.32),
            substeps: 16,
            mass: F::one(),
            restitution: F::from_f32(0.27),
            segment_count: 8,
            branch_wind_scale: F::from_f32(20.0),
            player: PlayerConfig::new(),
            collision: CollisionConfig::new(),
        }
    }

    pub fn with_gravity(mut self, gravity: F) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: F) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }

    pub fn with_mass(mut self, mass: F) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_segment_count(mut self, segment_count: usize) -> Self {
        self.segment_count = segment_count;
        self
    }

    pub fn with_branch_wind_scale(mut self, scale: F) -> Self {
        self.branch_wind_scale = scale;
        self
    }

    pub fn with_player(mut self, player: PlayerConfig<F>) -> Self {
        self.player = player;
        self
    }

    pub fn with_collision(mut self, collision: CollisionConfig) -> Self {
        self.collision = collision;
        self
    }

    /// Constraint passes per substep for the current stiffness.
    pub fn iterations(&self) -> usize {
        solver_iterations(self.stiffness)
    }

    /// Downward force applied to every free node each substep.
    pub fn gravity_force(&self) -> Vec2<F> {
        Vec2::new(F::zero(), self.gravity * self.gravity_scale)
    }

    /// Fail fast on values the solver is not defined for.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let zero = F::zero();
        let one = F::one();
        let bad = |field| Err(PhysicsError::InvalidConfiguration { field });

        if !self.gravity.is_finite() {
            return bad("gravity");
        }
        if !self.gravity_scale.is_finite() {
            return bad("gravity_scale");
        }
        if self.substeps == 0 {
            return bad("substeps");
        }
        if !self.stiffness.is_finite() || self.stiffness <= zero {
            return bad("stiffness");
        }
        if !self.damping.is_finite() || self.damping <= zero || self.damping > one {
            return bad("damping");
        }
        if !self.mass.is_finite() || self.mass <= zero || self.mass > F::two() {
            return bad("mass");
        }
        if !self.restitution.is_finite() || self.restitution < zero || self.restitution > one {
            return bad("restitution");
        }
        if self.segment_count == 0 {
            return bad("segment_count");
        }
        if !self.branch_wind_scale.is_finite() {
            return bad("branch_wind_scale");
        }
        self.player.validate()
    }

    /// Pull every bounded tunable into range, the way slider bounds would.
    /// Non-finite values fall back to their defaults first.
    pub fn clamped(mut self) -> Self {
        let defaults = Self::new();
        let finite_or = |v: F, fallback: F| if v.is_finite() { v } else { fallback };
        self.gravity = finite_or(self.gravity, defaults.gravity);
        self.gravity_scale = finite_or(self.gravity_scale, defaults.gravity_scale);
        self.stiffness = finite_or(self.stiffness, defaults.stiffness);
        self.damping = finite_or(self.damping, defaults.damping);
        self.mass = finite_or(self.mass, defaults.mass);
        self.restitution = finite_or(self.restitution, defaults.restitution);
        self.branch_wind_scale = finite_or(self.branch_wind_scale, defaults.branch_wind_scale);

        let eps = F::from_f32(0.01);
        self.substeps = self.substeps.clamp(1, MAX_SUBSTEPS);
        self.stiffness = self.stiffness.clamp(eps, F::one());
        self.damping = self.damping.clamp(eps, F::one());
        self.mass = self.mass.clamp(eps, F::two());
        self.restitution = self.restitution.clamp(F::zero(), F::one());
        self.segment_count = self.segment_count.clamp(1, MAX_SEGMENTS);
        self
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound `clamped` applies to `substeps`.
pub const MAX_SUBSTEPS: usize = 64;
/// Upper bound `clamped` applies to `segment_count`.
pub const MAX_SEGMENTS: usize = 64;

/// `max(1, floor(stiffness * 10))`.
pub fn solver_iterations<F: Float>(stiffness: F) -> usize {
    let scaled = (stiffness * F::from_f32(10.0)).floor().to_f32();
    if scaled >= 1.0 { scaled as usize } else { 1 }
}

/// Player movement constants. Defaults follow a 60 Hz, 600-unit-wide screen.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerConfig<F: Float> {
    /// Half width and half height of the player's box.
    pub half_extents: Vec2<F>,
    /// Contact radius = `half_extents.y * radius_scale`.
    pub radius_scale: F,
    /// Horizontal speed while a direction is held.
    pub move_speed: F,
    /// Per-tick multiplier on `vx` with no direction held.
    pub horizontal_decay: F,
    /// `|vx|` below this snaps to zero.
    pub stop_threshold: F,
    /// Extra factor on world gravity for the player.
    pub gravity_multiplier: F,
    /// Upward speed given the instant a jump starts.
    pub jump_impulse: F,
    /// Upward acceleration while the jump is held.
    pub jump_acceleration: F,
    /// Longest a held jump keeps accelerating, in seconds.
    pub max_jump_duration: F,
    /// Sideways acceleration per unit of breeze while airborne.
    pub breeze_acceleration: F,
    /// Fall speed cap.
    pub terminal_velocity: F,
    /// Horizontal extent of the world; the player is clamped into it.
    pub world_width: F,
}

impl<F: Float> PlayerConfig<F> {
    pub fn new() -> Self {
        PlayerConfig {
            half_extents: Vec2::new(F::from_f32(50.0), F::from_f32(50.0)),
            radius_scale: F::from_f32(0.9),
            move_speed: F::from_f32(300.0),
            horizontal_decay: F::from_f32(0.8),
            stop_threshold: F::from_f32(5.0),
            gravity_multiplier: F::two(),
            jump_impulse: F::from_f32(400.0),
            jump_acceleration: F::from_f32(2400.0),
            max_jump_duration: F::half(),
            breeze_acceleration: F::from_f32(120.0),
            terminal_velocity: F::from_f32(1500.0),
            world_width: F::from_f32(600.0),
        }
    }

    pub fn with_half_extents(mut self, half_extents: Vec2<F>) -> Self {
        self.half_extents = half_extents;
        self
    }

    pub fn with_move_speed(mut self, move_speed: F) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_world_width(mut self, world_width: F) -> Self {
        self.world_width = world_width;
        self
    }

    pub fn with_jump(mut self, impulse: F, acceleration: F) -> Self {
        self.jump_impulse = impulse;
        self.jump_acceleration = acceleration;
        self
    }

    pub fn with_breeze_acceleration(mut self, breeze_acceleration: F) -> Self {
        self.breeze_acceleration = breeze_acceleration;
        self
    }

    pub fn with_max_jump_duration(mut self, seconds: F) -> Self {
        self.max_jump_duration = seconds;
        self
    }

    /// Radius used against branch segments.
    pub fn contact_radius(&self) -> F {
        self.half_extents.y * self.radius_scale
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        let zero = F::zero();
        let bad = |field| Err(PhysicsError::InvalidConfiguration { field });

        if !(self.half_extents.x > zero && self.half_extents.y > zero) {
            return bad("player.half_extents");
        }
        if !(self.radius_scale > zero) {
            return bad("player.radius_scale");
        }
        if !(self.horizontal_decay >= zero && self.horizontal_decay < F::one()) {
            return bad("player.horizontal_decay");
        }
        if !(self.terminal_velocity > zero) {
            return bad("player.terminal_velocity");
        }
        if !(self.world_width >= self.half_extents.x * F::two()) {
            return bad("player.world_width");
        }
        Ok(())
    }
}

impl<F: Float> Default for PlayerConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Contact response switches.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionConfig {
    /// Reflect velocity on every contact, even when the player is already
    /// moving away from the branch. `true` reproduces the shipped game,
    /// including its resting jitter; `false` only reflects approaching
    /// velocity.
    pub reflect_separating: bool,
}

impl CollisionConfig {
    pub fn new() -> Self {
        CollisionConfig { reflect_separating: true }
    }

    pub fn with_reflect_separating(mut self, reflect: bool) -> Self {
        self.reflect_separating = reflect;
        self
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::new()
    }
}
