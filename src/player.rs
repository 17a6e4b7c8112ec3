//! The player: an explicit-velocity body that lands on branches and ledges.

use crate::branch::Branch;
use crate::collision::{resolve_branch_contacts, segment_contact};
use crate::config::{PlayerConfig, SimulationConfig};
use crate::drawable::{Drawable, EntityKind, Facing};
use crate::float::Float;
use crate::observer::StepObserver;
use crate::platform::{Rect, StaticPlatform, LANDING_SLOP};
use crate::vec::{Vec, Vec2};

bitflags::bitflags! {
    /// Buttons held this tick.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP  = 1 << 2;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JumpState {
    Grounded,
    /// Rising under a held jump.
    Jumping,
    Falling,
}

/// What happened to the player during one update.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerStep {
    /// Branch segments resolved this tick, across all branches.
    pub branch_contacts: usize,
    /// Platform the player landed on, if any.
    pub platform: Option<usize>,
    /// Went from airborne to grounded this tick.
    pub landed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBody<F: Float> {
    /// Centre of the body.
    pub position: Vec2<F>,
    /// World units per second.
    pub velocity: Vec2<F>,
    pub jump_state: JumpState,
    pub facing: Facing,
    /// Seconds since the current jump started.
    jump_time: F,
    jump_was_down: bool,
}

impl<F: Float> PlayerBody<F> {
    /// A grounded, motionless body centred at `position`.
    pub fn new(position: Vec2<F>) -> Self {
        PlayerBody {
            position,
            velocity: Vec2::zero(),
            jump_state: JumpState::Grounded,
            facing: Facing::Right,
            jump_time: F::zero(),
            jump_was_down: false,
        }
    }

    /// Put the body back at `position`, motionless and grounded.
    pub fn reset(&mut self, position: Vec2<F>) {
        *self = PlayerBody { facing: self.facing, ..PlayerBody::new(position) };
    }

    pub fn is_airborne(&self) -> bool {
        self.jump_state != JumpState::Grounded
    }

    pub fn is_falling(&self) -> bool {
        self.jump_state == JumpState::Falling
    }

    /// Axis-aligned box around the body.
    pub fn rect(&self, half_extents: Vec2<F>) -> Rect<F> {
        Rect::from_center(self.position, half_extents)
    }

    /// Advance one tick.
    ///
    /// Horizontal input, jump, gravity and breeze update the velocity;
    /// position integrates; then branch contacts resolve (mutating the
    /// branches), then static platforms catch a falling body, and finally
    /// the body is clamped to the world's width.
    #[allow(clippy::too_many_arguments)]
    pub fn update<O: StepObserver<F>>(
        &mut self,
        input: Buttons,
        branches: &mut [Branch<F>],
        platforms: &[StaticPlatform<F>],
        ambient: F,
        dt: F,
        config: &SimulationConfig<F>,
        observer: &mut O,
    ) -> PlayerStep {
        let pc = &config.player;
        let was_airborne = self.is_airborne();
        let prev_bottom = self.position.y + pc.half_extents.y;

        self.steer(input, pc);
        self.jump(input, dt, pc);

        self.velocity.y = self.velocity.y
            + config.gravity * config.gravity_scale * pc.gravity_multiplier * dt;
        if self.is_airborne() {
            self.velocity.x = self.velocity.x + ambient * pc.breeze_acceleration * dt;
        }
        self.velocity.y = self.velocity.y.min(pc.terminal_velocity);
        self.position = self.position + self.velocity.scale(dt);

        let radius = pc.contact_radius();
        let mut branch_contacts = 0;
        for branch in branches.iter_mut() {
            branch_contacts += resolve_branch_contacts(
                &mut self.position,
                &mut self.velocity,
                radius,
                branch,
                config,
                &mut *observer,
            );
        }

        let body = self.rect(pc.half_extents);
        let platform = platforms
            .iter()
            .position(|p| p.catches(&body, prev_bottom, self.velocity.y));
        if let Some(i) = platform {
            let p = &platforms[i];
            self.position.y = p.rect.top() - pc.half_extents.y;
            self.position.x = self.position.x + p.displacement().x;
            self.velocity.y = F::zero();
        }

        self.clamp_to_world(pc);

        if branch_contacts > 0 || platform.is_some() {
            self.jump_state = JumpState::Grounded;
            self.jump_time = F::zero();
        } else {
            match self.jump_state {
                JumpState::Grounded if !self.supported(branches, platforms, pc) => {
                    self.jump_state = JumpState::Falling;
                }
                JumpState::Jumping if self.velocity.y > F::zero() => {
                    self.jump_state = JumpState::Falling;
                }
                _ => {}
            }
        }

        let landed = was_airborne && !self.is_airborne();
        if landed {
            observer.on_landing();
        }
        PlayerStep { branch_contacts, platform, landed }
    }

    fn steer(&mut self, input: Buttons, pc: &PlayerConfig<F>) {
        let left = input.contains(Buttons::LEFT);
        let right = input.contains(Buttons::RIGHT);
        if left != right {
            self.facing = if left { Facing::Left } else { Facing::Right };
            self.velocity.x = self.facing.sign::<F>() * pc.move_speed;
        } else {
            self.velocity.x = self.velocity.x * pc.horizontal_decay;
            if self.velocity.x.abs() < pc.stop_threshold {
                self.velocity.x = F::zero();
            }
        }
    }

    /// Jumps start on the press edge and only from the ground. Holding keeps
    /// accelerating upward until `max_jump_duration`; letting go or timing
    /// out drops any remaining upward speed.
    fn jump(&mut self, input: Buttons, dt: F, pc: &PlayerConfig<F>) {
        let held = input.contains(Buttons::JUMP);
        let pressed = held && !self.jump_was_down;
        self.jump_was_down = held;

        match self.jump_state {
            JumpState::Grounded if pressed => {
                self.jump_state = JumpState::Jumping;
                self.jump_time = F::zero();
                self.velocity.y = -pc.jump_impulse;
            }
            JumpState::Jumping => {
                self.jump_time = self.jump_time + dt;
                if held && self.jump_time < pc.max_jump_duration {
                    self.velocity.y = self.velocity.y - pc.jump_acceleration * dt;
                } else {
                    self.jump_state = JumpState::Falling;
                    self.velocity.y = self.velocity.y.max(F::zero());
                }
            }
            _ => {}
        }
    }

    fn clamp_to_world(&mut self, pc: &PlayerConfig<F>) {
        let min = pc.half_extents.x;
        let max = pc.world_width - pc.half_extents.x;
        if self.position.x < min {
            self.position.x = min;
            self.velocity.x = F::zero();
        } else if self.position.x > max {
            self.position.x = max;
            self.velocity.x = F::zero();
        }
    }

    /// Probe slightly below the body for something to stand on.
    fn supported(
        &self,
        branches: &[Branch<F>],
        platforms: &[StaticPlatform<F>],
        pc: &PlayerConfig<F>,
    ) -> bool {
        let slop = F::from_f32(LANDING_SLOP);
        let below = self.position + Vec2::new(F::zero(), slop);
        let radius = pc.contact_radius();
        let on_branch = branches.iter().any(|b| {
            b.top_rail()
                .windows(2)
                .enumerate()
                .any(|(i, w)| segment_contact(below, radius, i, w[0].pos, w[1].pos).is_some())
        });
        let body = self.rect(pc.half_extents);
        on_branch || platforms.iter().any(|p| p.supports(&body))
    }
}

impl<F: Float> Drawable<F> for PlayerBody<F> {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn position(&self) -> Vec2<F> {
        self.position
    }

    fn facing(&self) -> Facing {
        self.facing
    }
}
