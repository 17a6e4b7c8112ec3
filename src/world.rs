//! Everything one level needs, stepped in a fixed order.
//!
//! Per tick: the breeze is sampled and platforms sway. The player moves and
//! resolves contacts against the branches. Only then do the branches run
//! their gravity and constraint pass, so the dents the player left are
//! smoothed out in the same tick. Hazards walk last.
//!
//! Leaves only read the breeze, so they drift right after it is sampled.

use crate::branch::{Branch, BranchSpec};
use crate::breeze::breeze_strength;
use crate::config::SimulationConfig;
use crate::drawable::{DrawItem, Facing};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::hazard::Patroller;
use crate::leaf::{Leaf, LeafRng};
use crate::observer::StepObserver;
use crate::platform::StaticPlatform;
use crate::player::{Buttons, PlayerBody, PlayerStep};
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Summary of one [`World::step`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepReport<F: Float> {
    /// Breeze strength used for this tick.
    pub breeze: F,
    pub player: PlayerStep,
    /// First hazard overlapping the player after it moved, if any.
    pub hazard_hit: Option<usize>,
}

pub struct World<F: Float> {
    config: SimulationConfig<F>,
    pub player: PlayerBody<F>,
    branches: AllocVec<Branch<F>>,
    platforms: AllocVec<StaticPlatform<F>>,
    hazards: AllocVec<Patroller<F>>,
    leaves: AllocVec<Leaf<F>>,
    leaf_rng: LeafRng,
    /// Width and height of the area leaves fall through.
    leaf_field: Vec2<F>,
    elapsed: F,
}

impl<F: Float> World<F> {
    pub fn new(config: SimulationConfig<F>, player_start: Vec2<F>) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(World {
            config,
            player: PlayerBody::new(player_start),
            branches: AllocVec::new(),
            platforms: AllocVec::new(),
            hazards: AllocVec::new(),
            leaves: AllocVec::new(),
            leaf_rng: LeafRng::new(0),
            leaf_field: Vec2::new(F::zero(), F::zero()),
            elapsed: F::zero(),
        })
    }

    /// Build a branch from `spec` and add it. Returns its index.
    pub fn add_branch(&mut self, spec: BranchSpec<F>) -> Result<usize, PhysicsError> {
        let branch = Branch::new(spec)?;
        self.branches.push(branch);
        Ok(self.branches.len() - 1)
    }

    pub fn add_platform(&mut self, platform: StaticPlatform<F>) -> usize {
        self.platforms.push(platform);
        self.platforms.len() - 1
    }

    /// Put a patroller on platform `platform`. Returns its index.
    pub fn add_patroller(
        &mut self,
        platform: usize,
        speed: F,
        direction: Facing,
    ) -> Result<usize, PhysicsError> {
        let count = self.platforms.len();
        let on = self
            .platforms
            .get(platform)
            .ok_or(PhysicsError::PlatformOutOfBounds { index: platform, count })?;
        self.hazards.push(Patroller::new(platform, on, speed, direction));
        Ok(self.hazards.len() - 1)
    }

    /// Replace the leaves with `count` new ones scattered over the band
    /// `field.y` tall directly above a `field`-sized area, so they fall in
    /// over the first few seconds.
    pub fn scatter_leaves(&mut self, count: usize, field: Vec2<F>, seed: u64) {
        self.leaf_rng = LeafRng::new(seed);
        self.leaf_field = field;
        self.leaves.clear();
        self.scatter(count);
    }

    fn scatter(&mut self, count: usize) {
        for _ in 0..count {
            let x = self.leaf_rng.range(F::zero(), self.leaf_field.x);
            let y = self.leaf_rng.range(-self.leaf_field.y, F::zero());
            self.leaves.push(Leaf::new(Vec2::new(x, y), &mut self.leaf_rng));
        }
    }

    /// Advance one tick of `dt` seconds.
    pub fn step<O: StepObserver<F>>(
        &mut self,
        input: Buttons,
        dt: F,
        observer: &mut O,
    ) -> StepReport<F> {
        self.elapsed = self.elapsed + dt;
        let breeze = breeze_strength(self.elapsed);

        for leaf in self.leaves.iter_mut() {
            leaf.update(breeze, dt, self.leaf_field, &mut self.leaf_rng);
        }

        for p in self.platforms.iter_mut() {
            p.sway(breeze, self.elapsed);
        }

        let player = self.player.update(
            input,
            &mut self.branches,
            &self.platforms,
            breeze,
            dt,
            &self.config,
            &mut *observer,
        );

        let wind = Vec2::new(breeze * self.config.branch_wind_scale, F::zero());
        for b in self.branches.iter_mut() {
            b.set_wind(wind);
            b.update(dt, &self.config, &mut *observer);
        }

        for h in self.hazards.iter_mut() {
            h.update(dt, &self.platforms[h.platform]);
        }
        let body = self.player.rect(self.config.player.half_extents);
        let hazard_hit = self.hazards.iter().position(|h| h.hits(&body));

        StepReport { breeze, player, hazard_hit }
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    /// Swap in a new config. It is validated first; a changed segment count
    /// rebuilds every branch.
    pub fn set_config<O: StepObserver<F>>(
        &mut self,
        config: SimulationConfig<F>,
        observer: &mut O,
    ) -> Result<(), PhysicsError> {
        config.validate()?;
        let resize = config.segment_count != self.config.segment_count;
        self.config = config;
        if resize {
            self.rebuild_branches(observer)?;
        }
        Ok(())
    }

    /// Rebuild every branch at `segment_count`, discarding their motion.
    pub fn set_segment_count<O: StepObserver<F>>(
        &mut self,
        segment_count: usize,
        observer: &mut O,
    ) -> Result<(), PhysicsError> {
        if segment_count == 0 {
            return Err(PhysicsError::InsufficientSegments);
        }
        self.config.segment_count = segment_count;
        self.rebuild_branches(observer)
    }

    fn rebuild_branches<O: StepObserver<F>>(&mut self, observer: &mut O) -> Result<(), PhysicsError> {
        let n = self.config.segment_count;
        for b in self.branches.iter_mut() {
            b.rebuild(n)?;
        }
        observer.on_rebuild(n);
        Ok(())
    }

    /// Level restart: player back to `position`, clock and hazards reset,
    /// branches rebuilt from their specs, leaves scattered afresh.
    pub fn restart(&mut self, position: Vec2<F>) -> Result<(), PhysicsError> {
        self.player.reset(position);
        self.elapsed = F::zero();
        for b in self.branches.iter_mut() {
            let n = b.segment_count();
            b.rebuild(n)?;
        }
        for p in self.platforms.iter_mut() {
            p.reset();
        }
        self.hazards.clear();
        let count = self.leaves.len();
        self.leaves.clear();
        self.scatter(count);
        Ok(())
    }

    pub fn elapsed(&self) -> F {
        self.elapsed
    }

    pub fn branches(&self) -> &[Branch<F>] {
        &self.branches
    }

    pub fn platforms(&self) -> &[StaticPlatform<F>] {
        &self.platforms
    }

    pub fn hazards(&self) -> &[Patroller<F>] {
        &self.hazards
    }

    pub fn leaves(&self) -> &[Leaf<F>] {
        &self.leaves
    }

    /// Everything to draw this frame: leaves behind everything, then
    /// platforms, branches, hazards, and the player on top.
    pub fn drawables(&self) -> AllocVec<DrawItem<F>> {
        let mut items = AllocVec::with_capacity(
            self.leaves.len() + self.platforms.len() + self.branches.len() + self.hazards.len() + 1,
        );
        items.extend(self.leaves.iter().enumerate().map(|(i, l)| DrawItem::from_drawable(i, l)));
        items.extend(self.platforms.iter().enumerate().map(|(i, p)| DrawItem::from_drawable(i, p)));
        items.extend(self.branches.iter().enumerate().map(|(i, b)| DrawItem::from_drawable(i, b)));
        items.extend(self.hazards.iter().enumerate().map(|(i, h)| DrawItem::from_drawable(i, h)));
        items.push(DrawItem::from_drawable(0, &self.player));
        items
    }
}
