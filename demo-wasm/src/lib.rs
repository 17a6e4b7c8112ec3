use canopy::{
    create_branch, Branch, BranchSpec, Buttons, EntityKind, Facing, NoOpStepObserver, Rect,
    SimulationConfig, StaticPlatform, Vec2, World, LEAF_COUNT,
};
use wasm_bindgen::prelude::*;

fn to_js(err: canopy::PhysicsError) -> JsError {
    JsError::new(&err.to_string())
}

fn flatten(points: impl Iterator<Item = Vec2<f32>>) -> Vec<f32> {
    let mut out = Vec::new();
    for p in points {
        out.push(p.x);
        out.push(p.y);
    }
    out
}

// ---- Branch Demo ----

/// One branch on its own, with every solver knob exposed for tuning.
#[wasm_bindgen]
pub struct BranchDemo {
    branch: Branch<f32>,
    config: SimulationConfig<f32>,
}

#[wasm_bindgen]
impl BranchDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(segments: usize, angle_degrees: f32) -> Result<BranchDemo, JsError> {
        let config = SimulationConfig::new().with_segment_count(segments);
        config.validate().map_err(to_js)?;
        let branch = create_branch(Vec2::new(50.0f32, 300.0), 300.0, segments, 40.0, 10.0, angle_degrees)
            .map_err(to_js)?;
        Ok(BranchDemo { branch, config })
    }

    pub fn update(&mut self, dt: f32) {
        self.branch.update(dt, &self.config, &mut NoOpStepObserver);
    }

    /// Shove every free node; shows up as velocity on the next update.
    pub fn poke(&mut self, fx: f32, fy: f32) {
        self.branch.apply_force(Vec2::new(fx, fy));
    }

    pub fn set_wind(&mut self, x: f32) {
        self.branch.set_wind(Vec2::new(x, 0.0));
    }

    /// Out-of-range values are clamped rather than rejected so sliders can
    /// be dragged freely.
    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.config = self.config.clone().with_stiffness(stiffness).clamped();
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.config = self.config.clone().with_damping(damping).clamped();
    }

    pub fn set_substeps(&mut self, substeps: usize) {
        self.config = self.config.clone().with_substeps(substeps).clamped();
    }

    pub fn set_segment_count(&mut self, segments: usize) -> Result<(), JsError> {
        self.branch.rebuild(segments).map_err(to_js)?;
        self.config.segment_count = segments;
        Ok(())
    }

    /// Returns flat [x0, y0, x1, y1, ...] top-rail positions, root first
    pub fn top_rail(&self) -> Vec<f32> {
        flatten(self.branch.top_rail().iter().map(|n| n.pos))
    }

    /// Returns flat [x0, y0, x1, y1, ...] bottom-rail positions, root first
    pub fn bottom_rail(&self) -> Vec<f32> {
        flatten(self.branch.bottom_rail().iter().map(|n| n.pos))
    }

    /// Returns [x0, y0, x1, y1, t0, t1] per top-rail segment
    pub fn rail_segments(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.branch.segment_count() * 6);
        for s in self.branch.rail_segments() {
            out.extend_from_slice(&[
                s.start.x,
                s.start.y,
                s.end.x,
                s.end.y,
                s.start_thickness,
                s.end_thickness,
            ]);
        }
        out
    }

    pub fn max_constraint_error(&self) -> f32 {
        self.branch.max_constraint_error()
    }
}

// ---- Level Demo ----

/// A small level: two branches, a ledge with a patroller, the ground, and
/// leaves falling through a 600x1200 screen.
#[wasm_bindgen]
pub struct LevelDemo {
    world: World<f32>,
    start: Vec2<f32>,
    hazard_hit: bool,
}

#[wasm_bindgen]
impl LevelDemo {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<LevelDemo, JsError> {
        let start = Vec2::new(300.0f32, 1140.0);
        let mut world = World::new(SimulationConfig::new(), start).map_err(to_js)?;
        let segments = world.config().segment_count;
        world
            .add_branch(BranchSpec::new(Vec2::new(0.0, 900.0), 280.0, segments, 40.0, 10.0, -10.0))
            .map_err(to_js)?;
        world
            .add_branch(BranchSpec::new(Vec2::new(600.0, 650.0), 260.0, segments, 40.0, 10.0, 190.0))
            .map_err(to_js)?;
        let ledge = world.add_platform(
            StaticPlatform::new(Rect::new(180.0, 420.0, 220.0, 20.0)).with_phases(0.0, 1.3),
        );
        world.add_platform(StaticPlatform::ground(600.0, 1190.0, 10.0));
        world.add_patroller(ledge, 40.0, Facing::Right).map_err(to_js)?;
        world.scatter_leaves(LEAF_COUNT, Vec2::new(600.0, 1200.0), 0x1eaf);

        Ok(LevelDemo { world, start, hazard_hit: false })
    }

    /// `buttons` is a bit set: 1 = left, 2 = right, 4 = jump.
    pub fn update(&mut self, buttons: u8, dt: f32) {
        let input = Buttons::from_bits_truncate(buttons);
        let report = self.world.step(input, dt, &mut NoOpStepObserver);
        self.hazard_hit = report.hazard_hit.is_some();
    }

    pub fn hazard_hit(&self) -> bool {
        self.hazard_hit
    }

    pub fn restart(&mut self) -> Result<(), JsError> {
        self.world.restart(self.start).map_err(to_js)?;
        self.hazard_hit = false;
        Ok(())
    }

    pub fn set_segment_count(&mut self, segments: usize) -> Result<(), JsError> {
        self.world.set_segment_count(segments, &mut NoOpStepObserver).map_err(to_js)
    }

    pub fn branch_count(&self) -> usize {
        self.world.branches().len()
    }

    /// Returns flat top-rail positions of branch `index`
    pub fn branch_top_rail(&self, index: usize) -> Vec<f32> {
        match self.world.branches().get(index) {
            Some(b) => flatten(b.top_rail().iter().map(|n| n.pos)),
            None => Vec::new(),
        }
    }

    /// Returns [kind, x, y, rotation, facing] per draw item, back to front.
    /// kind: 0 player, 1 branch, 2 platform, 3 hazard, 4 leaf; facing: -1 or 1.
    pub fn draw_list(&self) -> Vec<f32> {
        let items = self.world.drawables();
        let mut out = Vec::with_capacity(items.len() * 5);
        for d in &items {
            let kind = match d.kind {
                EntityKind::Player => 0.0,
                EntityKind::Branch => 1.0,
                EntityKind::Platform => 2.0,
                EntityKind::Hazard => 3.0,
                EntityKind::Leaf => 4.0,
            };
            out.extend_from_slice(&[kind, d.position.x, d.position.y, d.rotation, d.facing.sign()]);
        }
        out
    }

    /// Returns [x, y, w, h] per platform
    pub fn platform_rects(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for p in self.world.platforms() {
            out.extend_from_slice(&[p.rect.x, p.rect.y, p.rect.w, p.rect.h]);
        }
        out
    }

    /// Returns [size, tint] per leaf, in draw-list order.
    pub fn leaf_styles(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for l in self.world.leaves() {
            out.extend_from_slice(&[l.size, l.tint as f32]);
        }
        out
    }

    pub fn breeze(&self) -> f32 {
        canopy::breeze_strength(self.world.elapsed())
    }
}
