use canopy::{create_branch, Branch, BranchSpec, NoOpStepObserver, PhysicsError, RecordingObserver, SimulationConfig, Vec2};
use canopy::Vec as _;

fn settle_config() -> SimulationConfig<f32> {
    SimulationConfig::new()
        .with_stiffness(0.32)
        .with_damping(0.99)
        .with_substeps(16)
        .with_gravity(0.89)
}

#[test]
fn taper_from_base_to_tip() {
    let branch = create_branch(Vec2::new(0.0f32, 0.0), 200.0, 4, 40.0, 10.0, 0.0).unwrap();

    let top = branch.top_rail();
    let bottom = branch.bottom_rail();
    assert_eq!(top.len(), 5);
    assert_eq!(bottom.len(), 5);

    let root_gap = bottom[0].pos.y - top[0].pos.y;
    let tip_gap = bottom[4].pos.y - top[4].pos.y;
    assert!((root_gap - 40.0).abs() < 1e-4, "root separation {}", root_gap);
    assert!((tip_gap - 10.0).abs() < 1e-4, "tip separation {}", tip_gap);
    assert!((top[4].pos.x - 200.0).abs() < 1e-4);
    assert!(top[0].pos.y < bottom[0].pos.y, "top rail should sit above the bottom rail");
}

#[test]
fn constraint_topology() {
    let branch = create_branch(Vec2::new(0.0f32, 0.0), 100.0, 5, 20.0, 20.0, 0.0).unwrap();
    // One brace per index plus four per bay.
    assert_eq!(branch.constraints().len(), 6 + 4 * 5);
    assert_eq!(branch.nodes().len(), 12);

    let fixed: Vec<usize> = branch
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.fixed)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(fixed, vec![0, 6], "only the two root nodes are fixed");

    for c in branch.constraints() {
        assert!(c.current_length(branch.nodes()) - c.rest_length == 0.0);
    }
}

#[test]
fn upward_branch_keeps_top_rail_above() {
    let branch = create_branch(Vec2::new(0.0f64, 0.0), 100.0, 2, 20.0, 10.0, -30.0).unwrap();
    for (t, b) in branch.top_rail().iter().zip(branch.bottom_rail()) {
        assert!(t.pos.y < b.pos.y);
    }
    // Heading up-right: the tip is above and to the right of the root.
    assert!(branch.tip().x > 0.0 && branch.tip().y < 0.0);
}

#[test]
fn invalid_specs_are_rejected() {
    let anchor = Vec2::new(0.0f32, 0.0);
    assert_eq!(
        create_branch(anchor, 100.0, 0, 20.0, 10.0, 0.0).unwrap_err(),
        PhysicsError::InsufficientSegments
    );
    assert_eq!(
        create_branch(anchor, -5.0, 4, 20.0, 10.0, 0.0).unwrap_err(),
        PhysicsError::InvalidLength
    );
    assert_eq!(
        create_branch(anchor, 100.0, 4, -1.0, 10.0, 0.0).unwrap_err(),
        PhysicsError::InvalidThickness
    );
}

#[test]
fn constraints_converge_at_full_stiffness() {
    let mut branch = create_branch(Vec2::new(0.0f64, 0.0), 200.0, 4, 40.0, 10.0, 0.0).unwrap();
    let tip = branch.tip();
    branch.node_mut(4).unwrap().pos = tip + Vec2::new(6.0, 9.0);
    branch.node_mut(7).unwrap().pos.y += 4.0;
    assert!(branch.max_constraint_error() > 1.0);

    branch.relax(500, 1.0);

    let err = branch.max_constraint_error();
    assert!(err < 1e-3, "constraints should converge, max error {}", err);
}

#[test]
fn root_nodes_never_move() {
    let mut branch = create_branch(Vec2::new(50.0f32, 300.0), 200.0, 6, 40.0, 10.0, 0.0).unwrap();
    let top_root = branch.top_rail()[0].pos;
    let bottom_root = branch.bottom_rail()[0].pos;

    let config = settle_config();
    branch.set_wind(Vec2::new(500.0, -300.0));
    for i in 0..120 {
        branch.apply_force(Vec2::new(0.0, 5000.0));
        branch.apply_force_at(0, Vec2::new(1e6, 1e6)).unwrap();
        if i % 10 == 0 {
            branch.node_mut(0).unwrap().displace(Vec2::new(3.0, 3.0));
        }
        branch.update(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }

    let top = &branch.top_rail()[0];
    let bottom = &branch.bottom_rail()[0];
    assert_eq!(top.pos, top_root);
    assert_eq!(top.prev_pos, top_root);
    assert_eq!(bottom.pos, bottom_root);
    assert_eq!(bottom.prev_pos, bottom_root);
}

#[test]
fn free_fall_settles() {
    let mut branch = create_branch(Vec2::new(0.0f32, 0.0), 200.0, 4, 40.0, 10.0, 0.0).unwrap();
    let config = settle_config();
    let start_tip = branch.tip();

    let mut last = branch.tip();
    let mut last_delta = f32::MAX;
    for _ in 0..300 {
        branch.update(1.0 / 60.0, &config, &mut NoOpStepObserver);
        let tip = branch.tip();
        last_delta = tip.distance(last);
        last = tip;
    }

    assert!(last.y > start_tip.y, "tip should sag under gravity");
    assert!(last_delta < 1e-2, "tip still moving {} per tick after 5 s", last_delta);
}

#[test]
fn damping_dissipates_motion() {
    let config = SimulationConfig::<f64>::new()
        .with_gravity(0.0)
        .with_stiffness(0.32)
        .with_damping(0.98)
        .with_substeps(8);
    let mut branch = create_branch(Vec2::new(0.0f64, 0.0), 200.0, 6, 40.0, 10.0, 0.0).unwrap();

    // Kick the tip: moving pos without prev_pos gives it velocity.
    branch.node_mut(6).unwrap().pos.y += 25.0;

    let mut motion = Vec::new();
    for _ in 0..300 {
        branch.update(1.0 / 60.0, &config, &mut NoOpStepObserver);
        motion.push(branch.motion());
    }

    let early: f64 = motion[..30].iter().sum();
    let late: f64 = motion[270..].iter().sum();
    assert!(late < early * 1e-3, "motion should decay: early {} late {}", early, late);
    assert!(motion[299] < 1e-3);
}

#[test]
fn observer_sees_every_substep() {
    let mut branch = create_branch(Vec2::new(0.0f32, 0.0), 100.0, 3, 20.0, 10.0, 0.0).unwrap();
    let config = settle_config();
    let mut obs = RecordingObserver::new();
    branch.update(1.0 / 60.0, &config, &mut obs);

    assert_eq!(obs.integrations, 16);
    assert_eq!(obs.constraint_iterations, 16 * 3);
    assert_eq!(obs.steps, 1);
}

#[test]
fn wind_pushes_branch_sideways() {
    let config = settle_config().with_gravity(0.0);
    let mut calm = create_branch(Vec2::new(0.0f32, 0.0), 150.0, 5, 30.0, 10.0, -90.0).unwrap();
    let mut windy = calm.clone();
    windy.set_wind(Vec2::new(200.0, 0.0));

    for _ in 0..60 {
        calm.update(1.0 / 60.0, &config, &mut NoOpStepObserver);
        windy.update(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }
    assert!(windy.tip().x > calm.tip().x + 0.01);
}

#[test]
fn rebuild_discards_state_and_changes_topology() {
    let mut branch = Branch::new(BranchSpec::new(Vec2::new(0.0f32, 0.0), 200.0, 4, 40.0, 10.0, 0.0)).unwrap();
    let config = settle_config();
    for _ in 0..30 {
        branch.update(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }
    assert!(branch.motion() > 0.0);

    branch.rebuild(8).unwrap();
    assert_eq!(branch.segment_count(), 8);
    assert_eq!(branch.top_rail().len(), 9);
    assert_eq!(branch.motion(), 0.0);
    assert!((branch.tip().x - 200.0).abs() < 1e-4);

    assert_eq!(branch.rebuild(0), Err(PhysicsError::InsufficientSegments));
    assert_eq!(branch.segment_count(), 8, "failed rebuild leaves the branch alone");
}

#[test]
fn rail_segments_taper() {
    let branch = create_branch(Vec2::new(0.0f32, 0.0), 200.0, 4, 40.0, 10.0, 0.0).unwrap();
    let segs: Vec<_> = branch.rail_segments().collect();
    assert_eq!(segs.len(), 4);
    assert_eq!(segs[0].start_thickness, 40.0);
    assert_eq!(segs[3].end_thickness, 10.0);
    for pair in segs.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert!(pair[0].start_thickness > pair[1].start_thickness);
    }
}

#[test]
fn out_of_range_node_is_an_error() {
    let mut branch = create_branch(Vec2::new(0.0f32, 0.0), 100.0, 2, 20.0, 10.0, 0.0).unwrap();
    assert_eq!(
        branch.apply_force_at(6, Vec2::new(1.0, 0.0)),
        Err(PhysicsError::NodeOutOfBounds { index: 6, count: 6 })
    );
}
