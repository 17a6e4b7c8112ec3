use canopy::{
    create_branch, resolve_branch_contacts, Branch, CollisionConfig, NoOpStepObserver,
    RecordingObserver, SimulationConfig, Vec2,
};
use canopy::Vec as _;

/// Horizontal branch of even thickness whose top rail runs along y = 290,
/// nodes every 50 units from x = 0.
fn flat_branch() -> Branch<f64> {
    create_branch(Vec2::new(0.0, 300.0), 200.0, 4, 20.0, 20.0, 0.0).unwrap()
}

fn radius(config: &SimulationConfig<f64>) -> f64 {
    config.player.contact_radius()
}

fn nearest_rail_distance(branch: &Branch<f64>, p: Vec2<f64>) -> f64 {
    branch
        .top_rail()
        .windows(2)
        .map(|w| {
            let (c, _) = canopy::closest_point_on_segment(p, w[0].pos, w[1].pos);
            p.distance(c)
        })
        .fold(f64::MAX, f64::min)
}

#[test]
fn single_pass_removes_penetration() {
    let config = SimulationConfig::<f64>::new();
    let r = radius(&config);
    let mut branch = flat_branch();

    // Midpoint of the second segment, half a unit too deep.
    let mut pos = Vec2::new(75.0, 290.0 - (r - 0.5));
    let mut vel = Vec2::new(0.0, 200.0);

    let contacts =
        resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, &config, &mut NoOpStepObserver);

    assert_eq!(contacts, 1);
    let dist = nearest_rail_distance(&branch, pos);
    assert!(dist >= r - 1e-9, "still penetrating: distance {} radius {}", dist, r);
}

#[test]
fn push_is_split_by_projection() {
    let config = SimulationConfig::<f64>::new();
    let r = radius(&config);
    let mut branch = flat_branch();
    let before: Vec<_> = branch.top_rail().iter().map(|n| n.pos).collect();

    let mut pos = Vec2::new(75.0, 290.0 - (r - 0.5));
    let mut vel = Vec2::zero();
    resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, &config, &mut NoOpStepObserver);

    let d1 = branch.top_rail()[1].pos.y - before[1].y;
    let d2 = branch.top_rail()[2].pos.y - before[2].y;
    assert!(d1 > 0.0, "segment should be pushed down");
    assert!((d1 - d2).abs() < 1e-12, "t = 0.5 splits evenly: {} vs {}", d1, d2);
    // overlap 0.5 * mass factor 0.5 * weight 0.5
    assert!((d1 - 0.125).abs() < 1e-9);

    // Untouched nodes stay put.
    assert_eq!(branch.top_rail()[3].pos, before[3]);
    // Pushing does not touch prev_pos; it becomes velocity.
    assert_eq!(branch.top_rail()[1].prev_pos, before[1]);
}

#[test]
fn heavier_player_pushes_harder() {
    let light = SimulationConfig::<f64>::new().with_mass(0.5);
    let heavy = SimulationConfig::<f64>::new().with_mass(1.5);
    let r = radius(&light);

    let dent = |config: &SimulationConfig<f64>| {
        let mut branch = flat_branch();
        let mut pos = Vec2::new(75.0, 290.0 - (r - 2.0));
        let mut vel = Vec2::zero();
        resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, config, &mut NoOpStepObserver);
        branch.top_rail()[1].pos.y - 290.0
    };

    assert!(dent(&heavy) > dent(&light));
}

#[test]
fn fixed_root_absorbs_nothing() {
    let config = SimulationConfig::<f64>::new();
    let r = radius(&config);
    let mut branch = flat_branch();
    let root = branch.top_rail()[0].pos;

    let start = Vec2::new(10.0, 290.0 - (r - 1.0));
    let mut pos = start;
    let mut vel = Vec2::zero();
    let contacts =
        resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, &config, &mut NoOpStepObserver);

    assert_eq!(contacts, 1);
    assert_eq!(branch.top_rail()[0].pos, root);
    assert!(branch.top_rail()[1].pos.y > 290.0);
    assert!(
        nearest_rail_distance(&branch, pos) > nearest_rail_distance(&flat_branch(), start),
        "player should be pushed out"
    );
}

#[test]
fn velocity_reflects_with_restitution() {
    let config = SimulationConfig::<f64>::new().with_restitution(0.27);
    let r = radius(&config);
    let mut branch = flat_branch();

    let mut pos = Vec2::new(75.0, 290.0 - (r - 0.5));
    let mut vel = Vec2::new(0.0, 200.0);
    resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, &config, &mut NoOpStepObserver);

    assert!(vel.x.abs() < 1e-9);
    assert!((vel.y + 54.0).abs() < 1e-9, "expected -54, got {}", vel.y);
}

#[test]
fn separating_velocity_reflection_is_configurable() {
    let r = radius(&SimulationConfig::new());
    let run = |config: SimulationConfig<f64>| {
        let mut branch = flat_branch();
        let mut pos = Vec2::new(75.0, 290.0 - (r - 0.5));
        let mut vel = Vec2::new(0.0, -100.0);
        resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, &config, &mut NoOpStepObserver);
        vel
    };

    // Default: every contact reflects, even when already moving away.
    let always = run(SimulationConfig::new());
    assert!((always.y - 27.0).abs() < 1e-4);

    let only_approaching = run(
        SimulationConfig::new().with_collision(CollisionConfig::new().with_reflect_separating(false)),
    );
    assert_eq!(only_approaching, Vec2::new(0.0, -100.0));
}

#[test]
fn no_contact_when_clear() {
    let config = SimulationConfig::<f64>::new();
    let r = radius(&config);
    let mut branch = flat_branch();
    let mut pos = Vec2::new(75.0, 290.0 - r - 1.0);
    let mut vel = Vec2::new(3.0, 4.0);
    let mut obs = RecordingObserver::new();

    let contacts = resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, &config, &mut obs);

    assert_eq!(contacts, 0);
    assert_eq!(obs.contacts, 0);
    assert_eq!(vel, Vec2::new(3.0, 4.0));
}

#[test]
fn observer_records_contact_depth() {
    let config = SimulationConfig::<f64>::new();
    let r = radius(&config);
    let mut branch = flat_branch();
    let mut pos = Vec2::new(75.0, 290.0 - (r - 3.0));
    let mut vel = Vec2::zero();
    let mut obs = RecordingObserver::new();

    resolve_branch_contacts(&mut pos, &mut vel, r, &mut branch, &config, &mut obs);

    assert_eq!(obs.contacts, 1);
    assert!((obs.deepest_overlap - 3.0).abs() < 1e-9);
}
