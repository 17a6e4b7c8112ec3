use canopy::{BranchSpec, Buttons, NoOpStepObserver, Rect, SimulationConfig, StaticPlatform, Vec2, World};
use canopy::Facing;

fn scripted_input(tick: usize) -> Buttons {
    match tick % 90 {
        0..=19 => Buttons::RIGHT,
        20..=29 => Buttons::RIGHT | Buttons::JUMP,
        30..=59 => Buttons::empty(),
        _ => Buttons::LEFT,
    }
}

fn run(ticks: usize) -> (Vec<Vec2<f32>>, Vec2<f32>) {
    let mut world = World::new(SimulationConfig::new(), Vec2::new(120.0, 150.0)).unwrap();
    world.add_branch(BranchSpec::new(Vec2::new(0.0, 300.0), 260.0, 8, 40.0, 10.0, -10.0)).unwrap();
    world.add_branch(BranchSpec::new(Vec2::new(600.0, 650.0), 240.0, 8, 40.0, 10.0, 190.0)).unwrap();
    let ledge = world.add_platform(StaticPlatform::new(Rect::new(150.0, 900.0, 200.0, 20.0)));
    world.add_platform(StaticPlatform::ground(600.0, 1190.0, 10.0));
    world.add_patroller(ledge, 40.0, Facing::Right).unwrap();

    for tick in 0..ticks {
        world.step(scripted_input(tick), 1.0 / 60.0, &mut NoOpStepObserver);
    }

    let nodes = world
        .branches()
        .iter()
        .flat_map(|b| b.nodes().iter().map(|n| n.pos))
        .collect();
    (nodes, world.player.position)
}

#[test]
fn identical_runs_are_bit_identical() {
    let (nodes_a, player_a) = run(600);
    let (nodes_b, player_b) = run(600);

    assert_eq!(player_a.x.to_bits(), player_b.x.to_bits());
    assert_eq!(player_a.y.to_bits(), player_b.y.to_bits());
    assert_eq!(nodes_a.len(), nodes_b.len());
    for (a, b) in nodes_a.iter().zip(&nodes_b) {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }
}

#[test]
fn simulation_stays_finite() {
    let (nodes, player) = run(1800);
    assert!(player.x.is_finite() && player.y.is_finite());
    assert!(nodes.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}
