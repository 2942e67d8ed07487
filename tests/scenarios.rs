use explorers_rrt::path::{path_length, simplify};
use explorers_rrt::{
    Bounds, Obstacle, PlannedPath, Planner, PlannerConfig, Point, Scenario, StepResult, Variant,
    scenario,
};
use rstest::rstest;

fn quiet_config(variant: Variant, seed: u64) -> PlannerConfig {
    let mut config = PlannerConfig {
        variant,
        seed: Some(seed),
        ..Default::default()
    };
    config.dynamic.spawn_probability = 0.0;
    config
}

fn run_until_goal(planner: &mut Planner, max_steps: usize) -> Option<PlannedPath> {
    (0..max_steps).find_map(|_| match planner.step() {
        StepResult::GoalReached(path) => Some(path),
        _ => None,
    })
}

fn assert_clear(path: &[Point], obstacles: &[Obstacle]) {
    for w in path.windows(2) {
        for obstacle in obstacles {
            assert!(
                !obstacle.intersects_segment(&w[0], &w[1]),
                "{:?} -> {:?} crosses {obstacle:?}",
                w[0],
                w[1]
            );
        }
    }
}

#[rstest]
#[case::rrt_star(Variant::RrtStar)]
#[case::dynamic(Variant::DynamicRrtStar)]
#[case::mod_rrt_star(Variant::ModRrtStar)]
fn open_workspace_reaches_goal(#[case] variant: Variant) {
    let scenario = Scenario::new(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Bounds::new(200.0, 200.0),
    );
    let mut planner =
        Planner::initialize(scenario, quiet_config(variant, 42)).expect("Valid problem");
    let path = run_until_goal(&mut planner, 20_000).expect("Reaches the goal");

    let last_tree_point = path.waypoints[path.waypoints.len() - 2];
    assert!(last_tree_point.distance(&Point::new(100.0, 0.0)) < 20.0);
    assert!(path.cost >= 100.0 - 1e-9);
    assert!(path.cost < 300.0, "Cost {} is far from the straight line", path.cost);
    assert!((path.cost - path_length(&path.waypoints)).abs() < 1e-6);
}

#[rstest]
#[case::rrt_star(Variant::RrtStar, 1)]
#[case::dynamic(Variant::DynamicRrtStar, 2)]
#[case::mod_rrt_star(Variant::ModRrtStar, 3)]
fn block_on_the_straight_line_forces_a_detour(#[case] variant: Variant, #[case] seed: u64) {
    let block = Obstacle::rect(80.0, 80.0, 40.0, 40.0);
    let scenario = Scenario::new(
        Point::new(0.0, 100.0),
        Point::new(200.0, 100.0),
        Bounds::new(200.0, 200.0),
    )
    .with_obstacles([block]);
    let mut planner =
        Planner::initialize(scenario, quiet_config(variant, seed)).expect("Valid problem");
    let path = run_until_goal(&mut planner, 50_000).expect("Reaches the goal");

    assert!(path.cost > 200.0);
    assert_clear(&path.waypoints, &[block]);
    assert_clear(&simplify(&path.waypoints, &[block]), &[block]);
}

#[test]
fn obstacle_on_pending_route_forces_replanning() {
    let start = Point::new(20.0, 100.0);
    let goal = Point::new(380.0, 100.0);
    let scenario = Scenario::new(start, goal, Bounds::new(400.0, 200.0));
    let mut planner = Planner::initialize(scenario, quiet_config(Variant::DynamicRrtStar, 7))
        .expect("Valid problem");

    let mut steps = 0;
    while !planner.goal_pending() {
        planner.step();
        steps += 1;
        assert!(steps < 20_000, "Never got near the goal");
    }
    let route = planner.extract_path().expect("Pending route");
    let blocker = route[1..route.len() - 1]
        .iter()
        .find(|p| p.distance(&start) > 60.0 && p.distance(&goal) > 60.0)
        .map(|p| Obstacle::circle(p.x, p.y, 5.0))
        .expect("Route has a waypoint away from both ends");
    assert!(planner.try_add_dynamic_obstacle(blocker));

    assert_eq!(planner.step(), StepResult::Replanning);
    assert_eq!(planner.tree().len(), 1);
    assert_eq!(planner.extract_path(), None);
    assert_eq!(planner.stats().resets, 1);

    let path = run_until_goal(&mut planner, 20_000).expect("Replans around the blocker");
    assert_clear(&path.waypoints, &[blocker]);
}

#[test]
fn obstacle_across_pending_edge_forces_replanning() {
    let start = Point::new(20.0, 100.0);
    let goal = Point::new(380.0, 100.0);
    let scenario = Scenario::new(start, goal, Bounds::new(400.0, 200.0));
    // Without clearance a small obstacle between two nodes leaves both in the tree
    let config = PlannerConfig {
        clearance: 0.0,
        ..quiet_config(Variant::DynamicRrtStar, 11)
    };
    let mut planner = Planner::initialize(scenario, config).expect("Valid problem");

    let mut steps = 0;
    while !planner.goal_pending() {
        planner.step();
        steps += 1;
        assert!(steps < 20_000, "Never got near the goal");
    }
    let route = planner.extract_path().expect("Pending route");
    let blocker = route[..route.len() - 1]
        .windows(2)
        .map(|w| w[0].lerp(&w[1], 0.5))
        .find(|mid| mid.distance(&start) > 5.0 && mid.distance(&goal) > 5.0)
        .map(|mid| Obstacle::circle(mid.x, mid.y, 0.5))
        .expect("Route has an edge away from both ends");
    assert!(planner.try_add_dynamic_obstacle(blocker));
    assert!(planner.goal_pending());

    assert_eq!(planner.step(), StepResult::Replanning);
    assert_eq!(planner.tree().len(), 1);
    assert!(!planner.goal_pending());
}

#[test]
fn obstacle_on_finished_route_discards_it() {
    let start = Point::new(20.0, 100.0);
    let goal = Point::new(380.0, 100.0);
    let scenario = Scenario::new(start, goal, Bounds::new(400.0, 200.0));
    let mut planner = Planner::initialize(scenario, quiet_config(Variant::ModRrtStar, 8))
        .expect("Valid problem");
    let path = run_until_goal(&mut planner, 20_000).expect("Reaches the goal");

    let middle = path.waypoints[path.waypoints.len() / 2];
    assert!(middle.distance(&start) > 25.0 && middle.distance(&goal) > 25.0);
    assert!(planner.try_add_dynamic_obstacle(Obstacle::circle(middle.x, middle.y, 3.0)));
    assert!(!planner.is_finished());
    assert_eq!(planner.tree().len(), 1);
    assert!(!matches!(planner.step(), StepResult::GoalReached(_)));
}

#[rstest]
#[case::map_one_dynamic(scenario::map_one(), Variant::DynamicRrtStar)]
#[case::map_two_dynamic(scenario::map_two(), Variant::DynamicRrtStar)]
#[case::map_one_mod(scenario::map_one(), Variant::ModRrtStar)]
#[case::map_two_mod(scenario::map_two(), Variant::ModRrtStar)]
fn tree_invariants_hold_while_obstacles_appear(#[case] problem: Scenario, #[case] variant: Variant) {
    let bounds = problem.bounds;
    let config = PlannerConfig {
        variant,
        seed: Some(99),
        ..Default::default()
    };
    let clearance = config.clearance;
    let mut planner = Planner::initialize(problem, config).expect("Valid problem");

    for _ in 0..3_000 {
        if let StepResult::GoalReached(path) = planner.step() {
            let obstacles: Vec<Obstacle> = planner
                .static_obstacles()
                .iter()
                .chain(planner.dynamic_obstacles())
                .copied()
                .collect();
            assert_clear(&path.waypoints, &obstacles);
            assert!(path.waypoints.len() <= planner.tree().len() + 1);
            break;
        }
        let tree = planner.tree();
        tree.verify().expect("Tree is consistent");
        for node in tree.nodes() {
            assert!(bounds.contains(&node.point));
            for obstacle in planner.static_obstacles().iter().chain(planner.dynamic_obstacles()) {
                assert!(!obstacle.contains(&node.point, clearance));
            }
        }
    }

    let dynamic = planner.dynamic_obstacles();
    assert!(dynamic.len() <= 5);
    for (i, a) in dynamic.iter().enumerate() {
        assert!(planner.static_obstacles().iter().all(|s| !a.overlaps(s)));
        assert!(dynamic[i + 1..].iter().all(|b| !a.overlaps(b)));
    }
}

#[test]
fn same_seed_same_plan() {
    let run = || {
        let mut planner = Planner::initialize(
            scenario::map_one(),
            PlannerConfig {
                variant: Variant::DynamicRrtStar,
                seed: Some(5),
                ..Default::default()
            },
        )
        .expect("Valid problem");
        for _ in 0..500 {
            planner.step();
        }
        planner.tree_snapshot()
    };
    assert_eq!(run(), run());
}
