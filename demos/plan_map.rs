//! Plans across one of the preset maps and reports what it took.
//!
//! ```text
//! cargo run --example plan_map -- [map_one|map_two] [rrt_star|dynamic_rrt_star|mod_rrt_star] [config.toml]
//! ```
//!
//! Set `RUST_LOG=explorers_rrt=debug` to watch the tree grow.
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, bail};
use explorers_rrt::{Planner, PlannerConfig, StepResult, Variant, scenario};
use tracing::{info, warn};

const MAX_STEPS: usize = 100_000;

fn parse_variant(name: &str) -> anyhow::Result<Variant> {
    Ok(match name {
        "rrt_star" => Variant::RrtStar,
        "dynamic_rrt_star" => Variant::DynamicRrtStar,
        "mod_rrt_star" => Variant::ModRrtStar,
        other => bail!("Unknown variant {other:?}"),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("explorers_rrt=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let scenario = match args.get(1).map(String::as_str).unwrap_or("map_one") {
        "map_one" => scenario::map_one(),
        "map_two" => scenario::map_two(),
        other => bail!("Unknown map {other:?}, expected map_one or map_two"),
    };
    let mut config = match args.get(3) {
        Some(path) => {
            info!("Loading configuration from {path}");
            PlannerConfig::load(Path::new(path))?
        }
        None => PlannerConfig::default(),
    };
    if let Some(name) = args.get(2) {
        config.variant = parse_variant(name)?;
    }

    let started = Instant::now();
    let mut planner =
        Planner::initialize(scenario, config).context("Could not set up the planner")?;
    let mut solution = None;
    for _ in 0..MAX_STEPS {
        match planner.step() {
            StepResult::GoalReached(path) => {
                solution = Some(path);
                break;
            }
            StepResult::ObstacleAdded(obstacle) => info!(?obstacle, "New obstacle"),
            StepResult::Replanning => warn!("Replanning from the start"),
            _ => {}
        }
    }
    let elapsed = started.elapsed();

    let stats = planner.stats();
    println!("Execution time: {:.3} s", elapsed.as_secs_f64());
    println!("Nodes explored: {}", stats.nodes_explored);
    println!("Dynamic obstacles: {}", planner.dynamic_obstacles().len());
    match solution {
        Some(path) => {
            println!("Path nodes: {}", path.tree_nodes);
            println!("Path cost: {:.2}", path.cost);
            println!("Smoothed waypoints: {}", path.smoothed.len());
        }
        None => println!("No path found after {MAX_STEPS} steps"),
    }
    Ok(())
}
