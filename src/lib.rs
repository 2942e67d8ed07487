//! Sampling-based motion planning in a bounded 2D workspace.
//!
//! Three members of the RRT* family share one engine: plain RRT* against static obstacles,
//! RRT* that also reacts to obstacles appearing while it plans, and MOD-RRT*, which replaces
//! rewiring with a Pareto dominance filter over path cost and distance to the goal.
//!
//! ```no_run
//! use explorers_rrt::{Planner, PlannerConfig, StepResult, scenario};
//!
//! let mut planner = Planner::initialize(scenario::map_one(), PlannerConfig::default())?;
//! loop {
//!     if let StepResult::GoalReached(path) = planner.step() {
//!         println!("{} waypoints, cost {:.1}", path.waypoints.len(), path.cost);
//!         break;
//!     }
//! }
//! # Ok::<(), explorers_rrt::PlannerError>(())
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod path;
pub mod planner;
pub mod rrt;
pub mod scenario;

pub use config::{DynamicObstacleConfig, PlannerConfig, SizeRange, SmoothingConfig, Variant};
pub use error::{Endpoint, PlannerError};
pub use geometry::{Bounds, Obstacle, Point};
pub use planner::{NodeSummary, PlanStats, PlannedPath, Planner, StepResult, TreeSnapshot};
pub use scenario::Scenario;
