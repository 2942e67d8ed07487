use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::geometry::{Obstacle, ObstacleSet, Point};
use crate::path::{path_length, post_process};
use crate::rrt::{Growth, NodeId, RRTStar, Reactor, Rejection, Sampler, Tree};
use crate::scenario::Scenario;

#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Grew {
        node: NodeSummary,
        rewired: Vec<NodeId>,
    },
    ObstacleAdded(Obstacle),
    ObstacleRejected,
    GoalReached(PlannedPath),
    /// The goal path was compromised and the tree was reset to its root
    Replanning,
    /// No acceptable candidate within the attempt limit
    NoProgress,
    /// Growth is held until the dynamic obstacle set is complete
    AwaitingObstacles,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub point: Point,
    pub cost: f64,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedPath {
    pub waypoints: Vec<Point>,
    /// `waypoints` after simplification, interpolation and smoothing
    pub smoothed: Vec<Point>,
    pub cost: f64,
    pub tree_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub nodes: Vec<NodeSummary>,
}

impl TreeSnapshot {
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.nodes
            .iter()
            .filter_map(|n| n.parent.map(|p| (self.nodes[p].point, n.point)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub steps: usize,
    /// Nodes accepted into the tree, including ones later pruned or reset away
    pub nodes_explored: usize,
    pub rewires: usize,
    pub nodes_pruned: usize,
    pub resets: usize,
    pub obstacles_added: usize,
    pub obstacles_rejected: usize,
    pub no_progress: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingGoal {
    Node(NodeId),
    /// The goal-adjacent node was pruned by a new obstacle
    Pruned,
}

pub struct Planner {
    scenario: Scenario,
    config: PlannerConfig,
    rrt: RRTStar,
    sampler: Sampler,
    obstacles: ObstacleSet,
    reactor: Reactor,
    pending_goal: Option<PendingGoal>,
    solution: Option<PlannedPath>,
    stats: PlanStats,
}

impl Planner {
    pub fn initialize(scenario: Scenario, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        scenario.validate(config.clearance)?;
        let sampler = Sampler::new(&scenario.bounds, config.seed)
            .map_err(|e| PlannerError::Config(e.to_string()))?;
        let rrt = RRTStar::new(
            scenario.start,
            scenario.bounds,
            config.step_size,
            config.clearance,
            config.rewire_radius,
            config.max_sample_attempts,
        );
        let reactor = Reactor::new(
            config.dynamic.clone(),
            config.clearance,
            scenario.start,
            scenario.goal,
        );
        let obstacles = ObstacleSet::new(scenario.static_obstacles.clone());
        info!(
            variant = ?config.variant,
            start = ?scenario.start,
            goal = ?scenario.goal,
            static_obstacles = obstacles.static_obstacles().len(),
            "Planner initialized"
        );
        Ok(Self {
            scenario,
            config,
            rrt,
            sampler,
            obstacles,
            reactor,
            pending_goal: None,
            solution: None,
            stats: PlanStats::default(),
        })
    }

    pub fn step(&mut self) -> StepResult {
        self.stats.steps += 1;
        if let Some(solution) = &self.solution {
            return StepResult::GoalReached(solution.clone());
        }
        if let Some(pending) = self.pending_goal.take() {
            return self.connect_goal(pending);
        }

        if self.config.variant.spawns_obstacles() && self.reactor.has_capacity(&self.obstacles) {
            if let Some(obstacle) = self
                .reactor
                .maybe_propose(self.sampler.rng(), &self.scenario.bounds)
            {
                return match self.admit(obstacle) {
                    Ok(()) => StepResult::ObstacleAdded(obstacle),
                    Err(_) => {
                        self.stats.obstacles_rejected += 1;
                        StepResult::ObstacleRejected
                    }
                };
            }
            if self.reactor.holds_growth(&self.obstacles) {
                return StepResult::AwaitingObstacles;
            }
        }

        let growth = if self.config.variant.rewires() {
            Growth::Rewire
        } else {
            Growth::ParetoFilter {
                goal: self.scenario.goal,
            }
        };
        let Some(extension) = self.rrt.extend(&mut self.sampler, &self.obstacles, growth) else {
            warn!(
                attempts = self.config.max_sample_attempts,
                "No valid candidate found"
            );
            self.stats.no_progress += 1;
            return StepResult::NoProgress;
        };
        self.stats.nodes_explored += 1;
        self.stats.rewires += extension.rewired.len();

        let point = self.rrt.tree()[extension.node];
        if self.reaches_goal(&point) {
            debug!(node = extension.node, "Goal connection pending");
            self.pending_goal = Some(PendingGoal::Node(extension.node));
        }
        StepResult::Grew {
            node: self.summary(extension.node),
            rewired: extension.rewired,
        }
    }

    /// Admit an externally supplied dynamic obstacle. Returns false if it was rejected.
    pub fn try_add_dynamic_obstacle(&mut self, obstacle: Obstacle) -> bool {
        match self.admit(obstacle) {
            Ok(()) => true,
            Err(rejection) => {
                debug!(?obstacle, %rejection, "Obstacle rejected");
                false
            }
        }
    }

    fn admit(&mut self, obstacle: Obstacle) -> std::result::Result<(), Rejection> {
        self.reactor.admit(&mut self.obstacles, obstacle)?;
        self.stats.obstacles_added += 1;

        let before = self.rrt.len();
        let remap = self.reactor.prune(self.rrt.tree_mut(), &obstacle);
        self.stats.nodes_pruned += before - self.rrt.len();
        if let Some(PendingGoal::Node(node)) = self.pending_goal {
            self.pending_goal = Some(match remap[node] {
                Some(moved) => PendingGoal::Node(moved),
                None => PendingGoal::Pruned,
            });
        }

        // A finished route the new obstacle cuts through has to be planned again
        let compromised = self.solution.as_ref().is_some_and(|solution| {
            solution
                .waypoints
                .windows(2)
                .any(|w| obstacle.intersects_segment(&w[0], &w[1]))
        });
        if compromised {
            info!("New obstacle blocks the finished path");
            self.solution = None;
            self.replan();
        }
        Ok(())
    }

    /// Validate the route to a goal-adjacent node against the dynamic obstacles and either
    /// finalize it or start over.
    fn connect_goal(&mut self, pending: PendingGoal) -> StepResult {
        let PendingGoal::Node(node) = pending else {
            info!("Goal node was pruned, replanning");
            self.replan();
            return StepResult::Replanning;
        };
        let mut waypoints = self.rrt.tree().extract_path(node);
        waypoints.push(self.scenario.goal);
        let blocked = waypoints
            .windows(2)
            .any(|w| self.obstacles.segment_blocked_by_dynamic(&w[0], &w[1]));
        if blocked {
            info!("Goal path crosses a dynamic obstacle, replanning");
            self.replan();
            return StepResult::Replanning;
        }

        let cost = self.rrt.tree().cost(node)
            + self.rrt.tree()[node].distance(&self.scenario.goal);
        let smoothed = post_process(
            &waypoints,
            &self.obstacles.to_vec(),
            &self.config.smoothing,
        );
        let solution = PlannedPath {
            tree_nodes: waypoints.len() - 1,
            waypoints,
            smoothed,
            cost,
        };
        info!(
            cost = solution.cost,
            length = path_length(&solution.waypoints),
            path_nodes = solution.tree_nodes,
            nodes_explored = self.stats.nodes_explored,
            "Goal reached"
        );
        self.solution = Some(solution.clone());
        StepResult::GoalReached(solution)
    }

    fn replan(&mut self) {
        self.rrt.tree_mut().reset();
        self.pending_goal = None;
        self.stats.resets += 1;
    }

    /// Close enough to finish with one clear straight edge.
    fn reaches_goal(&self, point: &Point) -> bool {
        point.distance(&self.scenario.goal) < self.config.step_size
            && !self.obstacles.segment_blocked(point, &self.scenario.goal)
    }

    fn summary(&self, id: NodeId) -> NodeSummary {
        let node = &self.rrt.tree().nodes()[id];
        NodeSummary {
            id,
            point: node.point,
            cost: node.cumulative_cost,
            parent: node.parent,
        }
    }

    pub fn tree_snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            nodes: (0..self.rrt.len()).map(|id| self.summary(id)).collect(),
        }
    }

    /// The finalized route if there is one, otherwise the route to a goal connection still
    /// awaiting validation.
    pub fn extract_path(&self) -> Option<Vec<Point>> {
        if let Some(solution) = &self.solution {
            return Some(solution.waypoints.clone());
        }
        let Some(PendingGoal::Node(node)) = self.pending_goal else {
            return None;
        };
        let mut path = self.rrt.tree().extract_path(node);
        path.push(self.scenario.goal);
        Some(path)
    }

    pub fn tree(&self) -> &Tree {
        self.rrt.tree()
    }

    pub fn solution(&self) -> Option<&PlannedPath> {
        self.solution.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.solution.is_some()
    }

    /// A goal connection is waiting to be validated by the next step.
    pub fn goal_pending(&self) -> bool {
        self.pending_goal.is_some()
    }

    pub fn stats(&self) -> &PlanStats {
        &self.stats
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn static_obstacles(&self) -> &[Obstacle] {
        self.obstacles.static_obstacles()
    }

    pub fn dynamic_obstacles(&self) -> &[Obstacle] {
        self.obstacles.dynamic_obstacles()
    }
}
