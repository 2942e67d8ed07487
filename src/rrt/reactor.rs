use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DynamicObstacleConfig;
use crate::geometry::{Bounds, Obstacle, ObstacleSet, Point};

use super::node::NodeId;
use super::tree::Tree;

/// Why a dynamic obstacle was not admitted. None of these are fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("the dynamic obstacle limit has been reached")]
    AtCapacity,
    #[error("the obstacle has non-positive or non-finite extents")]
    Malformed,
    #[error("the obstacle overlaps an existing obstacle")]
    Overlap,
    #[error("the obstacle covers the start or the goal")]
    CoversEndpoint,
}

#[derive(Debug, Clone)]
pub struct Reactor {
    config: DynamicObstacleConfig,
    clearance: f64,
    protected: [Point; 2],
}

impl Reactor {
    pub fn new(config: DynamicObstacleConfig, clearance: f64, start: Point, goal: Point) -> Self {
        Self {
            config,
            clearance,
            protected: [start, goal],
        }
    }

    pub fn has_capacity(&self, obstacles: &ObstacleSet) -> bool {
        obstacles.dynamic_obstacles().len() < self.config.max_count
    }

    pub fn holds_growth(&self, obstacles: &ObstacleSet) -> bool {
        self.config.spawn_before_growth && self.has_capacity(obstacles)
    }

    /// With the configured probability, propose a random obstacle inside the workspace interior.
    pub fn maybe_propose<R: Rng + ?Sized>(&self, rng: &mut R, bounds: &Bounds) -> Option<Obstacle> {
        if !rng.random_bool(self.config.spawn_probability) {
            return None;
        }
        Some(propose_obstacle(rng, bounds, &self.config))
    }

    pub fn admit(&self, obstacles: &mut ObstacleSet, obstacle: Obstacle) -> Result<(), Rejection> {
        if !self.has_capacity(obstacles) {
            return Err(Rejection::AtCapacity);
        }
        if !obstacle.is_well_formed() {
            return Err(Rejection::Malformed);
        }
        if obstacles.overlaps_any(&obstacle) {
            debug!(?obstacle, "Discarding overlapping obstacle");
            return Err(Rejection::Overlap);
        }
        if self
            .protected
            .iter()
            .any(|p| obstacle.contains(p, self.clearance))
        {
            debug!(?obstacle, "Discarding obstacle over an endpoint");
            return Err(Rejection::CoversEndpoint);
        }
        obstacles.push_dynamic(obstacle);
        info!(
            ?obstacle,
            count = obstacles.dynamic_obstacles().len(),
            "Admitted dynamic obstacle"
        );
        Ok(())
    }

    pub fn prune(&self, tree: &mut Tree, obstacle: &Obstacle) -> Vec<Option<NodeId>> {
        let before = tree.len();
        let remap = tree.prune(|node| obstacle.contains(&node.point, self.clearance));
        if tree.len() < before {
            info!(removed = before - tree.len(), remaining = tree.len(), "Pruned tree");
        }
        remap
    }
}

/// A circle or a rectangle, equally likely, placed `interior_margin` away from the walls.
pub fn propose_obstacle<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    config: &DynamicObstacleConfig,
) -> Obstacle {
    let (x_lo, x_hi) = interior(bounds.width, config.interior_margin);
    let (y_lo, y_hi) = interior(bounds.height, config.interior_margin);
    let x = rng.random_range(x_lo..=x_hi);
    let y = rng.random_range(y_lo..=y_hi);
    if rng.random_bool(0.5) {
        let r = rng.random_range(config.circle_radius.min..=config.circle_radius.max);
        Obstacle::circle(x, y, r)
    } else {
        let side = config.rect_side;
        Obstacle::rect(
            x,
            y,
            rng.random_range(side.min..=side.max),
            rng.random_range(side.min..=side.max),
        )
    }
}

fn interior(extent: f64, margin: f64) -> (f64, f64) {
    let lo = margin.min(extent / 2.0);
    (lo, (extent - margin).max(lo))
}
