use serde::{Deserialize, Serialize};

use crate::error::{Endpoint, PlannerError, Result};
use crate::geometry::{Bounds, Obstacle, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub start: Point,
    pub goal: Point,
    pub bounds: Bounds,
    #[serde(default)]
    pub static_obstacles: Vec<Obstacle>,
}

impl Scenario {
    pub fn new(start: Point, goal: Point, bounds: Bounds) -> Self {
        Self {
            start,
            goal,
            bounds,
            static_obstacles: vec![],
        }
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        self.static_obstacles.extend(obstacles);
        self
    }

    /// Check the problem is solvable in principle: a real workspace, well formed obstacles and
    /// both endpoints inside the workspace and clear of every static obstacle.
    pub fn validate(&self, clearance: f64) -> Result<()> {
        let Bounds { width, height } = self.bounds;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PlannerError::DegenerateWorkspace { width, height });
        }
        for (index, obstacle) in self.static_obstacles.iter().enumerate() {
            if !obstacle.is_well_formed() {
                return Err(PlannerError::MalformedObstacle {
                    index,
                    obstacle: *obstacle,
                });
            }
        }
        for (endpoint, point) in [(Endpoint::Start, self.start), (Endpoint::Goal, self.goal)] {
            if !self.bounds.contains(&point) {
                return Err(PlannerError::OutOfBounds { endpoint, point });
            }
            if let Some(index) = self
                .static_obstacles
                .iter()
                .position(|o| o.contains(&point, clearance))
            {
                return Err(PlannerError::InsideObstacle {
                    endpoint,
                    point,
                    index,
                });
            }
        }
        Ok(())
    }
}

const START: Point = Point::new(50.0, 550.0);
const GOAL: Point = Point::new(750.0, 50.0);
const WORKSPACE: Bounds = Bounds::new(800.0, 600.0);

pub fn map_one() -> Scenario {
    Scenario::new(START, GOAL, WORKSPACE).with_obstacles([
        Obstacle::rect(300.0, 200.0, 100.0, 100.0),
        Obstacle::rect(500.0, 400.0, 100.0, 100.0),
        Obstacle::rect(100.0, 300.0, 50.0, 50.0),
    ])
}

pub fn map_two() -> Scenario {
    Scenario::new(START, GOAL, WORKSPACE).with_obstacles([
        Obstacle::circle(600.0, 400.0, 100.0),
        Obstacle::rect(0.0, 200.0, 400.0, 50.0),
        Obstacle::rect(0.0, 400.0, 400.0, 50.0),
        Obstacle::rect(0.0, 100.0, 400.0, 50.0),
        Obstacle::circle(600.0, 100.0, 100.0),
    ])
}
