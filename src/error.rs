//! Error types for planner construction

use thiserror::Error;

use crate::geometry::{Obstacle, Point};

/// Which end of the planning problem an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Planner error type. Every variant is raised while validating a planning problem, so a
/// constructed planner is always in a valid state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("The workspace must have a positive, finite size, got {width}x{height}")]
    DegenerateWorkspace { width: f64, height: f64 },

    #[error("The {endpoint} point {point:?} lies outside the workspace")]
    OutOfBounds { endpoint: Endpoint, point: Point },

    #[error("The {endpoint} point {point:?} is within clearance of static obstacle {index}")]
    InsideObstacle {
        endpoint: Endpoint,
        point: Point,
        index: usize,
    },

    #[error("Static obstacle {index} is malformed: {obstacle:?}")]
    MalformedObstacle { index: usize, obstacle: Obstacle },
}

pub type Result<T> = std::result::Result<T, PlannerError>;
