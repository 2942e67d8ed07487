use serde::Serialize;

use crate::geometry::Point;

/// Index of a node in the tree arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RRTNode {
    pub point: Point,
    /// Path length from the root
    pub cumulative_cost: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl RRTNode {
    pub fn root(point: Point) -> Self {
        Self {
            point,
            cumulative_cost: 0.0,
            parent: None,
            children: vec![],
        }
    }
}
