use crate::geometry::Point;

use super::tree::Tree;

/// The two objectives MOD-RRT* trades off. Lower is better for both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objectives {
    pub cost: f64,
    pub distance_to_goal: f64,
}

impl Objectives {
    /// `self` is at least as good as `other` on both objectives.
    pub fn dominates(&self, other: &Objectives) -> bool {
        self.cost <= other.cost && self.distance_to_goal <= other.distance_to_goal
    }
}

/// Is a candidate with `candidate` objectives dominated by any node already in the tree?
pub fn is_dominated(tree: &Tree, goal: &Point, candidate: &Objectives) -> bool {
    tree.nodes().iter().any(|node| {
        Objectives {
            cost: node.cumulative_cost,
            distance_to_goal: node.point.distance(goal),
        }
        .dominates(candidate)
    })
}
