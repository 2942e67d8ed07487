use tracing::{debug, trace};

use crate::geometry::{Bounds, ObstacleSet, Point};

use super::node::NodeId;
use super::pareto::{Objectives, is_dominated};
use super::sampler::Sampler;
use super::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Growth {
    /// Choose the cheapest parent in the neighbourhood, then rewire the neighbourhood through the new node.
    Rewire,
    /// Attach to the nearest node unless an existing node is both cheaper and closer to `goal`.
    ParetoFilter { goal: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub node: NodeId,
    pub rewired: Vec<NodeId>,
}

pub struct RRTStar {
    tree: Tree,
    bounds: Bounds,
    step_size: f64,
    clearance: f64,
    rewire_radius: f64,
    max_sample_attempts: usize,
}

impl RRTStar {
    pub fn new(
        from: Point,
        bounds: Bounds,
        step_size: f64,
        clearance: f64,
        rewire_radius: f64,
        max_sample_attempts: usize,
    ) -> Self {
        Self {
            tree: Tree::new(from),
            bounds,
            step_size,
            clearance,
            rewire_radius,
            max_sample_attempts,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Draw samples until one produces an acceptable node, at most `max_sample_attempts` times.
    pub fn extend(
        &mut self,
        sampler: &mut Sampler,
        obstacles: &ObstacleSet,
        growth: Growth,
    ) -> Option<Extension> {
        for attempt in 0..self.max_sample_attempts {
            let target = sampler.sample();
            let nearest_node_index = self.tree.nearest(&target);
            let nearest = self.tree[nearest_node_index];
            // The tree only ever grows by whole steps, never by jumping to the sample
            let Some(candidate) = nearest.steer_towards(&target, self.step_size) else {
                continue;
            };
            if !self.is_valid(&nearest, &candidate, obstacles) {
                continue;
            }
            let extension = match growth {
                Growth::Rewire => self.insert_and_rewire(nearest_node_index, candidate, obstacles),
                Growth::ParetoFilter { goal } => {
                    let objectives = Objectives {
                        cost: self.tree.cost(nearest_node_index) + nearest.distance(&candidate),
                        distance_to_goal: candidate.distance(&goal),
                    };
                    if is_dominated(&self.tree, &goal, &objectives) {
                        trace!(?candidate, "Candidate is dominated");
                        continue;
                    }
                    Extension {
                        node: self.tree.insert(candidate, nearest_node_index),
                        rewired: vec![],
                    }
                }
            };
            debug!(
                node = extension.node,
                attempts = attempt + 1,
                cost = self.tree.cost(extension.node),
                rewired = extension.rewired.len(),
                "Extended tree"
            );
            return Some(extension);
        }
        None
    }

    fn is_valid(&self, from: &Point, to: &Point, obstacles: &ObstacleSet) -> bool {
        self.bounds.contains(to)
            && obstacles.point_clear(to, self.clearance)
            && !obstacles.segment_blocked(from, to)
    }

    fn insert_and_rewire(
        &mut self,
        nearest: NodeId,
        candidate: Point,
        obstacles: &ObstacleSet,
    ) -> Extension {
        let neighborhood = self.tree.near(&candidate, self.rewire_radius);
        let parent = self.select_parent(nearest, &neighborhood, &candidate, obstacles);
        let new_index = self.tree.insert(candidate, parent);
        let rewired = self.rewire(new_index, parent, &neighborhood, obstacles);
        Extension {
            node: new_index,
            rewired,
        }
    }

    fn select_parent(
        &self,
        nearest: NodeId,
        neighborhood: &[NodeId],
        candidate: &Point,
        obstacles: &ObstacleSet,
    ) -> NodeId {
        let mut best_parent_index = nearest;
        let mut best_parent_cost = self.tree.cost(nearest) + self.tree[nearest].distance(candidate);
        for &neighbor in neighborhood {
            if neighbor == nearest {
                continue;
            }
            let candidate_cost = self.tree.cost(neighbor) + self.tree[neighbor].distance(candidate);
            if candidate_cost < best_parent_cost
                && !obstacles.segment_blocked(&self.tree[neighbor], candidate)
            {
                best_parent_cost = candidate_cost;
                best_parent_index = neighbor;
            }
        }
        best_parent_index
    }

    /// Re-parent neighbours whose cost strictly drops when routed through `new_node`.
    fn rewire(
        &mut self,
        new_node: NodeId,
        parent: NodeId,
        neighborhood: &[NodeId],
        obstacles: &ObstacleSet,
    ) -> Vec<NodeId> {
        let mut rewired = vec![];
        for &node in neighborhood {
            if node == parent {
                continue;
            }
            let updated_cost = self.tree.cost(new_node) + self.tree[new_node].distance(&self.tree[node]);
            if updated_cost >= self.tree.cost(node)
                || obstacles.segment_blocked(&self.tree[new_node], &self.tree[node])
            {
                continue;
            }
            // Refuses moves that would put a node below its own descendant
            if self.tree.reparent(node, new_node) {
                rewired.push(node);
            }
        }
        rewired
    }
}
