use std::collections::VecDeque;
use std::ops::Index;

use crate::geometry::Point;

use super::node::{NodeId, RRTNode};

pub const COST_TOLERANCE: f64 = 1e-6;

/// Arena of planning nodes. The root lives at index 0 and is never removed.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<RRTNode>,
}

impl Tree {
    pub fn new(root: Point) -> Self {
        Self {
            nodes: vec![RRTNode::root(root)],
        }
    }

    pub const ROOT: NodeId = 0;

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn nodes(&self) -> &[RRTNode] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&RRTNode> {
        self.nodes.get(id)
    }

    pub fn cost(&self, id: NodeId) -> f64 {
        self.nodes[id].cumulative_cost
    }

    pub fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[Self::ROOT].children.clear();
    }

    /// Nearest node by euclidean distance. Ties go to the earliest inserted node.
    pub fn nearest(&self, point: &Point) -> NodeId {
        let mut min_distance = f64::INFINITY;
        let mut min_index = Self::ROOT;
        for (i, n) in self.nodes.iter().enumerate() {
            let distance = n.point.distance(point);
            if distance < min_distance {
                min_distance = distance;
                min_index = i;
            }
        }
        min_index
    }

    pub fn near(&self, point: &Point, radius: f64) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.point.distance(point) <= radius)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn insert(&mut self, point: Point, parent: NodeId) -> NodeId {
        let cumulative_cost = self.nodes[parent].cumulative_cost + self.nodes[parent].point.distance(&point);
        let id = self.nodes.len();
        self.nodes.push(RRTNode {
            point,
            cumulative_cost,
            parent: Some(parent),
            children: vec![],
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.parent_chain(node).contains(&ancestor)
    }

    /// Move `node` below `new_parent` and push the cost change down its subtree.
    ///
    /// Returns false, leaving the tree untouched, if the move would create a cycle or targets the root.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> bool {
        if node == Self::ROOT || self.is_ancestor(node, new_parent) {
            return false;
        }
        if let Some(old_parent) = self.nodes[node].parent {
            self.nodes[old_parent].children.retain(|&c| c != node);
        }
        self.nodes[node].parent = Some(new_parent);
        self.nodes[new_parent].children.push(node);
        self.propagate_cost(node);
        true
    }

    fn propagate_cost(&mut self, node: NodeId) {
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            if let Some(parent) = self.nodes[current].parent {
                self.nodes[current].cumulative_cost = self.nodes[parent].cumulative_cost
                    + self.nodes[parent].point.distance(&self.nodes[current].point);
            }
            queue.extend(self.nodes[current].children.iter().copied());
        }
    }

    /// The walk is bounded by the tree size so a corrupted parent link can never loop forever.
    pub fn parent_chain(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.nodes[current].parent {
            if chain.len() > self.nodes.len() {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn extract_path(&self, node: NodeId) -> Vec<Point> {
        let mut chain = self.parent_chain(node);
        chain.reverse();
        chain.into_iter().map(|i| self.nodes[i].point).collect()
    }

    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut queue = VecDeque::from([node]);
        while let Some(current) = queue.pop_front() {
            out.push(current);
            queue.extend(self.nodes[current].children.iter().copied());
        }
        out
    }

    /// Remove every node matching `doomed` together with its descendants, then compact the arena.
    ///
    /// Returns a mapping from old to new indices (`None` for removed nodes). The root always survives.
    pub fn prune(&mut self, doomed: impl Fn(&RRTNode) -> bool) -> Vec<Option<NodeId>> {
        let mut removed = vec![false; self.nodes.len()];
        for i in 1..self.nodes.len() {
            if !removed[i] && doomed(&self.nodes[i]) {
                for d in self.subtree(i) {
                    removed[d] = true;
                }
            }
        }

        let mut remap = vec![None; self.nodes.len()];
        let mut next = 0;
        for (old, gone) in removed.iter().enumerate() {
            if !gone {
                remap[old] = Some(next);
                next += 1;
            }
        }

        let old_nodes = std::mem::take(&mut self.nodes);
        self.nodes = old_nodes
            .into_iter()
            .zip(removed)
            .filter(|(_, gone)| !gone)
            .map(|(mut node, _)| {
                // A surviving node's parent always survives, since removal takes whole subtrees
                node.parent = node.parent.and_then(|p| remap[p]);
                node.children = node.children.iter().filter_map(|&c| remap[c]).collect();
                node
            })
            .collect();
        remap
    }

    pub fn verify(&self) -> anyhow::Result<()> {
        if self.nodes[Self::ROOT].parent.is_some() {
            return Err(anyhow::anyhow!("Root has a parent"));
        }
        for (i, node) in self.nodes.iter().enumerate().skip(1) {
            let parent = node
                .parent
                .ok_or_else(|| anyhow::anyhow!("Node {i} has no parent"))?;
            let parent_node = self
                .nodes
                .get(parent)
                .ok_or_else(|| anyhow::anyhow!("Node {i} points at missing parent {parent}"))?;
            if !parent_node.children.contains(&i) {
                return Err(anyhow::anyhow!("Node {i} is not listed as a child of {parent}"));
            }
            let expected = parent_node.cumulative_cost + parent_node.point.distance(&node.point);
            if (expected - node.cumulative_cost).abs() > COST_TOLERANCE {
                return Err(anyhow::anyhow!(
                    "Node {i} has cost {} but its parent implies {expected}",
                    node.cumulative_cost
                ));
            }
            let chain = self.parent_chain(i);
            if chain.last() != Some(&Self::ROOT) || chain.len() > self.nodes.len() {
                return Err(anyhow::anyhow!("Node {i} does not reach the root"));
            }
        }
        Ok(())
    }
}

impl Index<NodeId> for Tree {
    type Output = Point;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index].point
    }
}
