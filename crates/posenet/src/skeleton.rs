use std::collections::VecDeque;

use crate::{
    error::PoseError,
    keypoints::{NUM_KEYPOINTS, POSE_CHAIN},
};

/// Directed skeleton edge. `id` is the displacement map channel of the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub id: usize,
    pub parent: usize,
    pub child: usize,
}

/// Which displacement map moves along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// parent to child, read from the forward displacement map
    Forward,
    /// child to parent, read from the backward displacement map
    Backward,
}

/// One hop of a traversal: reach `target` from the already placed `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub edge: usize,
    pub source: usize,
    pub target: usize,
    pub direction: Direction,
}

/// Tree over `num_parts` keypoints. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonGraph {
    num_parts: usize,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, Direction)>>,
}

impl SkeletonGraph {
    /// Build a graph from `(parent, child)` pairs; pair `i` becomes edge `i`.
    ///
    /// Rejects graphs that are not a spanning tree over `num_parts` parts.
    pub fn new(num_parts: usize, pairs: &[(usize, usize)]) -> Result<Self, PoseError> {
        if num_parts == 0 {
            return Err(PoseError::InvalidSkeleton("skeleton has no parts".to_string()));
        }
        if pairs.len() != num_parts - 1 {
            return Err(PoseError::InvalidSkeleton(format!(
                "a tree over {} parts needs {} edges, got {}",
                num_parts,
                num_parts - 1,
                pairs.len()
            )));
        }

        let mut edges = Vec::with_capacity(pairs.len());
        let mut adjacency = vec![Vec::new(); num_parts];
        for (id, &(parent, child)) in pairs.iter().enumerate() {
            if parent >= num_parts || child >= num_parts || parent == child {
                return Err(PoseError::InvalidSkeleton(format!(
                    "edge {} ({} -> {}) is out of range or a self loop",
                    id, parent, child
                )));
            }
            edges.push(Edge { id, parent, child });
            adjacency[parent].push((id, Direction::Forward));
            adjacency[child].push((id, Direction::Backward));
        }

        let graph = Self {
            num_parts,
            edges,
            adjacency,
        };

        // n - 1 edges plus connectivity implies acyclic
        let reached = graph.traverse_from(0).len() + 1;
        if reached != num_parts {
            return Err(PoseError::InvalidSkeleton(format!(
                "skeleton is disconnected: {} of {} parts reachable",
                reached, num_parts
            )));
        }

        Ok(graph)
    }

    /// The 17 part PoseNet pose chain.
    pub fn posenet() -> Self {
        let pairs: Vec<(usize, usize)> = POSE_CHAIN
            .iter()
            .map(|&(parent, child)| (usize::from(parent), usize::from(child)))
            .collect();
        match Self::new(NUM_KEYPOINTS, &pairs) {
            Ok(graph) => graph,
            Err(err) => unreachable!("built-in pose chain is a tree: {err}"),
        }
    }

    pub fn num_parts(&self) -> usize {
        self.num_parts
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Breadth-first hops from `root` that reach every other part exactly once.
    ///
    /// Neighbours are expanded in edge id order, so the order is deterministic.
    pub fn traverse_from(&self, root: usize) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.num_parts.saturating_sub(1));
        if root >= self.num_parts {
            return steps;
        }

        let mut visited = vec![false; self.num_parts];
        let mut queue = VecDeque::new();
        visited[root] = true;
        queue.push_back(root);

        while let Some(source) = queue.pop_front() {
            for &(edge_id, direction) in &self.adjacency[source] {
                let edge = self.edges[edge_id];
                let target = match direction {
                    Direction::Forward => edge.child,
                    Direction::Backward => edge.parent,
                };
                if visited[target] {
                    continue;
                }
                visited[target] = true;
                steps.push(Step {
                    edge: edge_id,
                    source,
                    target,
                    direction,
                });
                queue.push_back(target);
            }
        }

        steps
    }
}
