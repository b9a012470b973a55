//! Append-only planning tree.
//!
//! Nodes are stored in insertion order; a node's id is its index and is
//! never reused. Every node except the root points at a strictly earlier
//! parent, so the store is always a valid tree rooted at node 0. Nodes are
//! immutable once appended.

use crate::core::WorldPoint;
use crate::error::{MargaError, Result};

/// A vertex in the planning tree.
///
/// All costs use the squared-distance metric, computed once at insertion.
#[derive(Clone, Copy, Debug)]
pub struct PlanNode {
    /// Position in the plane
    pub position: WorldPoint,
    /// Index of this node in the graph
    pub id: usize,
    /// Index of the parent node; `None` only for the root
    pub parent: Option<usize>,
    /// Accumulated cost from the root. Carried for cost-based rewiring;
    /// the active control flow does not consume it.
    pub cost_from_start: f32,
    /// Cost of the single edge to the parent
    pub cost_parent_edge: f32,
    /// Squared distance from this node to the goal, fixed at insertion
    pub cost_to_goal: f32,
}

/// Append-only collection of [`PlanNode`]s, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct PlanGraph {
    nodes: Vec<PlanNode>,
}

impl PlanGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create node 0 at the start position.
    ///
    /// Fails if the graph already has a root.
    pub fn insert_root(&mut self, position: WorldPoint, goal: WorldPoint) -> Result<&PlanNode> {
        if !self.nodes.is_empty() {
            return Err(MargaError::Plan(
                "planning tree already has a root".to_string(),
            ));
        }
        self.nodes.push(PlanNode {
            position,
            id: 0,
            parent: None,
            cost_from_start: 0.0,
            cost_parent_edge: 0.0,
            cost_to_goal: position.distance_squared(&goal),
        });
        Ok(&self.nodes[0])
    }

    /// Append a node at `position` with the given parent.
    ///
    /// Returns the new node's id. `parent_id` must reference an existing
    /// node; violating that is a programming error and panics.
    pub fn append(&mut self, position: WorldPoint, parent_id: usize, goal: WorldPoint) -> usize {
        assert!(
            parent_id < self.nodes.len(),
            "parent id {} out of range (graph has {} nodes)",
            parent_id,
            self.nodes.len()
        );
        let parent = &self.nodes[parent_id];
        let edge_cost = position.distance_squared(&parent.position);
        let id = self.nodes.len();
        self.nodes.push(PlanNode {
            position,
            id,
            parent: Some(parent_id),
            cost_from_start: parent.cost_from_start + edge_cost,
            cost_parent_edge: edge_cost,
            cost_to_goal: position.distance_squared(&goal),
        });
        id
    }

    /// Id of the node nearest to `position` by squared distance.
    ///
    /// Linear scan; ties break to the lowest id. `None` only on an empty
    /// graph, which cannot happen after root insertion.
    pub fn nearest(&self, position: WorldPoint) -> Option<usize> {
        let mut best_cost = f32::INFINITY;
        let mut best_id = None;
        for node in &self.nodes {
            let cost = node.position.distance_squared(&position);
            if cost < best_cost {
                best_cost = cost;
                best_id = Some(node.id);
            }
        }
        best_id
    }

    /// Read a node by id. Panics on an out-of-range id, which is a
    /// contract violation since ids are produced only by this graph.
    pub fn node(&self, id: usize) -> &PlanNode {
        &self.nodes[id]
    }

    /// Id of the most recently appended node.
    pub fn frontier(&self) -> Option<usize> {
        self.nodes.last().map(|n| n.id)
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PlanNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_root() -> PlanGraph {
        let mut graph = PlanGraph::new();
        graph
            .insert_root(WorldPoint::ZERO, WorldPoint::new(10.0, 0.0))
            .unwrap();
        graph
    }

    #[test]
    fn test_root_invariants() {
        let graph = graph_with_root();
        let root = graph.node(0);
        assert_eq!(root.id, 0);
        assert_eq!(root.parent, None);
        assert_eq!(root.cost_from_start, 0.0);
        assert!((root.cost_to_goal - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_double_root_rejected() {
        let mut graph = graph_with_root();
        assert!(
            graph
                .insert_root(WorldPoint::ZERO, WorldPoint::new(10.0, 0.0))
                .is_err()
        );
    }

    #[test]
    fn test_append_costs() {
        let mut graph = graph_with_root();
        let goal = WorldPoint::new(10.0, 0.0);
        let id = graph.append(WorldPoint::new(3.0, 4.0), 0, goal);
        assert_eq!(id, 1);

        let node = graph.node(1);
        assert_eq!(node.parent, Some(0));
        assert!((node.cost_parent_edge - 25.0).abs() < 1e-4);
        assert!((node.cost_from_start - 25.0).abs() < 1e-4);
        assert!((node.cost_to_goal - 65.0).abs() < 1e-4);
    }

    #[test]
    fn test_parents_always_strictly_earlier() {
        let mut graph = graph_with_root();
        let goal = WorldPoint::new(10.0, 0.0);
        for i in 0..20 {
            let position = WorldPoint::new(i as f32 * 0.3, (i % 5) as f32 * 0.2);
            let parent = graph.nearest(position).unwrap();
            graph.append(position, parent, goal);
        }
        for node in graph.iter().skip(1) {
            assert!(node.parent.unwrap() < node.id);
        }
    }

    #[test]
    fn test_nearest_picks_closest() {
        let mut graph = PlanGraph::new();
        let goal = WorldPoint::new(10.0, 10.0);
        graph.insert_root(WorldPoint::new(0.0, 0.0), goal).unwrap();
        graph.append(WorldPoint::new(1.0, 0.0), 0, goal);
        graph.append(WorldPoint::new(5.0, 5.0), 0, goal);

        assert_eq!(graph.nearest(WorldPoint::new(0.9, 0.0)), Some(1));
    }

    #[test]
    fn test_nearest_tie_breaks_to_lowest_id() {
        let mut graph = PlanGraph::new();
        let goal = WorldPoint::new(10.0, 0.0);
        graph.insert_root(WorldPoint::new(0.0, 1.0), goal).unwrap();
        graph.append(WorldPoint::new(0.0, -1.0), 0, goal);

        // Query equidistant from both nodes
        assert_eq!(graph.nearest(WorldPoint::ZERO), Some(0));
    }

    #[test]
    fn test_nearest_on_empty_graph() {
        let graph = PlanGraph::new();
        assert_eq!(graph.nearest(WorldPoint::ZERO), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_append_with_bad_parent_panics() {
        let mut graph = graph_with_root();
        graph.append(WorldPoint::new(1.0, 1.0), 7, WorldPoint::new(10.0, 0.0));
    }
}
