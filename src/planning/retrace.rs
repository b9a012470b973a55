//! Goal-proximity path extraction.
//!
//! A single scan over the tree finds a node inside the goal's acceptance
//! radius, then the parent chain from that node back to the root becomes
//! the waypoint path. The scan never exits early: when several nodes
//! qualify, the last one in id order wins.

use crate::core::WorldPoint;
use crate::planning::PlanGraph;

/// Result of a successful retrace.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedPath {
    /// Waypoints in world coordinates, start to goal
    pub waypoints: Vec<WorldPoint>,
    /// Total path length in meters
    pub length: f32,
    /// Id of the goal-qualifying node the path was traced from
    pub reached_node: usize,
}

/// Walk the tree for a path ending within the acceptance radius of the goal.
///
/// `acceptance_radius_sq` is compared against each node's squared distance
/// to the goal. Returns `None` when no node qualifies; the graph is left
/// untouched either way, so calling twice yields identical output.
pub fn retrace(graph: &PlanGraph, acceptance_radius_sq: f32) -> Option<PlannedPath> {
    let mut closest_cost_seen = f32::INFINITY;
    let mut qualifying: Option<usize> = None;

    for node in graph.iter() {
        if node.cost_to_goal < closest_cost_seen {
            closest_cost_seen = node.cost_to_goal;
        }
        // Tracked independently of the minimum above: the most recently
        // scanned node inside the radius is the one the path ends at.
        if node.cost_to_goal < acceptance_radius_sq {
            qualifying = Some(node.id);
        }
    }

    let Some(reached_node) = qualifying else {
        tracing::warn!(
            "no node within acceptance radius of goal (closest approach {:.3}m over {} nodes)",
            closest_cost_seen.sqrt(),
            graph.len()
        );
        return None;
    };

    tracing::debug!(
        "retracing from node {} ({:.3}m from goal)",
        reached_node,
        graph.node(reached_node).cost_to_goal.sqrt()
    );

    let mut waypoints = vec![graph.node(reached_node).position];
    let mut current = reached_node;
    while let Some(parent) = graph.node(current).parent {
        waypoints.push(graph.node(parent).position);
        current = parent;
    }
    waypoints.reverse();

    let length = waypoints
        .windows(2)
        .map(|pair| pair[0].distance(&pair[1]))
        .sum();

    Some(PlannedPath {
        waypoints,
        length,
        reached_node,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_qualifying_node_returns_none() {
        let goal = WorldPoint::new(100.0, 0.0);
        let mut graph = PlanGraph::new();
        graph.insert_root(WorldPoint::ZERO, goal).unwrap();
        graph.append(WorldPoint::new(1.0, 0.0), 0, goal);

        assert!(retrace(&graph, 1.0).is_none());
    }

    #[test]
    fn test_chain_retraces_root_to_goal() {
        let goal = WorldPoint::new(2.0, 0.1);
        let mut graph = PlanGraph::new();
        graph.insert_root(WorldPoint::ZERO, goal).unwrap();
        let a = graph.append(WorldPoint::new(1.0, 0.0), 0, goal);
        let b = graph.append(WorldPoint::new(2.0, 0.0), a, goal);

        let path = retrace(&graph, 0.25).expect("node b is within the radius");
        assert_eq!(path.reached_node, b);
        assert_eq!(
            path.waypoints,
            vec![
                WorldPoint::ZERO,
                WorldPoint::new(1.0, 0.0),
                WorldPoint::new(2.0, 0.0),
            ]
        );
        assert!((path.length - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_last_qualifying_node_wins() {
        let goal = WorldPoint::new(5.0, 0.0);
        let mut graph = PlanGraph::new();
        graph.insert_root(WorldPoint::ZERO, goal).unwrap();
        // Two qualifying nodes; the second is farther from the goal but
        // later in scan order, and scan order decides.
        let near = graph.append(WorldPoint::new(5.0, 0.1), 0, goal);
        let late = graph.append(WorldPoint::new(5.0, 0.4), near, goal);

        let path = retrace(&graph, 0.5 * 0.5).unwrap();
        assert_eq!(path.reached_node, late);
    }

    #[test]
    fn test_retrace_is_idempotent() {
        let goal = WorldPoint::new(3.0, 0.0);
        let mut graph = PlanGraph::new();
        graph.insert_root(WorldPoint::ZERO, goal).unwrap();
        let a = graph.append(WorldPoint::new(1.5, 0.5), 0, goal);
        graph.append(WorldPoint::new(2.9, 0.0), a, goal);

        let first = retrace(&graph, 1.0).unwrap();
        let second = retrace(&graph, 1.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_root_inside_radius_yields_single_waypoint() {
        let goal = WorldPoint::new(0.2, 0.0);
        let mut graph = PlanGraph::new();
        graph.insert_root(WorldPoint::ZERO, goal).unwrap();

        let path = retrace(&graph, 1.0).unwrap();
        assert_eq!(path.waypoints, vec![WorldPoint::ZERO]);
        assert_eq!(path.length, 0.0);
    }
}
