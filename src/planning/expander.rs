//! Per-tick tree expansion.
//!
//! Each call grows the tree by exactly one node: a step of at most the
//! sampling distance in a uniformly random direction from the newest node,
//! truncated short of the first obstacle along the ray. The new node is
//! attached to whichever existing node is nearest to the landing position,
//! which is not necessarily the node the step was taken from.

use rand::Rng;
use std::f32::consts::TAU;

use crate::core::WorldPoint;
use crate::planning::PlanGraph;
use crate::world::CollisionQuery;

/// Margin kept between a truncated step and the obstacle that cut it short,
/// so a new node never lands inside or beyond the obstacle surface.
const OBSTACLE_CLEARANCE: f32 = 0.1;

/// Grows the planning tree one node per call.
#[derive(Clone, Debug)]
pub struct Expander {
    /// Step length per expansion (meters)
    sampling_distance: f32,
}

impl Expander {
    /// Create an expander with the given step length.
    pub fn new(sampling_distance: f32) -> Self {
        Self { sampling_distance }
    }

    /// Grow the tree by one node and return its id.
    ///
    /// The step always starts at the newest node in the tree, not a
    /// randomly chosen one; that bias is a deliberate property of this
    /// planner and shapes the trees it grows. The graph must already have
    /// its root.
    pub fn expand<W: CollisionQuery, R: Rng>(
        &self,
        graph: &mut PlanGraph,
        world: &W,
        goal: WorldPoint,
        rng: &mut R,
    ) -> usize {
        let frontier_id = graph
            .frontier()
            .expect("expand called on a rootless graph");
        let origin = graph.node(frontier_id).position;

        let angle = rng.random_range(0.0..TAU);
        let direction = WorldPoint::new(angle.cos(), angle.sin());

        let step = match world.cast(origin, direction, self.sampling_distance) {
            Some(hit) => hit - OBSTACLE_CLEARANCE,
            None => self.sampling_distance,
        };
        let candidate = origin + direction * step;

        // Attach to the nearest node over the whole tree, which may not be
        // the frontier the step came from.
        let parent_id = graph
            .nearest(candidate)
            .expect("expand called on an empty graph");

        graph.append(candidate, parent_id, goal)
    }
}
