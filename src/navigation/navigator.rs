//! Tick-driven planning driver.
//!
//! Owns the planning tree, the expander, the follower and the
//! visualization sink, and performs exactly one unit of work per tick:
//! one tree expansion, one retrace attempt, or one follow step. The graph
//! is owned exclusively by this driver for the lifetime of a plan.

use rand::Rng;

use crate::config::MargaConfig;
use crate::core::WorldPoint;
use crate::navigation::PathFollower;
use crate::planning::{Expander, PlanGraph, PlannedPath, retrace};
use crate::viz::{NullSink, PlanSink};
use crate::world::CollisionQuery;

/// Phase of the planning process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanPhase {
    /// Expanding the tree, one node per tick
    Growing,
    /// Budget exhausted (or goal reached early), retrace pending
    Retracing,
    /// Walking the agent along the retraced path
    Following,
    /// Terminal: path consumed, or retrace failed, or never started
    Idle,
}

/// Result of one navigator tick.
#[derive(Clone, Copy, Debug)]
pub struct NavigatorStep {
    /// Phase after this tick
    pub phase: PlanPhase,
    /// Agent position after this tick
    pub position: WorldPoint,
    /// Nodes currently in the planning tree
    pub nodes_in_tree: usize,
    /// Expansion budget left
    pub iterations_remaining: u32,
}

/// Sampling-based planner and path-following driver.
pub struct Navigator<W: CollisionQuery> {
    world: W,
    sink: Box<dyn PlanSink>,
    graph: PlanGraph,
    expander: Expander,
    follower: PathFollower,
    /// Squared goal-proximity threshold for retrace
    acceptance_radius_sq: f32,
    /// End the growing phase as soon as a node qualifies
    stop_on_goal: bool,
    phase: PlanPhase,
    iterations_remaining: u32,
    max_iterations: u32,
    goal: WorldPoint,
    position: WorldPoint,
    path: Option<PlannedPath>,
}

impl<W: CollisionQuery> Navigator<W> {
    /// Create a navigator from configuration, with a discarding sink.
    pub fn new(config: &MargaConfig, world: W) -> Self {
        Self {
            world,
            sink: Box::new(NullSink),
            graph: PlanGraph::new(),
            expander: Expander::new(config.planner.sampling_distance),
            follower: PathFollower::new(config.follower.speed, config.follower.arrival_radius),
            acceptance_radius_sq: config.planner.acceptance_radius
                * config.planner.acceptance_radius,
            stop_on_goal: config.planner.stop_on_goal,
            phase: PlanPhase::Idle,
            iterations_remaining: 0,
            max_iterations: config.planner.max_iterations,
            goal: WorldPoint::ZERO,
            position: WorldPoint::ZERO,
            path: None,
        }
    }

    /// Replace the visualization sink.
    pub fn with_sink(mut self, sink: Box<dyn PlanSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Begin a planning run from `start` toward `goal`.
    ///
    /// Resets any previous run: a fresh tree with a single root node, the
    /// full iteration budget, and no path.
    pub fn start(&mut self, start: WorldPoint, goal: WorldPoint) {
        self.graph = PlanGraph::new();
        self.graph
            .insert_root(start, goal)
            .expect("fresh graph cannot already have a root");
        self.follower.clear_path();
        self.path = None;
        self.goal = goal;
        self.position = start;
        self.iterations_remaining = self.max_iterations;
        self.phase = PlanPhase::Growing;
        tracing::info!(
            "planning started: ({:.2}, {:.2}) -> ({:.2}, {:.2}), budget {}",
            start.x,
            start.y,
            goal.x,
            goal.y,
            self.max_iterations
        );
    }

    /// Perform one unit of work.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> NavigatorStep {
        match self.phase {
            PlanPhase::Growing => self.grow(rng),
            PlanPhase::Retracing => self.trace_path(),
            PlanPhase::Following => self.follow(),
            PlanPhase::Idle => {}
        }
        self.step_report()
    }

    /// One tree expansion; hands over to retracing when the budget runs
    /// out, or earlier if `stop_on_goal` is set and a node qualifies.
    fn grow<R: Rng>(&mut self, rng: &mut R) {
        if self.iterations_remaining == 0 {
            self.phase = PlanPhase::Retracing;
            return;
        }

        let id = self
            .expander
            .expand(&mut self.graph, &self.world, self.goal, rng);
        self.iterations_remaining -= 1;

        let node = *self.graph.node(id);
        let parent = *self.graph.node(node.parent.expect("expanded node has a parent"));
        self.sink.edge_added(node.position, parent.position);

        if self.stop_on_goal && node.cost_to_goal < self.acceptance_radius_sq {
            tracing::info!(
                "goal reached after {} nodes, ending growth early",
                self.graph.len()
            );
            self.phase = PlanPhase::Retracing;
        } else if self.iterations_remaining == 0 {
            tracing::debug!("iteration budget exhausted, {} nodes grown", self.graph.len());
            self.phase = PlanPhase::Retracing;
        }
    }

    /// The single retrace attempt of a planning run.
    fn trace_path(&mut self) {
        match retrace(&self.graph, self.acceptance_radius_sq) {
            Some(path) => {
                tracing::info!(
                    "search successful: {} waypoints, {:.2}m",
                    path.waypoints.len(),
                    path.length
                );
                self.sink.path_traced(&path.waypoints);
                self.sink.nodes_visited(&path.waypoints);
                self.follower.set_path(path.waypoints.clone());
                self.path = Some(path);
                self.phase = PlanPhase::Following;
            }
            None => {
                tracing::warn!("search failed: no path to goal within budget");
                self.phase = PlanPhase::Idle;
            }
        }
    }

    /// One follow step; idles once the path is consumed.
    fn follow(&mut self) {
        self.position = self.follower.advance(self.position);
        if self.follower.is_complete() {
            tracing::info!(
                "path consumed, agent at ({:.2}, {:.2})",
                self.position.x,
                self.position.y
            );
            self.phase = PlanPhase::Idle;
        }
    }

    fn step_report(&self) -> NavigatorStep {
        NavigatorStep {
            phase: self.phase,
            position: self.position,
            nodes_in_tree: self.graph.len(),
            iterations_remaining: self.iterations_remaining,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> PlanPhase {
        self.phase
    }

    /// True once the run has reached its terminal phase.
    pub fn is_idle(&self) -> bool {
        self.phase == PlanPhase::Idle
    }

    /// Agent position as of the latest tick.
    pub fn position(&self) -> WorldPoint {
        self.position
    }

    /// The retraced path, if the search succeeded.
    pub fn path(&self) -> Option<&PlannedPath> {
        self.path.as_ref()
    }

    /// The planning tree, for inspection and rendering.
    pub fn graph(&self) -> &PlanGraph {
        &self.graph
    }
}
