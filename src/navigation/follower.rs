//! Waypoint follower with fixed per-tick speed.
//!
//! Advances a position toward successive waypoints, at most `speed` meters
//! per tick and never overshooting the current target. Reaching a waypoint
//! (within the arrival radius) advances the index and retargets within the
//! same tick, so a path that starts at the agent's own position costs no
//! motion ticks.

use crate::core::WorldPoint;

/// State of path following.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowState {
    /// No path has been set
    NoPath,
    /// Moving toward a waypoint
    Following,
    /// All waypoints consumed
    Complete,
}

/// Follows a waypoint sequence one bounded step per tick.
#[derive(Clone, Debug)]
pub struct PathFollower {
    /// Distance travelled per tick (meters)
    speed: f32,
    /// Distance tolerance for reaching waypoints (meters)
    arrival_radius: f32,
    /// Current path to follow
    path: Vec<WorldPoint>,
    /// Current waypoint index
    index: usize,
    /// Current state
    state: FollowState,
}

impl PathFollower {
    /// Create a follower with the given per-tick speed and arrival radius.
    pub fn new(speed: f32, arrival_radius: f32) -> Self {
        Self {
            speed,
            arrival_radius,
            path: Vec::new(),
            index: 0,
            state: FollowState::NoPath,
        }
    }

    /// Set a new path to follow.
    pub fn set_path(&mut self, waypoints: Vec<WorldPoint>) {
        if waypoints.is_empty() {
            tracing::warn!("set_path: received empty path");
            self.path.clear();
            self.index = 0;
            self.state = FollowState::NoPath;
        } else {
            tracing::info!("set_path: {} waypoints", waypoints.len());
            self.path = waypoints;
            self.index = 0;
            self.state = FollowState::Following;
        }
    }

    /// Clear the current path.
    pub fn clear_path(&mut self) {
        self.path.clear();
        self.index = 0;
        self.state = FollowState::NoPath;
    }

    /// Check if the whole path has been consumed.
    pub fn is_complete(&self) -> bool {
        self.state == FollowState::Complete
    }

    /// Check if there is a path to follow.
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Current state.
    pub fn state(&self) -> FollowState {
        self.state
    }

    /// Index of the waypoint currently being approached.
    pub fn current_waypoint(&self) -> usize {
        self.index
    }

    /// Advance `position` one tick along the path.
    ///
    /// Returns the new position. Without a path (or once complete) the
    /// position passes through unchanged.
    pub fn advance(&mut self, position: WorldPoint) -> WorldPoint {
        if self.path.is_empty() {
            self.state = FollowState::NoPath;
            return position;
        }

        // Skip waypoints the agent is already standing on before moving.
        while self.index < self.path.len()
            && position.distance(&self.path[self.index]) < self.arrival_radius
        {
            self.index += 1;
        }
        if self.index >= self.path.len() {
            if self.state != FollowState::Complete {
                tracing::debug!("path complete: all {} waypoints reached", self.path.len());
            }
            self.state = FollowState::Complete;
            return position;
        }
        self.state = FollowState::Following;

        let target = self.path[self.index];
        let new_position = Self::move_towards(position, target, self.speed);

        if new_position.distance(&target) < self.arrival_radius {
            self.index += 1;
            if self.index == self.path.len() {
                tracing::debug!("path complete: all {} waypoints reached", self.path.len());
                self.state = FollowState::Complete;
            }
        }

        new_position
    }

    /// Step from `from` toward `to` by at most `max_step`, with exact
    /// arrival when the remaining distance is within the step.
    fn move_towards(from: WorldPoint, to: WorldPoint, max_step: f32) -> WorldPoint {
        let remaining = from.distance(&to);
        if remaining <= max_step || remaining < f32::EPSILON {
            return to;
        }
        from + (to - from) * (max_step / remaining)
    }
}
