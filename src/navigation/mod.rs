//! Path following and the tick-driven planning driver.

mod follower;
mod navigator;

pub use follower::{FollowState, PathFollower};
pub use navigator::{Navigator, NavigatorStep, PlanPhase};
