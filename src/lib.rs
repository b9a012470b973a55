//! # MargaNav
//!
//! Sampling-based 2D motion planner with obstacle-aware tree growth.
//!
//! ## Overview
//!
//! MargaNav incrementally builds a tree of reachable positions from a start
//! point toward a goal through an obstacle field, then retraces and follows
//! a waypoint path once the tree reaches the goal's acceptance radius:
//!
//! - **Growing**: one tree-expansion step per tick, always from the newest
//!   node, with steps truncated short of the first obstacle along the ray
//! - **Retracing**: a single scan for a node within the acceptance radius,
//!   then a parent-link walk back to the root
//! - **Following**: fixed-speed waypoint advance with arrival detection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga_nav::{MargaConfig, Navigator, ObstacleField, WorldPoint};
//!
//! let config = MargaConfig::default();
//! config.validate()?;
//!
//! let world = ObstacleField::from_config(&config.world);
//! let mut navigator = Navigator::new(&config, world);
//!
//! navigator.start(WorldPoint::new(0.0, 0.0), WorldPoint::new(8.0, 5.0));
//! let mut rng = rand::rng();
//! while !navigator.is_idle() {
//!     let step = navigator.tick(&mut rng);
//!     println!("agent at ({:.2}, {:.2})", step.position.x, step.position.y);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! Positions are planar world coordinates in meters, X/Y axis-aligned.
//! The planner operates in the horizontal plane; height is not modeled.

// Core geometry
pub mod core;

// Configuration
pub mod config;

// Error types
pub mod error;

// Obstacle world and ray queries
pub mod world;

// Tree construction and path extraction
pub mod planning;

// Path following and the tick-driven driver
pub mod navigation;

// Visualization sinks and SVG rendering
pub mod viz;

// Re-export commonly used types
pub use config::MargaConfig;
pub use core::WorldPoint;
pub use error::{MargaError, Result};
pub use navigation::{FollowState, Navigator, NavigatorStep, PathFollower, PlanPhase};
pub use planning::{Expander, PlanGraph, PlanNode, PlannedPath, retrace};
pub use viz::{NullSink, PlanSink, SharedRecorder, SvgConfig, SvgRenderer, TreeRecorder};
pub use world::{CollisionQuery, ObstacleField};
