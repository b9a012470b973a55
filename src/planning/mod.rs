//! Tree construction and path extraction.
//!
//! This module provides:
//! - Append-only planning tree with parent links and insertion-time costs
//! - Per-tick tree expansion with obstacle-aware step truncation
//! - Goal-proximity retrace producing the final waypoint path

mod expander;
mod graph;
mod retrace;

pub use expander::Expander;
pub use graph::{PlanGraph, PlanNode};
pub use retrace::{PlannedPath, retrace};
