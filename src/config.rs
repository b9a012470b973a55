//! Configuration loading for MargaNav

use crate::core::WorldPoint;
use crate::error::{MargaError, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub follower: FollowerConfig,
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Tree growth parameters
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Step length per expansion (meters)
    #[serde(default = "default_sampling_distance")]
    pub sampling_distance: f32,

    /// Neighbor search radius for cost-based rewiring (meters).
    /// Validated against the sampling distance but not consumed by the
    /// active retrace logic.
    #[serde(default = "default_neighbor_search_radius")]
    pub neighbor_search_radius: f32,

    /// Goal proximity threshold for a successful retrace (meters)
    #[serde(default = "default_acceptance_radius")]
    pub acceptance_radius: f32,

    /// Expansion budget (one tree node per iteration)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Stop growing as soon as a node lands within the acceptance radius,
    /// instead of consuming the whole iteration budget first
    #[serde(default)]
    pub stop_on_goal: bool,
}

/// Waypoint following parameters
#[derive(Clone, Debug, Deserialize)]
pub struct FollowerConfig {
    /// Distance travelled per follow tick (meters)
    #[serde(default = "default_follow_speed")]
    pub speed: f32,

    /// Distance tolerance for reaching waypoints (meters)
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius: f32,
}

/// Start and goal of the planning run
#[derive(Clone, Debug, Deserialize)]
pub struct MissionConfig {
    /// Agent start position
    #[serde(default)]
    pub start: WorldPoint,

    /// Goal position
    #[serde(default = "default_goal")]
    pub goal: WorldPoint,
}

/// Obstacle layout for the planning world
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldConfig {
    /// Circular obstacles
    #[serde(default, rename = "circle")]
    pub circles: Vec<CircleConfig>,

    /// Wall segments
    #[serde(default, rename = "wall")]
    pub walls: Vec<WallConfig>,
}

/// A circular obstacle
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CircleConfig {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// A wall segment obstacle
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WallConfig {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Output configuration
#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Path to save SVG visualization
    #[serde(default = "default_svg_path")]
    pub svg_path: String,
}

// Default value functions
fn default_sampling_distance() -> f32 {
    1.0
}
fn default_neighbor_search_radius() -> f32 {
    2.0
}
fn default_acceptance_radius() -> f32 {
    1.0
}
fn default_max_iterations() -> u32 {
    2000
}
fn default_follow_speed() -> f32 {
    0.1
}
fn default_arrival_radius() -> f32 {
    0.5
}
fn default_goal() -> WorldPoint {
    WorldPoint::new(8.0, 5.0)
}
fn default_svg_path() -> String {
    "output/plan.svg".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sampling_distance: default_sampling_distance(),
            neighbor_search_radius: default_neighbor_search_radius(),
            acceptance_radius: default_acceptance_radius(),
            max_iterations: default_max_iterations(),
            stop_on_goal: false,
        }
    }
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            speed: default_follow_speed(),
            arrival_radius: default_arrival_radius(),
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            start: WorldPoint::ZERO,
            goal: default_goal(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            svg_path: default_svg_path(),
        }
    }
}

impl Default for MargaConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            follower: FollowerConfig::default(),
            mission: MissionConfig::default(),
            world: WorldConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: MargaConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check every parameter constraint, refusing to plan on violation.
    pub fn validate(&self) -> Result<()> {
        if self.planner.sampling_distance <= 0.0 {
            return Err(MargaError::Config(
                "sampling_distance must be positive".to_string(),
            ));
        }
        if self.planner.neighbor_search_radius <= 0.0 {
            return Err(MargaError::Config(
                "neighbor_search_radius must be positive".to_string(),
            ));
        }
        if self.planner.neighbor_search_radius < self.planner.sampling_distance {
            return Err(MargaError::Config(
                "neighbor_search_radius must be at least sampling_distance".to_string(),
            ));
        }
        if self.planner.acceptance_radius <= 0.0 {
            return Err(MargaError::Config(
                "acceptance_radius must be positive".to_string(),
            ));
        }
        if self.planner.max_iterations == 0 {
            return Err(MargaError::Config(
                "max_iterations must be positive".to_string(),
            ));
        }
        if self.follower.speed < 0.0 {
            return Err(MargaError::Config(
                "follower speed must not be negative".to_string(),
            ));
        }
        if self.follower.arrival_radius <= 0.0 {
            return Err(MargaError::Config(
                "arrival_radius must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MargaConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_sampling_distance_rejected() {
        let mut config = MargaConfig::default();
        config.planner.sampling_distance = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_search_radius_below_sampling_distance_rejected() {
        let mut config = MargaConfig::default();
        config.planner.sampling_distance = 2.0;
        config.planner.neighbor_search_radius = 1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("neighbor_search_radius"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut config = MargaConfig::default();
        config.planner.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_speed_rejected() {
        let mut config = MargaConfig::default();
        config.follower.speed = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [planner]
            sampling_distance = 0.5
            max_iterations = 500

            [mission]
            start = { x = 1.0, y = 1.0 }
            goal = { x = 6.0, y = 4.0 }

            [[world.circle]]
            x = 3.0
            y = 2.0
            radius = 0.8

            [[world.wall]]
            x1 = 0.0
            y1 = 0.0
            x2 = 5.0
            y2 = 0.0
        "#;
        let config: MargaConfig = toml::from_str(toml_str).unwrap();
        assert!((config.planner.sampling_distance - 0.5).abs() < 1e-6);
        assert_eq!(config.planner.max_iterations, 500);
        assert_eq!(config.world.circles.len(), 1);
        assert_eq!(config.world.walls.len(), 1);
        assert!((config.mission.goal.x - 6.0).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }
}
