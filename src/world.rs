//! Obstacle world and bounded ray queries.
//!
//! The planner only ever asks one question of its environment: does a ray
//! from this origin hit anything within this distance, and how far out?
//! That seam is the [`CollisionQuery`] trait; [`ObstacleField`] is the
//! geometric implementation used by the binary and the tests.

use crate::config::WorldConfig;
use crate::core::WorldPoint;

/// Ray-obstacle intersection test bounded by a maximum distance.
///
/// Implementations never mutate obstacle state; the planner only queries.
pub trait CollisionQuery {
    /// Cast a ray from `origin` along the unit vector `direction`.
    ///
    /// Returns the distance to the first obstacle struck within
    /// `max_distance`, or `None` if the ray is clear.
    fn cast(&self, origin: WorldPoint, direction: WorldPoint, max_distance: f32) -> Option<f32>;
}

/// A circular obstacle.
#[derive(Clone, Copy, Debug)]
struct Circle {
    center: WorldPoint,
    radius: f32,
}

/// A wall segment obstacle.
#[derive(Clone, Copy, Debug)]
struct Segment {
    a: WorldPoint,
    b: WorldPoint,
}

/// A static world of circular obstacles and wall segments.
#[derive(Clone, Debug, Default)]
pub struct ObstacleField {
    circles: Vec<Circle>,
    walls: Vec<Segment>,
}

impl ObstacleField {
    /// Create an empty field (every ray is clear).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the field from the `[world]` configuration section.
    pub fn from_config(config: &WorldConfig) -> Self {
        let circles = config
            .circles
            .iter()
            .map(|c| Circle {
                center: WorldPoint::new(c.x, c.y),
                radius: c.radius,
            })
            .collect();
        let walls = config
            .walls
            .iter()
            .map(|w| Segment {
                a: WorldPoint::new(w.x1, w.y1),
                b: WorldPoint::new(w.x2, w.y2),
            })
            .collect();
        Self { circles, walls }
    }

    /// Add a circular obstacle.
    pub fn add_circle(&mut self, center: WorldPoint, radius: f32) {
        self.circles.push(Circle { center, radius });
    }

    /// Add a wall segment.
    pub fn add_wall(&mut self, a: WorldPoint, b: WorldPoint) {
        self.walls.push(Segment { a, b });
    }

    /// Number of obstacles in the field.
    pub fn obstacle_count(&self) -> usize {
        self.circles.len() + self.walls.len()
    }

    /// Circle centers and radii, for rendering.
    pub fn circles(&self) -> impl Iterator<Item = (WorldPoint, f32)> + '_ {
        self.circles.iter().map(|c| (c.center, c.radius))
    }

    /// Wall endpoints, for rendering.
    pub fn walls(&self) -> impl Iterator<Item = (WorldPoint, WorldPoint)> + '_ {
        self.walls.iter().map(|s| (s.a, s.b))
    }

    /// Distance along the ray to a circle, if struck.
    fn hit_circle(origin: WorldPoint, direction: WorldPoint, circle: &Circle) -> Option<f32> {
        let to_origin = origin - circle.center;
        let b = to_origin.dot(&direction);
        let c = to_origin.dot(&to_origin) - circle.radius * circle.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        if near >= 0.0 {
            return Some(near);
        }
        // Near root behind the origin: inside the circle if the far root
        // is still ahead.
        let far = -b + sqrt_d;
        if far >= 0.0 { Some(0.0) } else { None }
    }

    /// Distance along the ray to a wall segment, if struck.
    fn hit_segment(origin: WorldPoint, direction: WorldPoint, segment: &Segment) -> Option<f32> {
        let along_wall = segment.b - segment.a;
        let denominator = direction.cross(&along_wall);
        if denominator.abs() < f32::EPSILON {
            // Parallel ray, treated as a miss
            return None;
        }
        let to_wall = segment.a - origin;
        let t = to_wall.cross(&along_wall) / denominator;
        let u = to_wall.cross(&direction) / denominator;
        if t >= 0.0 && (0.0..=1.0).contains(&u) {
            Some(t)
        } else {
            None
        }
    }
}

impl CollisionQuery for ObstacleField {
    fn cast(&self, origin: WorldPoint, direction: WorldPoint, max_distance: f32) -> Option<f32> {
        let mut nearest: Option<f32> = None;

        for circle in &self.circles {
            if let Some(d) = Self::hit_circle(origin, direction, circle)
                && d <= max_distance
                && nearest.is_none_or(|n| d < n)
            {
                nearest = Some(d);
            }
        }
        for wall in &self.walls {
            if let Some(d) = Self::hit_segment(origin, direction, wall)
                && d <= max_distance
                && nearest.is_none_or(|n| d < n)
            {
                nearest = Some(d);
            }
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAST: WorldPoint = WorldPoint { x: 1.0, y: 0.0 };

    #[test]
    fn test_empty_field_is_clear() {
        let field = ObstacleField::new();
        assert!(field.cast(WorldPoint::ZERO, EAST, 100.0).is_none());
    }

    #[test]
    fn test_circle_hit_distance() {
        let mut field = ObstacleField::new();
        field.add_circle(WorldPoint::new(5.0, 0.0), 1.0);

        let hit = field.cast(WorldPoint::ZERO, EAST, 10.0);
        assert!(hit.is_some());
        assert!((hit.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_beyond_range_is_missed() {
        let mut field = ObstacleField::new();
        field.add_circle(WorldPoint::new(5.0, 0.0), 1.0);

        assert!(field.cast(WorldPoint::ZERO, EAST, 3.0).is_none());
    }

    #[test]
    fn test_circle_off_axis_is_missed() {
        let mut field = ObstacleField::new();
        field.add_circle(WorldPoint::new(5.0, 3.0), 1.0);

        assert!(field.cast(WorldPoint::ZERO, EAST, 10.0).is_none());
    }

    #[test]
    fn test_wall_hit_distance() {
        let mut field = ObstacleField::new();
        field.add_wall(WorldPoint::new(3.0, -1.0), WorldPoint::new(3.0, 1.0));

        let hit = field.cast(WorldPoint::ZERO, EAST, 10.0);
        assert!(hit.is_some());
        assert!((hit.unwrap() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_behind_origin_is_missed() {
        let mut field = ObstacleField::new();
        field.add_wall(WorldPoint::new(-3.0, -1.0), WorldPoint::new(-3.0, 1.0));

        assert!(field.cast(WorldPoint::ZERO, EAST, 10.0).is_none());
    }

    #[test]
    fn test_nearest_of_several_obstacles_wins() {
        let mut field = ObstacleField::new();
        field.add_circle(WorldPoint::new(6.0, 0.0), 1.0);
        field.add_wall(WorldPoint::new(2.0, -1.0), WorldPoint::new(2.0, 1.0));

        let hit = field.cast(WorldPoint::ZERO, EAST, 10.0);
        assert!((hit.unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_origin_inside_circle_reports_zero() {
        let mut field = ObstacleField::new();
        field.add_circle(WorldPoint::ZERO, 2.0);

        let hit = field.cast(WorldPoint::ZERO, EAST, 10.0);
        assert_eq!(hit, Some(0.0));
    }
}
