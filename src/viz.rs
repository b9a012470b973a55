//! Visualization sinks and SVG rendering.
//!
//! The planner reports tree edges, the retraced path and the visited nodes
//! to a [`PlanSink`] as fire-and-forget notifications; the planner never
//! depends on what a sink does with them. Rendered artifacts are owned
//! entirely by the sink side. [`SvgRenderer`] turns a recorded run into an
//! SVG audit file.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::Path;
use std::rc::Rc;

use crate::core::WorldPoint;
use crate::error::Result;
use crate::world::ObstacleField;

/// Receiver for planner visualization events.
///
/// All notifications are fire-and-forget: implementations must not fail
/// back into the planner.
pub trait PlanSink {
    /// A new tree edge between a node and its parent.
    fn edge_added(&mut self, node: WorldPoint, parent: WorldPoint) {
        let _ = (node, parent);
    }

    /// The retraced path, start to goal.
    fn path_traced(&mut self, waypoints: &[WorldPoint]) {
        let _ = waypoints;
    }

    /// Nodes on the retraced chain, to mark with the search-complete color.
    fn nodes_visited(&mut self, nodes: &[WorldPoint]) {
        let _ = nodes;
    }
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PlanSink for NullSink {}

/// Records planner events for rendering after the run.
#[derive(Clone, Debug, Default)]
pub struct TreeRecorder {
    /// Tree edges in insertion order (node, parent)
    pub edges: Vec<(WorldPoint, WorldPoint)>,
    /// Retraced path waypoints
    pub path: Vec<WorldPoint>,
    /// Nodes marked as visited by the retrace
    pub visited: Vec<WorldPoint>,
}

impl PlanSink for TreeRecorder {
    fn edge_added(&mut self, node: WorldPoint, parent: WorldPoint) {
        self.edges.push((node, parent));
    }

    fn path_traced(&mut self, waypoints: &[WorldPoint]) {
        self.path = waypoints.to_vec();
    }

    fn nodes_visited(&mut self, nodes: &[WorldPoint]) {
        self.visited.extend_from_slice(nodes);
    }
}

/// Shared handle to a [`TreeRecorder`], so the driver can keep feeding the
/// recorder while the caller retains access for rendering afterwards.
#[derive(Clone, Debug, Default)]
pub struct SharedRecorder(Rc<RefCell<TreeRecorder>>);

impl SharedRecorder {
    /// Create an empty shared recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded data so far.
    pub fn snapshot(&self) -> TreeRecorder {
        self.0.borrow().clone()
    }
}

impl PlanSink for SharedRecorder {
    fn edge_added(&mut self, node: WorldPoint, parent: WorldPoint) {
        self.0.borrow_mut().edge_added(node, parent);
    }

    fn path_traced(&mut self, waypoints: &[WorldPoint]) {
        self.0.borrow_mut().path_traced(waypoints);
    }

    fn nodes_visited(&mut self, nodes: &[WorldPoint]) {
        self.0.borrow_mut().nodes_visited(nodes);
    }
}

/// SVG color scheme for visualization
#[derive(Clone, Debug)]
pub struct SvgColorScheme {
    /// Background color
    pub background: &'static str,
    /// Obstacle outline/fill color
    pub obstacle: &'static str,
    /// Tree edge color
    pub tree_edge: &'static str,
    /// Retraced path and visited node color
    pub search_complete: &'static str,
    /// Start marker color
    pub start: &'static str,
    /// Goal marker color
    pub goal: &'static str,
}

impl Default for SvgColorScheme {
    fn default() -> Self {
        Self {
            background: "#F8F8F8",
            obstacle: "#333333",
            tree_edge: "#99BBDD",
            search_complete: "#CC2222",
            start: "#22AA22",
            goal: "#2222AA",
        }
    }
}

/// Configuration for SVG rendering
#[derive(Clone, Debug)]
pub struct SvgConfig {
    /// Pixels per meter
    pub scale: f32,
    /// Tree edge line width
    pub edge_width: f32,
    /// Path line width
    pub path_width: f32,
    /// Node marker radius
    pub marker_radius: f32,
    /// Color scheme
    pub colors: SvgColorScheme,
    /// Padding around the drawing in pixels
    pub padding: f32,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            scale: 50.0,
            edge_width: 1.0,
            path_width: 3.0,
            marker_radius: 4.0,
            colors: SvgColorScheme::default(),
            padding: 20.0,
        }
    }
}

/// SVG visualization builder for a planning run.
pub struct SvgRenderer {
    config: SvgConfig,
    /// Recorded tree, path and visited nodes
    recording: TreeRecorder,
    /// Obstacles to draw: circles (center, radius)
    circles: Vec<(WorldPoint, f32)>,
    /// Obstacles to draw: wall segments
    walls: Vec<(WorldPoint, WorldPoint)>,
    /// Start and goal markers
    endpoints: Option<(WorldPoint, WorldPoint)>,
    /// Title to display
    title: Option<String>,
}

impl SvgRenderer {
    /// Create a renderer for a recorded run.
    pub fn new(config: SvgConfig, recording: TreeRecorder) -> Self {
        Self {
            config,
            recording,
            circles: Vec::new(),
            walls: Vec::new(),
            endpoints: None,
            title: None,
        }
    }

    /// Draw the obstacle field behind the tree.
    pub fn with_obstacles(mut self, field: &ObstacleField) -> Self {
        self.circles = field.circles().collect();
        self.walls = field.walls().collect();
        self
    }

    /// Mark the start and goal positions.
    pub fn with_endpoints(mut self, start: WorldPoint, goal: WorldPoint) -> Self {
        self.endpoints = Some((start, goal));
        self
    }

    /// Set a title to display.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Bounding box of everything that will be drawn.
    fn bounds(&self) -> (WorldPoint, WorldPoint) {
        let mut min = WorldPoint::new(f32::MAX, f32::MAX);
        let mut max = WorldPoint::new(f32::MIN, f32::MIN);
        let mut include = |p: WorldPoint| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        };

        for &(a, b) in &self.recording.edges {
            include(a);
            include(b);
        }
        for &(center, radius) in &self.circles {
            include(center + WorldPoint::new(radius, radius));
            include(center - WorldPoint::new(radius, radius));
        }
        for &(a, b) in &self.walls {
            include(a);
            include(b);
        }
        if let Some((start, goal)) = self.endpoints {
            include(start);
            include(goal);
        }
        if min.x > max.x {
            // Nothing recorded; draw a small empty canvas.
            (WorldPoint::new(-1.0, -1.0), WorldPoint::new(1.0, 1.0))
        } else {
            (min, max)
        }
    }

    /// Render to SVG string.
    pub fn render(&self) -> String {
        let (min_world, max_world) = self.bounds();
        let scale = self.config.scale;
        let padding = self.config.padding;
        let title_height = if self.title.is_some() { 30.0 } else { 0.0 };

        let width = (max_world.x - min_world.x) * scale + 2.0 * padding;
        let height = (max_world.y - min_world.y) * scale + 2.0 * padding + title_height;

        // World to pixel, with the Y axis flipped for SVG.
        let px = |p: WorldPoint| -> (f32, f32) {
            (
                (p.x - min_world.x) * scale + padding,
                (max_world.y - p.y) * scale + padding + title_height,
            )
        };

        let mut svg = String::new();
        writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
            width, height, width, height
        )
        .unwrap();
        writeln!(
            &mut svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            self.config.colors.background
        )
        .unwrap();

        if let Some(title) = &self.title {
            writeln!(
                &mut svg,
                r#"  <text x="{:.0}" y="20" font-family="sans-serif" font-size="14">{}</text>"#,
                padding, title
            )
            .unwrap();
        }

        // Obstacles
        for &(center, radius) in &self.circles {
            let (cx, cy) = px(center);
            writeln!(
                &mut svg,
                r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" fill-opacity="0.7"/>"#,
                cx,
                cy,
                radius * scale,
                self.config.colors.obstacle
            )
            .unwrap();
        }
        for &(a, b) in &self.walls {
            let (x1, y1) = px(a);
            let (x2, y2) = px(b);
            writeln!(
                &mut svg,
                r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="3"/>"#,
                x1, y1, x2, y2, self.config.colors.obstacle
            )
            .unwrap();
        }

        // Tree edges
        for &(node, parent) in &self.recording.edges {
            let (x1, y1) = px(node);
            let (x2, y2) = px(parent);
            writeln!(
                &mut svg,
                r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
                x1, y1, x2, y2, self.config.colors.tree_edge, self.config.edge_width
            )
            .unwrap();
        }

        // Retraced path
        if self.recording.path.len() >= 2 {
            let points: Vec<String> = self
                .recording
                .path
                .iter()
                .map(|&p| {
                    let (x, y) = px(p);
                    format!("{:.1},{:.1}", x, y)
                })
                .collect();
            writeln!(
                &mut svg,
                r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{:.1}"/>"#,
                points.join(" "),
                self.config.colors.search_complete,
                self.config.path_width
            )
            .unwrap();
        }

        // Visited nodes
        for &node in &self.recording.visited {
            let (cx, cy) = px(node);
            writeln!(
                &mut svg,
                r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                cx,
                cy,
                self.config.marker_radius * 0.75,
                self.config.colors.search_complete
            )
            .unwrap();
        }

        // Start and goal markers
        if let Some((start, goal)) = self.endpoints {
            let (sx, sy) = px(start);
            let (gx, gy) = px(goal);
            writeln!(
                &mut svg,
                r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                sx, sy, self.config.marker_radius, self.config.colors.start
            )
            .unwrap();
            writeln!(
                &mut svg,
                r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                gx, gy, self.config.marker_radius, self.config.colors.goal
            )
            .unwrap();
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    /// Render and write to a file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recording() -> TreeRecorder {
        let mut recorder = TreeRecorder::default();
        recorder.edge_added(WorldPoint::new(1.0, 0.0), WorldPoint::ZERO);
        recorder.edge_added(WorldPoint::new(1.5, 1.0), WorldPoint::new(1.0, 0.0));
        recorder.path_traced(&[
            WorldPoint::ZERO,
            WorldPoint::new(1.0, 0.0),
            WorldPoint::new(1.5, 1.0),
        ]);
        recorder.nodes_visited(&[WorldPoint::new(1.0, 0.0), WorldPoint::new(1.5, 1.0)]);
        recorder
    }

    #[test]
    fn test_recorder_captures_events() {
        let recorder = sample_recording();
        assert_eq!(recorder.edges.len(), 2);
        assert_eq!(recorder.path.len(), 3);
        assert_eq!(recorder.visited.len(), 2);
    }

    #[test]
    fn test_shared_recorder_snapshot() {
        let shared = SharedRecorder::new();
        let mut sink = shared.clone();
        sink.edge_added(WorldPoint::new(1.0, 0.0), WorldPoint::ZERO);

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.edges.len(), 1);
    }

    #[test]
    fn test_render_contains_expected_elements() {
        let mut field = ObstacleField::new();
        field.add_circle(WorldPoint::new(0.5, 0.5), 0.2);
        field.add_wall(WorldPoint::new(-1.0, 0.0), WorldPoint::new(-1.0, 1.0));

        let svg = SvgRenderer::new(SvgConfig::default(), sample_recording())
            .with_obstacles(&field)
            .with_endpoints(WorldPoint::ZERO, WorldPoint::new(1.5, 1.0))
            .with_title("test run")
            .render();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("test run"));
        assert!(svg.contains("<circle"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_empty_recording_still_renders() {
        let svg = SvgRenderer::new(SvgConfig::default(), TreeRecorder::default()).render();
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/plan.svg");

        SvgRenderer::new(SvgConfig::default(), sample_recording())
            .save(&path)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }
}
