//! MargaNav - sampling-based motion planner demo driver.
//!
//! Loads a world and planning parameters from TOML, grows the planning
//! tree one node per tick, retraces a path once the iteration budget is
//! spent, walks the agent along it, and writes an SVG audit file of the
//! run.

use std::path::Path;

use tracing::{debug, info, warn};

use marga_nav::config::MargaConfig;
use marga_nav::core::WorldPoint;
use marga_nav::error::Result;
use marga_nav::navigation::{Navigator, PlanPhase};
use marga_nav::viz::{SharedRecorder, SvgConfig, SvgRenderer};
use marga_nav::world::ObstacleField;

/// Hard cap on driver ticks, far above any configured budget plus the
/// follow phase; a runaway guard, not a tuning knob.
const MAX_TICKS: u64 = 10_000_000;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marga_nav=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        MargaConfig::load(config_path)?
    } else if Path::new("marga.toml").exists() {
        info!("Loading configuration from marga.toml");
        MargaConfig::load(Path::new("marga.toml"))?
    } else {
        info!("Using default configuration");
        MargaConfig::default()
    };

    config.validate()?;

    info!("MargaNav v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Mission: ({:.2}, {:.2}) -> ({:.2}, {:.2}), {} obstacles",
        config.mission.start.x,
        config.mission.start.y,
        config.mission.goal.x,
        config.mission.goal.y,
        config.world.circles.len() + config.world.walls.len()
    );
    info!(
        "Planner: step {:.2}m, acceptance {:.2}m, budget {}",
        config.planner.sampling_distance,
        config.planner.acceptance_radius,
        config.planner.max_iterations
    );

    let field = ObstacleField::from_config(&config.world);
    let recorder = SharedRecorder::new();
    let mut navigator =
        Navigator::new(&config, field.clone()).with_sink(Box::new(recorder.clone()));

    navigator.start(config.mission.start, config.mission.goal);

    let mut rng = rand::rng();
    let mut ticks: u64 = 0;
    while !navigator.is_idle() {
        let step = navigator.tick(&mut rng);
        if step.phase == PlanPhase::Following {
            debug!(
                "agent at ({:.2}, {:.2})",
                step.position.x, step.position.y
            );
        }
        ticks += 1;
        if ticks >= MAX_TICKS {
            warn!("tick cap reached, aborting run");
            break;
        }
    }

    match navigator.path() {
        Some(path) => info!(
            "Planning complete: {} nodes, path {:.2}m over {} waypoints, agent at ({:.2}, {:.2})",
            navigator.graph().len(),
            path.length,
            path.waypoints.len(),
            navigator.position().x,
            navigator.position().y
        ),
        None => warn!(
            "Planning failed: no node within {:.2}m of the goal after {} nodes",
            config.planner.acceptance_radius,
            navigator.graph().len()
        ),
    }

    // Write the SVG audit file
    let svg_path = Path::new(&config.output.svg_path);
    SvgRenderer::new(SvgConfig::default(), recorder.snapshot())
        .with_obstacles(&field)
        .with_endpoints(config.mission.start, config.mission.goal)
        .with_title(format!(
            "marga-nav: {} nodes, {} ticks",
            navigator.graph().len(),
            ticks
        ))
        .save(svg_path)?;
    info!("Visualization written to {}", svg_path.display());

    Ok(())
}
