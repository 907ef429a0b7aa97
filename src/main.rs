//! Headless collision-predictor simulation
//!
//! Usage: `collision-predictor [config.yaml]`. Without a path the built-in
//! defaults are used. Log verbosity follows `RUST_LOG` (default `info`).

use collision_predictor::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> collision_predictor::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading configuration");
            SimConfig::load(&path)?
        }
        None => SimConfig::default(),
    };

    let kind = if config.sim.self_driving {
        TrackerKind::Predictive
    } else {
        TrackerKind::Plain
    };
    let placement = if config.sim.randomize {
        Placement::Random
    } else {
        Placement::default()
    };

    let mut env = Environment::from_config(&config)?;
    env.spawn(kind, None, placement)?;
    info!(
        cars = env.alive(),
        ?kind,
        noise = config.sim.measurement_noise,
        "simulation started"
    );

    let mut failures = 0;
    for frame in 1..=config.sim.ticks {
        if frame % config.sim.spawn_frame_interval == 0 {
            env.spawn(kind, None, placement)?;
        }
        if frame % config.sim.report_frame_interval == 0 {
            env.report();
        }

        let tick = env.update_all();
        failures += tick.failures.len();
    }

    let report = env.report();
    info!(
        ticks = config.sim.ticks,
        alive = report.alive,
        total = report.total,
        collisions = report.collisions,
        failures,
        "simulation finished"
    );
    Ok(())
}
