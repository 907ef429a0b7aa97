//! Common helpers for collision-predictor integration tests

#![allow(dead_code)]

use collision_predictor::sim::{Environment, Placement};
use collision_predictor::tracking::TrackerConfig;
use collision_predictor::types::geometry::Point2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Per-tick time step and a quiet sensor, so estimates and forecasts are
/// in the same units as the body's motion.
pub fn per_tick_config(measurement_noise: f64) -> TrackerConfig {
    TrackerConfig {
        measurement_noise,
        dt: 1.0,
        ..TrackerConfig::default()
    }
}

/// Empty environment with a seeded RNG and display scale 10.
pub fn make_environment(config: TrackerConfig, target: usize, seed: u64) -> Environment {
    Environment::new(config, 10.0, target, StdRng::seed_from_u64(seed))
}

/// Fixed placement at `(x, y)` facing `heading` radians.
pub fn place_at(x: f64, y: f64, heading: f64, accel: f64) -> Placement {
    Placement::Fixed {
        position: Point2::new(x, y),
        heading,
        accel,
    }
}
