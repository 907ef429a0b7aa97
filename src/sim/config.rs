//! Simulation configuration
//!
//! Loaded from YAML with a `game` section (field and timing) and a `sim`
//! section (population, noise, prediction). Every key is optional and falls
//! back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tracking::{TrackerConfig, DEFAULT_EXTENT_SCALE};
use crate::types::geometry::FieldBounds;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Field width and height in pixels
    pub window_size: [f64; 2],
    /// Tick interval in seconds, also the regular filter's time step
    pub interval: f64,
    /// Display scale; car footprints are multiples of it
    pub scale: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_size: [1000.0, 1000.0],
            interval: 1.0 / 20.0,
            scale: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Population the environment tops up to
    pub target_n_cars: usize,
    /// Sensor noise standard deviation in pixels
    pub measurement_noise: f64,
    /// Random placement when true, fixed placement otherwise
    pub randomize: bool,
    /// Spawn predictive (self-driving) trackers
    pub self_driving: bool,
    /// Time step of the prediction-only filter
    pub look_ahead_time: f64,
    /// Simulated seconds a wreck stays on the field
    pub crash_grace: f64,
    /// Envelope multiplier for the regular estimate
    pub extent_scale: f64,
    /// RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
    pub spawn_frame_interval: u64,
    pub report_frame_interval: u64,
    /// Ticks the headless runner executes
    pub ticks: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            target_n_cars: 10,
            measurement_noise: 5.0,
            randomize: true,
            self_driving: false,
            look_ahead_time: 10.0,
            crash_grace: 0.4,
            extent_scale: DEFAULT_EXTENT_SCALE,
            seed: None,
            spawn_frame_interval: 20,
            report_frame_interval: 100,
            ticks: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub game: GameConfig,
    pub sim: SimParams,
}

impl SimConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: SimConfig =
            serde_yaml::from_str(contents).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let [width, height] = self.game.window_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidParameter("window size must be positive"));
        }
        if !(self.game.interval.is_finite() && self.game.interval > 0.0) {
            return Err(Error::InvalidParameter("interval must be positive"));
        }
        if !(self.game.scale > 0.0) {
            return Err(Error::InvalidParameter("scale must be positive"));
        }
        // Zero noise makes the innovation covariance singular
        if !(self.sim.measurement_noise.is_finite() && self.sim.measurement_noise > 0.0) {
            return Err(Error::InvalidParameter("measurement noise must be positive"));
        }
        if !(self.sim.look_ahead_time.is_finite() && self.sim.look_ahead_time > 0.0) {
            return Err(Error::InvalidParameter("look-ahead time must be positive"));
        }
        if self.sim.crash_grace < 0.0 {
            return Err(Error::InvalidParameter("crash grace must be >= 0"));
        }
        if self.sim.spawn_frame_interval == 0 || self.sim.report_frame_interval == 0 {
            return Err(Error::InvalidParameter("frame intervals must be >= 1"));
        }
        Ok(())
    }

    #[inline]
    pub fn bounds(&self) -> FieldBounds {
        let [width, height] = self.game.window_size;
        FieldBounds::new(width, height)
    }

    /// Per-manager parameters derived from this config.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            measurement_noise: self.sim.measurement_noise,
            dt: self.game.interval,
            bounds: self.bounds(),
            crash_grace: self.sim.crash_grace,
            extent_scale: self.sim.extent_scale,
            look_ahead: self.sim.look_ahead_time,
        }
    }
}
