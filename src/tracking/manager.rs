//! Per-object tracking manager
//!
//! Owns one body (the ground truth), the sensor watching it and the filter
//! estimating it, and runs one estimation tick at a time.

use rand::rngs::StdRng;

use super::estimate::{Estimate, DEFAULT_EXTENT_SCALE};
use super::TrackId;
use crate::filters::kalman::KalmanFilter;
use crate::models::{
    structural_covariance, ConstantAcceleration2D, DerivedKinematicsSensor2D, STATE_DIM,
};
use crate::sensors::NoisyPositionSensor;
use crate::sim::body::Body;
use crate::types::geometry::FieldBounds;
use crate::types::spaces::{ControlInput, StateVector};
use crate::{Error, Result};

/// Filter over `[x, vx, ax, y, vy, ay]` with a scalar control input.
pub type KinematicFilter = KalmanFilter<f64, STATE_DIM, 1, STATE_DIM>;

/// Immutable per-manager parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Standard deviation of the position sensor noise
    pub measurement_noise: f64,
    /// Tick interval the regular filter is built for
    pub dt: f64,
    /// Playing field
    pub bounds: FieldBounds,
    /// Simulated seconds a wreck stays on the field
    pub crash_grace: f64,
    /// Envelope multiplier for the regular estimate
    pub extent_scale: f64,
    /// Time step of the prediction-only filter
    pub look_ahead: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            measurement_noise: 5.0,
            dt: 1.0 / 20.0,
            bounds: FieldBounds::new(1000.0, 1000.0),
            crash_grace: 0.4,
            extent_scale: DEFAULT_EXTENT_SCALE,
            look_ahead: 10.0,
        }
    }
}

impl TrackerConfig {
    /// Builds an uninitialised constant-acceleration filter for time step `dt`.
    pub fn build_filter(&self, dt: f64) -> Result<KinematicFilter> {
        if !(self.measurement_noise.is_finite() && self.measurement_noise >= 0.0) {
            return Err(Error::InvalidParameter("measurement noise must be finite and >= 0"));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidParameter("filter time step must be positive"));
        }
        let transition = ConstantAcceleration2D::new(self.measurement_noise);
        let sensor = DerivedKinematicsSensor2D::new(self.measurement_noise);
        Ok(KalmanFilter::from_models(&transition, &sensor, dt))
    }
}

/// Why a manager asked to be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Crashed and the grace period has elapsed
    Crashed,
    /// Entirely outside the field
    OutOfBounds,
}

/// Result of one manager tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome<E> {
    Tracked(E),
    Removed(RemovalReason),
}

#[derive(Debug, Clone)]
pub struct TrackingManager {
    id: TrackId,
    body: Body,
    sensor: NoisyPositionSensor,
    filter: KinematicFilter,
    config: TrackerConfig,
    started: bool,
    last_estimate: Option<Estimate>,
}

impl TrackingManager {
    pub fn new(id: TrackId, body: Body, config: TrackerConfig, rng: StdRng) -> Result<Self> {
        Ok(Self {
            id,
            body,
            sensor: NoisyPositionSensor::new(config.measurement_noise, rng)?,
            filter: config.build_filter(config.dt)?,
            config,
            started: false,
            last_estimate: None,
        })
    }

    #[inline]
    pub fn id(&self) -> TrackId {
        self.id
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[inline]
    pub fn sensor(&self) -> &NoisyPositionSensor {
        &self.sensor
    }

    #[inline]
    pub fn filter(&self) -> &KinematicFilter {
        &self.filter
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// True once the filter has been seeded by a first measurement.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Estimate produced by the most recent successful tick.
    #[inline]
    pub fn last_estimate(&self) -> Option<Estimate> {
        self.last_estimate
    }

    fn out_of_bounds(&self) -> bool {
        self.config.bounds.excludes(&self.body.edges())
    }

    /// Runs one estimation tick at simulated time `now`.
    ///
    /// Advances the body, samples the sensor, and steps the filter with a
    /// zero control input. The first tick seeds the filter mean with the
    /// observation itself and its covariance with the unscaled structural
    /// template.
    ///
    /// # Errors
    /// Propagates filter failures. The body has already advanced when the
    /// filter step fails; the next tick carries on from there.
    pub fn update(&mut self, now: f64) -> Result<TickOutcome<Estimate>> {
        if let Some(crashed_at) = self.body.crashed_at() {
            if now - crashed_at > self.config.crash_grace {
                return Ok(TickOutcome::Removed(RemovalReason::Crashed));
            }
        }
        if self.out_of_bounds() {
            return Ok(TickOutcome::Removed(RemovalReason::OutOfBounds));
        }

        self.body.advance();
        // Leaving the field during this tick's motion counts for this tick
        if self.out_of_bounds() {
            return Ok(TickOutcome::Removed(RemovalReason::OutOfBounds));
        }

        let observation = self.sensor.sample(self.body.position).to_observation();

        if !self.started {
            self.filter.initialize(
                StateVector::from_svector(*observation.as_svector()),
                structural_covariance(1.0),
            );
            self.started = true;
        }

        let updated = self
            .filter
            .step(&ControlInput::zeros(), &observation, None, None)?;

        let estimate = Estimate::from_state(&updated, self.config.extent_scale);
        self.last_estimate = Some(estimate);
        Ok(TickOutcome::Tracked(estimate))
    }
}
