//! Predictive (self-driving) tracking manager
//!
//! Wraps a [`TrackingManager`] with a second filter built for a longer time
//! step. That filter is never updated with measurements: each tick it
//! projects the regular filter's latest estimate forward to forecast where
//! the car is heading, and the forecast drives braking.

use rand::rngs::StdRng;
use tracing::debug;

use super::estimate::{position_of, Estimate};
use super::manager::{KinematicFilter, TickOutcome, TrackerConfig, TrackingManager};
use super::{TrackEstimate, TrackId};
use crate::collision::{predict_collision, ForecastTrack};
use crate::sim::body::Body;
use crate::sim::controls::{apply_control, ControlCommand};
use crate::types::geometry::Point2;
use crate::types::spaces::ControlInput;
use crate::{Error, Result};

/// Envelope multiplier for the forecast estimate.
pub const FORECAST_EXTENT_SCALE: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct PredictiveTrackingManager {
    base: TrackingManager,
    predictor: KinematicFilter,
    future_position: Option<Point2>,
    braking: bool,
}

impl PredictiveTrackingManager {
    pub fn new(id: TrackId, body: Body, config: TrackerConfig, rng: StdRng) -> Result<Self> {
        Ok(Self {
            base: TrackingManager::new(id, body, config, rng)?,
            predictor: config.build_filter(config.look_ahead)?,
            future_position: None,
            braking: false,
        })
    }

    #[inline]
    pub fn base(&self) -> &TrackingManager {
        &self.base
    }

    #[inline]
    pub fn base_mut(&mut self) -> &mut TrackingManager {
        &mut self.base
    }

    /// Forecast position from the last tick, `None` before the first one.
    #[inline]
    pub fn future_position(&self) -> Option<Point2> {
        self.future_position
    }

    #[inline]
    pub fn is_braking(&self) -> bool {
        self.braking
    }

    /// Current estimated position and cached forecast, for other tracks' checks.
    pub fn forecast_track(&self) -> ForecastTrack {
        let current = self
            .base
            .last_estimate()
            .map(|estimate| estimate.center)
            .unwrap_or(self.base.body().position);
        ForecastTrack {
            id: self.base.id(),
            current,
            future: self.future_position,
        }
    }

    /// Runs the base tick, then forecasts and decides whether to brake.
    ///
    /// `others` holds every track's latest forecast; this track's own entry,
    /// if present, is ignored.
    pub fn update(&mut self, now: f64, others: &[ForecastTrack]) -> Result<TickOutcome<TrackEstimate>> {
        let current = match self.base.update(now)? {
            TickOutcome::Tracked(estimate) => estimate,
            TickOutcome::Removed(reason) => return Ok(TickOutcome::Removed(reason)),
        };

        let filter = self.base.filter();
        let (mean, sigma) = filter
            .last_mean()
            .zip(filter.last_sigma())
            .ok_or(Error::UninitializedFilter)?;
        let forecast = self
            .predictor
            .predict(&ControlInput::zeros(), Some(mean), Some(sigma))?;
        self.future_position = Some(position_of(&forecast));

        let threshold = self.base.body().size().max_dimension();
        let on_collision_course = predict_collision(&self.forecast_track(), others, threshold);
        if on_collision_course {
            if !self.braking {
                debug!(track = self.base.id().0, "forecast collision, braking");
            }
            apply_control(self.base.body_mut(), ControlCommand::Brake);
        }
        self.braking = on_collision_course;

        Ok(TickOutcome::Tracked(TrackEstimate {
            id: self.base.id(),
            current,
            forecast: Some(Estimate::from_state(&forecast, FORECAST_EXTENT_SCALE)),
            braking: self.braking,
        }))
    }
}
