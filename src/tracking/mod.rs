//! Per-object tracking
//!
//! A tracker owns one simulated body together with the sensor watching it and
//! the filter estimating it. Two variants exist: a plain tracker that only
//! estimates, and a predictive one that additionally forecasts and brakes.

mod estimate;
mod manager;
mod predictive;

pub use estimate::*;
pub use manager::*;
pub use predictive::*;

use crate::collision::ForecastTrack;
use crate::sim::body::Body;
use crate::Result;

/// Stable identifier of a tracked object, unique within one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl ::core::fmt::Display for TrackId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything a renderer needs for one tracker after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackEstimate {
    pub id: TrackId,
    /// Regular filter estimate
    pub current: Estimate,
    /// Forecast estimate, predictive trackers only
    pub forecast: Option<Estimate>,
    /// Whether collision avoidance is braking
    pub braking: bool,
}

impl TrackEstimate {
    fn plain(id: TrackId, current: Estimate) -> Self {
        Self {
            id,
            current,
            forecast: None,
            braking: false,
        }
    }
}

/// A tracker of either kind.
#[derive(Debug, Clone)]
pub enum Tracker {
    Plain(TrackingManager),
    Predictive(PredictiveTrackingManager),
}

impl Tracker {
    /// The shared estimation core.
    pub fn base(&self) -> &TrackingManager {
        match self {
            Tracker::Plain(manager) => manager,
            Tracker::Predictive(manager) => manager.base(),
        }
    }

    fn base_mut(&mut self) -> &mut TrackingManager {
        match self {
            Tracker::Plain(manager) => manager,
            Tracker::Predictive(manager) => manager.base_mut(),
        }
    }

    #[inline]
    pub fn id(&self) -> TrackId {
        self.base().id()
    }

    #[inline]
    pub fn body(&self) -> &Body {
        self.base().body()
    }

    #[inline]
    pub fn body_mut(&mut self) -> &mut Body {
        self.base_mut().body_mut()
    }

    #[inline]
    pub fn is_predictive(&self) -> bool {
        matches!(self, Tracker::Predictive(_))
    }

    #[inline]
    pub fn last_estimate(&self) -> Option<Estimate> {
        self.base().last_estimate()
    }

    /// Current position and cached forecast. Plain trackers never have a
    /// forecast, so forecast checks skip them.
    pub fn forecast_track(&self) -> ForecastTrack {
        match self {
            Tracker::Plain(manager) => ForecastTrack {
                id: manager.id(),
                current: manager
                    .last_estimate()
                    .map(|estimate| estimate.center)
                    .unwrap_or(manager.body().position),
                future: None,
            },
            Tracker::Predictive(manager) => manager.forecast_track(),
        }
    }

    /// Runs one tick. `others` is only consulted by predictive trackers.
    pub fn update(&mut self, now: f64, others: &[ForecastTrack]) -> Result<TickOutcome<TrackEstimate>> {
        match self {
            Tracker::Plain(manager) => Ok(match manager.update(now)? {
                TickOutcome::Tracked(estimate) => {
                    TickOutcome::Tracked(TrackEstimate::plain(manager.id(), estimate))
                }
                TickOutcome::Removed(reason) => TickOutcome::Removed(reason),
            }),
            Tracker::Predictive(manager) => manager.update(now, others),
        }
    }
}

impl From<TrackingManager> for Tracker {
    fn from(manager: TrackingManager) -> Self {
        Tracker::Plain(manager)
    }
}

impl From<PredictiveTrackingManager> for Tracker {
    fn from(manager: PredictiveTrackingManager) -> Self {
        Tracker::Predictive(manager)
    }
}
