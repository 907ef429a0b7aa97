//! Simulation environment
//!
//! Owns every live tracker and drives the per-tick sequence: the
//! current-state collision pass over all pairs first, then each tracker's
//! update in spawn order. Trackers that ask to be removed are dropped within
//! the same tick.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::body::Body;
use super::config::SimConfig;
use crate::collision::{overlapping_pairs, ForecastTrack};
use crate::tracking::{
    PredictiveTrackingManager, RemovalReason, TickOutcome, TrackEstimate, TrackId, Tracker,
    TrackerConfig, TrackingManager,
};
use crate::types::geometry::{Point2, Rect};
use crate::{Error, Result};

/// Acceleration given to randomly placed cars.
const RANDOM_SPAWN_ACCEL: f64 = 1.0;

/// Where newly spawned cars start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Uniform over the field with a random steering angle
    Random,
    Fixed {
        position: Point2,
        /// Rotation angle in radians
        heading: f64,
        accel: f64,
    },
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Fixed {
            position: Point2::new(500.0, 500.0),
            heading: 0.0,
            accel: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerKind {
    Plain,
    /// Self-driving: forecasts and brakes
    Predictive,
}

/// Population counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    pub alive: usize,
    pub total: usize,
    pub collisions: usize,
}

impl ::core::fmt::Display for Report {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        write!(
            f,
            "cars alive: {}, total spawned: {}, collisions: {}",
            self.alive, self.total, self.collisions
        )
    }
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Estimates in update order
    pub estimates: Vec<TrackEstimate>,
    pub removed: Vec<(TrackId, RemovalReason)>,
    /// Trackers whose update failed; they stay and retry next tick
    pub failures: Vec<(TrackId, Error)>,
    /// Collisions first detected this tick
    pub new_collisions: usize,
}

#[derive(Debug)]
pub struct Environment {
    trackers: Vec<Tracker>,
    config: TrackerConfig,
    scale: f64,
    target_count: usize,
    rng: StdRng,
    next_id: u64,
    clock: f64,
    alive: usize,
    total: usize,
    collisions: usize,
}

impl Environment {
    pub fn new(config: TrackerConfig, scale: f64, target_count: usize, rng: StdRng) -> Self {
        Self {
            trackers: Vec::new(),
            config,
            scale,
            target_count,
            rng,
            next_id: 0,
            clock: 0.0,
            alive: 0,
            total: 0,
            collisions: 0,
        }
    }

    /// Validates `config` and builds an empty environment from it.
    ///
    /// Without a configured seed the RNG is seeded from OS entropy.
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::new(
            config.tracker_config(),
            config.game.scale,
            config.sim.target_n_cars,
            rng,
        ))
    }

    #[inline]
    pub fn trackers(&self) -> &[Tracker] {
        &self.trackers
    }

    #[inline]
    pub fn trackers_mut(&mut self) -> &mut [Tracker] {
        &mut self.trackers
    }

    pub fn tracker(&self, id: TrackId) -> Option<&Tracker> {
        self.trackers.iter().find(|tracker| tracker.id() == id)
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Simulated time of the next tick.
    #[inline]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[inline]
    pub fn alive(&self) -> usize {
        self.alive
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    #[inline]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Spawns `count` trackers, or tops the population up to the target
    /// count when `count` is `None`. Returns the new ids in spawn order.
    pub fn spawn(
        &mut self,
        kind: TrackerKind,
        count: Option<usize>,
        placement: Placement,
    ) -> Result<Vec<TrackId>> {
        let count = count.unwrap_or_else(|| self.target_count.saturating_sub(self.alive));
        let mut ids = Vec::with_capacity(count);

        for _ in 0..count {
            let body = self.place(placement);
            let id = TrackId(self.next_id);
            let sensor_rng = StdRng::seed_from_u64(self.rng.gen());
            let tracker = match kind {
                TrackerKind::Plain => {
                    Tracker::from(TrackingManager::new(id, body, self.config, sensor_rng)?)
                }
                TrackerKind::Predictive => Tracker::from(PredictiveTrackingManager::new(
                    id,
                    body,
                    self.config,
                    sensor_rng,
                )?),
            };
            let position = tracker.body().position;
            debug!(track = id.0, ?kind, x = position.x, y = position.y, "spawned");

            self.trackers.push(tracker);
            self.next_id += 1;
            self.alive += 1;
            self.total += 1;
            ids.push(id);
        }

        Ok(ids)
    }

    fn place(&mut self, placement: Placement) -> Body {
        match placement {
            Placement::Random => {
                // Whole pixels in [1, size]
                let width = self.config.bounds.width.max(1.0) as u32;
                let height = self.config.bounds.height.max(1.0) as u32;
                let position = Point2::new(
                    f64::from(self.rng.gen_range(1..=width)),
                    f64::from(self.rng.gen_range(1..=height)),
                );
                Body::new(position, self.scale)
                    .with_accel(RANDOM_SPAWN_ACCEL)
                    .with_steering(self.rng.gen_range(0.0..TAU))
            }
            Placement::Fixed {
                position,
                heading,
                accel,
            } => Body::new(position, self.scale)
                .with_rotation(heading)
                .with_accel(accel),
        }
    }

    /// Current-state collision pass over every unordered pair.
    ///
    /// Overlapping bodies are both marked crashed at the current clock. The
    /// counter only moves when neither body had crashed before. Returns the
    /// number of new collisions.
    pub fn check_collisions(&mut self) -> usize {
        let edges: Vec<Rect> = self.trackers.iter().map(|t| t.body().edges()).collect();
        let now = self.clock;
        let mut new_collisions = 0;

        for (i, j) in overlapping_pairs(&edges) {
            let fresh =
                !self.trackers[i].body().is_crashed() && !self.trackers[j].body().is_crashed();
            if fresh {
                self.collisions += 1;
                new_collisions += 1;
                info!(
                    a = self.trackers[i].id().0,
                    b = self.trackers[j].id().0,
                    total = self.collisions,
                    "collision"
                );
            }
            self.trackers[i].body_mut().mark_crashed(now);
            self.trackers[j].body_mut().mark_crashed(now);
        }

        new_collisions
    }

    /// Runs one full tick and advances the clock by `dt`.
    ///
    /// A tracker whose update fails is logged, reported and kept; it runs
    /// again on the next tick.
    pub fn update_all(&mut self) -> TickReport {
        let now = self.clock;
        let mut report = TickReport {
            new_collisions: self.check_collisions(),
            ..TickReport::default()
        };

        let mut i = 0;
        while i < self.trackers.len() {
            // Forecasts are re-read per tracker so earlier updates this tick are visible
            let others: Vec<ForecastTrack> = if self.trackers[i].is_predictive() {
                self.trackers.iter().map(Tracker::forecast_track).collect()
            } else {
                Vec::new()
            };

            let id = self.trackers[i].id();
            match self.trackers[i].update(now, &others) {
                Ok(TickOutcome::Tracked(estimate)) => {
                    report.estimates.push(estimate);
                    i += 1;
                }
                Ok(TickOutcome::Removed(reason)) => {
                    self.trackers.remove(i);
                    self.alive -= 1;
                    debug!(track = id.0, ?reason, "removed");
                    report.removed.push((id, reason));
                }
                Err(error) => {
                    warn!(track = id.0, %error, "tracker update failed");
                    report.failures.push((id, error));
                    i += 1;
                }
            }
        }

        self.clock += self.config.dt;
        report
    }

    /// Current counters, also logged.
    pub fn report(&self) -> Report {
        let report = Report {
            alive: self.alive,
            total: self.total,
            collisions: self.collisions,
        };
        info!("{report}");
        report
    }
}
