//! Noisy position sensor with differenced kinematics
//!
//! The sensor only ever sees position. Velocity and acceleration are raw
//! sample-to-sample differences over a three-sample window.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::models::STATE_DIM;
use crate::types::geometry::Point2;
use crate::types::spaces::Measurement;
use crate::{Error, Result};

/// Number of position samples kept for differencing.
pub const WINDOW_CAPACITY: usize = 3;

/// Position with its first and second differences.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicSample {
    pub position: Point2,
    pub velocity: Point2,
    pub acceleration: Point2,
}

impl KinematicSample {
    /// Flattens into the filter layout `[x, vx, ax, y, vy, ay]`.
    pub fn to_observation(&self) -> Measurement<f64, STATE_DIM> {
        Measurement::from_array([
            self.position.x,
            self.velocity.x,
            self.acceleration.x,
            self.position.y,
            self.velocity.y,
            self.acceleration.y,
        ])
    }
}

/// Gaussian-noise position sensor.
///
/// The noise source is injected so runs can be seeded and replayed.
#[derive(Debug, Clone)]
pub struct NoisyPositionSensor<R = StdRng> {
    noise: Normal<f64>,
    rng: R,
    window: VecDeque<Point2>,
    last: KinematicSample,
}

impl<R: Rng> NoisyPositionSensor<R> {
    /// # Errors
    /// [`Error::InvalidParameter`] if `measurement_noise` is negative or not finite.
    pub fn new(measurement_noise: f64, rng: R) -> Result<Self> {
        if !(measurement_noise.is_finite() && measurement_noise >= 0.0) {
            return Err(Error::InvalidParameter("measurement noise must be finite and >= 0"));
        }
        let noise = Normal::new(0.0, measurement_noise)
            .map_err(|_| Error::InvalidParameter("measurement noise must be finite and >= 0"))?;
        Ok(Self {
            noise,
            rng,
            window: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
            last: KinematicSample::default(),
        })
    }

    /// Takes a noisy reading of `true_position` and refreshes the derived kinematics.
    ///
    /// Velocity needs two samples and acceleration three; until then the
    /// previous cached value is kept.
    ///
    /// Known calibration quirk: the differences are per tick and are not
    /// divided by the interval, while the filter's transition matrix is built
    /// with `dt`.
    pub fn sample(&mut self, true_position: Point2) -> KinematicSample {
        let noise = Point2::new(
            self.noise.sample(&mut self.rng),
            self.noise.sample(&mut self.rng),
        );
        let position = true_position + noise;

        self.window.push_back(position);
        if self.window.len() > WINDOW_CAPACITY {
            self.window.pop_front();
        }

        let n = self.window.len();
        let velocity = if n >= 2 {
            self.window[n - 1] - self.window[n - 2]
        } else {
            self.last.velocity
        };
        let acceleration = if n >= 3 {
            velocity - self.last.velocity
        } else {
            self.last.acceleration
        };

        self.last = KinematicSample {
            position,
            velocity,
            acceleration,
        };
        self.last
    }
}

impl<R> NoisyPositionSensor<R> {
    /// Last derived reading, all zeros before the first sample.
    #[inline]
    pub fn last(&self) -> KinematicSample {
        self.last
    }

    /// Samples currently held, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &Point2> {
        self.window.iter()
    }

    #[inline]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn measurement_noise(&self) -> f64 {
        self.noise.std_dev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn noiseless() -> NoisyPositionSensor {
        NoisyPositionSensor::new(0.0, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn test_last_before_first_sample_is_zero() {
        let sensor = noiseless();
        assert_eq!(sensor.last(), KinematicSample::default());
        assert_eq!(sensor.window_len(), 0);
    }

    #[test]
    fn test_derivatives_fill_in_progressively() {
        let mut sensor = noiseless();

        let first = sensor.sample(Point2::new(10.0, 0.0));
        assert_eq!(first.position, Point2::new(10.0, 0.0));
        assert_eq!(first.velocity, Point2::default());
        assert_eq!(first.acceleration, Point2::default());

        let second = sensor.sample(Point2::new(12.0, 1.0));
        assert_eq!(second.velocity, Point2::new(2.0, 1.0));
        assert_eq!(second.acceleration, Point2::default());

        let third = sensor.sample(Point2::new(15.0, 1.0));
        assert_eq!(third.velocity, Point2::new(3.0, 0.0));
        assert_eq!(third.acceleration, Point2::new(1.0, -1.0));
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut sensor = noiseless();
        for k in 0..10 {
            sensor.sample(Point2::new(k as f64 * k as f64, 0.0));
            assert!(sensor.window_len() <= WINDOW_CAPACITY);
        }
        assert_eq!(sensor.window_len(), WINDOW_CAPACITY);

        // x = k^2 for k = 7, 8, 9
        let held: Vec<f64> = sensor.window().map(|p| p.x).collect();
        assert_eq!(held, vec![49.0, 64.0, 81.0]);

        let last = sensor.last();
        assert_eq!(last.velocity.x, 17.0);
        assert_eq!(last.acceleration.x, 2.0);
    }

    #[test]
    fn test_same_seed_same_noise() {
        let mut a = NoisyPositionSensor::new(5.0, StdRng::seed_from_u64(42)).unwrap();
        let mut b = NoisyPositionSensor::new(5.0, StdRng::seed_from_u64(42)).unwrap();

        for _ in 0..5 {
            assert_eq!(a.sample(Point2::new(1.0, 2.0)), b.sample(Point2::new(1.0, 2.0)));
        }
        assert!(a.last().position != Point2::new(1.0, 2.0));
    }

    #[test]
    fn test_observation_layout() {
        let sample = KinematicSample {
            position: Point2::new(1.0, 4.0),
            velocity: Point2::new(2.0, 5.0),
            acceleration: Point2::new(3.0, 6.0),
        };
        assert_eq!(
            sample.to_observation().as_slice(),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
        );
    }

    #[test]
    fn test_negative_noise_rejected() {
        for noise in [-1.0, -1e-9, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                NoisyPositionSensor::new(noise, StdRng::seed_from_u64(0)),
                Err(Error::InvalidParameter(_))
            ));
        }
        let sensor = NoisyPositionSensor::new(0.0, StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(sensor.measurement_noise(), 0.0);
    }
}
