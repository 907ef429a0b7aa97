//! Observation (sensor) models
//!
//! Describes how filter observations relate to the tracked state.

use nalgebra::RealField;
use num_traits::Float;

use super::covariance::{structural_covariance, STATE_DIM};
use crate::types::spaces::MeasurementCovariance;
use crate::types::transforms::ObservationMatrix;

/// Trait for linear observation models.
///
/// z = H * x + v, with v ~ N(0, R)
pub trait ObservationModel<T: RealField, const N: usize, const M: usize> {
    /// Returns the observation matrix H.
    fn observation_matrix(&self) -> ObservationMatrix<T, M, N>;

    /// Returns the measurement noise covariance R.
    fn measurement_noise(&self) -> MeasurementCovariance<T, M>;
}

/// Full kinematic observation derived from a noisy position sensor.
///
/// Observes all of `[x, vx, ax, y, vy, ay]`. Only the positions are sensed;
/// the velocity and acceleration components are differences of consecutive
/// samples, which is what the correlated noise template models.
#[derive(Debug, Clone)]
pub struct DerivedKinematicsSensor2D<T: RealField> {
    /// Position measurement noise standard deviation
    pub sigma_pos: T,
}

impl<T: RealField + Float + Copy> DerivedKinematicsSensor2D<T> {
    /// # Panics
    /// Panics if `sigma_pos` is negative or not finite.
    pub fn new(sigma_pos: T) -> Self {
        assert!(
            Float::is_finite(sigma_pos) && sigma_pos >= T::zero(),
            "Measurement noise sigma_pos must be finite and non-negative"
        );
        Self { sigma_pos }
    }
}

impl<T: RealField + Float + Copy> ObservationModel<T, STATE_DIM, STATE_DIM>
    for DerivedKinematicsSensor2D<T>
{
    fn observation_matrix(&self) -> ObservationMatrix<T, STATE_DIM, STATE_DIM> {
        ObservationMatrix::from_matrix(nalgebra::SMatrix::identity())
    }

    fn measurement_noise(&self) -> MeasurementCovariance<T, STATE_DIM> {
        let template = structural_covariance(self.sigma_pos * self.sigma_pos);
        MeasurementCovariance::from_matrix(*template.as_matrix())
    }
}
