//! Discrete-time linear Kalman filter
//!
//! The filter owns its matrices (fixed at construction, with the time step
//! baked into A and Q) and the last committed estimate. Prediction is a pure
//! function of its inputs; only `update` commits a new estimate.
//!
//! # Example
//!
//! ```
//! use collision_predictor::filters::kalman::KalmanFilter;
//! use collision_predictor::models::{
//!     structural_covariance, ConstantAcceleration2D, DerivedKinematicsSensor2D,
//! };
//! use collision_predictor::types::spaces::{ControlInput, Measurement, StateVector};
//!
//! let transition = ConstantAcceleration2D::new(1.0);
//! let sensor = DerivedKinematicsSensor2D::new(1.0);
//! let mut filter: KalmanFilter<f64, 6, 1, 6> =
//!     KalmanFilter::from_models(&transition, &sensor, 0.05);
//!
//! let state = [10.0, 1.0, 0.0, 20.0, -1.0, 0.0];
//! filter.initialize(StateVector::from_array(state), structural_covariance(1.0));
//!
//! let z = Measurement::from_array(state);
//! let updated = filter.step(&ControlInput::zeros(), &z, None, None).unwrap();
//! assert!((updated.mean.index(0) - 10.0).abs() < 1.0);
//! ```

use nalgebra::RealField;

use crate::models::{ObservationModel, TransitionModel};
use crate::types::spaces::{
    ComputeInnovation, ControlInput, Measurement, MeasurementCovariance, StateCovariance,
    StateVector,
};
use crate::types::transforms::{
    compute_innovation_covariance, compute_kalman_gain, simple_covariance_update, ControlMatrix,
    ObservationMatrix, TransitionMatrix,
};
use crate::{Error, Result};

// ============================================================================
// Kalman Filter State
// ============================================================================

/// Mean and covariance of a state estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanState<T: RealField, const N: usize> {
    /// State estimate mean
    pub mean: StateVector<T, N>,
    /// State estimate covariance
    pub covariance: StateCovariance<T, N>,
}

impl<T: RealField + Copy, const N: usize> KalmanState<T, N> {
    #[inline]
    pub fn new(mean: StateVector<T, N>, covariance: StateCovariance<T, N>) -> Self {
        Self { mean, covariance }
    }

    /// Returns the trace of the covariance matrix (sum of variances).
    #[inline]
    pub fn uncertainty(&self) -> T {
        self.covariance.trace()
    }
}

// ============================================================================
// Kalman Filter
// ============================================================================

/// A discrete-time linear Kalman filter with control input.
///
/// # Type Parameters
///
/// - `T`: Scalar type
/// - `N`: State dimension
/// - `C`: Control dimension
/// - `M`: Observation dimension
#[derive(Debug, Clone)]
pub struct KalmanFilter<T: RealField, const N: usize, const C: usize, const M: usize> {
    transition: TransitionMatrix<T, N>,
    control: ControlMatrix<T, N, C>,
    observation: ObservationMatrix<T, M, N>,
    process_noise: StateCovariance<T, N>,
    measurement_noise: MeasurementCovariance<T, M>,
    last_mean: Option<StateVector<T, N>>,
    last_sigma: Option<StateCovariance<T, N>>,
}

impl<T: RealField + Copy, const N: usize, const C: usize, const M: usize> KalmanFilter<T, N, C, M> {
    /// Creates an uninitialised filter from explicit matrices.
    pub fn new(
        transition: TransitionMatrix<T, N>,
        control: ControlMatrix<T, N, C>,
        observation: ObservationMatrix<T, M, N>,
        process_noise: StateCovariance<T, N>,
        measurement_noise: MeasurementCovariance<T, M>,
    ) -> Self {
        Self {
            transition,
            control,
            observation,
            process_noise,
            measurement_noise,
            last_mean: None,
            last_sigma: None,
        }
    }

    /// Creates an uninitialised filter whose matrices are built for time step `dt`.
    pub fn from_models<Trans, Obs>(transition: &Trans, observation: &Obs, dt: T) -> Self
    where
        Trans: TransitionModel<T, N, C>,
        Obs: ObservationModel<T, N, M>,
    {
        Self::new(
            transition.transition_matrix(dt),
            transition.control_matrix(),
            observation.observation_matrix(),
            transition.process_noise(dt),
            observation.measurement_noise(),
        )
    }

    /// Seeds both the stored mean and covariance.
    pub fn initialize(&mut self, mean: StateVector<T, N>, covariance: StateCovariance<T, N>) {
        self.last_mean = Some(mean);
        self.last_sigma = Some(covariance);
    }

    #[inline]
    pub fn last_mean(&self) -> Option<&StateVector<T, N>> {
        self.last_mean.as_ref()
    }

    #[inline]
    pub fn last_sigma(&self) -> Option<&StateCovariance<T, N>> {
        self.last_sigma.as_ref()
    }

    /// The committed estimate, `None` before initialisation.
    pub fn last_state(&self) -> Option<KalmanState<T, N>> {
        match (self.last_mean, self.last_sigma) {
            (Some(mean), Some(covariance)) => Some(KalmanState { mean, covariance }),
            _ => None,
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.last_mean.is_some() && self.last_sigma.is_some()
    }

    /// Performs the prediction step.
    ///
    /// - x_pred = A * x + B * u
    /// - P_pred = A * P * A^T + Q
    ///
    /// Explicit `last_mean` / `last_sigma` take precedence over the stored
    /// estimate. The stored estimate is never modified.
    ///
    /// # Errors
    /// [`Error::UninitializedFilter`] if a mean or covariance is neither
    /// supplied nor stored.
    pub fn predict(
        &self,
        control_input: &ControlInput<T, C>,
        last_mean: Option<&StateVector<T, N>>,
        last_sigma: Option<&StateCovariance<T, N>>,
    ) -> Result<KalmanState<T, N>> {
        let mean = last_mean
            .or(self.last_mean.as_ref())
            .ok_or(Error::UninitializedFilter)?;
        let sigma = last_sigma
            .or(self.last_sigma.as_ref())
            .ok_or(Error::UninitializedFilter)?;

        let predicted_mean =
            self.transition.apply_state(mean) + self.control.apply_control(control_input);
        let predicted_sigma = self
            .transition
            .propagate_covariance(sigma)
            .add(&self.process_noise);

        Ok(KalmanState::new(predicted_mean, predicted_sigma))
    }

    /// Performs the update step and commits the result.
    ///
    /// - S = H * P * H^T + R
    /// - K = P * H^T * S^{-1}
    /// - x_upd = x + K * (z - H * x)
    /// - P_upd = (I - K * H) * P
    ///
    /// # Errors
    /// [`Error::SingularMatrix`] if `S` cannot be inverted. The stored
    /// estimate is left as it was.
    pub fn update(
        &mut self,
        observation: &Measurement<T, M>,
        predicted: &KalmanState<T, N>,
    ) -> Result<KalmanState<T, N>> {
        let predicted_obs = self.observation.observe(&predicted.mean);
        let innovation = observation.innovation(predicted_obs);

        let innovation_cov = compute_innovation_covariance(
            &predicted.covariance,
            &self.observation,
            &self.measurement_noise,
        );
        let kalman_gain =
            compute_kalman_gain(&predicted.covariance, &self.observation, &innovation_cov)
                .ok_or(Error::SingularMatrix)?;

        let updated_mean = predicted.mean + kalman_gain.correct(&innovation);
        let updated_sigma =
            simple_covariance_update(&predicted.covariance, &kalman_gain, &self.observation);

        self.last_mean = Some(updated_mean);
        self.last_sigma = Some(updated_sigma);

        Ok(KalmanState::new(updated_mean, updated_sigma))
    }

    /// Predict followed by update.
    pub fn step(
        &mut self,
        control_input: &ControlInput<T, C>,
        observation: &Measurement<T, M>,
        last_mean: Option<&StateVector<T, N>>,
        last_sigma: Option<&StateCovariance<T, N>>,
    ) -> Result<KalmanState<T, N>> {
        let predicted = self.predict(control_input, last_mean, last_sigma)?;
        self.update(observation, &predicted)
    }
}

// ============================================================================
// Tests
// ============================================================================
