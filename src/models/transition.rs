//! Transition (motion) models
//!
//! Describes how the tracked state evolves over one filter time step.

use nalgebra::RealField;
use num_traits::Float;

use super::covariance::{structural_covariance, STATE_DIM};
use crate::types::spaces::StateCovariance;
use crate::types::transforms::{ControlMatrix, TransitionMatrix};

/// Trait for linear transition models with an additive control term.
///
/// x_{k+1} = A * x_k + B * u_k + w, with w ~ N(0, Q)
pub trait TransitionModel<T: RealField, const N: usize, const C: usize> {
    /// Returns the state transition matrix A for time step dt.
    fn transition_matrix(&self, dt: T) -> TransitionMatrix<T, N>;

    /// Returns the control matrix B.
    fn control_matrix(&self) -> ControlMatrix<T, N, C>;

    /// Returns the process noise covariance Q for time step dt.
    fn process_noise(&self, dt: T) -> StateCovariance<T, N>;
}

/// Constant acceleration model in 2D.
///
/// State: `[x, vx, ax, y, vy, ay]`. Both axes share the same dynamics and
/// are never coupled. The scalar control input acts on both acceleration
/// components.
#[derive(Debug, Clone)]
pub struct ConstantAcceleration2D<T: RealField> {
    /// Standard deviation of the position noise the template is scaled by
    pub noise_std: T,
}

impl<T: RealField + Float + Copy> ConstantAcceleration2D<T> {
    /// Creates a new constant acceleration model.
    ///
    /// # Panics
    /// Panics if `noise_std` is negative or not finite.
    pub fn new(noise_std: T) -> Self {
        assert!(
            Float::is_finite(noise_std) && noise_std >= T::zero(),
            "Noise standard deviation must be finite and non-negative"
        );
        Self { noise_std }
    }
}

impl<T: RealField + Float + Copy> TransitionModel<T, STATE_DIM, 1> for ConstantAcceleration2D<T> {
    fn transition_matrix(&self, dt: T) -> TransitionMatrix<T, STATE_DIM> {
        assert!(dt >= T::zero(), "Time step dt must be non-negative");
        let one = T::one();
        let zero = T::zero();
        let half_dt2 = nalgebra::convert::<f64, T>(0.5) * dt * dt;

        TransitionMatrix::from_matrix(nalgebra::matrix![
            one, dt, half_dt2, zero, zero, zero;
            zero, one, dt, zero, zero, zero;
            zero, zero, one, zero, zero, zero;
            zero, zero, zero, one, dt, half_dt2;
            zero, zero, zero, zero, one, dt;
            zero, zero, zero, zero, zero, one
        ])
    }

    fn control_matrix(&self) -> ControlMatrix<T, STATE_DIM, 1> {
        let one = T::one();
        let zero = T::zero();

        ControlMatrix::from_matrix(nalgebra::matrix![zero; zero; one; zero; zero; one])
    }

    fn process_noise(&self, dt: T) -> StateCovariance<T, STATE_DIM> {
        assert!(dt >= T::zero(), "Time step dt must be non-negative");
        structural_covariance(self.noise_std * self.noise_std * dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spaces::StateVector;

    #[test]
    fn test_constant_acceleration_kinematics() {
        let model = ConstantAcceleration2D::new(1.0_f64);
        let a = model.transition_matrix(2.0);

        let state = StateVector::from_array([1.0, 3.0, 0.5, -1.0, 0.0, -2.0]);
        let next = a.apply_state(&state);

        // x + v*dt + a*dt^2/2
        assert!((next.index(0) - 8.0).abs() < 1e-10);
        assert!((next.index(1) - 4.0).abs() < 1e-10);
        assert!((next.index(2) - 0.5).abs() < 1e-10);
        assert!((next.index(3) + 5.0).abs() < 1e-10);
        assert!((next.index(4) + 4.0).abs() < 1e-10);
        assert!((next.index(5) + 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_axes_are_not_coupled() {
        let model = ConstantAcceleration2D::new(1.0_f64);
        let a = model.transition_matrix(0.05);
        let state = StateVector::from_array([10.0, 1.0, 1.0, 0.0, 0.0, 0.0]);

        let next = a.apply_state(&state);
        assert_eq!(*next.index(3), 0.0);
        assert_eq!(*next.index(4), 0.0);
        assert_eq!(*next.index(5), 0.0);
    }

    #[test]
    fn test_control_only_reaches_acceleration() {
        let model = ConstantAcceleration2D::new(1.0_f64);
        let b = model.control_matrix();
        let column: Vec<f64> = b.as_matrix().iter().copied().collect();
        assert_eq!(column, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_process_noise_scales_with_dt() {
        let model = ConstantAcceleration2D::new(2.0_f64);
        let short = model.process_noise(0.5);
        let long = model.process_noise(10.0);

        assert!((short.get(0, 0) - 2.0).abs() < 1e-10);
        assert!((long.trace() / short.trace() - 20.0).abs() < 1e-10);
    }

    #[test]
    #[should_panic]
    fn test_negative_noise_panics() {
        let _ = ConstantAcceleration2D::new(-1.0_f64);
    }
}
