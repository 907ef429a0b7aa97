//! Typed transformation matrices
//!
//! Matrices mapping vectors between spaces, with the source and target
//! spaces carried in the type.

use ::core::marker::PhantomData;
use nalgebra::{RealField, SMatrix, Scalar};

use super::spaces::{
    ControlInput, ControlSpace, Innovation, InnovationSpace, Measurement, MeasurementCovariance,
    MeasurementSpace, StateCovariance, StateSpace, StateVector,
};

// ============================================================================
// Transform Matrix
// ============================================================================

/// A matrix mapping `COLS`-dimensional `From` vectors to `ROWS`-dimensional
/// `To` vectors.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Transform<T: Scalar, const ROWS: usize, const COLS: usize, To, From> {
    inner: SMatrix<T, ROWS, COLS>,
    _marker: PhantomData<(To, From)>,
}

impl<T: Scalar, const ROWS: usize, const COLS: usize, To, From> Transform<T, ROWS, COLS, To, From> {
    #[inline]
    pub fn from_matrix(inner: SMatrix<T, ROWS, COLS>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn as_matrix(&self) -> &SMatrix<T, ROWS, COLS> {
        &self.inner
    }
}

impl<T: Scalar + Copy, const ROWS: usize, const COLS: usize, To: Clone, From: Clone> Copy
    for Transform<T, ROWS, COLS, To, From>
where
    SMatrix<T, ROWS, COLS>: Copy,
{
}

impl<T: RealField + Copy, const ROWS: usize, const COLS: usize, To, From>
    Transform<T, ROWS, COLS, To, From>
{
    #[inline]
    pub fn zeros() -> Self {
        Self::from_matrix(SMatrix::zeros())
    }
}

/// State transition matrix A: StateSpace -> StateSpace
pub type TransitionMatrix<T, const N: usize> = Transform<T, N, N, StateSpace, StateSpace>;

/// Control matrix B: ControlSpace -> StateSpace
pub type ControlMatrix<T, const N: usize, const C: usize> =
    Transform<T, N, C, StateSpace, ControlSpace>;

/// Observation matrix H: StateSpace -> MeasurementSpace
pub type ObservationMatrix<T, const M: usize, const N: usize> =
    Transform<T, M, N, MeasurementSpace, StateSpace>;

/// Kalman gain K: InnovationSpace -> StateSpace
pub type KalmanGain<T, const N: usize, const M: usize> =
    Transform<T, N, M, StateSpace, InnovationSpace>;

impl<T: RealField + Copy, const N: usize> TransitionMatrix<T, N> {
    #[inline]
    pub fn identity() -> Self {
        Self::from_matrix(SMatrix::identity())
    }

    /// A * x
    #[inline]
    pub fn apply_state(&self, state: &StateVector<T, N>) -> StateVector<T, N> {
        StateVector::from_svector(self.inner * state.as_svector())
    }

    /// A * P * A^T
    #[inline]
    pub fn propagate_covariance(&self, cov: &StateCovariance<T, N>) -> StateCovariance<T, N> {
        StateCovariance::from_matrix(self.inner * cov.as_matrix() * self.inner.transpose())
    }
}

impl<T: RealField + Copy, const N: usize, const C: usize> ControlMatrix<T, N, C> {
    /// B * u
    #[inline]
    pub fn apply_control(&self, control: &ControlInput<T, C>) -> StateVector<T, N> {
        StateVector::from_svector(self.inner * control.as_svector())
    }
}

impl<T: RealField + Copy, const M: usize, const N: usize> ObservationMatrix<T, M, N> {
    /// H * x
    #[inline]
    pub fn observe(&self, state: &StateVector<T, N>) -> Measurement<T, M> {
        Measurement::from_svector(self.inner * state.as_svector())
    }

    /// H * P * H^T
    #[inline]
    pub fn project_covariance(&self, cov: &StateCovariance<T, N>) -> MeasurementCovariance<T, M> {
        MeasurementCovariance::from_matrix(self.inner * cov.as_matrix() * self.inner.transpose())
    }
}

impl<T: RealField + Copy, const N: usize, const M: usize> KalmanGain<T, N, M> {
    /// K * y
    #[inline]
    pub fn correct(&self, innovation: &Innovation<T, M>) -> StateVector<T, N> {
        StateVector::from_svector(self.inner * innovation.as_svector())
    }
}

// ============================================================================
// Kalman Gain Computation
// ============================================================================

/// Computes the innovation covariance.
///
/// S = H * P * H^T + R
pub fn compute_innovation_covariance<T: RealField + Copy, const N: usize, const M: usize>(
    state_cov: &StateCovariance<T, N>,
    obs_matrix: &ObservationMatrix<T, M, N>,
    meas_noise: &MeasurementCovariance<T, M>,
) -> MeasurementCovariance<T, M> {
    obs_matrix.project_covariance(state_cov).add(meas_noise)
}

/// Computes the Kalman gain matrix.
///
/// K = P * H^T * S^{-1}
///
/// Returns `None` if `S` is singular.
pub fn compute_kalman_gain<T: RealField + Copy, const N: usize, const M: usize>(
    state_cov: &StateCovariance<T, N>,
    obs_matrix: &ObservationMatrix<T, M, N>,
    innovation_cov: &MeasurementCovariance<T, M>,
) -> Option<KalmanGain<T, N, M>> {
    let s_inv = innovation_cov.as_matrix().try_inverse()?;
    let k = state_cov.as_matrix() * obs_matrix.as_matrix().transpose() * s_inv;

    Some(KalmanGain::from_matrix(k))
}

/// Standard covariance update.
///
/// P_updated = (I - K*H) * P
pub fn simple_covariance_update<T: RealField + Copy, const N: usize, const M: usize>(
    state_cov: &StateCovariance<T, N>,
    kalman_gain: &KalmanGain<T, N, M>,
    obs_matrix: &ObservationMatrix<T, M, N>,
) -> StateCovariance<T, N> {
    let i: SMatrix<T, N, N> = SMatrix::identity();
    let i_kh = i - kalman_gain.as_matrix() * obs_matrix.as_matrix();

    StateCovariance::from_matrix(i_kh * state_cov.as_matrix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_applies_velocity() {
        let dt = 0.5_f64;
        let a = TransitionMatrix::<f64, 3>::from_matrix(nalgebra::matrix![
            1.0, dt, 0.5 * dt * dt;
            0.0, 1.0, dt;
            0.0, 0.0, 1.0
        ]);

        let state = StateVector::from_array([0.0, 2.0, 4.0]);
        let predicted = a.apply_state(&state);

        assert!((predicted.index(0) - 1.5).abs() < 1e-10);
        assert!((predicted.index(1) - 4.0).abs() < 1e-10);
        assert!((predicted.index(2) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_control_matrix_touches_only_mapped_rows() {
        let b = ControlMatrix::<f64, 3, 1>::from_matrix(nalgebra::matrix![0.0; 0.0; 1.0]);
        let u = ControlInput::from_array([2.0]);

        let effect = b.apply_control(&u);
        assert!(effect.index(0).abs() < 1e-10);
        assert!((effect.index(2) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_kalman_gain_with_equal_uncertainty_is_half() {
        let p = StateCovariance::<f64, 2>::identity();
        let h = ObservationMatrix::<f64, 2, 2>::from_matrix(nalgebra::SMatrix::identity());
        let r = MeasurementCovariance::<f64, 2>::identity();

        let s = compute_innovation_covariance(&p, &h, &r);
        let k = compute_kalman_gain(&p, &h, &s).unwrap();

        assert!((k.as_matrix()[(0, 0)] - 0.5).abs() < 1e-10);
        assert!(k.as_matrix()[(0, 1)].abs() < 1e-10);

        let updated = simple_covariance_update(&p, &k, &h);
        assert!((updated.trace() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_kalman_gain_singular_innovation() {
        let p = StateCovariance::<f64, 2>::zeros();
        let h = ObservationMatrix::<f64, 2, 2>::from_matrix(nalgebra::SMatrix::identity());
        let s = MeasurementCovariance::<f64, 2>::zeros();

        assert!(compute_kalman_gain(&p, &h, &s).is_none());
    }
}
