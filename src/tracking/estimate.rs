//! Renderable view of a filter estimate

use crate::filters::kalman::KalmanState;
use crate::models::STATE_DIM;
use crate::types::geometry::{Extent, Point2, Rect};

/// Index of `x` in the state vector.
pub const POS_X: usize = 0;
/// Index of `y` in the state vector.
pub const POS_Y: usize = 3;

/// Default multiplier from position variance to drawn envelope size.
pub const DEFAULT_EXTENT_SCALE: f64 = 30.0;

/// Estimated centre plus a covariance envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub center: Point2,
    pub rect: Rect,
}

impl Estimate {
    /// Centre from the mean position, envelope from the position variances
    /// times `extent_scale`.
    pub fn from_state(state: &KalmanState<f64, STATE_DIM>, extent_scale: f64) -> Self {
        let center = position_of(state);
        let extent = Extent::new(
            state.covariance.get(POS_X, POS_X) * extent_scale,
            state.covariance.get(POS_Y, POS_Y) * extent_scale,
        );
        Self {
            center,
            rect: Rect::centered(center, extent),
        }
    }
}

/// Mean position of a state estimate.
pub fn position_of(state: &KalmanState<f64, STATE_DIM>) -> Point2 {
    Point2::new(*state.mean.index(POS_X), *state.mean.index(POS_Y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spaces::{StateCovariance, StateVector};

    #[test]
    fn test_envelope_scales_position_variance() {
        let mut cov = nalgebra::SMatrix::<f64, 6, 6>::identity();
        cov[(0, 0)] = 2.0;
        cov[(3, 3)] = 0.5;
        let state = KalmanState::new(
            StateVector::from_array([100.0, 1.0, 0.0, 200.0, 0.0, 0.0]),
            StateCovariance::from_matrix(cov),
        );

        let estimate = Estimate::from_state(&state, DEFAULT_EXTENT_SCALE);
        assert_eq!(estimate.center, Point2::new(100.0, 200.0));
        assert_eq!(estimate.rect.as_tuple(), (70.0, 192.5, 60.0, 15.0));

        let unscaled = Estimate::from_state(&state, 1.0);
        assert_eq!(unscaled.rect.as_tuple(), (99.0, 199.75, 2.0, 0.5));
    }
}
