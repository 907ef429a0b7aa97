//! Structural noise template for the derived kinematic observation
//!
//! The sensor reports one noisy position per tick and differences it into
//! velocity and acceleration. With independent position noise `n_k` of
//! variance `σ²` on one axis:
//!
//! - `p = n0`
//! - `v = n0 - n1`
//! - `a = n0 - 2·n1 + n2`
//!
//! which gives the per-axis covariance `σ²·[[1, 1, 1], [1, 2, 3], [1, 3, 6]]`.
//! The two axes are sampled independently, so the off-axis blocks are zero.

use nalgebra::RealField;

use crate::types::spaces::StateCovariance;

/// Dimension of the per-axis `[pos, vel, acc]` block.
pub const AXIS_DIM: usize = 3;

/// Dimension of the full `[pos_x, vel_x, acc_x, pos_y, vel_y, acc_y]` state.
pub const STATE_DIM: usize = 2 * AXIS_DIM;

const AXIS_TEMPLATE: [[f64; AXIS_DIM]; AXIS_DIM] = [[1.0, 1.0, 1.0], [1.0, 2.0, 3.0], [1.0, 3.0, 6.0]];

/// Returns the block-diagonal template scaled by `scale`.
pub fn structural_covariance<T: RealField + Copy>(scale: T) -> StateCovariance<T, STATE_DIM> {
    let mut m = nalgebra::SMatrix::<T, STATE_DIM, STATE_DIM>::zeros();
    for axis in 0..2 {
        let offset = axis * AXIS_DIM;
        for (i, row) in AXIS_TEMPLATE.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                m[(offset + i, offset + j)] = nalgebra::convert::<f64, T>(*value) * scale;
            }
        }
    }
    StateCovariance::from_matrix(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_symmetric_and_axis_independent() {
        let cov = structural_covariance(2.0_f64);
        let m = cov.as_matrix();

        assert!((m - m.transpose()).norm() < 1e-12);
        for i in 0..AXIS_DIM {
            for j in AXIS_DIM..STATE_DIM {
                assert_eq!(m[(i, j)], 0.0);
                assert_eq!(m[(j, i)], 0.0);
            }
        }
        assert!((m[(2, 2)] - 12.0).abs() < 1e-12);
        assert!((m[(4, 5)] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_template_is_positive_definite() {
        let cov = structural_covariance(1.0_f64);
        assert!(nalgebra::Cholesky::new(*cov.as_matrix()).is_some());
    }
}
