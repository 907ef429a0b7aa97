//! Model traits for single-object tracking
//!
//! Motion dynamics, the derived-kinematics sensor and the structural noise
//! template both of them are built from.

mod covariance;
mod observation;
mod transition;

pub use covariance::*;
pub use observation::*;
pub use transition::*;
