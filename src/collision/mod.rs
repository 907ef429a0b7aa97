//! Collision detection
//!
//! Two independent checks sharing no state:
//!
//! - [`bounding_box_overlap`]: are two objects overlapping right now
//! - [`predict_collision`]: will two forecast trajectories come too close

mod bounding_box;
mod forecast;

pub use bounding_box::*;
pub use forecast::*;
