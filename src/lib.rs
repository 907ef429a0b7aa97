//! Collision predictor: Kalman-filter tracking and predictive collision avoidance
//!
//! Simulated cars are observed only through noisy position sensors. Each car
//! runs a constant-acceleration Kalman filter on the sensor's derived
//! kinematics, optionally forecasts its position further ahead with a second
//! prediction-only filter, and brakes when the forecast trajectory comes too
//! close to another car's.
//!
//! # Layout
//!
//! - [`types`]: typed vector spaces, transforms and planar geometry
//! - [`models`]: motion/observation models and the structural noise template
//! - [`filters`]: the linear Kalman filter
//! - [`sensors`]: noisy position sensor with derived velocity/acceleration
//! - [`tracking`]: per-object tracking managers
//! - [`collision`]: bounding-box and forecast-segment collision checks
//! - [`sim`]: bodies, controls, configuration and the orchestrating environment

pub mod collision;
pub mod filters;
pub mod models;
pub mod sensors;
pub mod sim;
pub mod tracking;
pub mod types;

pub mod prelude {
    pub use crate::collision::*;
    pub use crate::filters::kalman::*;
    pub use crate::models::*;
    pub use crate::sensors::*;
    pub use crate::sim::*;
    pub use crate::tracking::*;
    pub use crate::types::geometry::*;
    pub use crate::types::spaces::*;
}

/// Error types for the library
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Filter asked to predict or update without a mean/covariance
    UninitializedFilter,
    /// Matrix is singular and cannot be inverted
    SingularMatrix,
    /// A construction parameter is out of range
    InvalidParameter(&'static str),
    /// Configuration could not be read or parsed
    Config(String),
}

impl std::error::Error for Error {}

impl ::core::fmt::Display for Error {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            Error::UninitializedFilter => write!(f, "Filter has no prior mean/covariance"),
            Error::SingularMatrix => write!(f, "Matrix is singular"),
            Error::InvalidParameter(what) => write!(f, "Invalid parameter: {what}"),
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

pub type Result<T> = ::core::result::Result<T, Error>;
