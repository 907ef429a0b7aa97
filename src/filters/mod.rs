//! State estimation filters
//!
//! - [`kalman::KalmanFilter`]: linear Kalman filter with control input

pub mod kalman;
