//! Simulation: bodies, driver controls, configuration and the environment

pub mod body;
pub mod config;
pub mod controls;
pub mod environment;

pub use body::Body;
pub use config::{GameConfig, SimConfig, SimParams};
pub use controls::{apply_control, ControlCommand};
pub use environment::{Environment, Placement, Report, TickReport, TrackerKind};
