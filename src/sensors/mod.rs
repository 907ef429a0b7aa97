//! Sensor models feeding the tracking filters

mod position;

pub use position::*;
