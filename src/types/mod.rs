//! Core types: typed vector spaces, transformations and planar geometry

pub mod geometry;
pub mod spaces;
pub mod transforms;
