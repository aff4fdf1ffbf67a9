//! Sky geometry primitives shared by every crate: vectors, spherical
//! coordinates, rotations, projections and screen-space bounds.

pub mod bounds;
pub mod math;

pub use bounds::*;
