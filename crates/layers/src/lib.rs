pub mod fields;
pub mod graticule;
pub mod grid;
pub mod labels;
pub mod layer;
pub mod markers;
pub mod observations;
pub mod path;
pub mod skymap;
pub mod symbology;

pub use layer::*;
