pub mod picking;
pub mod selection;
pub mod surface;
pub mod svg;
pub mod visibility;

pub use surface::*;
