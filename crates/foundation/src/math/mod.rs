pub mod precision;
pub mod projection;
pub mod sphere;
pub mod vec;

pub use precision::*;
pub use projection::*;
pub use sphere::*;
pub use vec::*;
