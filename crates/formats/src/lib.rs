pub mod geojson;
pub mod records;

pub use geojson::*;
pub use records::*;
