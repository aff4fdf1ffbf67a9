use foundation::math::UnknownProjection;
use formats::GeoJsonError;

#[derive(Debug, Clone, PartialEq)]
pub enum PlotError {
    /// The configured projection family is not one the renderer knows.
    UnknownProjection(String),
    InvalidDimensions { width: u32, height: u32 },
    InvalidConfig(String),
    /// Input data could not be parsed or hashed.
    Data(String),
}

impl std::fmt::Display for PlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotError::UnknownProjection(name) => write!(
                f,
                "unknown projection type {name:?} (expected \"orthographic\" or \"mollweide\")"
            ),
            PlotError::InvalidDimensions { width, height } => {
                write!(f, "invalid plot dimensions {width}x{height}")
            }
            PlotError::InvalidConfig(msg) => write!(f, "invalid plot config: {msg}"),
            PlotError::Data(msg) => write!(f, "invalid plot data: {msg}"),
        }
    }
}

impl std::error::Error for PlotError {}

impl From<UnknownProjection> for PlotError {
    fn from(e: UnknownProjection) -> Self {
        PlotError::UnknownProjection(e.0)
    }
}

impl From<GeoJsonError> for PlotError {
    fn from(e: GeoJsonError) -> Self {
        PlotError::Data(e.to_string())
    }
}

impl From<serde_json::Error> for PlotError {
    fn from(e: serde_json::Error) -> Self {
        PlotError::Data(e.to_string())
    }
}
