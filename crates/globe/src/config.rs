use foundation::math::ProjectionKind;
use layers::symbology::DEFAULT_AIRMASS_THRESHOLD;
use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// Renderer configuration. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// `"orthographic"` or `"mollweide"`.
    pub projection: String,
    pub width: u32,
    pub height: u32,
    pub airmass_threshold: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Orthographic.name().to_string(),
            width: 600,
            height: 600,
            airmass_threshold: DEFAULT_AIRMASS_THRESHOLD,
        }
    }
}

impl PlotConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PlotError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn projection_kind(&self) -> Result<ProjectionKind, PlotError> {
        Ok(self.projection.parse::<ProjectionKind>()?)
    }

    pub fn validate(&self) -> Result<ProjectionKind, PlotError> {
        let kind = self.projection_kind()?;
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.airmass_threshold.is_finite() {
            return Err(PlotError::InvalidConfig(format!(
                "airmass_threshold must be finite, got {}",
                self.airmass_threshold
            )));
        }
        Ok(kind)
    }
}
