//! Input records consumed by the globe renderer.
//!
//! These mirror the JSON shapes the alert dashboard already resolves upstream;
//! nothing here fetches or persists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geojson::FeatureCollection;

/// A sky localization. Every member is optional on input so that incomplete
/// records can be detected and deferred instead of half-rendered.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub dateobs: Option<String>,
    #[serde(default)]
    pub localization_name: Option<String>,
    #[serde(default)]
    pub contour: Option<FeatureCollection>,
}

impl Localization {
    /// Names of the required members that are missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("id");
        }
        if self.dateobs.as_deref().is_none_or(str::is_empty) {
            missing.push("dateobs");
        }
        if self.localization_name.as_deref().is_none_or(str::is_empty) {
            missing.push("localization_name");
        }
        if self.contour.is_none() {
            missing.push("contour");
        }
        missing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentField {
    pub id: u32,
    pub field_id: u32,
    #[serde(default)]
    pub ra: Option<f64>,
    #[serde(default)]
    pub dec: Option<f64>,
    /// Current airmass at the observatory, when known.
    #[serde(default)]
    pub airmass: Option<f64>,
    #[serde(default)]
    pub contour_summary: Option<FeatureCollection>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub instrument_type: String,
    #[serde(default)]
    pub band: String,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub fields: Vec<InstrumentField>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBundle {
    #[serde(default)]
    pub geojson: Option<FeatureCollection>,
    #[serde(default)]
    pub sources: Vec<Value>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyBundle {
    #[serde(default)]
    pub geojson: Option<FeatureCollection>,
    #[serde(default)]
    pub galaxies: Vec<Value>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationBundle {
    #[serde(default)]
    pub geojson: Vec<FeatureCollection>,
    #[serde(default)]
    pub observations: Vec<Value>,
}

/// Which layers to draw. Every layer is opt-in.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub skymap: bool,
    pub sources: bool,
    pub galaxies: bool,
    pub instrument: bool,
    pub observations: bool,
}

impl RenderOptions {
    pub fn all() -> Self {
        Self {
            skymap: true,
            sources: true,
            galaxies: true,
            instrument: true,
            observations: true,
        }
    }
}

/// Everything a single globe draws, as one serializable document.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotBundle {
    pub localization: Option<Localization>,
    pub sources: Option<SourceBundle>,
    pub galaxies: Option<GalaxyBundle>,
    pub instrument: Option<Instrument>,
    pub observations: Option<ObservationBundle>,
    pub options: RenderOptions,
}

/// Content identity of any serializable record (blake3 of its canonical JSON).
pub fn content_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
