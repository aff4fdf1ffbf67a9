use foundation::math::Rotation;
use formats::{
    GalaxyBundle, Instrument, Localization, ObservationBundle, PlotBundle, RenderOptions,
    SourceBundle, content_hash,
};
use scene::selection::SelectedFields;
use serde::Serialize;

use crate::error::PlotError;

/// Optional data drawn over the sky map, with the flags that enable it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct Overlays<'a> {
    pub sources: Option<&'a SourceBundle>,
    pub galaxies: Option<&'a GalaxyBundle>,
    pub instrument: Option<&'a Instrument>,
    pub observations: Option<&'a ObservationBundle>,
    pub options: RenderOptions,
}

impl<'a> Overlays<'a> {
    pub fn from_bundle(bundle: &'a PlotBundle) -> Self {
        Self {
            sources: bundle.sources.as_ref(),
            galaxies: bundle.galaxies.as_ref(),
            instrument: bundle.instrument.as_ref(),
            observations: bundle.observations.as_ref(),
            options: bundle.options,
        }
    }
}

/// Everything one render of the globe reads. Rotation and field selection
/// belong to the host and only change through `PlotHost`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeProps<'a> {
    pub localization: &'a Localization,
    pub overlays: Overlays<'a>,
    /// `None` renders with the identity rotation.
    pub rotation: Option<Rotation>,
    pub selected_fields: &'a SelectedFields,
}

#[derive(Serialize)]
struct DataIdentity<'a> {
    localization: &'a Localization,
    overlays: &'a Overlays<'a>,
}

impl<'a> GlobeProps<'a> {
    pub fn new(localization: &'a Localization, selected_fields: &'a SelectedFields) -> Self {
        Self {
            localization,
            overlays: Overlays::default(),
            rotation: None,
            selected_fields,
        }
    }

    pub fn with_overlays(mut self, overlays: Overlays<'a>) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn with_rotation(mut self, rotation: Option<Rotation>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_selected_fields(mut self, selected_fields: &'a SelectedFields) -> Self {
        self.selected_fields = selected_fields;
        self
    }

    /// Content hash of the drawn data (excluding rotation and selection).
    pub fn data_hash(&self) -> Result<String, PlotError> {
        Ok(content_hash(&DataIdentity {
            localization: self.localization,
            overlays: &self.overlays,
        })?)
    }
}

/// Host-side state the globe writes back to.
pub trait PlotHost {
    fn set_rotation(&mut self, rotation: Rotation);
    fn set_selected_fields(&mut self, selected: SelectedFields);
}

/// Plain in-memory host: keeps whatever the globe last pushed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HostState {
    pub rotation: Option<Rotation>,
    pub selected_fields: SelectedFields,
}

impl PlotHost for HostState {
    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = Some(rotation);
    }

    fn set_selected_fields(&mut self, selected: SelectedFields) {
        self.selected_fields = selected;
    }
}
