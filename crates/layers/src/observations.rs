use formats::{Feature, ObservationBundle};
use scene::selection::ObservationSelection;
use scene::{Element, Interaction, LayerKind, Surface};

use crate::layer::{DrawContext, Layer};
use crate::symbology::observation_style;

/// Key for an observation footprint: the `obs_id` or `id` property, then the
/// feature id, then its position as `collection:feature` within the bundle.
pub fn observation_key(feature: &Feature, collection: usize, index: usize) -> String {
    for key in ["obs_id", "id"] {
        match feature.properties.get(key) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(serde_json::Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    feature
        .id
        .clone()
        .unwrap_or_else(|| format!("{collection}:{index}"))
}

#[derive(Debug, Copy, Clone)]
pub struct ObservationsLayer<'a> {
    pub bundle: &'a ObservationBundle,
    pub selection: &'a ObservationSelection,
}

impl Layer for ObservationsLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Observations
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        let features = self
            .bundle
            .geojson
            .iter()
            .enumerate()
            .flat_map(|(c, fc)| fc.features.iter().enumerate().map(move |(i, f)| (c, i, f)));
        for (collection, index, feature) in features {
            let Some(shape) = feature
                .geometry
                .as_ref()
                .and_then(|g| ctx.paths.shape(g, true))
            else {
                continue;
            };
            let key = observation_key(feature, collection, index);
            let highlighted = self.selection.is_highlighted(&key);
            out.push(
                Element::new(LayerKind::Observations, shape, observation_style(highlighted))
                    .with_tooltip(format!("observation {key}"))
                    .with_interaction(Interaction::ToggleObservation(key)),
            );
        }
    }
}
