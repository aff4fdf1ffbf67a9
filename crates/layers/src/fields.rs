use formats::{Instrument, InstrumentField};
use scene::selection::SelectedFields;
use scene::{Element, Interaction, LayerKind, Surface};
use tracing::debug;

use crate::layer::{DrawContext, Layer};
use crate::symbology::{field_fill, field_style};

/// Instrument field footprints, coloured by selection and airmass.
///
/// Fields paint in descending `field_id`, so the lowest ids end on top and
/// win clicks where footprints overlap.
#[derive(Debug, Copy, Clone)]
pub struct FieldsLayer<'a> {
    pub instrument: &'a Instrument,
    pub selected: &'a SelectedFields,
    pub airmass_threshold: f64,
}

impl FieldsLayer<'_> {
    fn tooltip(&self, field: &InstrumentField) -> String {
        let mut text = format!("{} field {}", self.instrument.name, field.field_id);
        if let (Some(ra), Some(dec)) = (field.ra, field.dec) {
            text.push_str(&format!("\nRA {ra:.4}, Dec {dec:.4}"));
        }
        match field.airmass {
            Some(a) => text.push_str(&format!("\nairmass {a:.2}")),
            None => text.push_str("\nairmass unknown"),
        }
        text
    }
}

impl Layer for FieldsLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Fields
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        let mut fields: Vec<&InstrumentField> = self.instrument.fields.iter().collect();
        fields.sort_by(|a, b| b.field_id.cmp(&a.field_id));

        for field in fields {
            let Some(summary) = &field.contour_summary else {
                debug!(field_id = field.field_id, "field has no footprint");
                continue;
            };
            let fill = field_fill(
                self.selected.contains(field.field_id),
                field.airmass,
                self.airmass_threshold,
                &self.instrument.filters,
            );
            let tooltip = self.tooltip(field);

            for feature in &summary.features {
                let Some(shape) = feature
                    .geometry
                    .as_ref()
                    .and_then(|g| ctx.paths.shape(g, true))
                else {
                    continue;
                };
                out.push(
                    Element::new(LayerKind::Fields, shape, field_style(fill.clone()))
                        .with_tooltip(tooltip.clone())
                        .with_interaction(Interaction::ToggleField(field.field_id)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FieldsLayer;
    use crate::layer::{DrawContext, Layer};
    use crate::symbology::filter_color;
    use formats::{Feature, FeatureCollection, Geometry, Instrument, InstrumentField};
    use foundation::math::{LonLat, Projection, ProjectionKind, Rotation};
    use pretty_assertions::assert_eq;
    use scene::selection::SelectedFields;
    use scene::{Interaction, LayerKind, Surface};

    fn square(lon: f64, lat: f64) -> FeatureCollection {
        FeatureCollection::new(vec![Feature::new(Geometry::Polygon(vec![vec![
            LonLat::new(lon - 3.0, lat - 3.0),
            LonLat::new(lon + 3.0, lat - 3.0),
            LonLat::new(lon + 3.0, lat + 3.0),
            LonLat::new(lon - 3.0, lat + 3.0),
            LonLat::new(lon - 3.0, lat - 3.0),
        ]]))])
    }

    fn field(field_id: u32, lon: f64, airmass: Option<f64>) -> InstrumentField {
        InstrumentField {
            id: 100 + field_id,
            field_id,
            ra: Some(lon),
            dec: Some(0.0),
            airmass,
            contour_summary: Some(square(lon, 0.0)),
        }
    }

    #[test]
    fn paints_descending_with_fill_policy() {
        let instrument = Instrument {
            name: "ZTF".into(),
            filters: vec!["ztfg".into(), "ztfr".into()],
            fields: vec![
                field(1, 0.0, Some(1.1)),
                field(3, 20.0, Some(3.0)),
                field(2, -20.0, None),
            ],
            ..Instrument::default()
        };
        let selected = SelectedFields::from_ids([2]);
        let p = Projection::new(ProjectionKind::Orthographic, 600.0, 600.0, Rotation::IDENTITY);
        let mut out = Surface::new(600, 600);
        FieldsLayer {
            instrument: &instrument,
            selected: &selected,
            airmass_threshold: 2.5,
        }
        .draw(&DrawContext::new(&p), &mut out);

        let drawn: Vec<_> = out
            .layer(LayerKind::Fields)
            .map(|e| (e.interaction.clone(), e.style.fill.clone()))
            .collect();
        assert_eq!(
            drawn,
            vec![
                (Some(Interaction::ToggleField(3)), Some("gray".to_string())),
                (
                    Some(Interaction::ToggleField(2)),
                    Some(filter_color(&instrument.filters))
                ),
                (Some(Interaction::ToggleField(1)), Some("white".to_string())),
            ]
        );
        let tip = out.elements()[0].tooltip.as_deref().unwrap_or_default();
        assert!(tip.starts_with("ZTF field 3"));
    }
}
