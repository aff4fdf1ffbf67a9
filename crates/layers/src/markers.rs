//! Source and galaxy point markers with their labels.

use formats::{Feature, FeatureCollection, GalaxyBundle, SourceBundle};
use foundation::math::LonLat;
use scene::{Element, LayerKind, Shape, Style, Surface};
use tracing::debug;

use crate::labels::{LabelStyle, feature_anchor, is_feature_visible, label_position};
use crate::layer::{DrawContext, Layer};
use crate::symbology::{GALAXY_FILL, SOURCE_FILL};

pub const MARKER_RADIUS_PX: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct SourcesLayer<'a> {
    pub bundle: &'a SourceBundle,
    pub label: LabelStyle,
}

impl<'a> SourcesLayer<'a> {
    pub fn new(bundle: &'a SourceBundle) -> Self {
        Self {
            bundle,
            label: LabelStyle::default(),
        }
    }
}

impl Layer for SourcesLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Sources
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        let Some(geojson) = &self.bundle.geojson else {
            debug!("sources layer skipped: no geojson");
            return;
        };
        draw_markers(ctx, out, LayerKind::Sources, geojson, SOURCE_FILL, &self.label, |_, _| None);
    }
}

#[derive(Debug, Clone)]
pub struct GalaxiesLayer<'a> {
    pub bundle: &'a GalaxyBundle,
    pub label: LabelStyle,
}

impl<'a> GalaxiesLayer<'a> {
    pub fn new(bundle: &'a GalaxyBundle) -> Self {
        Self {
            bundle,
            label: LabelStyle {
                color: GALAXY_FILL.to_string(),
                ..LabelStyle::default()
            },
        }
    }
}

impl Layer for GalaxiesLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Galaxies
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        let Some(geojson) = &self.bundle.geojson else {
            debug!("galaxies layer skipped: no geojson");
            return;
        };
        draw_markers(
            ctx,
            out,
            LayerKind::Galaxies,
            geojson,
            GALAXY_FILL,
            &self.label,
            |feature, anchor| Some(coordinate_tooltip(feature, anchor)),
        );
    }
}

/// `name` plus RA/Dec; explicit `ra`/`dec` properties win over the geometry.
pub fn coordinate_tooltip(feature: &Feature, anchor: LonLat) -> String {
    let ra = feature.property_f64("ra").unwrap_or(anchor.lon_deg);
    let dec = feature.property_f64("dec").unwrap_or(anchor.lat_deg);
    match feature.name() {
        Some(name) => format!("{name}\nRA {ra:.4}, Dec {dec:.4}"),
        None => format!("RA {ra:.4}, Dec {dec:.4}"),
    }
}

fn draw_markers(
    ctx: &DrawContext<'_>,
    out: &mut Surface,
    layer: LayerKind,
    features: &FeatureCollection,
    fill: &str,
    label: &LabelStyle,
    tooltip: impl Fn(&Feature, LonLat) -> Option<String>,
) {
    for feature in &features.features {
        let Some(anchor) = feature_anchor(feature) else {
            continue;
        };
        let visible = is_feature_visible(&ctx.cap, feature);
        let px = ctx.place(anchor);
        let tip = tooltip(feature, anchor);

        let mut marker = Element::new(
            layer,
            Shape::Circle {
                center: px,
                radius: MARKER_RADIUS_PX,
            },
            Style::filled(fill),
        )
        .with_visibility(visible)
        .with_link(feature.url());
        if let Some(t) = &tip {
            marker = marker.with_tooltip(t.clone());
        }
        out.push(marker);

        let Some(name) = feature.name() else {
            continue;
        };
        let mut text = Element::new(
            layer,
            Shape::Text {
                anchor: label_position(px, label),
                text: name.to_string(),
            },
            Style::filled(label.color.clone()).with_font_size(label.font_size_px),
        )
        .with_visibility(visible)
        .with_link(feature.url());
        if let Some(t) = tip {
            text = text.with_tooltip(t);
        }
        out.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::{GalaxiesLayer, SourcesLayer, coordinate_tooltip};
    use crate::layer::{DrawContext, Layer};
    use formats::{Feature, FeatureCollection, GalaxyBundle, Geometry, SourceBundle};
    use foundation::math::{LonLat, Projection, ProjectionKind, Rotation};
    use pretty_assertions::assert_eq;
    use scene::{LayerKind, Surface};

    fn point(name: &str, lon: f64, lat: f64) -> Feature {
        Feature::new(Geometry::Point(LonLat::new(lon, lat)))
            .with_property("name", name)
            .with_property("url", format!("/source/{name}"))
    }

    fn ortho() -> Projection {
        Projection::new(ProjectionKind::Orthographic, 600.0, 600.0, Rotation::IDENTITY)
    }

    #[test]
    fn sources_get_labels_links_and_culling() {
        let bundle = SourceBundle {
            geojson: Some(FeatureCollection::new(vec![
                point("ZTF19near", 10.0, 10.0),
                point("ZTF19far", 170.0, 0.0),
            ])),
            sources: Vec::new(),
        };
        let p = ortho();
        let mut out = Surface::new(600, 600);
        SourcesLayer::new(&bundle).draw(&DrawContext::new(&p), &mut out);

        assert_eq!(out.count(LayerKind::Sources), 4);
        assert_eq!(out.visible_count(LayerKind::Sources), 2);
        let first = &out.elements()[0];
        assert_eq!(first.link.as_deref(), Some("/source/ZTF19near"));
    }

    #[test]
    fn galaxies_carry_coordinate_tooltips() {
        let bundle = GalaxyBundle {
            geojson: Some(FeatureCollection::new(vec![
                point("NGC4993", 17.0, -23.0).with_property("ra", 197.45),
            ])),
            galaxies: Vec::new(),
        };
        let p = ortho();
        let mut out = Surface::new(600, 600);
        GalaxiesLayer::new(&bundle).draw(&DrawContext::new(&p), &mut out);

        let tips: Vec<_> = out
            .layer(LayerKind::Galaxies)
            .filter_map(|e| e.tooltip.clone())
            .collect();
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0], "NGC4993\nRA 197.4500, Dec -23.0000");
    }

    #[test]
    fn tooltip_without_name_is_coordinates_only() {
        let f = Feature::new(Geometry::Point(LonLat::new(1.0, 2.0)));
        assert_eq!(coordinate_tooltip(&f, LonLat::new(1.0, 2.0)), "RA 1.0000, Dec 2.0000");
    }

    #[test]
    fn missing_geojson_is_skipped() {
        let bundle = SourceBundle::default();
        let p = ortho();
        let mut out = Surface::new(600, 600);
        SourcesLayer::new(&bundle).draw(&DrawContext::new(&p), &mut out);
        assert!(out.is_empty());
    }
}
