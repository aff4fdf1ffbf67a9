use formats::{Geometry, Localization};
use scene::{Element, LayerKind, Shape, Style, Surface};
use tracing::debug;

use crate::labels::{feature_anchor, is_feature_visible};
use crate::layer::{DrawContext, Layer};
use crate::symbology::{CENTER_MARKER_FILL, contour_style};

const CENTER_RADIUS_PX: f64 = 5.0;

/// Credible-region contours of a localization, plus its centre marker.
#[derive(Debug, Copy, Clone)]
pub struct SkymapLayer<'a> {
    pub localization: &'a Localization,
}

impl Layer for SkymapLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Skymap
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        let Some(contour) = &self.localization.contour else {
            debug!("skymap layer skipped: localization has no contour");
            return;
        };

        for feature in &contour.features {
            let Some(geometry) = &feature.geometry else {
                continue;
            };

            if let Geometry::Point(_) = geometry {
                let Some(anchor) = feature_anchor(feature) else {
                    continue;
                };
                let mut marker = Element::new(
                    LayerKind::Skymap,
                    Shape::Circle {
                        center: ctx.place(anchor),
                        radius: CENTER_RADIUS_PX,
                    },
                    Style::filled(CENTER_MARKER_FILL),
                )
                .with_visibility(is_feature_visible(&ctx.cap, feature));
                if let Some(name) = feature.name() {
                    marker = marker.with_tooltip(name);
                }
                out.push(marker);
                continue;
            }

            let Some(shape) = ctx.paths.shape(geometry, false) else {
                continue;
            };
            let mut element = Element::new(LayerKind::Skymap, shape, contour_style());
            if let Some(level) = feature.credible_level() {
                element = element.with_tooltip(format!("{level}% credible region"));
            }
            out.push(element);
        }
    }
}
