use foundation::math::LonLat;
use scene::{Element, LayerKind, Shape, Style, Surface};

use crate::graticule::{GraticuleConfig, graticule_lines};
use crate::labels::{LabelStyle, label_position};
use crate::layer::{DrawContext, Layer};
use crate::symbology::{SPHERE_FILL, SPHERE_STROKE, TICK_COLOR, graticule_style};

/// Longitudes of the fixed equatorial angle ticks.
pub const TICK_LONGITUDES: [f64; 4] = [-90.0, 0.0, 90.0, 180.0];

const TICK_RADIUS_PX: f64 = 2.0;

#[derive(Debug, Copy, Clone, Default)]
pub struct SphereLayer;

impl Layer for SphereLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Background
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        out.push(Element::new(
            LayerKind::Background,
            Shape::Path {
                rings: vec![ctx.paths.sphere_outline()],
                closed: true,
            },
            Style::filled(SPHERE_FILL).with_stroke(SPHERE_STROKE, 1.0),
        ));
    }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct GraticuleLayer {
    pub config: GraticuleConfig,
}

impl Layer for GraticuleLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Graticule
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        let rings: Vec<_> = graticule_lines(self.config)
            .iter()
            .flat_map(|line| ctx.paths.polyline(line))
            .collect();
        out.push(Element::new(
            LayerKind::Graticule,
            Shape::Path {
                rings,
                closed: false,
            },
            graticule_style(),
        ));
    }
}

#[derive(Debug, Clone, Default)]
pub struct AngleTicksLayer {
    pub style: LabelStyle,
}

impl Layer for AngleTicksLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::AngleTicks
    }

    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface) {
        for lon in TICK_LONGITUDES {
            let at = LonLat::new(lon, 0.0);
            let visible = ctx.cap.contains(at);
            let px = ctx.place(at);
            out.push(
                Element::new(
                    LayerKind::AngleTicks,
                    Shape::Circle {
                        center: px,
                        radius: TICK_RADIUS_PX,
                    },
                    Style::filled(TICK_COLOR),
                )
                .with_visibility(visible),
            );
            out.push(
                Element::new(
                    LayerKind::AngleTicks,
                    Shape::Text {
                        anchor: label_position(px, &self.style),
                        text: format!("{lon}°"),
                    },
                    Style::filled(self.style.color.clone()).with_font_size(self.style.font_size_px),
                )
                .with_visibility(visible),
            );
        }
    }
}
