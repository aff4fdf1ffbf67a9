use foundation::math::{LonLat, Projection, Vec2};
use formats::RenderOptions;
use scene::visibility::ViewCap;
use scene::{LayerKind, Surface};

use crate::path::PathGenerator;

/// Per-redraw state shared by every layer.
#[derive(Debug, Copy, Clone)]
pub struct DrawContext<'a> {
    pub projection: &'a Projection,
    pub cap: ViewCap,
    pub paths: PathGenerator<'a>,
}

impl<'a> DrawContext<'a> {
    pub fn new(projection: &'a Projection) -> Self {
        Self {
            projection,
            cap: ViewCap::of(projection),
            paths: PathGenerator::new(projection),
        }
    }

    /// Screen position of a sky point, without horizon clipping. Callers
    /// decide visibility through `cap`.
    pub fn place(&self, p: LonLat) -> Vec2 {
        self.projection
            .project_view(self.projection.rotation().apply(p))
    }
}

pub trait Layer {
    fn kind(&self) -> LayerKind;

    /// Appends this layer's elements to `out`.
    fn draw(&self, ctx: &DrawContext<'_>, out: &mut Surface);
}

/// Whether `options` turns `kind` on. The sphere, grid and ticks are always
/// drawn; data layers are opt-in.
pub fn is_enabled(options: &RenderOptions, kind: LayerKind) -> bool {
    match kind {
        LayerKind::Background | LayerKind::Graticule | LayerKind::AngleTicks => true,
        LayerKind::Skymap => options.skymap,
        LayerKind::Fields => options.instrument,
        LayerKind::Observations => options.observations,
        LayerKind::Sources => options.sources,
        LayerKind::Galaxies => options.galaxies,
    }
}

#[cfg(test)]
mod tests {
    use super::is_enabled;
    use formats::RenderOptions;
    use scene::LayerKind;

    #[test]
    fn data_layers_are_opt_in() {
        let none = RenderOptions::default();
        let on: Vec<_> = LayerKind::ALL
            .into_iter()
            .filter(|k| is_enabled(&none, *k))
            .collect();
        assert_eq!(
            on,
            vec![LayerKind::Background, LayerKind::Graticule, LayerKind::AngleTicks]
        );

        let only_sources = RenderOptions {
            sources: true,
            ..RenderOptions::default()
        };
        assert!(is_enabled(&only_sources, LayerKind::Sources));
        assert!(!is_enabled(&only_sources, LayerKind::Galaxies));
        assert!(LayerKind::ALL.iter().all(|k| is_enabled(&RenderOptions::all(), *k)));
    }
}
