use foundation::math::Rotation;
use formats::Localization;
use scene::selection::SelectedFields;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlotError;
use crate::props::{GlobeProps, Overlays};
use crate::renderer::GlobePlot;

/// Which stored localization to show when none is passed explicitly.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalizationSlot {
    #[default]
    Cached,
    Analysis,
}

/// The two stored localizations a host may hold.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct LocalizationSlots<'a> {
    pub cached: Option<&'a Localization>,
    pub analysis: Option<&'a Localization>,
}

impl<'a> LocalizationSlots<'a> {
    pub fn get(&self, slot: LocalizationSlot) -> Option<&'a Localization> {
        match slot {
            LocalizationSlot::Cached => self.cached,
            LocalizationSlot::Analysis => self.analysis,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotView<'a> {
    /// The localization is absent or incomplete; nothing is drawn.
    Loading { missing: Vec<&'static str> },
    Globe(GlobeProps<'a>),
}

/// Resolves which localization to plot and hands it to a `GlobePlot`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalizationPlot<'a> {
    /// Wins over the slots when present.
    pub localization: Option<&'a Localization>,
    pub slot: LocalizationSlot,
    pub slots: LocalizationSlots<'a>,
    pub overlays: Overlays<'a>,
    /// Host rotation; when `None` the view centres on the first contour
    /// feature.
    pub rotation: Option<Rotation>,
    pub selected_fields: &'a SelectedFields,
}

impl<'a> LocalizationPlot<'a> {
    pub fn new(selected_fields: &'a SelectedFields) -> Self {
        Self {
            localization: None,
            slot: LocalizationSlot::default(),
            slots: LocalizationSlots::default(),
            overlays: Overlays::default(),
            rotation: None,
            selected_fields,
        }
    }

    pub fn resolve(&self) -> Option<&'a Localization> {
        self.localization.or_else(|| self.slots.get(self.slot))
    }

    pub fn view(&self) -> PlotView<'a> {
        let Some(localization) = self.resolve() else {
            return PlotView::Loading {
                missing: vec!["localization"],
            };
        };
        let missing = localization.missing_fields();
        if !missing.is_empty() {
            return PlotView::Loading { missing };
        }

        let rotation = self.rotation.unwrap_or_else(|| default_rotation(localization));
        PlotView::Globe(
            GlobeProps::new(localization, self.selected_fields)
                .with_overlays(self.overlays)
                .with_rotation(Some(rotation)),
        )
    }

    /// Renders through `plot` unless the data is still loading. The renderer
    /// is not touched in the loading case.
    pub fn render(&self, plot: &mut GlobePlot) -> Result<PlotView<'a>, PlotError> {
        let view = self.view();
        match &view {
            PlotView::Loading { missing } => {
                debug!(?missing, "localization incomplete; showing loading state");
            }
            PlotView::Globe(props) => {
                plot.render(props)?;
            }
        }
        Ok(view)
    }
}

/// Rotation that centres the view on the first contour feature:
/// `[360 - lon, -lat, 0]`, or the identity when there is no coordinate.
pub fn default_rotation(localization: &Localization) -> Rotation {
    localization
        .contour
        .as_ref()
        .and_then(|c| c.features.first())
        .and_then(|f| f.geometry.as_ref())
        .and_then(|g| g.first_coordinate())
        .filter(|p| p.is_finite())
        .map(|p| Rotation::new(360.0 - p.lon_deg, -p.lat_deg, 0.0))
        .unwrap_or(Rotation::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::{LocalizationPlot, LocalizationSlot, LocalizationSlots, PlotView, default_rotation};
    use formats::{Feature, FeatureCollection, Geometry, Localization};
    use foundation::math::{LonLat, Rotation};
    use pretty_assertions::assert_eq;
    use scene::selection::SelectedFields;

    fn named(name: &str) -> Localization {
        Localization {
            id: Some(1),
            dateobs: Some("2017-08-17T12:41:04".into()),
            localization_name: Some(name.into()),
            contour: Some(FeatureCollection::new(vec![Feature::new(Geometry::Point(
                LonLat::new(197.45, -23.38),
            ))])),
        }
    }

    #[test]
    fn explicit_localization_wins_over_slots() {
        let sel = SelectedFields::new();
        let explicit = named("explicit");
        let cached = named("cached");
        let analysis = named("analysis");
        let mut plot = LocalizationPlot::new(&sel);
        plot.slots = LocalizationSlots {
            cached: Some(&cached),
            analysis: Some(&analysis),
        };

        assert_eq!(plot.resolve(), Some(&cached));
        plot.slot = LocalizationSlot::Analysis;
        assert_eq!(plot.resolve(), Some(&analysis));
        plot.localization = Some(&explicit);
        assert_eq!(plot.resolve(), Some(&explicit));
    }

    #[test]
    fn absent_localization_is_loading() {
        let sel = SelectedFields::new();
        let plot = LocalizationPlot::new(&sel);
        assert_eq!(
            plot.view(),
            PlotView::Loading {
                missing: vec!["localization"]
            }
        );
    }

    #[test]
    fn default_rotation_centres_first_feature() {
        let r = default_rotation(&named("x"));
        assert!((r.lambda - (360.0 - 197.45)).abs() < 1e-12);
        assert_eq!(r.phi, 23.38);
        assert_eq!(r.gamma, 0.0);
        assert_eq!(default_rotation(&Localization::default()), Rotation::IDENTITY);
    }

    #[test]
    fn explicit_rotation_is_kept() {
        let sel = SelectedFields::new();
        let loc = named("x");
        let mut plot = LocalizationPlot::new(&sel);
        plot.localization = Some(&loc);
        plot.rotation = Some(Rotation::new(1.0, 2.0, 3.0));
        let PlotView::Globe(props) = plot.view() else {
            panic!("expected globe view");
        };
        assert_eq!(props.rotation, Some(Rotation::new(1.0, 2.0, 3.0)));
    }
}
