use foundation::math::{Projection, ProjectionKind, Rotation, Vec2};
use layers::fields::FieldsLayer;
use layers::grid::{AngleTicksLayer, GraticuleLayer, SphereLayer};
use layers::markers::{GalaxiesLayer, SourcesLayer};
use layers::observations::ObservationsLayer;
use layers::skymap::SkymapLayer;
use layers::{DrawContext, Layer, is_enabled};
use runtime::{ChangeToken, EventBus, EventKind, Frame, RedrawObserver};
use scene::selection::ObservationSelection;
use scene::{LayerKind, Surface};
use tracing::debug;

use crate::config::PlotConfig;
use crate::error::PlotError;
use crate::props::GlobeProps;

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct DragState {
    pub last_px: Vec2,
}

/// The globe renderer.
///
/// Every redraw clears the surface and rebuilds all layers from the current
/// props. `render` only redraws when the change token moves; interactions
/// force a redraw.
#[derive(Debug)]
pub struct GlobePlot {
    config: PlotConfig,
    kind: ProjectionKind,
    pub(crate) projection: Option<Projection>,
    pub(crate) observer: RedrawObserver,
    pub(crate) events: EventBus,
    pub(crate) observations: ObservationSelection,
    data_hash: Option<String>,
    surface: Surface,
    pub(crate) drag: Option<DragState>,
}

impl GlobePlot {
    /// Fails on an unknown projection or empty viewport.
    pub fn new(config: PlotConfig) -> Result<Self, PlotError> {
        let kind = config.validate()?;
        let surface = Surface::new(config.width, config.height);
        Ok(Self {
            config,
            kind,
            projection: None,
            observer: RedrawObserver::new(),
            events: EventBus::new(),
            observations: ObservationSelection::new(),
            data_hash: None,
            surface,
            drag: None,
        })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn projection_kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Projection of the last redraw.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Rotation of the last redraw (roll is always 0 for Mollweide).
    pub fn rotation(&self) -> Option<Rotation> {
        self.projection.map(|p| p.rotation())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn observation_selection(&self) -> &ObservationSelection {
        &self.observations
    }

    pub fn redraw_count(&self) -> u64 {
        self.observer.redraw_count()
    }

    /// Redraws if anything the output depends on changed since the last
    /// redraw. Returns whether a redraw happened.
    pub fn render(&mut self, props: &GlobeProps<'_>) -> Result<bool, PlotError> {
        let rotation = self.resolve_rotation(props.rotation);
        let token = self.token(props, rotation)?;
        match self.observer.observe(token) {
            Some(frame) => {
                self.redraw(props, rotation, frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub(crate) fn force_redraw(
        &mut self,
        props: &GlobeProps<'_>,
        rotation: Rotation,
    ) -> Result<Frame, PlotError> {
        let rotation = self.resolve_rotation(Some(rotation));
        let token = self.token(props, rotation)?;
        let frame = self.observer.force(token);
        self.redraw(props, rotation, frame);
        Ok(frame)
    }

    fn resolve_rotation(&self, rotation: Option<Rotation>) -> Rotation {
        let r = rotation.unwrap_or(Rotation::IDENTITY);
        match self.kind {
            ProjectionKind::Orthographic => r,
            ProjectionKind::Mollweide => r.without_roll(),
        }
    }

    /// Builds the change token. New data drops observation highlights, since
    /// their keys belong to the previous bundle.
    fn token(
        &mut self,
        props: &GlobeProps<'_>,
        rotation: Rotation,
    ) -> Result<ChangeToken, PlotError> {
        let data = props.data_hash()?;
        if self.data_hash.as_deref() != Some(data.as_str()) {
            if self.data_hash.is_some() {
                debug!("data changed; clearing observation highlights");
            }
            self.observations.clear();
            self.data_hash = Some(data.clone());
        }
        Ok(ChangeToken::new(data)
            .with_rotation(rotation.to_array())
            .with_dimensions(self.config.width, self.config.height)
            .with_selection(props.selected_fields.iter())
            .with_local_revision(self.observations.revision()))
    }

    fn redraw(&mut self, props: &GlobeProps<'_>, rotation: Rotation, frame: Frame) {
        let projection = Projection::new(
            self.kind,
            f64::from(self.config.width),
            f64::from(self.config.height),
            rotation,
        );
        self.surface.reset(self.config.width, self.config.height);
        let ctx = DrawContext::new(&projection);
        let overlays = &props.overlays;
        let options = &overlays.options;

        let mut stack: Vec<Box<dyn Layer + '_>> = Vec::with_capacity(LayerKind::ALL.len());
        stack.push(Box::new(SphereLayer));
        stack.push(Box::new(GraticuleLayer::default()));
        stack.push(Box::new(AngleTicksLayer::default()));
        stack.push(Box::new(SkymapLayer {
            localization: props.localization,
        }));
        if let Some(instrument) = overlays.instrument {
            stack.push(Box::new(FieldsLayer {
                instrument,
                selected: props.selected_fields,
                airmass_threshold: self.config.airmass_threshold,
            }));
        }
        if let Some(bundle) = overlays.observations {
            stack.push(Box::new(ObservationsLayer {
                bundle,
                selection: &self.observations,
            }));
        }
        if let Some(bundle) = overlays.sources {
            stack.push(Box::new(SourcesLayer::new(bundle)));
        }
        if let Some(bundle) = overlays.galaxies {
            stack.push(Box::new(GalaxiesLayer::new(bundle)));
        }

        for kind in LayerKind::ALL {
            if !is_enabled(options, kind) {
                continue;
            }
            let mut drawn = false;
            for layer in stack.iter().filter(|l| l.kind() == kind) {
                layer.draw(&ctx, &mut self.surface);
                drawn = true;
            }
            if !drawn {
                debug!(layer = kind.name(), "layer enabled but has no data; skipped");
            }
        }

        debug!(
            frame = frame.index,
            projection = self.kind.name(),
            rotation = ?rotation.to_array(),
            elements = self.surface.elements().len(),
            "globe redraw"
        );
        self.events.record(
            frame,
            EventKind::Redraw,
            format!(
                "{} {:?} {} elements",
                self.kind.name(),
                projection.rotation().to_array(),
                self.surface.elements().len()
            ),
        );
        self.projection = Some(projection);
    }
}
