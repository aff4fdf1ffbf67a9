//! Pointer interactions: click to toggle, drag to rotate.

use foundation::math::{Rotation, Vec2};
use runtime::EventKind;
use scene::Interaction;
use scene::picking::pick;
use tracing::debug;

use crate::error::PlotError;
use crate::props::{GlobeProps, PlotHost};
use crate::renderer::{DragState, GlobePlot};

/// Degrees of rotation per pixel of drag, before dividing by the scale.
pub const DRAG_SENSITIVITY: f64 = 75.0;

impl GlobePlot {
    /// Handles a click at `px` on the last drawn surface.
    ///
    /// A field toggles its id in the host's selection, pushes the current
    /// rotation to the host and redraws with the new selection. An
    /// observation toggles its local highlight and redraws. Returns what was
    /// hit, if anything.
    pub fn click(
        &mut self,
        props: &GlobeProps<'_>,
        host: &mut impl PlotHost,
        px: Vec2,
    ) -> Result<Option<Interaction>, PlotError> {
        let Some(hit) = pick(self.surface(), px) else {
            return Ok(None);
        };
        let rotation = self.rotation().unwrap_or(Rotation::IDENTITY);

        match &hit.interaction {
            Interaction::ToggleField(field_id) => {
                let selected = props.selected_fields.toggled(*field_id);
                host.set_rotation(rotation);
                host.set_selected_fields(selected.clone());
                let frame = self.force_redraw(&props.with_selected_fields(&selected), rotation)?;
                debug!(field_id, selected = selected.contains(*field_id), "field toggled");
                self.events
                    .record(frame, EventKind::FieldToggle, format!("field {field_id}"));
            }
            Interaction::ToggleObservation(key) => {
                let on = self.observations.toggle(key);
                let frame = self.force_redraw(props, rotation)?;
                debug!(observation = %key, highlighted = on, "observation toggled");
                self.events.record(
                    frame,
                    EventKind::ObservationToggle,
                    format!("observation {key}"),
                );
            }
        }
        Ok(Some(hit.interaction))
    }

    /// Starts a drag. Returns `false` (and ignores the gesture) unless the
    /// globe is orthographic and has been drawn.
    pub fn drag_start(&mut self, px: Vec2) -> bool {
        if !self.projection_kind().supports_free_rotation() || self.projection.is_none() {
            return false;
        }
        self.drag = Some(DragState { last_px: px });
        true
    }

    /// Rotates by the pointer delta, redraws and pushes the rotation to the
    /// host. Dragging levels the view, so roll resets to 0. Returns the new
    /// rotation, or `None` when no drag is active.
    pub fn drag_move(
        &mut self,
        props: &GlobeProps<'_>,
        host: &mut impl PlotHost,
        px: Vec2,
    ) -> Result<Option<Rotation>, PlotError> {
        let (Some(drag), Some(projection)) = (self.drag, self.projection) else {
            return Ok(None);
        };
        let k = DRAG_SENSITIVITY / projection.scale();
        let delta = px - drag.last_px;
        let r = projection.rotation();
        let rotation = Rotation::new(r.lambda + delta.x * k, r.phi - delta.y * k, 0.0);

        self.drag = Some(DragState { last_px: px });
        let frame = self.force_redraw(props, rotation)?;
        host.set_rotation(rotation);
        self.events
            .record(frame, EventKind::Drag, format!("{:?}", rotation.to_array()));
        Ok(Some(rotation))
    }

    pub fn drag_end(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PlotConfig;
    use crate::props::{GlobeProps, HostState};
    use crate::renderer::GlobePlot;
    use formats::Localization;
    use foundation::math::{Rotation, Vec2};
    use scene::selection::SelectedFields;

    #[test]
    fn drag_rotates_by_scaled_delta() {
        let loc = Localization::default();
        let sel = SelectedFields::new();
        let props = GlobeProps::new(&loc, &sel);
        let mut host = HostState::default();
        let mut plot = GlobePlot::new(PlotConfig::default()).unwrap();

        assert!(!plot.drag_start(Vec2::new(0.0, 0.0)), "nothing drawn yet");
        plot.render(&props).unwrap();
        assert!(plot.drag_start(Vec2::new(300.0, 300.0)));

        let scale = plot.projection().map(|p| p.scale()).unwrap();
        let r = plot
            .drag_move(&props, &mut host, Vec2::new(310.0, 290.0))
            .unwrap()
            .unwrap();
        let k = 75.0 / scale;
        assert!((r.lambda - 10.0 * k).abs() < 1e-9);
        assert!((r.phi - 10.0 * k).abs() < 1e-9);
        assert_eq!(host.rotation, Some(r));
        assert_eq!(plot.rotation(), Some(r));
        assert_eq!(plot.redraw_count(), 2);

        plot.drag_end();
        assert!(plot.drag_move(&props, &mut host, Vec2::new(0.0, 0.0)).unwrap().is_none());
    }

    #[test]
    fn drag_resets_roll() {
        let loc = Localization::default();
        let sel = SelectedFields::new();
        let props =
            GlobeProps::new(&loc, &sel).with_rotation(Some(Rotation::new(10.0, 20.0, 30.0)));
        let mut host = HostState::default();
        let mut plot = GlobePlot::new(PlotConfig::default()).unwrap();
        plot.render(&props).unwrap();
        assert_eq!(plot.rotation().map(|r| r.gamma), Some(30.0));

        assert!(plot.drag_start(Vec2::new(300.0, 300.0)));
        let r = plot
            .drag_move(&props, &mut host, Vec2::new(300.0, 300.0))
            .unwrap()
            .unwrap();
        assert_eq!(r, Rotation::new(10.0, 20.0, 0.0));
        assert_eq!(host.rotation, Some(r));
    }

    #[test]
    fn mollweide_ignores_drags() {
        let loc = Localization::default();
        let sel = SelectedFields::new();
        let config = PlotConfig {
            projection: "mollweide".into(),
            ..PlotConfig::default()
        };
        let mut plot = GlobePlot::new(config).unwrap();
        let props = GlobeProps::new(&loc, &sel).with_rotation(Some(Rotation::new(1.0, 2.0, 3.0)));
        plot.render(&props).unwrap();
        assert!(!plot.drag_start(Vec2::new(1.0, 1.0)));
        assert!(!plot.is_dragging());
    }
}
