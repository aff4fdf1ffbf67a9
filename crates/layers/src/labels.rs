use foundation::math::{LonLat, Vec2};
use formats::Feature;
use scene::visibility::ViewCap;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub font_size_px: f64,
    pub color: String,
    /// Offset from the marker centre to the text baseline start.
    pub offset_px: Vec2,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size_px: 11.0,
            color: "#000000".to_string(),
            offset_px: Vec2::new(6.0, -6.0),
        }
    }
}

/// Label text for a point feature: its trimmed name.
pub fn label_text(feature: &Feature) -> Option<&str> {
    feature.name()
}

/// Whether a point feature is drawn as visible.
///
/// Requires a name or a non-zero credible level, a finite anchor coordinate,
/// and a great-circle distance from the view centre strictly below the cap.
pub fn is_feature_visible(cap: &ViewCap, feature: &Feature) -> bool {
    let labelled = feature.name().is_some() || feature.credible_level().is_some_and(|c| c != 0.0);
    if !labelled {
        return false;
    }
    let Some(anchor) = feature_anchor(feature) else {
        return false;
    };
    cap.contains(anchor)
}

/// First coordinate of the feature's geometry, when finite.
pub fn feature_anchor(feature: &Feature) -> Option<LonLat> {
    feature
        .geometry
        .as_ref()
        .and_then(|g| g.first_coordinate())
        .filter(|p| p.is_finite())
}

pub fn label_position(marker: Vec2, style: &LabelStyle) -> Vec2 {
    marker + style.offset_px
}
