//! Globe projections: orthographic and Mollweide.
//!
//! A `Projection` maps sky coordinates to viewport pixels:
//! rotate into view space, apply the raw projection, then scale and translate
//! (screen `y` grows downward).

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};
use std::str::FromStr;

use super::sphere::{EPSILON, LonLat, Rotation};
use super::vec::Vec2;

const MOLLWEIDE_CX: f64 = 2.0 * SQRT_2 / PI;
const MOLLWEIDE_CY: f64 = SQRT_2;
const MOLLWEIDE_MAX_ITERATIONS: usize = 30;

/// Fraction of the viewport the projected sphere occupies.
const VIEWPORT_FILL: f64 = 0.95;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    Orthographic,
    Mollweide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProjection(pub String);

impl std::fmt::Display for UnknownProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown projection type {:?} (expected \"orthographic\" or \"mollweide\")",
            self.0
        )
    }
}

impl std::error::Error for UnknownProjection {}

impl ProjectionKind {
    pub const fn name(self) -> &'static str {
        match self {
            ProjectionKind::Orthographic => "orthographic",
            ProjectionKind::Mollweide => "mollweide",
        }
    }

    /// Largest great-circle distance (radians) from the view centre at which
    /// a point still counts as facing the viewer. The comparison is strict.
    pub const fn visibility_threshold(self) -> f64 {
        match self {
            ProjectionKind::Orthographic => FRAC_PI_2,
            ProjectionKind::Mollweide => PI,
        }
    }

    /// Whether pointer drags rotate the view.
    pub const fn supports_free_rotation(self) -> bool {
        matches!(self, ProjectionKind::Orthographic)
    }
}

impl FromStr for ProjectionKind {
    type Err = UnknownProjection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orthographic" => Ok(ProjectionKind::Orthographic),
            "mollweide" => Ok(ProjectionKind::Mollweide),
            other => Err(UnknownProjection(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    kind: ProjectionKind,
    scale: f64,
    translate: Vec2,
    rotation: Rotation,
}

impl Projection {
    /// Builds a projection sized for a `width` x `height` viewport, centred.
    pub fn new(kind: ProjectionKind, width: f64, height: f64, rotation: Rotation) -> Self {
        let scale = match kind {
            ProjectionKind::Orthographic => VIEWPORT_FILL * width.min(height) / 2.0,
            ProjectionKind::Mollweide => {
                // The Mollweide ellipse spans 4*sqrt(2) by 2*sqrt(2) radii.
                VIEWPORT_FILL * (width / (4.0 * SQRT_2)).min(height / (2.0 * SQRT_2))
            }
        };
        let mut p = Self {
            kind,
            scale,
            translate: Vec2::new(width / 2.0, height / 2.0),
            rotation: Rotation::IDENTITY,
        };
        p.set_rotation(rotation);
        p
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Mollweide views never roll; the roll component is dropped.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = match self.kind {
            ProjectionKind::Orthographic => rotation,
            ProjectionKind::Mollweide => rotation.without_roll(),
        };
    }

    pub fn visibility_threshold(&self) -> f64 {
        self.kind.visibility_threshold()
    }

    /// Sky coordinate under the viewport centre: the inverse projection of
    /// `translate`.
    pub fn view_center(&self) -> LonLat {
        self.invert(self.translate)
            .unwrap_or_else(|| self.rotation.invert(LonLat::new(0.0, 0.0)))
    }

    /// Projects a sky coordinate. Returns `None` on the clipped far side of
    /// an orthographic globe.
    pub fn project(&self, p: LonLat) -> Option<Vec2> {
        if !p.is_finite() {
            return None;
        }
        let view = self.rotation.apply(p);
        let (lon, lat) = view.to_radians();
        if self.kind == ProjectionKind::Orthographic && lat.cos() * lon.cos() < -EPSILON {
            return None;
        }
        Some(self.project_view(view))
    }

    /// Projects an already-rotated (view space) coordinate without clipping.
    pub fn project_view(&self, view: LonLat) -> Vec2 {
        let (lon, lat) = view.to_radians();
        let (x, y) = match self.kind {
            ProjectionKind::Orthographic => (lat.cos() * lon.sin(), lat.sin()),
            ProjectionKind::Mollweide => {
                let theta = mollweide_theta(lat);
                (MOLLWEIDE_CX * lon * theta.cos(), MOLLWEIDE_CY * theta.sin())
            }
        };
        Vec2::new(
            self.translate.x + self.scale * x,
            self.translate.y - self.scale * y,
        )
    }

    /// Pixel to sky coordinate; `None` outside the projected sphere.
    pub fn invert(&self, px: Vec2) -> Option<LonLat> {
        let x = (px.x - self.translate.x) / self.scale;
        let y = (self.translate.y - px.y) / self.scale;
        let view = match self.kind {
            ProjectionKind::Orthographic => {
                let rho = (x * x + y * y).sqrt();
                if rho > 1.0 + EPSILON {
                    return None;
                }
                if rho == 0.0 {
                    LonLat::new(0.0, 0.0)
                } else {
                    let c = rho.min(1.0).asin();
                    let (sin_c, cos_c) = c.sin_cos();
                    LonLat::from_radians(
                        (x * sin_c).atan2(rho * cos_c),
                        (y * sin_c / rho).clamp(-1.0, 1.0).asin(),
                    )
                }
            }
            ProjectionKind::Mollweide => {
                let ex = x / (2.0 * MOLLWEIDE_CX * FRAC_PI_2);
                let ey = y / MOLLWEIDE_CY;
                if ex * ex + ey * ey > 1.0 + EPSILON {
                    return None;
                }
                let theta = ey.clamp(-1.0, 1.0).asin();
                let cos_theta = theta.cos();
                let lon = if cos_theta.abs() < EPSILON {
                    0.0
                } else {
                    x / (MOLLWEIDE_CX * cos_theta)
                };
                let lat = ((2.0 * theta + (2.0 * theta).sin()) / PI)
                    .clamp(-1.0, 1.0)
                    .asin();
                LonLat::from_radians(lon, lat)
            }
        };
        Some(self.rotation.invert(view))
    }

    /// Centre of the projected sphere outline in pixels.
    pub fn sphere_center(&self) -> Vec2 {
        self.translate
    }
}

/// Solves `2θ + sin 2θ = π sin φ` for the auxiliary Mollweide angle.
fn mollweide_theta(lat: f64) -> f64 {
    let target = PI * lat.sin();
    let mut phi = lat;
    for _ in 0..MOLLWEIDE_MAX_ITERATIONS {
        let delta = (phi + phi.sin() - target) / (1.0 + phi.cos());
        phi -= delta;
        if delta.abs() <= EPSILON || !delta.is_finite() {
            break;
        }
    }
    if phi.is_finite() {
        phi / 2.0
    } else {
        lat.signum() * FRAC_PI_2
    }
}

#[cfg(test)]
mod tests {
    use super::{Projection, ProjectionKind};
    use crate::math::{LonLat, Rotation, Vec2};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn parses_known_kinds_and_rejects_others() {
        assert_eq!(
            "orthographic".parse::<ProjectionKind>(),
            Ok(ProjectionKind::Orthographic)
        );
        assert_eq!(
            "mollweide".parse::<ProjectionKind>(),
            Ok(ProjectionKind::Mollweide)
        );
        let err = "mercator".parse::<ProjectionKind>().unwrap_err();
        assert_eq!(err.0, "mercator");
    }

    #[test]
    fn thresholds_per_family() {
        assert_eq!(ProjectionKind::Orthographic.visibility_threshold(), FRAC_PI_2);
        assert_eq!(ProjectionKind::Mollweide.visibility_threshold(), PI);
    }

    #[test]
    fn orthographic_centre_maps_to_viewport_centre() {
        let p = Projection::new(
            ProjectionKind::Orthographic,
            600.0,
            600.0,
            Rotation::new(-45.0, -10.0, 0.0),
        );
        let px = p.project(LonLat::new(45.0, 10.0)).unwrap();
        assert_close(px.x, 300.0, 1e-9);
        assert_close(px.y, 300.0, 1e-9);
    }

    #[test]
    fn orthographic_clips_far_side() {
        let p = Projection::new(ProjectionKind::Orthographic, 600.0, 600.0, Rotation::IDENTITY);
        assert!(p.project(LonLat::new(180.0, 0.0)).is_none());
        assert!(p.project(LonLat::new(60.0, 0.0)).is_some());
    }

    #[test]
    fn orthographic_invert_round_trip() {
        let p = Projection::new(
            ProjectionKind::Orthographic,
            600.0,
            400.0,
            Rotation::new(20.0, -30.0, 5.0),
        );
        let sky = LonLat::new(-25.0, 40.0);
        let px = p.project(sky).unwrap();
        let back = p.invert(px).unwrap();
        assert_close(back.lon_deg, sky.lon_deg, 1e-6);
        assert_close(back.lat_deg, sky.lat_deg, 1e-6);
        assert!(p.invert(Vec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn mollweide_invert_round_trip() {
        let p = Projection::new(
            ProjectionKind::Mollweide,
            800.0,
            400.0,
            Rotation::new(30.0, 0.0, 0.0),
        );
        let sky = LonLat::new(100.0, -35.0);
        let px = p.project(sky).unwrap();
        let back = p.invert(px).unwrap();
        assert_close(back.lon_deg, sky.lon_deg, 1e-5);
        assert_close(back.lat_deg, sky.lat_deg, 1e-5);
    }

    #[test]
    fn mollweide_drops_roll() {
        let mut p = Projection::new(
            ProjectionKind::Mollweide,
            600.0,
            600.0,
            Rotation::new(10.0, 5.0, 40.0),
        );
        assert_eq!(p.rotation(), Rotation::new(10.0, 5.0, 0.0));
        p.set_rotation(Rotation::new(1.0, 2.0, 3.0));
        assert_eq!(p.rotation().gamma, 0.0);
    }

    #[test]
    fn mollweide_poles_project_to_top_and_bottom() {
        let p = Projection::new(ProjectionKind::Mollweide, 600.0, 600.0, Rotation::IDENTITY);
        let north = p.project(LonLat::new(0.0, 90.0)).unwrap();
        let south = p.project(LonLat::new(0.0, -90.0)).unwrap();
        assert_close(north.x, 300.0, 1e-6);
        assert!(north.y < 300.0);
        assert_close(north.y + south.y, 600.0, 1e-6);
    }

    #[test]
    fn view_center_follows_rotation() {
        let p = Projection::new(
            ProjectionKind::Orthographic,
            600.0,
            600.0,
            Rotation::new(-120.0, 30.0, 0.0),
        );
        let c = p.view_center();
        assert_close(c.lon_deg, 120.0, 1e-9);
        assert_close(c.lat_deg, -30.0, 1e-9);
    }
}
