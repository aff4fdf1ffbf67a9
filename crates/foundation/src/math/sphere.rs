//! Spherical coordinates and rotations on the celestial sphere.
//!
//! Conventions:
//! - Longitudes and latitudes are in degrees at API boundaries, radians inside.
//! - A `Rotation` is the `[lambda, phi, gamma]` Euler triple of a rotated
//!   projection: spin about the polar axis first, then tilt, then roll.

use std::f64::consts::{PI, TAU};

use super::Vec3;

/// Angular tolerance (radians) shared by the projection code.
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn from_radians(lon_rad: f64, lat_rad: f64) -> Self {
        Self::new(lon_rad.to_degrees(), lat_rad.to_degrees())
    }

    pub fn to_radians(self) -> (f64, f64) {
        (self.lon_deg.to_radians(), self.lat_deg.to_radians())
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }

    /// Unit vector with +x toward (0, 0) and +z toward the north pole.
    pub fn to_unit_vector(self) -> Vec3 {
        let (lon, lat) = self.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    pub fn from_unit_vector(v: Vec3) -> Self {
        let v = v.normalize();
        Self::from_radians(v.y.atan2(v.x), v.z.clamp(-1.0, 1.0).asin())
    }
}

fn wrap_lambda(lambda: f64) -> f64 {
    (lambda + PI).rem_euclid(TAU) - PI
}

fn haversin(x: f64) -> f64 {
    let s = (x / 2.0).sin();
    s * s
}

/// Great-circle distance between two points, in radians.
///
/// Uses the haversine form, which stays well conditioned for small angles.
/// Antipodal points are exactly `PI` apart.
pub fn great_circle_distance(a: LonLat, b: LonLat) -> f64 {
    let (lon0, lat0) = a.to_radians();
    let (lon1, lat1) = b.to_radians();
    let h = haversin(lat1 - lat0) + lat0.cos() * lat1.cos() * haversin(lon1 - lon0);
    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Three-axis view rotation, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
    pub gamma: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        lambda: 0.0,
        phi: 0.0,
        gamma: 0.0,
    };

    pub fn new(lambda: f64, phi: f64, gamma: f64) -> Self {
        Self { lambda, phi, gamma }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.lambda, self.phi, self.gamma]
    }

    /// Same spin and tilt with the roll forced to zero.
    pub fn without_roll(self) -> Self {
        Self::new(self.lambda, self.phi, 0.0)
    }

    pub fn is_finite(self) -> bool {
        self.lambda.is_finite() && self.phi.is_finite() && self.gamma.is_finite()
    }

    /// Rotates `p` into view space. Output longitude is in `[-180, 180)`.
    pub fn apply(&self, p: LonLat) -> LonLat {
        let (lon, lat) = p.to_radians();
        let lon = wrap_lambda(lon + self.lambda.to_radians());
        let (lon, lat) = self.phi_gamma_forward(lon, lat);
        LonLat::from_radians(lon, lat)
    }

    /// Inverse of [`Rotation::apply`].
    pub fn invert(&self, p: LonLat) -> LonLat {
        let (lon, lat) = p.to_radians();
        let (lon, lat) = self.phi_gamma_invert(lon, lat);
        let lon = wrap_lambda(lon - self.lambda.to_radians());
        LonLat::from_radians(lon, lat)
    }

    fn phi_gamma_forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        if self.phi == 0.0 && self.gamma == 0.0 {
            return (lon, lat);
        }
        let (sin_dphi, cos_dphi) = self.phi.to_radians().sin_cos();
        let (sin_dgamma, cos_dgamma) = self.gamma.to_radians().sin_cos();

        let cos_lat = lat.cos();
        let x = lon.cos() * cos_lat;
        let y = lon.sin() * cos_lat;
        let z = lat.sin();
        let k = z * cos_dphi + x * sin_dphi;

        (
            (y * cos_dgamma - k * sin_dgamma).atan2(x * cos_dphi - z * sin_dphi),
            (k * cos_dgamma + y * sin_dgamma).clamp(-1.0, 1.0).asin(),
        )
    }

    fn phi_gamma_invert(&self, lon: f64, lat: f64) -> (f64, f64) {
        if self.phi == 0.0 && self.gamma == 0.0 {
            return (lon, lat);
        }
        let (sin_dphi, cos_dphi) = self.phi.to_radians().sin_cos();
        let (sin_dgamma, cos_dgamma) = self.gamma.to_radians().sin_cos();

        let cos_lat = lat.cos();
        let x = lon.cos() * cos_lat;
        let y = lon.sin() * cos_lat;
        let z = lat.sin();
        let k = z * cos_dgamma - y * sin_dgamma;

        (
            (y * cos_dgamma + z * sin_dgamma).atan2(x * cos_dphi + k * sin_dphi),
            (k * cos_dphi - x * sin_dphi).clamp(-1.0, 1.0).asin(),
        )
    }
}
