use foundation::math::{LonLat, Projection, great_circle_distance};

/// The spherical cap currently facing the viewer.
///
/// Convention:
/// - A point is inside iff its great-circle distance from `center` is
///   strictly less than `threshold` (radians).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewCap {
    pub center: LonLat,
    pub threshold: f64,
}

impl ViewCap {
    pub fn new(center: LonLat, threshold: f64) -> Self {
        Self { center, threshold }
    }

    /// Cap of `projection`: centred on the sky point under the viewport
    /// centre, sized by the projection family.
    pub fn of(projection: &Projection) -> Self {
        Self::new(projection.view_center(), projection.visibility_threshold())
    }

    pub fn distance(&self, p: LonLat) -> f64 {
        great_circle_distance(p, self.center)
    }

    /// Strict boundary test on a precomputed distance.
    pub fn admits_distance(&self, distance: f64) -> bool {
        distance < self.threshold
    }

    pub fn contains(&self, p: LonLat) -> bool {
        p.is_finite() && self.admits_distance(self.distance(p))
    }
}
