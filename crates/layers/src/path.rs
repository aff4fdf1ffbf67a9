//! Geometry to screen-space paths.
//!
//! Segments are densified along great circles before projection so long
//! edges curve with the globe. Orthographic output is clipped at the horizon;
//! Mollweide output is cut at the antimeridian seam of the rotated view.

use foundation::math::{LonLat, Projection, ProjectionKind, Vec2, Vec3};
use formats::Geometry;
use scene::Shape;

/// Maximum angular length (degrees) of a segment before projection.
pub const DENSIFY_STEP_DEG: f64 = 2.0;

/// Radius of point markers drawn from GeoJSON points.
pub const POINT_RADIUS_PX: f64 = 4.5;

const OUTLINE_SAMPLES: usize = 180;

#[derive(Debug, Copy, Clone)]
pub struct PathGenerator<'a> {
    projection: &'a Projection,
}

impl<'a> PathGenerator<'a> {
    pub fn new(projection: &'a Projection) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &'a Projection {
        self.projection
    }

    /// Shape for a GeoJSON geometry. `area` forces line work to be treated as
    /// closed rings (footprints are often shipped as MultiLineStrings).
    pub fn shape(&self, geometry: &Geometry, area: bool) -> Option<Shape> {
        let rings = match geometry {
            Geometry::Point(p) => {
                let center = self.projection.project(*p)?;
                return Some(Shape::Circle {
                    center,
                    radius: POINT_RADIUS_PX,
                });
            }
            Geometry::MultiPoint(_) => return None,
            Geometry::LineString(line) => self.lines(std::slice::from_ref(line), area),
            Geometry::MultiLineString(lines) => self.lines(lines, area),
            Geometry::Polygon(rings) => self.lines(rings, true),
            Geometry::MultiPolygon(polys) => {
                let all: Vec<Vec<LonLat>> = polys.iter().flatten().cloned().collect();
                self.lines(&all, true)
            }
        };
        let closed = area || matches!(geometry, Geometry::Polygon(_) | Geometry::MultiPolygon(_));
        if rings.is_empty() {
            return None;
        }
        Some(Shape::Path { rings, closed })
    }

    fn lines(&self, lines: &[Vec<LonLat>], closed: bool) -> Vec<Vec<Vec2>> {
        let mut out = Vec::new();
        for line in lines {
            if closed {
                out.extend(self.ring(line));
            } else {
                out.extend(self.polyline(line));
            }
        }
        out
    }

    /// Projects an open polyline, splitting it wherever it leaves the view.
    pub fn polyline(&self, points: &[LonLat]) -> Vec<Vec<Vec2>> {
        let view = self.view_vectors(&densify(points, false));
        let mut out = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();

        for pair in view.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match self.projection.kind() {
                ProjectionKind::Orthographic => {
                    let (a_in, b_in) = (a.x >= 0.0, b.x >= 0.0);
                    if a_in && current.is_empty() {
                        current.push(self.screen(a));
                    }
                    match (a_in, b_in) {
                        (true, true) => current.push(self.screen(b)),
                        (true, false) => {
                            current.push(self.screen(horizon_crossing(a, b)));
                            flush(&mut out, &mut current);
                        }
                        (false, true) => {
                            current.push(self.screen(horizon_crossing(a, b)));
                            current.push(self.screen(b));
                        }
                        (false, false) => {}
                    }
                }
                ProjectionKind::Mollweide => {
                    if current.is_empty() {
                        current.push(self.screen(a));
                    }
                    if crosses_seam(a, b) {
                        flush(&mut out, &mut current);
                        current.push(self.screen(b));
                    } else {
                        current.push(self.screen(b));
                    }
                }
            }
        }
        flush(&mut out, &mut current);
        out
    }

    /// Projects a closed ring. Returns nothing when the ring is entirely on
    /// the far side of an orthographic globe.
    ///
    /// Hidden stretches of a partially visible ring are pulled onto the limb
    /// at the same azimuth; rings straddling the Mollweide seam are held on
    /// the side of their first vertex.
    pub fn ring(&self, points: &[LonLat]) -> Option<Vec<Vec2>> {
        let dense = densify(points, true);
        if dense.len() < 3 {
            return None;
        }
        let view = self.view_vectors(&dense);

        let projected: Vec<Vec2> = match self.projection.kind() {
            ProjectionKind::Orthographic => {
                if view.iter().all(|v| v.x < 0.0) {
                    return None;
                }
                let mut ring = Vec::with_capacity(view.len());
                for (i, v) in view.iter().enumerate() {
                    let next = view[(i + 1) % view.len()];
                    if v.x >= 0.0 {
                        ring.push(self.screen(*v));
                    } else {
                        ring.push(self.screen(onto_limb(*v)));
                    }
                    if (v.x >= 0.0) != (next.x >= 0.0) {
                        ring.push(self.screen(horizon_crossing(*v, next)));
                    }
                }
                ring
            }
            ProjectionKind::Mollweide => {
                let side = LonLat::from_unit_vector(view[0]).lon_deg.signum();
                view.iter()
                    .map(|v| {
                        let mut ll = LonLat::from_unit_vector(*v);
                        if ll.lon_deg.signum() != side && ll.lon_deg.abs() > 90.0 {
                            ll.lon_deg = side * 180.0;
                        }
                        self.projection.project_view(ll)
                    })
                    .collect()
            }
        };
        Some(projected)
    }

    /// Outline of the whole sphere (the globe disc or the Mollweide ellipse).
    pub fn sphere_outline(&self) -> Vec<Vec2> {
        let p = self.projection;
        match p.kind() {
            ProjectionKind::Orthographic => {
                let c = p.sphere_center();
                (0..OUTLINE_SAMPLES)
                    .map(|i| {
                        let t = i as f64 / OUTLINE_SAMPLES as f64 * std::f64::consts::TAU;
                        Vec2::new(c.x + p.scale() * t.cos(), c.y + p.scale() * t.sin())
                    })
                    .collect()
            }
            ProjectionKind::Mollweide => {
                let half = OUTLINE_SAMPLES / 2;
                let east = (0..=half).map(|i| {
                    let lat = 90.0 - 180.0 * i as f64 / half as f64;
                    p.project_view(LonLat::new(180.0, lat))
                });
                let west = (0..=half).map(|i| {
                    let lat = -90.0 + 180.0 * i as f64 / half as f64;
                    p.project_view(LonLat::new(-180.0, lat))
                });
                east.chain(west).collect()
            }
        }
    }

    fn view_vectors(&self, points: &[LonLat]) -> Vec<Vec3> {
        let rotation = self.projection.rotation();
        points
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| rotation.apply(*p).to_unit_vector())
            .collect()
    }

    fn screen(&self, view: Vec3) -> Vec2 {
        self.projection.project_view(LonLat::from_unit_vector(view))
    }
}

fn flush(out: &mut Vec<Vec<Vec2>>, current: &mut Vec<Vec2>) {
    if current.len() >= 2 {
        out.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Point where the great circle from `a` to `b` meets the `x = 0` horizon.
fn horizon_crossing(a: Vec3, b: Vec3) -> Vec3 {
    let t = a.x / (a.x - b.x);
    (a + (b - a).scale(t)).normalize()
}

/// Nearest limb point to a hidden vector (same azimuth around the view axis).
fn onto_limb(v: Vec3) -> Vec3 {
    let limb = Vec3::new(0.0, v.y, v.z);
    if limb.length() == 0.0 {
        return Vec3::new(0.0, 0.0, 1.0);
    }
    limb.normalize()
}

/// Whether the short segment `a`-`b` wraps through the back meridian.
fn crosses_seam(a: Vec3, b: Vec3) -> bool {
    a.x < 0.0 && b.x < 0.0 && (a.y >= 0.0) != (b.y >= 0.0)
}

/// Inserts great-circle samples so no segment exceeds `DENSIFY_STEP_DEG`.
/// Closed rings also densify the closing edge and drop a repeated last vertex.
pub fn densify(points: &[LonLat], closed: bool) -> Vec<LonLat> {
    let mut pts: Vec<LonLat> = points.iter().copied().filter(|p| p.is_finite()).collect();
    if closed && pts.len() >= 2 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 2 {
        return pts;
    }

    let mut out = Vec::with_capacity(pts.len());
    let edges = if closed { pts.len() } else { pts.len() - 1 };
    for i in 0..edges {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        out.push(a);
        let (va, vb) = (a.to_unit_vector(), b.to_unit_vector());
        let angle = va.dot(vb).clamp(-1.0, 1.0).acos().to_degrees();
        let steps = (angle / DENSIFY_STEP_DEG).ceil() as usize;
        for s in 1..steps {
            let t = s as f64 / steps as f64;
            out.push(LonLat::from_unit_vector(va + (vb - va).scale(t)));
        }
    }
    if !closed && let Some(last) = pts.last() {
        out.push(*last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{PathGenerator, densify};
    use formats::Geometry;
    use foundation::math::{LonLat, Projection, ProjectionKind, Rotation};
    use scene::Shape;

    fn ortho() -> Projection {
        Projection::new(ProjectionKind::Orthographic, 600.0, 600.0, Rotation::IDENTITY)
    }

    #[test]
    fn densify_limits_segment_length() {
        let pts = densify(&[LonLat::new(0.0, 0.0), LonLat::new(9.0, 0.0)], false);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts.first(), Some(&LonLat::new(0.0, 0.0)));
        assert_eq!(pts.last(), Some(&LonLat::new(9.0, 0.0)));
    }

    #[test]
    fn densify_drops_closing_duplicate() {
        let ring = [
            LonLat::new(0.0, 0.0),
            LonLat::new(1.0, 0.0),
            LonLat::new(1.0, 1.0),
            LonLat::new(0.0, 0.0),
        ];
        let pts = densify(&ring, true);
        assert_eq!(pts.len(), 3);
    }

    #[test]
    fn polyline_is_split_at_horizon() {
        let p = ortho();
        let paths = PathGenerator::new(&p);
        // Runs from the front, across the back, and into view again.
        let parts = paths.polyline(&[
            LonLat::new(60.0, 0.0),
            LonLat::new(120.0, 0.0),
            LonLat::new(180.0, 0.0),
            LonLat::new(-120.0, 0.0),
            LonLat::new(-60.0, 0.0),
        ]);
        assert_eq!(parts.len(), 2);
        // Each part ends or starts on the limb (x = 300 +/- scale).
        let limb = p.scale();
        let end = parts[0].last().unwrap();
        assert!((end.x - (300.0 + limb)).abs() < 1e-6);
        let start = parts[1].first().unwrap();
        assert!((start.x - (300.0 - limb)).abs() < 1e-6);
    }

    #[test]
    fn far_side_ring_is_dropped() {
        let p = ortho();
        let paths = PathGenerator::new(&p);
        let ring = [
            LonLat::new(170.0, -5.0),
            LonLat::new(-170.0, -5.0),
            LonLat::new(-170.0, 5.0),
            LonLat::new(170.0, 5.0),
        ];
        assert!(paths.ring(&ring).is_none());
        let geometry = Geometry::Polygon(vec![ring.to_vec()]);
        assert!(paths.shape(&geometry, true).is_none());
    }

    #[test]
    fn straddling_ring_stays_inside_disc() {
        let p = ortho();
        let paths = PathGenerator::new(&p);
        let ring = paths
            .ring(&[
                LonLat::new(80.0, -10.0),
                LonLat::new(100.0, -10.0),
                LonLat::new(100.0, 10.0),
                LonLat::new(80.0, 10.0),
            ])
            .expect("partially visible");
        for v in ring {
            let r = ((v.x - 300.0).powi(2) + (v.y - 300.0).powi(2)).sqrt();
            assert!(r <= p.scale() + 1e-6, "vertex outside disc: {v:?}");
        }
    }

    #[test]
    fn points_become_markers_and_lines_stay_open() {
        let p = ortho();
        let paths = PathGenerator::new(&p);
        let marker = paths.shape(&Geometry::Point(LonLat::new(0.0, 0.0)), false);
        assert!(matches!(marker, Some(Shape::Circle { .. })));
        let line = paths.shape(
            &Geometry::LineString(vec![LonLat::new(0.0, 0.0), LonLat::new(5.0, 5.0)]),
            false,
        );
        assert!(matches!(line, Some(Shape::Path { closed: false, .. })));
        let area = paths.shape(
            &Geometry::MultiLineString(vec![vec![
                LonLat::new(0.0, 0.0),
                LonLat::new(5.0, 0.0),
                LonLat::new(5.0, 5.0),
            ]]),
            true,
        );
        assert!(matches!(area, Some(Shape::Path { closed: true, .. })));
    }

    #[test]
    fn mollweide_polyline_breaks_at_seam() {
        let p = Projection::new(ProjectionKind::Mollweide, 600.0, 600.0, Rotation::IDENTITY);
        let paths = PathGenerator::new(&p);
        let parts = paths.polyline(&[LonLat::new(170.0, 0.0), LonLat::new(-170.0, 0.0)]);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn mollweide_outline_is_closed_ellipse() {
        let p = Projection::new(ProjectionKind::Mollweide, 600.0, 600.0, Rotation::IDENTITY);
        let outline = PathGenerator::new(&p).sphere_outline();
        let max_x = outline.iter().map(|v| v.x).fold(f64::MIN, f64::max);
        let min_x = outline.iter().map(|v| v.x).fold(f64::MAX, f64::min);
        assert!((max_x + min_x - 600.0).abs() < 1e-6);
        assert!(max_x <= 600.0);
    }
}
