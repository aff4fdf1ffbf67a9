use foundation::math::LonLat;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GraticuleConfig {
    /// Spacing of minor meridians and parallels, degrees.
    pub step_deg: f64,
    /// Minor meridians stop short of the poles at this latitude.
    pub minor_extent_lat: f64,
    /// Meridians at multiples of this run pole to pole.
    pub major_step_deg: f64,
    /// Sampling interval along each line, degrees.
    pub precision_deg: f64,
}

impl Default for GraticuleConfig {
    fn default() -> Self {
        Self {
            step_deg: 10.0,
            minor_extent_lat: 80.0,
            major_step_deg: 90.0,
            precision_deg: 2.5,
        }
    }
}

/// Meridians followed by parallels, as sampled polylines.
pub fn graticule_lines(config: GraticuleConfig) -> Vec<Vec<LonLat>> {
    let mut lines = Vec::new();
    let steps = (360.0 / config.step_deg).round() as i32;

    for i in 0..steps {
        let lon = -180.0 + f64::from(i) * config.step_deg;
        let major = (lon / config.major_step_deg).fract().abs() < 1e-9;
        let extent = if major { 90.0 } else { config.minor_extent_lat };
        lines.push(sample(-extent, extent, config.precision_deg, |lat| {
            LonLat::new(lon, lat)
        }));
    }

    let max = config.minor_extent_lat;
    let mut lat = -max;
    while lat <= max + 1e-9 {
        let l = lat;
        lines.push(sample(-180.0, 180.0, config.precision_deg, |lon| {
            LonLat::new(lon, l)
        }));
        lat += config.step_deg;
    }

    lines
}

fn sample(from: f64, to: f64, step: f64, point: impl Fn(f64) -> LonLat) -> Vec<LonLat> {
    let n = ((to - from) / step).ceil().max(1.0) as usize;
    (0..=n)
        .map(|i| point(from + (to - from) * i as f64 / n as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{GraticuleConfig, graticule_lines};

    #[test]
    fn default_grid_has_expected_lines() {
        let lines = graticule_lines(GraticuleConfig::default());
        // 36 meridians and 17 parallels (-80..=80).
        assert_eq!(lines.len(), 36 + 17);

        let prime = &lines[18];
        assert_eq!(prime[0].lon_deg, 0.0);
        assert_eq!(prime[0].lat_deg, -90.0);
        assert_eq!(prime.last().map(|p| p.lat_deg), Some(90.0));

        let minor = &lines[19];
        assert_eq!(minor[0].lat_deg, -80.0);

        let equator = &lines[36 + 8];
        assert!(equator.iter().all(|p| p.lat_deg.abs() < 1e-9));
        assert_eq!(equator.first().map(|p| p.lon_deg), Some(-180.0));
        assert_eq!(equator.last().map(|p| p.lon_deg), Some(180.0));
    }
}
