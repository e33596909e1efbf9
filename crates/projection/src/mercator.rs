//! Spherical Web Mercator projection (EPSG:3857).
//!
//! x = R * lon
//! y = R * ln(tan(pi/4 + lat/2))
//!
//! The poles map to infinity, so latitudes of +/-90 degrees and beyond are
//! rejected rather than clamped.

use std::f64::consts::PI;

use geo_common::{CrsCode, GeographicPoint, ProjectedPoint};

use crate::transform::{check_geographic, check_projected, GeoTransform, ProjectionError};
use crate::EARTH_RADIUS;

/// Web Mercator on a sphere of radius [`EARTH_RADIUS`].
#[derive(Debug, Clone)]
pub struct WebMercator {
    radius: f64,
}

impl WebMercator {
    pub fn new() -> Self {
        Self {
            radius: EARTH_RADIUS,
        }
    }

    /// Half the width of the projected world (meters).
    pub fn max_extent(&self) -> f64 {
        PI * self.radius
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoTransform for WebMercator {
    fn is_separable(&self) -> bool {
        true
    }

    fn crs(&self) -> CrsCode {
        CrsCode::Epsg3857
    }

    fn to_projected(&self, point: GeographicPoint) -> Result<ProjectedPoint, ProjectionError> {
        check_geographic(point)?;
        if point.lat.abs() >= 90.0 {
            return Err(ProjectionError::InvalidCoordinate {
                x: point.lon,
                y: point.lat,
            });
        }

        let lat = point.lat.to_radians();
        let projected = ProjectedPoint::new(
            self.radius * point.lon.to_radians(),
            self.radius * (PI / 4.0 + lat / 2.0).tan().ln(),
        );
        check_projected(projected).map_err(|_| ProjectionError::InvalidCoordinate {
            x: point.lon,
            y: point.lat,
        })?;
        Ok(projected)
    }

    fn to_geographic(&self, point: ProjectedPoint) -> Result<GeographicPoint, ProjectionError> {
        check_projected(point)?;
        let lon = (point.x / self.radius).to_degrees();
        let lat = (2.0 * (point.y / self.radius).exp().atan() - PI / 2.0).to_degrees();
        Ok(GeographicPoint::new(lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_coords_approx_eq;

    #[test]
    fn test_origin() {
        let m = WebMercator::new();
        let p = m.to_projected(GeographicPoint::new(0.0, 0.0)).unwrap();
        assert_coords_approx_eq!((p.x, p.y), (0.0, 0.0), 1e-9);
    }

    #[test]
    fn test_known_extent() {
        let m = WebMercator::new();
        let p = m.to_projected(GeographicPoint::new(180.0, 0.0)).unwrap();
        assert!((p.x - 20037508.342789244).abs() < 1e-6);
        assert!((m.max_extent() - 20037508.342789244).abs() < 1e-6);

        // 85.0511287798 is the latitude where the Mercator square closes.
        let p = m
            .to_projected(GeographicPoint::new(0.0, 85.0511287798066))
            .unwrap();
        assert!((p.y - 20037508.342789244).abs() < 1e-2);
    }

    #[test]
    fn test_zurich_roundtrip() {
        let m = WebMercator::new();
        let geo = GeographicPoint::new(8.5417, 47.3769);
        let p = m.to_projected(geo).unwrap();
        assert!((p.x - 950_857.69).abs() < 0.01, "x={}", p.x);
        assert!((p.y - 6_003_812.20).abs() < 0.01, "y={}", p.y);

        let back = m.to_geographic(p).unwrap();
        assert_coords_approx_eq!((back.lon, back.lat), (geo.lon, geo.lat), 1e-9);
    }

    #[test]
    fn test_poles_rejected() {
        let m = WebMercator::new();
        assert!(matches!(
            m.to_projected(GeographicPoint::new(0.0, 90.0)),
            Err(ProjectionError::InvalidCoordinate { .. })
        ));
        assert!(m.to_projected(GeographicPoint::new(0.0, -91.0)).is_err());
    }
}
