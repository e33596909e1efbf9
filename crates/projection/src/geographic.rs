//! Linear projections: equirectangular (EPSG:4087) and the identity plane.

use geo_common::{CrsCode, GeographicPoint, ProjectedPoint};

use crate::transform::{check_geographic, check_projected, GeoTransform, ProjectionError};
use crate::EARTH_RADIUS;

/// World Equidistant Cylindrical: x = R * lon, y = R * lat (radians).
#[derive(Debug, Clone)]
pub struct PlateCarree {
    radius: f64,
}

impl PlateCarree {
    pub fn new() -> Self {
        Self {
            radius: EARTH_RADIUS,
        }
    }
}

impl Default for PlateCarree {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoTransform for PlateCarree {
    fn is_separable(&self) -> bool {
        true
    }

    fn crs(&self) -> CrsCode {
        CrsCode::Epsg4087
    }

    fn to_projected(&self, point: GeographicPoint) -> Result<ProjectedPoint, ProjectionError> {
        check_geographic(point)?;
        Ok(ProjectedPoint::new(
            self.radius * point.lon.to_radians(),
            self.radius * point.lat.to_radians(),
        ))
    }

    fn to_geographic(&self, point: ProjectedPoint) -> Result<GeographicPoint, ProjectionError> {
        check_projected(point)?;
        Ok(GeographicPoint::new(
            (point.x / self.radius).to_degrees(),
            (point.y / self.radius).to_degrees(),
        ))
    }
}

/// Identity transform: projected coordinates are the geographic ones.
///
/// Lets tests describe rasters and drawings in the same numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planar;

impl GeoTransform for Planar {
    fn is_separable(&self) -> bool {
        true
    }

    fn crs(&self) -> CrsCode {
        CrsCode::LocalPlanar
    }

    fn to_projected(&self, point: GeographicPoint) -> Result<ProjectedPoint, ProjectionError> {
        check_geographic(point)?;
        Ok(ProjectedPoint::new(point.lon, point.lat))
    }

    fn to_geographic(&self, point: ProjectedPoint) -> Result<GeographicPoint, ProjectionError> {
        check_projected(point)?;
        Ok(GeographicPoint::new(point.x, point.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    #[test]
    fn test_plate_carree_one_degree() {
        let pc = PlateCarree::new();
        let p = pc.to_projected(GeographicPoint::new(1.0, 1.0)).unwrap();
        // One degree of arc on the 6378137 m sphere.
        assert_approx_eq!(p.x, 111_319.490_793, 1e-3);
        assert_approx_eq!(p.y, 111_319.490_793, 1e-3);
    }

    #[test]
    fn test_plate_carree_roundtrip() {
        let pc = PlateCarree::new();
        let geo = GeographicPoint::new(-122.4, 37.8);
        let back = pc.to_geographic(pc.to_projected(geo).unwrap()).unwrap();
        assert_coords_approx_eq!((back.lon, back.lat), (geo.lon, geo.lat), 1e-12);
    }

    #[test]
    fn test_planar_is_identity() {
        let p = Planar
            .to_projected(GeographicPoint::new(400.0, 600.0))
            .unwrap();
        assert_eq!((p.x, p.y), (400.0, 600.0));
        let g = Planar.to_geographic(ProjectedPoint::new(-3.5, 2.0)).unwrap();
        assert_eq!((g.lon, g.lat), (-3.5, 2.0));
    }
}
