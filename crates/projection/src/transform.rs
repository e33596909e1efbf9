//! The geographic <-> projected transform seam.

use geo_common::{CrsCode, GeographicPoint, ProjectedPoint};
use thiserror::Error;

use crate::{Planar, PlateCarree, WebMercator};

/// Errors raised by coordinate transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// Input was non-finite, or its image under the projection would be.
    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    /// The CRS is not a linear projected system.
    #[error("unsupported projected CRS: {0}")]
    UnsupportedCrs(CrsCode),
}

/// A fixed pair of coordinate systems: WGS84 geographic and one projected
/// plane.
///
/// Implementations are pure and deterministic and never clamp.
pub trait GeoTransform: Send + Sync {
    /// The projected CRS this transform produces.
    fn crs(&self) -> CrsCode;

    /// Geographic (lon/lat degrees) to projected (meters).
    fn to_projected(&self, point: GeographicPoint) -> Result<ProjectedPoint, ProjectionError>;

    /// Projected (meters) to geographic (lon/lat degrees).
    fn to_geographic(&self, point: ProjectedPoint) -> Result<GeographicPoint, ProjectionError>;

    /// True when longitude depends only on x and latitude only on y (and
    /// vice versa), which lets grid sweeps transform once per row and column.
    fn is_separable(&self) -> bool {
        false
    }
}

/// Build the transform for a configured projected CRS.
pub fn transform_for(crs: CrsCode) -> Result<Box<dyn GeoTransform>, ProjectionError> {
    match crs {
        CrsCode::Epsg3857 => Ok(Box::new(WebMercator::new())),
        CrsCode::Epsg4087 => Ok(Box::new(PlateCarree::new())),
        CrsCode::LocalPlanar => Ok(Box::new(Planar)),
        CrsCode::Epsg4326 => Err(ProjectionError::UnsupportedCrs(crs)),
    }
}

pub(crate) fn check_geographic(point: GeographicPoint) -> Result<(), ProjectionError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidCoordinate {
            x: point.lon,
            y: point.lat,
        })
    }
}

pub(crate) fn check_projected(point: ProjectedPoint) -> Result<(), ProjectionError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::InvalidCoordinate {
            x: point.x,
            y: point.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_crs() {
        for crs in [CrsCode::Epsg3857, CrsCode::Epsg4087, CrsCode::LocalPlanar] {
            assert_eq!(transform_for(crs).unwrap().crs(), crs);
        }
        assert!(matches!(
            transform_for(CrsCode::Epsg4326),
            Err(ProjectionError::UnsupportedCrs(CrsCode::Epsg4326))
        ));
    }

    #[test]
    fn test_every_transform_rejects_nan() {
        for crs in [CrsCode::Epsg3857, CrsCode::Epsg4087, CrsCode::LocalPlanar] {
            let t = transform_for(crs).unwrap();
            assert!(t.to_projected(GeographicPoint::new(f64::NAN, 0.0)).is_err());
            assert!(t
                .to_geographic(ProjectedPoint::new(0.0, f64::INFINITY))
                .is_err());
        }
    }
}
