//! Coordinate reference system transformations.
//!
//! Implements the projections the scenario pipeline is configured with from
//! scratch, without external dependencies. Every projection converts between
//! WGS84 longitude/latitude and a linear projected plane in meters.

pub mod geographic;
pub mod mercator;
pub mod transform;

pub use geographic::{Planar, PlateCarree};
pub use mercator::WebMercator;
pub use transform::{transform_for, GeoTransform, ProjectionError};

/// Spherical earth radius used by EPSG:3857 and EPSG:4087 (meters).
pub const EARTH_RADIUS: f64 = 6_378_137.0;
