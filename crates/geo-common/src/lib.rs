//! Common types shared across the land-cover scenario workspace.

pub mod bbox;
pub mod crs;
pub mod point;
pub mod polygon;

pub use bbox::{BboxParseError, BoundingBox, GeographicBounds};
pub use crs::{CrsCode, CrsParseError};
pub use point::{GeographicPoint, PixelCoordinate, ProjectedPoint};
pub use polygon::Polygon;
