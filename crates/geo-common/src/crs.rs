//! Coordinate Reference System codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate reference systems the scenario pipeline can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    #[default]
    Epsg3857,
    /// World Equidistant Cylindrical (meters)
    Epsg4087,
    /// Local engineering plane where projected == geographic coordinates.
    /// Only meaningful for synthetic data.
    LocalPlanar,
}

impl CrsCode {
    /// Parse a CRS string.
    ///
    /// Accepts formats like:
    /// - "EPSG:3857"
    /// - "epsg:4326"
    /// - "CRS:84" (equivalent to EPSG:4326)
    /// - "LOCAL" (identity plane)
    pub fn from_code_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            "EPSG:4087" => Ok(CrsCode::Epsg4087),
            "LOCAL" | "LOCAL:PLANAR" => Ok(CrsCode::LocalPlanar),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Map a numeric EPSG code (as stored in GeoTIFF keys) to a CRS.
    pub fn from_epsg(code: u16) -> Option<Self> {
        match code {
            4326 => Some(CrsCode::Epsg4326),
            3857 => Some(CrsCode::Epsg3857),
            4087 => Some(CrsCode::Epsg4087),
            _ => None,
        }
    }

    /// Numeric EPSG code, `None` for the local plane.
    pub fn epsg(&self) -> Option<u16> {
        match self {
            CrsCode::Epsg4326 => Some(4326),
            CrsCode::Epsg3857 => Some(3857),
            CrsCode::Epsg4087 => Some(4087),
            CrsCode::LocalPlanar => None,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg() {
            Some(code) => write!(f, "EPSG:{}", code),
            None => write!(f, "LOCAL:PLANAR"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
