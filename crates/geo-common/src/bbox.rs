//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::point::{GeographicPoint, ProjectedPoint};
use crate::polygon::Polygon;

/// A bounding box in projected coordinates (meters for every supported
/// projected CRS).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Envelope of a set of projected points. Returns `None` for an empty set.
    pub fn from_corners<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = ProjectedPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    /// Parse a comma separated "minx,miny,maxx,maxy" string.
    pub fn from_str_list(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(v.to_string()))
        };

        Ok(Self {
            min_x: parse(parts[0])?,
            min_y: parse(parts[1])?,
            max_x: parse(parts[2])?,
            max_y: parse(parts[3])?,
        })
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when all coordinates are finite and the box has positive extent
    /// on both axes.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.max_x > self.min_x
            && self.max_y > self.min_y
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Compute the intersection of two bounding boxes.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Check if `other` lies entirely inside this bbox, with `tolerance`
    /// slack on every edge.
    pub fn contains_bbox(&self, other: &BoundingBox, tolerance: f64) -> bool {
        other.min_x >= self.min_x - tolerance
            && other.min_y >= self.min_y - tolerance
            && other.max_x <= self.max_x + tolerance
            && other.max_y <= self.max_y + tolerance
    }

    /// Grow the box outward by `dx` on the left and right and `dy` on the
    /// top and bottom.
    pub fn buffered(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

/// A bounding region in geographic (lon/lat degree) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeographicBounds {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Envelope of every vertex of every polygon in a drawing.
    ///
    /// Returns `None` when the drawing has no vertices at all.
    pub fn from_polygons(polygons: &[Polygon]) -> Option<Self> {
        let mut vertices = polygons.iter().flat_map(|p| p.vertices.iter());
        let first = vertices.next()?;
        let mut bounds = Self::new(first.lon, first.lat, first.lon, first.lat);
        for v in vertices {
            bounds.min_lon = bounds.min_lon.min(v.lon);
            bounds.min_lat = bounds.min_lat.min(v.lat);
            bounds.max_lon = bounds.max_lon.max(v.lon);
            bounds.max_lat = bounds.max_lat.max(v.lat);
        }
        Some(bounds)
    }

    /// The four corners, counter-clockwise from the south-west.
    pub fn corners(&self) -> [GeographicPoint; 4] {
        [
            GeographicPoint::new(self.min_lon, self.min_lat),
            GeographicPoint::new(self.max_lon, self.min_lat),
            GeographicPoint::new(self.max_lon, self.max_lat),
            GeographicPoint::new(self.min_lon, self.max_lat),
        ]
    }

    /// Check if a point is contained within these bounds (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bbox format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in bbox: {0}")]
    InvalidNumber(String),
}
