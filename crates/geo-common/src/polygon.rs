//! User-drawn polygons in geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::bbox::GeographicBounds;
use crate::point::GeographicPoint;

/// A closed ring of geographic vertices.
///
/// The ring may or may not repeat its first vertex at the end; both forms are
/// treated the same. Self-intersection is not checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<GeographicPoint>,
}

impl Polygon {
    pub fn new(vertices: Vec<GeographicPoint>) -> Self {
        Self { vertices }
    }

    /// Build a polygon from `(lon, lat)` tuples.
    pub fn from_lon_lat(coords: &[(f64, f64)]) -> Self {
        Self {
            vertices: coords
                .iter()
                .map(|&(lon, lat)| GeographicPoint::new(lon, lat))
                .collect(),
        }
    }

    /// Vertex ring without consecutive duplicates and without the closing
    /// vertex.
    pub fn distinct_ring(&self) -> Vec<GeographicPoint> {
        let mut ring: Vec<GeographicPoint> = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if ring.last() != Some(v) {
                ring.push(*v);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring
    }

    /// Shoelace area in square degrees. Positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let ring = self.distinct_ring();
        if ring.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            sum += a.lon * b.lat - b.lon * a.lat;
        }
        sum / 2.0
    }

    /// Fewer than three distinct vertices, non-finite vertices, or every
    /// vertex on one line.
    ///
    /// A self-intersecting ring can have zero signed area and still enclose
    /// pixels, so collinearity is tested directly.
    pub fn is_degenerate(&self) -> bool {
        let ring = self.distinct_ring();
        if ring.len() < 3 || ring.iter().any(|v| !v.is_finite()) {
            return true;
        }
        let (a, b) = (ring[0], ring[1]);
        let (abx, aby) = (b.lon - a.lon, b.lat - a.lat);
        let ab_len = abx.hypot(aby);
        ring[2..].iter().all(|c| {
            let (acx, acy) = (c.lon - a.lon, c.lat - a.lat);
            let cross = abx * acy - aby * acx;
            // |cross| = |ab| |ac| sin(angle); the tolerance scales with the edges.
            cross.abs() <= 4.0 * f64::EPSILON * ab_len * acx.hypot(acy)
        })
    }

    /// Geographic envelope of the ring, `None` when it has no vertices.
    pub fn envelope(&self) -> Option<GeographicBounds> {
        GeographicBounds::from_polygons(std::slice::from_ref(self))
    }
}
