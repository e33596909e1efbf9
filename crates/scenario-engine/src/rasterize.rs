//! Polygon rasterization onto a reference raster's pixel grid.
//!
//! A pixel is marked when its center, converted to geographic coordinates,
//! lies inside any polygon of the drawing under the even-odd rule.
//!
//! Boundary convention: the crossing test uses the half-open rule
//! `(yi > py) != (yj > py)` and `px < x_intersect`, so a center exactly on a
//! polygon's west or south edge counts as inside and one on its east or north
//! edge counts as outside.

use geo_common::{GeographicBounds, GeographicPoint, Polygon, ProjectedPoint};
use projection::GeoTransform;

use crate::error::{Result, ScenarioError};
use crate::raster::Raster;

/// A per-pixel classification mask aligned with a reference raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Mask {
    /// Value of pixels outside every polygon.
    pub const NEUTRAL: u8 = 0;

    /// Marker the pipeline uses for edited pixels.
    pub const MARKED: u8 = 1;

    /// An all-neutral mask.
    pub fn neutral(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Self::NEUTRAL; width * height],
        }
    }

    /// Wrap row-major cells. Fails with `SizeMismatch` on a wrong length.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Result<Self> {
        if cells.len() != width * height {
            return Err(ScenarioError::SizeMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    pub fn is_marked(&self, col: usize, row: usize) -> bool {
        self.get(col, row).is_some_and(|v| v != Self::NEUTRAL)
    }

    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != Self::NEUTRAL).count()
    }
}

/// Even-odd ray casting test against a ring (closing vertex optional).
pub fn point_in_ring(lon: f64, lat: f64, ring: &[GeographicPoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lon, ring[i].lat);
        let (xj, yj) = (ring[j].lon, ring[j].lat);
        if (yi > lat) != (yj > lat) {
            let x_cross = (xj - xi) * (lat - yi) / (yj - yi) + xi;
            if lon < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// A polygon prepared for repeated point tests.
struct PreparedRing {
    ring: Vec<GeographicPoint>,
    envelope: GeographicBounds,
}

impl PreparedRing {
    fn contains(&self, lon: f64, lat: f64) -> bool {
        self.envelope.contains(lon, lat) && point_in_ring(lon, lat, &self.ring)
    }
}

fn prepare(polygons: &[Polygon]) -> Vec<PreparedRing> {
    polygons
        .iter()
        .enumerate()
        .filter_map(|(index, polygon)| {
            if polygon.is_degenerate() {
                tracing::debug!(index, "Skipping degenerate polygon");
                return None;
            }
            let envelope = polygon.envelope()?;
            Some(PreparedRing {
                ring: polygon.distinct_ring(),
                envelope,
            })
        })
        .collect()
}

/// Build a mask the size of `reference` with `marker` wherever a pixel center
/// falls inside any polygon. Unmatched pixels are [`Mask::NEUTRAL`].
///
/// Degenerate polygons contribute nothing; an empty drawing yields an
/// all-neutral mask.
pub fn rasterize(
    reference: &Raster,
    polygons: &[Polygon],
    transform: &dyn GeoTransform,
    marker: u8,
) -> Result<Mask> {
    if marker == Mask::NEUTRAL {
        return Err(ScenarioError::Config(
            "mask marker must differ from the neutral value".to_string(),
        ));
    }

    let (width, height) = reference.shape();
    let rings = prepare(polygons);
    if rings.is_empty() {
        return Ok(Mask::neutral(width, height));
    }

    let eastings: Vec<f64> = (0..width).map(|c| reference.pixel_center(c, 0).x).collect();
    let northings: Vec<f64> = (0..height).map(|r| reference.pixel_center(0, r).y).collect();

    let mut cells = Vec::with_capacity(width * height);
    if transform.is_separable() {
        let lons = eastings
            .iter()
            .map(|&x| Ok(transform.to_geographic(ProjectedPoint::new(x, northings[0]))?.lon))
            .collect::<Result<Vec<f64>>>()?;
        let lats = northings
            .iter()
            .map(|&y| Ok(transform.to_geographic(ProjectedPoint::new(eastings[0], y))?.lat))
            .collect::<Result<Vec<f64>>>()?;

        for &lat in &lats {
            for &lon in &lons {
                cells.push(mark(&rings, lon, lat, marker));
            }
        }
    } else {
        for &y in &northings {
            for &x in &eastings {
                let geo = transform.to_geographic(ProjectedPoint::new(x, y))?;
                cells.push(mark(&rings, geo.lon, geo.lat, marker));
            }
        }
    }

    let mask = Mask::from_cells(width, height, cells)?;
    tracing::debug!(
        polygons = rings.len(),
        marked = mask.marked_count(),
        "Rasterized drawing"
    );
    Ok(mask)
}

#[inline]
fn mark(rings: &[PreparedRing], lon: f64, lat: f64, marker: u8) -> u8 {
    if rings.iter().any(|r| r.contains(lon, lat)) {
        marker
    } else {
        Mask::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::{BoundingBox, CrsCode};
    use projection::{Planar, WebMercator};
    use test_utils::fixtures::drawings;

    fn reference(size: usize, extent: f64) -> Raster {
        Raster::single_band(
            size,
            size,
            vec![0.0; size * size],
            BoundingBox::new(0.0, 0.0, extent, extent),
            CrsCode::LocalPlanar,
        )
        .unwrap()
    }

    #[test]
    fn test_rectangle_inside_outside() {
        let r = reference(8, 8.0);
        let poly = Polygon::from_lon_lat(&drawings::rectangle(2.0, 2.0, 6.0, 6.0));
        let mask = rasterize(&r, &[poly], &Planar, 5).unwrap();

        assert_eq!(mask.marked_count(), 16);
        for row in 0..8 {
            for col in 0..8 {
                let c = r.pixel_center(col, row);
                let inside = c.x > 2.0 && c.x < 6.0 && c.y > 2.0 && c.y < 6.0;
                assert_eq!(mask.is_marked(col, row), inside, "pixel ({}, {})", col, row);
                if inside {
                    assert_eq!(mask.get(col, row), Some(5));
                }
            }
        }
    }

    #[test]
    fn test_boundary_convention() {
        // Edges pass exactly through pixel centers at 0.5 and 2.5.
        let r = reference(4, 4.0);
        let poly = Polygon::from_lon_lat(&drawings::rectangle(0.5, 0.5, 2.5, 2.5));
        let mask = rasterize(&r, &[poly], &Planar, 1).unwrap();

        // West/south edges inside, east/north edges outside.
        let marked: Vec<(usize, usize)> = (0..4)
            .flat_map(|row| (0..4).map(move |col| (col, row)))
            .filter(|&(c, r)| mask.is_marked(c, r))
            .collect();
        assert_eq!(marked, vec![(0, 2), (1, 2), (0, 3), (1, 3)]);
    }

    #[test]
    fn test_deterministic() {
        let r = reference(16, 16.0);
        let poly = Polygon::from_lon_lat(&drawings::triangle(1.5, 1.5, 14.5, 14.5));
        let a = rasterize(&r, &[poly.clone()], &Planar, 1).unwrap();
        let b = rasterize(&r, &[poly], &Planar, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bow_tie_even_odd() {
        let r = reference(8, 8.0);
        let poly = Polygon::from_lon_lat(&drawings::bow_tie(0.0, 0.0, 8.0, 8.0));
        let mask = rasterize(&r, &[poly], &Planar, 1).unwrap();
        assert!(mask.is_marked(0, 4)); // west lobe
        assert!(mask.is_marked(7, 3)); // east lobe
        assert!(!mask.is_marked(3, 7)); // south wedge
        assert!(!mask.is_marked(4, 0)); // north wedge
    }

    #[test]
    fn test_multiple_polygons_and_degenerates() {
        let r = reference(8, 8.0);
        let polygons = vec![
            Polygon::from_lon_lat(&drawings::rectangle(0.0, 0.0, 2.0, 2.0)),
            Polygon::from_lon_lat(&[(5.0, 5.0), (6.0, 6.0)]),
            Polygon::from_lon_lat(&[(5.0, 5.0), (6.0, 6.0), (7.0, 7.0)]),
            Polygon::from_lon_lat(&drawings::rectangle(6.0, 6.0, 8.0, 8.0)),
        ];
        let mask = rasterize(&r, &polygons, &Planar, 1).unwrap();
        assert_eq!(mask.marked_count(), 8);
        assert!(mask.is_marked(0, 7));
        assert!(mask.is_marked(7, 0));
    }

    #[test]
    fn test_empty_drawing_is_neutral() {
        let r = reference(4, 4.0);
        let mask = rasterize(&r, &[], &Planar, 1).unwrap();
        assert_eq!(mask, Mask::neutral(4, 4));
    }

    #[test]
    fn test_neutral_marker_rejected() {
        let r = reference(4, 4.0);
        assert!(matches!(
            rasterize(&r, &[], &Planar, Mask::NEUTRAL),
            Err(ScenarioError::Config(_))
        ));
    }

    /// Wraps a transform but hides its separability, forcing the per-pixel path.
    struct PerPixel(WebMercator);

    impl GeoTransform for PerPixel {
        fn crs(&self) -> CrsCode {
            self.0.crs()
        }
        fn to_projected(
            &self,
            p: GeographicPoint,
        ) -> std::result::Result<ProjectedPoint, projection::ProjectionError> {
            self.0.to_projected(p)
        }
        fn to_geographic(
            &self,
            p: ProjectedPoint,
        ) -> std::result::Result<GeographicPoint, projection::ProjectionError> {
            self.0.to_geographic(p)
        }
    }

    #[test]
    fn test_separable_path_matches_per_pixel() {
        let mercator = WebMercator::new();
        let sw = mercator.to_projected(GeographicPoint::new(8.50, 47.20)).unwrap();
        let ne = mercator.to_projected(GeographicPoint::new(8.80, 47.40)).unwrap();
        let r = Raster::single_band(
            40,
            30,
            vec![0.0; 1200],
            BoundingBox::new(sw.x, sw.y, ne.x, ne.y),
            CrsCode::Epsg3857,
        )
        .unwrap();
        let lake = Polygon::from_lon_lat(&[
            (8.54, 47.36),
            (8.60, 47.30),
            (8.70, 47.24),
            (8.76, 47.22),
            (8.72, 47.27),
            (8.62, 47.33),
        ]);

        let fast = rasterize(&r, &[lake.clone()], &mercator, 1).unwrap();
        let slow = rasterize(&r, &[lake], &PerPixel(WebMercator::new()), 1).unwrap();
        assert!(fast.marked_count() > 0);
        assert_eq!(fast, slow);
    }
}
