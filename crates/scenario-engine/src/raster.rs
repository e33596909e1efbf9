//! In-memory georeferenced rasters.
//!
//! A [`Raster`] owns one or more equally sized [`Grid`] bands plus the
//! projected bounding box they cover. Row 0 is the northern edge; column 0 is
//! the western edge. Rasters are never mutated after construction: every
//! pipeline stage builds a new one.

use geo_common::{BoundingBox, CrsCode, PixelCoordinate, ProjectedPoint};

use crate::error::{Result, ScenarioError};

/// A single band of values in row-major order (top-to-bottom).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Grid {
    /// Wrap row-major data. Fails with `SizeMismatch` when
    /// `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(ScenarioError::SizeMismatch {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
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

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get the value at a grid coordinate.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// One row as a slice. Panics if `row >= height`.
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    /// Copy into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.data.chunks(self.width.max(1)).map(<[f32]>::to_vec).collect()
    }
}

/// A georeferenced, multi-band raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    bands: Vec<Grid>,
    bbox: BoundingBox,
    crs: CrsCode,
}

impl Raster {
    /// Build a raster, validating that every band shares one non-empty shape
    /// and that the bbox has positive, finite extent.
    pub fn new(bands: Vec<Grid>, bbox: BoundingBox, crs: CrsCode) -> Result<Self> {
        let first = bands
            .first()
            .ok_or_else(|| ScenarioError::invalid_raster("raster needs at least one band"))?;
        let (width, height) = first.shape();

        if width == 0 || height == 0 {
            return Err(ScenarioError::invalid_raster(format!(
                "raster dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        if let Some(bad) = bands.iter().find(|b| b.shape() != (width, height)) {
            return Err(ScenarioError::shape_mismatch((width, height), bad.shape()));
        }

        if !bbox.is_valid() {
            return Err(ScenarioError::invalid_raster(format!(
                "bbox must have positive extent, got {:?}",
                bbox
            )));
        }

        Ok(Self {
            width,
            height,
            bands,
            bbox,
            crs,
        })
    }

    /// Convenience constructor for a single-band raster.
    pub fn single_band(
        width: usize,
        height: usize,
        data: Vec<f32>,
        bbox: BoundingBox,
        crs: CrsCode,
    ) -> Result<Self> {
        Self::new(vec![Grid::new(width, height, data)?], bbox, crs)
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

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn crs(&self) -> CrsCode {
        self.crs
    }

    pub fn bands(&self) -> &[Grid] {
        &self.bands
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn band(&self, index: usize) -> Option<&Grid> {
        self.bands.get(index)
    }

    /// The first band. Always present.
    pub fn primary_band(&self) -> &Grid {
        &self.bands[0]
    }

    /// Projected width of one pixel.
    pub fn pixel_width(&self) -> f64 {
        self.bbox.width() / self.width as f64
    }

    /// Projected height of one pixel.
    pub fn pixel_height(&self) -> f64 {
        self.bbox.height() / self.height as f64
    }

    /// Projected position of the north-west corner of pixel (`col`, `row`).
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> ProjectedPoint {
        ProjectedPoint::new(
            self.bbox.min_x + col as f64 * self.pixel_width(),
            self.bbox.max_y - row as f64 * self.pixel_height(),
        )
    }

    /// Projected position of the center of pixel (`col`, `row`).
    pub fn pixel_center(&self, col: usize, row: usize) -> ProjectedPoint {
        ProjectedPoint::new(
            self.bbox.min_x + (col as f64 + 0.5) * self.pixel_width(),
            self.bbox.max_y - (row as f64 + 0.5) * self.pixel_height(),
        )
    }

    /// Fractional pixel position of a projected point, without bounds checks.
    pub fn fractional_pixel(&self, easting: f64, northing: f64) -> (f64, f64) {
        (
            (easting - self.bbox.min_x) / self.pixel_width(),
            (self.bbox.max_y - northing) / self.pixel_height(),
        )
    }

    /// Pixel containing a projected point.
    ///
    /// `None` means the point is outside this raster's extent (or not
    /// finite). That is an ordinary outcome, not an error.
    pub fn geo_to_pixel(&self, easting: f64, northing: f64) -> Option<PixelCoordinate> {
        Some(PixelCoordinate::new(
            self.column_of(easting)?,
            self.row_of(northing)?,
        ))
    }

    /// Column containing an easting. The mapping is separable, so callers
    /// sweeping a grid can resolve columns once instead of per pixel.
    pub fn column_of(&self, easting: f64) -> Option<usize> {
        axis_index((easting - self.bbox.min_x) / self.pixel_width(), self.width)
    }

    /// Row containing a northing.
    pub fn row_of(&self, northing: f64) -> Option<usize> {
        axis_index((self.bbox.max_y - northing) / self.pixel_height(), self.height)
    }

    /// Bounds-checked read.
    pub fn value_at(&self, band: usize, col: usize, row: usize) -> Result<f32> {
        self.bands
            .get(band)
            .and_then(|g| g.get(col, row))
            .ok_or(ScenarioError::IndexOutOfRange { band, col, row })
    }

    /// Value of the pixel containing a projected point, if any.
    pub fn value_at_geo(&self, band: usize, easting: f64, northing: f64) -> Option<f32> {
        let px = self.geo_to_pixel(easting, northing)?;
        self.bands.get(band)?.get(px.col, px.row)
    }
}

/// Floor a fractional pixel position into `[0, len)`.
pub(crate) fn axis_index(fractional: f64, len: usize) -> Option<usize> {
    if !fractional.is_finite() {
        return None;
    }
    let idx = fractional.floor();
    if idx < 0.0 || idx >= len as f64 {
        return None;
    }
    Some(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::create_test_grid;

    fn raster_10x5() -> Raster {
        Raster::single_band(
            10,
            5,
            create_test_grid(10, 5),
            BoundingBox::new(100.0, 200.0, 120.0, 210.0),
            CrsCode::LocalPlanar,
        )
        .unwrap()
    }

    #[test]
    fn test_pixel_size() {
        let r = raster_10x5();
        assert_eq!(r.pixel_width(), 2.0);
        assert_eq!(r.pixel_height(), 2.0);
    }

    #[test]
    fn test_pixel_to_geo_row_zero_is_north() {
        let r = raster_10x5();
        assert_eq!(r.pixel_to_geo(0, 0), ProjectedPoint::new(100.0, 210.0));
        assert_eq!(r.pixel_to_geo(3, 2), ProjectedPoint::new(106.0, 206.0));
        assert_eq!(r.pixel_center(0, 0), ProjectedPoint::new(101.0, 209.0));
    }

    #[test]
    fn test_geo_to_pixel_inverse() {
        let r = raster_10x5();
        for row in 0..5 {
            for col in 0..10 {
                let c = r.pixel_center(col, row);
                assert_eq!(r.geo_to_pixel(c.x, c.y), Some(PixelCoordinate::new(col, row)));
            }
        }
    }

    #[test]
    fn test_geo_to_pixel_out_of_bounds() {
        let r = raster_10x5();
        assert_eq!(r.geo_to_pixel(99.9, 205.0), None);
        assert_eq!(r.geo_to_pixel(120.0, 205.0), None); // east edge is exclusive
        assert_eq!(r.geo_to_pixel(110.0, 210.1), None);
        assert_eq!(r.geo_to_pixel(110.0, 200.0), None); // south edge is exclusive
        assert_eq!(r.geo_to_pixel(f64::NAN, 205.0), None);
        assert_eq!(r.geo_to_pixel(100.0, 210.0), Some(PixelCoordinate::new(0, 0)));
    }

    #[test]
    fn test_value_at() {
        let r = raster_10x5();
        assert_eq!(r.value_at(0, 3, 2).unwrap(), 3002.0);
        assert!(matches!(
            r.value_at(0, 10, 0),
            Err(ScenarioError::IndexOutOfRange { col: 10, .. })
        ));
        assert!(matches!(
            r.value_at(1, 0, 0),
            Err(ScenarioError::IndexOutOfRange { band: 1, .. })
        ));
        assert_eq!(r.value_at_geo(0, 107.0, 205.5), Some(3002.0));
    }

    #[test]
    fn test_constructor_validation() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            Raster::new(vec![], bbox, CrsCode::LocalPlanar),
            Err(ScenarioError::InvalidRaster(_))
        ));
        assert!(matches!(
            Raster::single_band(2, 2, vec![0.0; 3], bbox, CrsCode::LocalPlanar),
            Err(ScenarioError::SizeMismatch { expected: 4, actual: 3 })
        ));
        assert!(matches!(
            Raster::new(
                vec![Grid::filled(2, 2, 0.0), Grid::filled(3, 2, 0.0)],
                bbox,
                CrsCode::LocalPlanar
            ),
            Err(ScenarioError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Raster::single_band(
                1,
                1,
                vec![0.0],
                BoundingBox::new(1.0, 0.0, 1.0, 1.0),
                CrsCode::LocalPlanar
            ),
            Err(ScenarioError::InvalidRaster(_))
        ));
    }

    #[test]
    fn test_grid_rows() {
        let g = Grid::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(g.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(g.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(g.get(3, 0), None);
    }
}
