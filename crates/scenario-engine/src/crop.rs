//! Buffered cropping around a drawn region.
//!
//! The crop window is the region's projected envelope grown by one
//! region-width on the left and right and one region-height on the top and
//! bottom (3x3 the region), truncated at the source raster's edges. The
//! cropped raster's bbox is derived from the pixel window actually kept, so
//! pixels and bounds always agree.

use geo_common::{BoundingBox, GeographicBounds};
use projection::GeoTransform;

use crate::error::{Result, ScenarioError};
use crate::raster::{Grid, Raster};

/// Snapping tolerance (in pixels) applied before flooring/ceiling window
/// edges, so corners that land on a pixel boundary up to float noise do not
/// gain or lose a whole pixel.
const EDGE_EPSILON: f64 = 1e-9;

/// A half-open pixel window `[col_start, col_end) x [row_start, row_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub col_start: usize,
    pub row_start: usize,
    pub col_end: usize,
    pub row_end: usize,
}

impl CropWindow {
    pub fn width(&self) -> usize {
        self.col_end.saturating_sub(self.col_start)
    }

    pub fn height(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Projected envelope of a geographic region.
pub fn project_region(region: &GeographicBounds, transform: &dyn GeoTransform) -> Result<BoundingBox> {
    let corners = region
        .corners()
        .iter()
        .map(|c| transform.to_projected(*c))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    BoundingBox::from_corners(corners).ok_or(ScenarioError::EmptyCropRegion)
}

/// Compute the clamped pixel window of the buffered region inside `source`.
pub fn buffered_window(source: &Raster, region: &BoundingBox) -> Result<CropWindow> {
    let (bounds_width, bounds_height) = (region.width(), region.height());
    if !(bounds_width > 0.0 && bounds_height > 0.0) {
        return Err(ScenarioError::EmptyCropRegion);
    }

    let buffered = region.buffered(bounds_width, bounds_height);

    let (fx0, fy0) = source.fractional_pixel(buffered.min_x, buffered.max_y);
    let (fx1, fy1) = source.fractional_pixel(buffered.max_x, buffered.min_y);

    let clamp = |v: f64, len: usize| v.max(0.0).min(len as f64) as usize;

    let window = CropWindow {
        col_start: clamp((fx0 + EDGE_EPSILON).floor(), source.width()),
        row_start: clamp((fy0 + EDGE_EPSILON).floor(), source.height()),
        col_end: clamp((fx1 - EDGE_EPSILON).ceil(), source.width()),
        row_end: clamp((fy1 - EDGE_EPSILON).ceil(), source.height()),
    };

    if window.is_empty() {
        return Err(ScenarioError::EmptyCropRegion);
    }
    Ok(window)
}

/// Copy a pixel window out of every band of `source`.
pub fn crop_to_window(source: &Raster, window: CropWindow) -> Result<Raster> {
    if window.is_empty() || window.col_end > source.width() || window.row_end > source.height() {
        return Err(ScenarioError::EmptyCropRegion);
    }

    let (w, h) = (window.width(), window.height());
    let mut bands = Vec::with_capacity(source.band_count());
    for band in source.bands() {
        let mut data = Vec::with_capacity(w * h);
        for row in window.row_start..window.row_end {
            data.extend_from_slice(&band.row(row)[window.col_start..window.col_end]);
        }
        bands.push(Grid::new(w, h, data)?);
    }

    let src = source.bbox();
    let (pw, ph) = (source.pixel_width(), source.pixel_height());
    let bbox = BoundingBox::new(
        src.min_x + window.col_start as f64 * pw,
        src.max_y - window.row_end as f64 * ph,
        src.min_x + window.col_end as f64 * pw,
        src.max_y - window.row_start as f64 * ph,
    );

    Raster::new(bands, bbox, source.crs())
}

/// Crop `source` to the buffered window around a geographic region.
pub fn crop_buffered(
    source: &Raster,
    region: &GeographicBounds,
    transform: &dyn GeoTransform,
) -> Result<Raster> {
    let projected = project_region(region, transform)?;
    let window = buffered_window(source, &projected)?;

    tracing::debug!(
        col_start = window.col_start,
        row_start = window.row_start,
        width = window.width(),
        height = window.height(),
        "Cropping buffered window"
    );

    crop_to_window(source, window)
}
