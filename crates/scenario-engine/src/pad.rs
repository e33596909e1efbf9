//! Position-preserving padding to tile-aligned squares.
//!
//! A cropped raster is grown to a `size x size` square, where `size` is the
//! next multiple of the tile size, by adding a border split evenly between
//! opposite sides (the extra pixel of an odd split goes right/bottom).
//! Existing pixels keep their absolute projected position. The new border is
//! backfilled from the original source raster where it has coverage and set
//! to the fill value elsewhere.

use geo_common::BoundingBox;

use crate::config::PipelineConfig;
use crate::error::{Result, ScenarioError};
use crate::raster::{Grid, Raster};

/// Padding parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadOptions {
    pub tile_size: usize,
    pub fill_value: f32,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            tile_size: 256,
            fill_value: 0.0,
        }
    }
}

impl From<&PipelineConfig> for PadOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            tile_size: config.tile_size,
            fill_value: config.fill_value,
        }
    }
}

/// Pixels added on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub size: usize,
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl Padding {
    /// Symmetric padding that turns `width x height` into the smallest
    /// tile-aligned square containing it.
    pub fn for_shape(width: usize, height: usize, tile_size: usize) -> Self {
        let size = padded_size(width, height, tile_size);
        let (width_diff, height_diff) = (size - width, size - height);
        let left = width_diff / 2;
        let top = height_diff / 2;
        Self {
            size,
            left,
            right: width_diff - left,
            top,
            bottom: height_diff - top,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0 && self.right == 0 && self.top == 0 && self.bottom == 0
    }
}

/// `ceil(max(width, height) / tile_size) * tile_size`.
pub fn padded_size(width: usize, height: usize, tile_size: usize) -> usize {
    width.max(height).div_ceil(tile_size) * tile_size
}

/// Pad `cropped` to a tile-aligned square, backfilling from `source`.
///
/// `source` must have the same band count as `cropped`; band `i` of the
/// output border comes from band `i` of the source.
pub fn pad_to_tile(cropped: &Raster, source: &Raster, options: &PadOptions) -> Result<Raster> {
    if options.tile_size == 0 {
        return Err(ScenarioError::Config("tile_size must be > 0".to_string()));
    }
    if cropped.band_count() != source.band_count() {
        return Err(ScenarioError::ShapeMismatch {
            expected: format!("{} bands", cropped.band_count()),
            actual: format!("{} bands", source.band_count()),
        });
    }

    let (width, height) = cropped.shape();
    let padding = Padding::for_shape(width, height, options.tile_size);
    if padding.is_zero() {
        return Ok(cropped.clone());
    }

    let (pw, ph) = (cropped.pixel_width(), cropped.pixel_height());
    let inner = cropped.bbox();
    let bbox = BoundingBox::new(
        inner.min_x - padding.left as f64 * pw,
        inner.min_y - padding.bottom as f64 * ph,
        inner.max_x + padding.right as f64 * pw,
        inner.max_y + padding.top as f64 * ph,
    );

    tracing::debug!(
        from_width = width,
        from_height = height,
        size = padding.size,
        left = padding.left,
        top = padding.top,
        "Padding raster to tile-aligned square"
    );

    // The pixel -> projected mapping is affine and axis-aligned, so every
    // lookup resolves per column and per row once.
    let size = padding.size;
    let cropped_cols = offsets_inside(size, padding.left, width);
    let cropped_rows = offsets_inside(size, padding.top, height);
    let source_cols: Vec<Option<usize>> = (0..size)
        .map(|x| source.column_of(bbox.min_x + (x as f64 + 0.5) * pw))
        .collect();
    let source_rows: Vec<Option<usize>> = (0..size)
        .map(|y| source.row_of(bbox.max_y - (y as f64 + 0.5) * ph))
        .collect();

    let mut bands = Vec::with_capacity(cropped.band_count());
    for (inner_band, source_band) in cropped.bands().iter().zip(source.bands()) {
        let mut data = Vec::with_capacity(size * size);
        for y in 0..size {
            let inner_row = cropped_rows[y].map(|r| inner_band.row(r));
            let source_row = source_rows[y].map(|r| source_band.row(r));
            for x in 0..size {
                let value = match (inner_row, cropped_cols[x]) {
                    (Some(row), Some(col)) => row[col],
                    _ => match (source_row, source_cols[x]) {
                        (Some(row), Some(col)) => row[col],
                        _ => options.fill_value,
                    },
                };
                data.push(value);
            }
        }
        bands.push(Grid::new(size, size, data)?);
    }

    Raster::new(bands, bbox, cropped.crs())
}

/// For each padded index, the index inside the original span if it falls
/// within `[offset, offset + len)`.
fn offsets_inside(size: usize, offset: usize, len: usize) -> Vec<Option<usize>> {
    (0..size)
        .map(|i| {
            if i >= offset && i < offset + len {
                Some(i - offset)
            } else {
                None
            }
        })
        .collect()
}
