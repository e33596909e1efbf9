//! Flattening a scenario raster for encoding and transmission.
//!
//! Only the first band is exported: the scenario workflow edits single-band
//! classification rasters. Values become 8-bit class codes.

use chrono::{DateTime, Utc};
use geo_common::{BoundingBox, CrsCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScenarioError};
use crate::raster::Grid;
use crate::types::ScenarioRaster;

/// A flat 8-bit pixel buffer with the minimal georeferencing needed to write
/// a GeoTIFF.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRaster {
    pub width: usize,
    pub height: usize,
    /// Projected units per pixel along x.
    pub pixel_scale_x: f64,
    /// Projected units per pixel along y (positive; rows run north to south).
    pub pixel_scale_y: f64,
    /// Projected x of the upper-left corner of pixel (0, 0).
    pub tie_point_x: f64,
    /// Projected y of the upper-left corner of pixel (0, 0).
    pub tie_point_y: f64,
    pub crs: CrsCode,
    /// Row-major class codes.
    pub pixels: Vec<u8>,
}

impl ExportedRaster {
    /// Re-create the 2D grid, row by row.
    pub fn inflate(&self) -> Vec<Vec<u8>> {
        self.pixels
            .chunks(self.width.max(1))
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// Extent implied by the tie point and pixel scale.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.tie_point_x,
            self.tie_point_y - self.pixel_scale_y * self.height as f64,
            self.tie_point_x + self.pixel_scale_x * self.width as f64,
            self.tie_point_y,
        )
    }

    /// Everything but the pixels, for JSON transmission alongside the bytes.
    pub fn metadata(&self) -> ExportMetadata {
        ExportMetadata {
            scenario_id: None,
            created_at: None,
            width: self.width,
            height: self.height,
            pixel_scale_x: self.pixel_scale_x,
            pixel_scale_y: self.pixel_scale_y,
            tie_point_x: self.tie_point_x,
            tie_point_y: self.tie_point_y,
            crs: self.crs.to_string(),
            bbox: self.bbox(),
        }
    }
}

/// Serializable description of an exported raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub width: usize,
    pub height: usize,
    pub pixel_scale_x: f64,
    pub pixel_scale_y: f64,
    pub tie_point_x: f64,
    pub tie_point_y: f64,
    pub crs: String,
    pub bbox: BoundingBox,
}

/// Convert one raster value to a class code.
///
/// Only finite whole numbers in 0..=255 are class codes.
pub fn to_class_code(value: f32) -> Result<u8> {
    if !value.is_finite() || value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
        return Err(ScenarioError::ClassValueOverflow {
            value: value as f64,
        });
    }
    Ok(value as u8)
}

/// Flatten a band into row-major class codes.
pub fn flatten_band(band: &Grid) -> Result<Vec<u8>> {
    let pixels = band
        .data()
        .iter()
        .map(|&v| to_class_code(v))
        .collect::<Result<Vec<u8>>>()?;

    let expected = band.width() * band.height();
    if pixels.len() != expected {
        return Err(ScenarioError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(pixels)
}

/// Export the first band of a scenario raster.
pub fn export(scenario: &ScenarioRaster) -> Result<ExportedRaster> {
    let raster = &scenario.raster;
    let pixels = flatten_band(raster.primary_band())?;
    let bbox = raster.bbox();

    Ok(ExportedRaster {
        width: raster.width(),
        height: raster.height(),
        pixel_scale_x: bbox.width() / raster.width() as f64,
        pixel_scale_y: bbox.height() / raster.height() as f64,
        tie_point_x: bbox.min_x,
        tie_point_y: bbox.max_y,
        crs: raster.crs(),
        pixels,
    })
}
