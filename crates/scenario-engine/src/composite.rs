//! Stamping a rasterized drawing onto a raster.

use crate::error::{Result, ScenarioError};
use crate::raster::{Grid, Raster};
use crate::rasterize::Mask;

/// Replace every marked pixel of the first band with `class_value`.
///
/// Other bands and all georeferencing are carried over unchanged. Fails with
/// `ShapeMismatch` if the mask and raster sizes differ.
pub fn composite(raster: &Raster, mask: &Mask, class_value: u8) -> Result<Raster> {
    if mask.shape() != raster.shape() {
        return Err(ScenarioError::shape_mismatch(raster.shape(), mask.shape()));
    }

    let stamped = class_value as f32;
    let data: Vec<f32> = raster
        .primary_band()
        .data()
        .iter()
        .zip(mask.cells())
        .map(|(&value, &cell)| if cell != Mask::NEUTRAL { stamped } else { value })
        .collect();

    let (width, height) = raster.shape();
    let mut bands = Vec::with_capacity(raster.band_count());
    bands.push(Grid::new(width, height, data)?);
    bands.extend(raster.bands().iter().skip(1).cloned());

    Raster::new(bands, raster.bbox(), raster.crs())
}
