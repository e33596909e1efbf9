//! GeoTIFF codec on top of the `tiff` crate.
//!
//! The writer emits 8-bit grayscale class maps with the three GeoTIFF tags a
//! GIS needs to place the image: model pixel scale, model tie point and a
//! GeoKey directory naming the CRS.
//!
//! The reader takes whatever layout the `tiff` decoder understands (byte
//! order, strips or tiles, LZW/Deflate/PackBits) and turns each sample of a
//! chunky image into one band. The CRS falls back to the caller's when the
//! file does not name one.

mod reader;
mod writer;

use std::path::Path;

use geo_common::CrsCode;

pub use reader::decode_geotiff;
pub use writer::encode_geotiff;

use crate::config::GeoTiffCompression;
use crate::error::{Result, ScenarioError};
use crate::export::ExportedRaster;
use crate::raster::Raster;

/// GeoKey ids and values.
pub(crate) mod geokey {
    pub const MODEL_TYPE: u16 = 1024;
    pub const RASTER_TYPE: u16 = 1025;
    pub const GEOGRAPHIC_TYPE: u16 = 2048;
    pub const PROJECTED_CS_TYPE: u16 = 3072;

    pub const MODEL_PROJECTED: u16 = 1;
    pub const MODEL_GEOGRAPHIC: u16 = 2;
    pub const RASTER_PIXEL_IS_AREA: u16 = 1;
    pub const USER_DEFINED: u16 = 32767;
}

/// Encode and write an exported raster to `path`.
pub fn write_geotiff(
    path: impl AsRef<Path>,
    raster: &ExportedRaster,
    compression: GeoTiffCompression,
) -> Result<()> {
    let bytes = encode_geotiff(raster, compression)?;
    std::fs::write(path.as_ref(), bytes)?;
    Ok(())
}

/// Read and decode a GeoTIFF from `path`.
pub fn read_geotiff(path: impl AsRef<Path>, fallback_crs: CrsCode) -> Result<Raster> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| ScenarioError::decode(format!("{}: {}", path.display(), e)))?;
    decode_geotiff(&bytes, fallback_crs)
}
