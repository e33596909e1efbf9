//! GeoTIFF decoding.

use std::collections::HashMap;
use std::io::Cursor;

use geo_common::{BoundingBox, CrsCode};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

use super::geokey;
use crate::error::{Result, ScenarioError};
use crate::raster::{Grid, Raster};

/// Largest decoded image, in bytes, the reader will allocate.
const MAX_DECODED_BYTES: usize = 512 * 1024 * 1024;

/// Decode a GeoTIFF into a raster, one band per sample.
///
/// `fallback_crs` is used when the file carries no GeoKey directory or names
/// an EPSG code the pipeline does not know.
pub fn decode_geotiff(data: &[u8], fallback_crs: CrsCode) -> Result<Raster> {
    let mut limits = Limits::default();
    limits.decoding_buffer_size = MAX_DECODED_BYTES;

    let mut decoder = Decoder::new(Cursor::new(data))
        .map_err(decode_error)?
        .with_limits(limits);

    let (width, height) = decoder.dimensions().map_err(decode_error)?;
    let (width, height) = (width as usize, height as usize);
    let pixel_count = width
        .checked_mul(height)
        .filter(|&n| n <= MAX_DECODED_BYTES)
        .ok_or_else(|| {
            ScenarioError::decode(format!("{}x{} image exceeds the decode limit", width, height))
        })?;

    let samples = tag_u16(&mut decoder, Tag::SamplesPerPixel)?.unwrap_or(1) as usize;
    let planar = tag_u16(&mut decoder, Tag::PlanarConfiguration)?.unwrap_or(1);
    if planar != 1 && samples > 1 {
        return Err(ScenarioError::decode("planar band layout is not supported"));
    }

    let bbox = georeference(&mut decoder, width, height)?;
    let crs = read_crs(&mut decoder, fallback_crs)?;

    let values = to_f32(decoder.read_image().map_err(decode_error)?)?;
    if samples == 0 || values.len() != pixel_count * samples {
        return Err(ScenarioError::decode(format!(
            "image data has {} samples, expected {} per pixel for {} pixels",
            values.len(),
            samples,
            pixel_count
        )));
    }

    let bands = (0..samples)
        .map(|b| Grid::new(width, height, values.iter().skip(b).step_by(samples).copied().collect()))
        .collect::<Result<Vec<Grid>>>()?;

    tracing::debug!(width, height, bands = samples, crs = %crs, "Decoded GeoTIFF");

    Raster::new(bands, bbox, crs)
}

fn decode_error(err: tiff::TiffError) -> ScenarioError {
    ScenarioError::decode(err.to_string())
}

fn tag_u16<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>, tag: Tag) -> Result<Option<u16>> {
    decoder
        .find_tag(tag)
        .map_err(decode_error)?
        .map(|value| value.into_u16())
        .transpose()
        .map_err(decode_error)
}

fn tag_f64s<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    tag: Tag,
) -> Result<Option<Vec<f64>>> {
    decoder
        .find_tag(tag)
        .map_err(decode_error)?
        .map(|value| value.into_f64_vec())
        .transpose()
        .map_err(decode_error)
}

fn to_f32(result: DecodingResult) -> Result<Vec<f32>> {
    let values = match result {
        DecodingResult::U8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
        _ => return Err(ScenarioError::decode("unsupported sample type")),
    };
    Ok(values)
}

fn georeference<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    width: usize,
    height: usize,
) -> Result<BoundingBox> {
    let scale = tag_f64s(decoder, Tag::ModelPixelScaleTag)?
        .filter(|s| s.len() >= 2)
        .ok_or_else(|| ScenarioError::decode("missing ModelPixelScale tag"))?;
    let tie = tag_f64s(decoder, Tag::ModelTiepointTag)?
        .filter(|t| t.len() >= 6)
        .ok_or_else(|| ScenarioError::decode("missing ModelTiepoint tag"))?;

    let (sx, sy) = (scale[0], scale[1]);
    let min_x = tie[3] - tie[0] * sx;
    let max_y = tie[4] + tie[1] * sy;

    Ok(BoundingBox::new(
        min_x,
        max_y - height as f64 * sy,
        min_x + width as f64 * sx,
        max_y,
    ))
}

fn read_crs<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    fallback: CrsCode,
) -> Result<CrsCode> {
    let directory = match decoder.find_tag(Tag::GeoKeyDirectoryTag).map_err(decode_error)? {
        Some(value) => value.into_u16_vec().map_err(decode_error)?,
        None => return Ok(fallback),
    };

    let keys: HashMap<u16, u16> = directory
        .get(4..)
        .unwrap_or_default()
        .chunks_exact(4)
        .filter(|k| k[1] == 0) // inline values only
        .map(|k| (k[0], k[3]))
        .collect();

    let code = keys
        .get(&geokey::PROJECTED_CS_TYPE)
        .or_else(|| keys.get(&geokey::GEOGRAPHIC_TYPE));

    let crs = match code {
        None => fallback,
        Some(&geokey::USER_DEFINED) => CrsCode::LocalPlanar,
        Some(&c) => match CrsCode::from_epsg(c) {
            Some(crs) => crs,
            None => {
                tracing::warn!(epsg = c, fallback = %fallback, "Unknown EPSG code in GeoKey directory");
                fallback
            }
        },
    };
    Ok(crs)
}
