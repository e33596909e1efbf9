//! GeoTIFF encoding.

use std::io::{Cursor, Seek, Write};

use geo_common::CrsCode;
use tiff::encoder::colortype::Gray8;
use tiff::encoder::{Compression, DeflateLevel, DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;

use super::geokey;
use crate::config::GeoTiffCompression;
use crate::error::{Result, ScenarioError};
use crate::export::ExportedRaster;

/// Encode an exported raster as an 8-bit grayscale GeoTIFF.
pub fn encode_geotiff(raster: &ExportedRaster, compression: GeoTiffCompression) -> Result<Vec<u8>> {
    let expected = raster.width * raster.height;
    if raster.pixels.len() != expected {
        return Err(ScenarioError::SizeMismatch {
            expected,
            actual: raster.pixels.len(),
        });
    }

    let width = to_u32(raster.width, "width")?;
    let height = to_u32(raster.height, "height")?;

    let codec = match compression {
        GeoTiffCompression::None => Compression::Uncompressed,
        GeoTiffCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
    };

    let mut out = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut out)
            .map_err(encode_error)?
            .with_compression(codec);
        let mut image = encoder.new_image::<Gray8>(width, height).map_err(encode_error)?;
        write_geo_tags(image.encoder(), raster)?;
        image.write_data(&raster.pixels).map_err(encode_error)?;
    }
    let out = out.into_inner();

    tracing::debug!(
        width,
        height,
        compression = %compression,
        bytes = out.len(),
        "Encoded GeoTIFF"
    );

    Ok(out)
}

fn write_geo_tags<W: Write + Seek, K: TiffKind>(
    dir: &mut DirectoryEncoder<'_, W, K>,
    raster: &ExportedRaster,
) -> Result<()> {
    let scale = [raster.pixel_scale_x, raster.pixel_scale_y, 0.0];
    dir.write_tag(Tag::ModelPixelScaleTag, scale.as_slice())
        .map_err(encode_error)?;

    // Pixel (0, 0) is tied to the upper-left corner of the grid.
    let tie_point = [0.0, 0.0, 0.0, raster.tie_point_x, raster.tie_point_y, 0.0];
    dir.write_tag(Tag::ModelTiepointTag, tie_point.as_slice())
        .map_err(encode_error)?;

    let keys = geo_keys(raster.crs);
    dir.write_tag(Tag::GeoKeyDirectoryTag, keys.as_slice())
        .map_err(encode_error)?;
    Ok(())
}

/// GeoKey directory: header followed by (key, location, count, value) quads.
fn geo_keys(crs: CrsCode) -> Vec<u16> {
    let code = crs.epsg().unwrap_or(geokey::USER_DEFINED);
    let keys: [[u16; 4]; 3] = if crs.is_geographic() {
        [
            [geokey::MODEL_TYPE, 0, 1, geokey::MODEL_GEOGRAPHIC],
            [geokey::RASTER_TYPE, 0, 1, geokey::RASTER_PIXEL_IS_AREA],
            [geokey::GEOGRAPHIC_TYPE, 0, 1, code],
        ]
    } else {
        [
            [geokey::MODEL_TYPE, 0, 1, geokey::MODEL_PROJECTED],
            [geokey::RASTER_TYPE, 0, 1, geokey::RASTER_PIXEL_IS_AREA],
            [geokey::PROJECTED_CS_TYPE, 0, 1, code],
        ]
    };

    let mut directory = vec![1, 1, 0, keys.len() as u16];
    directory.extend(keys.iter().flatten());
    directory
}

fn encode_error(err: tiff::TiffError) -> ScenarioError {
    ScenarioError::Encode(format!("TIFF encoding failed: {}", err))
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| ScenarioError::Encode(format!("{} {} exceeds TIFF limits", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::decoder::{Decoder, DecodingResult};

    fn exported(width: usize, height: usize) -> ExportedRaster {
        ExportedRaster {
            width,
            height,
            pixel_scale_x: 30.0,
            pixel_scale_y: 30.0,
            tie_point_x: 950_000.0,
            tie_point_y: 6_000_000.0,
            crs: CrsCode::Epsg3857,
            pixels: (0..width * height).map(|i| (i % 7) as u8).collect(),
        }
    }

    #[test]
    fn test_geo_tags_written() {
        let bytes = encode_geotiff(&exported(4, 3), GeoTiffCompression::None).unwrap();
        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();

        assert_eq!(decoder.dimensions().unwrap(), (4, 3));
        assert_eq!(
            decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).unwrap(),
            vec![30.0, 30.0, 0.0]
        );
        assert_eq!(
            decoder.get_tag_f64_vec(Tag::ModelTiepointTag).unwrap()[3..5],
            [950_000.0, 6_000_000.0]
        );
        assert_eq!(
            decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag).unwrap(),
            geo_keys(CrsCode::Epsg3857)
        );
    }

    #[test]
    fn test_pixels_survive_both_codecs() {
        let raster = exported(5, 2);
        for compression in [GeoTiffCompression::None, GeoTiffCompression::Deflate] {
            let bytes = encode_geotiff(&raster, compression).unwrap();
            let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
            let DecodingResult::U8(data) = decoder.read_image().unwrap() else {
                panic!("expected 8-bit samples");
            };
            assert_eq!(data, raster.pixels);
        }
    }

    #[test]
    fn test_deflate_shrinks_uniform_data() {
        let mut raster = exported(256, 256);
        raster.pixels = vec![9; 256 * 256];
        let raw = encode_geotiff(&raster, GeoTiffCompression::None).unwrap();
        let packed = encode_geotiff(&raster, GeoTiffCompression::Deflate).unwrap();
        assert!(packed.len() < raw.len() / 10);

        let mut decoder = Decoder::new(Cursor::new(packed)).unwrap();
        assert_eq!(decoder.get_tag_u32(Tag::Compression).unwrap(), 8);
    }

    #[test]
    fn test_geo_keys() {
        assert_eq!(
            geo_keys(CrsCode::Epsg3857),
            vec![1, 1, 0, 3, 1024, 0, 1, 1, 1025, 0, 1, 1, 3072, 0, 1, 3857]
        );
        assert_eq!(geo_keys(CrsCode::LocalPlanar)[15], 32767);
        assert_eq!(geo_keys(CrsCode::Epsg4326)[12], 2048);
    }

    #[test]
    fn test_size_mismatch() {
        let mut raster = exported(4, 4);
        raster.pixels.pop();
        assert!(matches!(
            encode_geotiff(&raster, GeoTiffCompression::None),
            Err(ScenarioError::SizeMismatch { expected: 16, actual: 15 })
        ));
    }
}
