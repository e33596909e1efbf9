//! GeoTIFF file round trips through the filesystem.

use geo_common::{BoundingBox, CrsCode};
use scenario_engine::{
    export, read_geotiff, write_geotiff, ExportedRaster, GeoTiffCompression, Raster, ScenarioError,
    ScenarioRaster,
};
use test_utils::{class_at, create_class_grid, scratch_dir};

fn scenario(crs: CrsCode) -> ScenarioRaster {
    let bbox = BoundingBox::new(949_000.0, 6_002_000.0, 956_680.0, 6_009_680.0);
    let raster = Raster::single_band(256, 256, create_class_grid(256, 256, 16, 12), bbox, crs).unwrap();
    ScenarioRaster::new(raster, bbox, 4)
}

#[test]
fn test_write_then_read_each_compression() {
    let dir = scratch_dir();
    let exported = export(&scenario(CrsCode::Epsg3857)).unwrap();

    for compression in [GeoTiffCompression::None, GeoTiffCompression::Deflate] {
        let path = dir.path().join(format!("scenario-{}.tif", compression));
        write_geotiff(&path, &exported, compression).unwrap();

        let raster = read_geotiff(&path, CrsCode::LocalPlanar).unwrap();
        assert_eq!(raster.crs(), CrsCode::Epsg3857);
        assert_eq!(raster.shape(), (256, 256));
        assert_eq!(raster.bbox(), exported.bbox());
        assert_eq!(raster.value_at(0, 100, 37).unwrap(), class_at(100, 37, 16, 12) as f32);
    }
}

#[test]
fn test_deflate_file_is_smaller() {
    let dir = scratch_dir();
    let exported = export(&scenario(CrsCode::Epsg4087)).unwrap();
    let raw = dir.path().join("raw.tif");
    let packed = dir.path().join("packed.tif");

    write_geotiff(&raw, &exported, GeoTiffCompression::None).unwrap();
    write_geotiff(&packed, &exported, GeoTiffCompression::Deflate).unwrap();

    let raw_len = std::fs::metadata(&raw).unwrap().len();
    let packed_len = std::fs::metadata(&packed).unwrap().len();
    assert!(packed_len < raw_len);
    assert!(raw_len > 256 * 256);
}

#[test]
fn test_exported_buffer_survives_file_trip() {
    let dir = scratch_dir();
    let exported = export(&scenario(CrsCode::LocalPlanar)).unwrap();
    let path = dir.path().join("planar.tif");
    write_geotiff(&path, &exported, GeoTiffCompression::Deflate).unwrap();

    let raster = read_geotiff(&path, CrsCode::Epsg3857).unwrap();
    let reread = export(&ScenarioRaster::new(raster.clone(), raster.bbox(), 4)).unwrap();

    let ExportedRaster { pixels, crs, .. } = reread;
    assert_eq!(pixels, exported.pixels);
    assert_eq!(crs, CrsCode::LocalPlanar);
    assert_eq!(exported.inflate()[37][100], class_at(100, 37, 16, 12));
}

#[test]
fn test_missing_file_is_decode_error() {
    let dir = scratch_dir();
    let err = read_geotiff(dir.path().join("absent.tif"), CrsCode::Epsg3857).unwrap_err();
    assert!(matches!(err, ScenarioError::Decode(_)));
    assert_eq!(err.user_message(), "The land-cover map could not be read.");
}
