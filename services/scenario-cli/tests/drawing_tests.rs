//! Tests for loading drawing files from disk.

use std::io::Write;

use scenario_cli::{load_drawing, DrawingError};

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_geojson_feature() {
    let file = write_temp(
        r#"{"type": "Feature", "properties": {},
            "geometry": {"type": "Polygon",
                         "coordinates": [[[8.54, 47.36], [8.60, 47.30], [8.70, 47.24], [8.54, 47.36]]]}}"#,
    );
    let drawing = load_drawing(file.path()).unwrap();

    assert_eq!(drawing.len(), 1);
    assert_eq!(drawing[0].distinct_ring().len(), 3);
    assert!(!drawing[0].is_degenerate());
}

#[test]
fn test_load_empty_collection() {
    let file = write_temp(r#"{"type": "FeatureCollection", "features": []}"#);
    assert!(load_drawing(file.path()).unwrap().is_empty());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_drawing(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, DrawingError::Io(_)));
}

#[test]
fn test_malformed_json() {
    let file = write_temp("[[[0, 0], [1, 0]");
    assert!(matches!(load_drawing(file.path()), Err(DrawingError::Json(_))));
}
