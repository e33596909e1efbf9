//! Drawing file parsing.
//!
//! Two layouts are accepted:
//! - a bare JSON array of rings, `[[[lon, lat], ...], ...]`
//! - GeoJSON: any object whose geometries are `Polygon`, `MultiPolygon` or
//!   collections of them; features without a geometry are skipped
//!
//! Only outer rings are used; holes are ignored.

use std::path::Path;

use geo_common::Polygon;
use geojson::{GeoJson, Geometry, Value};
use thiserror::Error;

/// Errors raised while loading a drawing.
#[derive(Debug, Error)]
pub enum DrawingError {
    #[error("failed to read drawing: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse drawing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    #[error("unsupported geometry type {0}; draw polygons")]
    UnsupportedGeometry(&'static str),

    #[error("invalid position {position:?} in ring {ring}")]
    InvalidPosition { ring: usize, position: Vec<f64> },
}

/// A ring of `[lon, lat, ...]` positions; extra ordinates are ignored.
type Ring = Vec<Vec<f64>>;

fn geojson_rings(geojson: GeoJson, out: &mut Vec<Ring>) -> Result<(), DrawingError> {
    match geojson {
        GeoJson::FeatureCollection(collection) => {
            for feature in collection.features {
                if let Some(geometry) = feature.geometry {
                    geometry_rings(geometry, out)?;
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = feature.geometry {
                geometry_rings(geometry, out)?;
            }
        }
        GeoJson::Geometry(geometry) => geometry_rings(geometry, out)?,
    }
    Ok(())
}

/// Outer ring of every polygon in `geometry`.
fn geometry_rings(geometry: Geometry, out: &mut Vec<Ring>) -> Result<(), DrawingError> {
    match geometry.value {
        Value::Polygon(rings) => out.extend(rings.into_iter().take(1)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.into_iter().filter_map(|p| p.into_iter().next()))
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                geometry_rings(geometry, out)?;
            }
        }
        Value::Point(_) => return Err(DrawingError::UnsupportedGeometry("Point")),
        Value::MultiPoint(_) => return Err(DrawingError::UnsupportedGeometry("MultiPoint")),
        Value::LineString(_) => return Err(DrawingError::UnsupportedGeometry("LineString")),
        Value::MultiLineString(_) => {
            return Err(DrawingError::UnsupportedGeometry("MultiLineString"))
        }
    }
    Ok(())
}

/// Parse a drawing from JSON text.
pub fn parse_drawing(json: &str) -> Result<Vec<Polygon>, DrawingError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let rings: Vec<Ring> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        let geojson = GeoJson::from_json_value(value).map_err(Box::new)?;
        let mut rings = Vec::new();
        geojson_rings(geojson, &mut rings)?;
        rings
    };

    rings
        .into_iter()
        .enumerate()
        .map(|(index, ring)| to_polygon(index, ring))
        .collect()
}

fn to_polygon(index: usize, ring: Ring) -> Result<Polygon, DrawingError> {
    let mut coords = Vec::with_capacity(ring.len());
    for position in ring {
        let (lon, lat) = match position.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => (f64::NAN, f64::NAN),
        };
        if !(lon.is_finite() && lat.is_finite()) {
            return Err(DrawingError::InvalidPosition {
                ring: index,
                position,
            });
        }
        coords.push((lon, lat));
    }
    Ok(Polygon::from_lon_lat(&coords))
}

/// Read and parse a drawing file.
pub fn load_drawing(path: impl AsRef<Path>) -> Result<Vec<Polygon>, DrawingError> {
    let text = std::fs::read_to_string(path)?;
    parse_drawing(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_rings() {
        let drawing = parse_drawing("[[[8.5, 47.3], [8.6, 47.3], [8.6, 47.4]], [[0, 0], [1, 0], [1, 1]]]").unwrap();
        assert_eq!(drawing.len(), 2);
        assert_eq!(drawing[0].vertices[2].lat, 47.4);
    }

    #[test]
    fn test_polygon_ignores_holes() {
        let json = r#"{
            "type": "Polygon",
            "coordinates": [
                [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                [[4, 4], [6, 4], [6, 6], [4, 4]]
            ]
        }"#;
        let drawing = parse_drawing(json).unwrap();
        assert_eq!(drawing.len(), 1);
        assert_eq!(drawing[0].vertices.len(), 5);
    }

    #[test]
    fn test_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "field"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}},
                {"type": "Feature", "properties": null, "geometry": null},
                {"type": "Feature",
                 "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[2, 2], [3, 2], [3, 3]]],
                    [[[5, 5, 120.0], [6, 5, 121.0], [6, 6, 119.0]]]
                 ]}}
            ]
        }"#;
        let drawing = parse_drawing(json).unwrap();
        assert_eq!(drawing.len(), 3);
        assert_eq!(drawing[2].vertices[1].lon, 6.0);
    }

    #[test]
    fn test_rejects_short_positions() {
        let err = parse_drawing("[[[0, 0], [1], [1, 1]]]").unwrap_err();
        assert!(matches!(err, DrawingError::InvalidPosition { ring: 0, .. }));
    }

    #[test]
    fn test_geometry_collection() {
        let json = r#"{
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]},
                {"type": "MultiPolygon", "coordinates": [[[[2, 2], [3, 2], [3, 3]]]]}
            ]
        }"#;
        assert_eq!(parse_drawing(json).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_unsupported_geometry() {
        let err = parse_drawing(r#"{"type": "Point", "coordinates": [1, 2]}"#).unwrap_err();
        assert!(matches!(err, DrawingError::UnsupportedGeometry("Point")));
    }

    #[test]
    fn test_rejects_malformed_geojson() {
        let err = parse_drawing(r#"{"type": "Polygon"}"#).unwrap_err();
        assert!(matches!(err, DrawingError::GeoJson(_)));
    }
}
