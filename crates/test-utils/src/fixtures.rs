//! Common test fixtures for scenario-editing tests.
//!
//! Bounding boxes are `(min_x, min_y, max_x, max_y)` tuples and drawings are
//! lists of `(lon, lat)` rings, so this crate stays free of workspace types.

/// Common bounding box definitions for testing.
pub mod bbox {
    /// 1000 x 1000 m synthetic source raster at 1 m resolution.
    pub const SOURCE_1K: (f64, f64, f64, f64) = (0.0, 0.0, 1000.0, 1000.0);

    /// Region drawn in the middle of [`SOURCE_1K`].
    pub const CENTER_REGION: (f64, f64, f64, f64) = (400.0, 400.0, 600.0, 600.0);

    /// Region hugging the north-west corner of [`SOURCE_1K`]; its buffered
    /// window spills over the source edges.
    pub const CORNER_REGION: (f64, f64, f64, f64) = (20.0, 900.0, 80.0, 980.0);

    /// Region entirely east of [`SOURCE_1K`].
    pub const OUTSIDE_REGION: (f64, f64, f64, f64) = (2000.0, 2000.0, 2100.0, 2100.0);
}

/// Common drawings for testing.
pub mod drawings {
    /// Closed axis-aligned rectangle ring (first vertex repeated).
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<(f64, f64)> {
        vec![
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ]
    }

    /// Triangle with a horizontal base, apex above its midpoint.
    pub fn triangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<(f64, f64)> {
        vec![(min_x, min_y), (max_x, min_y), ((min_x + max_x) / 2.0, max_y)]
    }

    /// Bow-tie ring crossing itself at the center of the box.
    pub fn bow_tie(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<(f64, f64)> {
        vec![(min_x, min_y), (max_x, max_y), (max_x, min_y), (min_x, max_y)]
    }
}
