//! Error types for the scenario pipeline.

use projection::ProjectionError;
use thiserror::Error;

/// Broad classification of a [`ScenarioError`], used by callers to decide
/// how to present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied input the pipeline cannot work with.
    Input,
    /// An internal invariant was broken; indicates a pipeline wiring bug.
    Invariant,
    /// Decoding, encoding, configuration or runtime failures around the core.
    Infrastructure,
}

/// Errors that can occur while producing a scenario raster.
#[derive(Error, Debug)]
pub enum ScenarioError {
    // === Input errors ===
    /// The buffered crop window has no pixels inside the source raster.
    #[error("crop region is empty or lies outside the source raster")]
    EmptyCropRegion,

    /// A coordinate was non-finite or outside the projection's domain.
    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    /// A value cannot be stored as an 8-bit class code.
    #[error("class value {value} does not fit in an unsigned 8-bit code")]
    ClassValueOverflow { value: f64 },

    // === Invariant violations ===
    /// Pixel read outside the raster.
    #[error("pixel index out of range: band {band}, col {col}, row {row}")]
    IndexOutOfRange { band: usize, col: usize, row: usize },

    /// Two rasters/masks that must share a shape do not.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A flattened buffer has the wrong number of elements.
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    // === Infrastructure errors ===
    /// Raster construction rejected inconsistent dimensions or bounds.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// Source bytes could not be decoded.
    #[error("failed to decode raster: {0}")]
    Decode(String),

    /// Output bytes could not be encoded.
    #[error("failed to encode raster: {0}")]
    Encode(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Worker or runtime failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScenarioError {
    /// Create a ShapeMismatch error from two `(width, height)` pairs.
    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch {
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }

    /// Create an InvalidRaster error.
    pub fn invalid_raster(msg: impl Into<String>) -> Self {
        Self::InvalidRaster(msg.into())
    }

    /// Create a Decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCropRegion | Self::InvalidCoordinate { .. } | Self::ClassValueOverflow { .. } => {
                ErrorKind::Input
            }
            Self::IndexOutOfRange { .. } | Self::ShapeMismatch { .. } | Self::SizeMismatch { .. } => {
                ErrorKind::Invariant
            }
            _ => ErrorKind::Infrastructure,
        }
    }

    /// A single actionable message per failure kind, suitable for end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyCropRegion => {
                "Draw at least one shape over the land-cover map before exporting."
            }
            Self::InvalidCoordinate { .. } => {
                "The drawing contains a point outside the supported map area."
            }
            Self::ClassValueOverflow { .. } => "Pick a land-cover class between 0 and 255.",
            Self::Decode(_) => "The land-cover map could not be read.",
            Self::Config(_) => "The scenario editor is misconfigured.",
            _ => "An unexpected internal error occurred while building the scenario.",
        }
    }
}

impl From<ProjectionError> for ScenarioError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::InvalidCoordinate { x, y } => Self::InvalidCoordinate { x, y },
            ProjectionError::UnsupportedCrs(crs) => {
                Self::Config(format!("{} is not a projected CRS", crs))
            }
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(err: std::io::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Result type for scenario operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use geo_common::CrsCode;

    #[test]
    fn test_kinds() {
        assert_eq!(ScenarioError::EmptyCropRegion.kind(), ErrorKind::Input);
        assert_eq!(
            ScenarioError::shape_mismatch((2, 2), (3, 3)).kind(),
            ErrorKind::Invariant
        );
        assert_eq!(
            ScenarioError::SizeMismatch { expected: 4, actual: 3 }.kind(),
            ErrorKind::Invariant
        );
        assert_eq!(ScenarioError::decode("bad").kind(), ErrorKind::Infrastructure);
    }

    #[test]
    fn test_projection_error_conversion() {
        let err: ScenarioError = ProjectionError::InvalidCoordinate { x: 1.0, y: 95.0 }.into();
        assert!(matches!(err, ScenarioError::InvalidCoordinate { x, y } if x == 1.0 && y == 95.0));

        let err: ScenarioError = ProjectionError::UnsupportedCrs(CrsCode::Epsg4326).into();
        assert!(matches!(err, ScenarioError::Config(_)));
    }

    #[test]
    fn test_invariant_errors_share_message() {
        let a = ScenarioError::IndexOutOfRange { band: 0, col: 1, row: 2 };
        let b = ScenarioError::shape_mismatch((1, 1), (2, 2));
        assert_eq!(a.user_message(), b.user_message());
        assert_ne!(a.user_message(), ScenarioError::EmptyCropRegion.user_message());
    }

    #[test]
    fn test_display() {
        let err = ScenarioError::shape_mismatch((768, 768), (600, 600));
        assert_eq!(err.to_string(), "shape mismatch: expected 768x768, got 600x600");
    }
}
