//! Configuration for the scenario pipeline.

use geo_common::CrsCode;
use serde::{Deserialize, Serialize};

/// Configuration for the scenario pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Side length the padded raster is aligned to. The downstream
    /// prediction service consumes square tiles of this size.
    pub tile_size: usize,

    /// Value written where neither the cropped nor the source raster has data.
    pub fill_value: f32,

    /// Projected CRS all rasters and pixel arithmetic use.
    pub crs: CrsCode,

    /// Compression codec for exported GeoTIFF strips.
    pub compression: GeoTiffCompression,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tile_size: 256,
            fill_value: 0.0,
            crs: CrsCode::Epsg3857,
            compression: GeoTiffCompression::None,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SCENARIO_TILE_SIZE") {
            if let Ok(size) = val.parse() {
                config.tile_size = size;
            }
        }

        if let Ok(val) = std::env::var("SCENARIO_FILL_VALUE") {
            if let Ok(fill) = val.parse() {
                config.fill_value = fill;
            }
        }

        if let Ok(val) = std::env::var("SCENARIO_CRS") {
            if let Ok(crs) = CrsCode::from_code_string(&val) {
                config.crs = crs;
            }
        }

        if let Ok(val) = std::env::var("SCENARIO_COMPRESSION") {
            config.compression = GeoTiffCompression::from_str(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 {
            return Err("tile_size must be > 0".to_string());
        }

        if !self.fill_value.is_finite() || !(0.0..=255.0).contains(&self.fill_value) {
            return Err("fill_value must be within 0-255".to_string());
        }

        if self.crs.is_geographic() {
            return Err(format!("crs must be a projected CRS, got {}", self.crs));
        }

        Ok(())
    }
}

/// Compression codec for exported GeoTIFF files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeoTiffCompression {
    /// Uncompressed strips.
    #[default]
    None,
    /// zlib/Deflate strips (TIFF compression 8).
    Deflate,
}

impl GeoTiffCompression {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// no compression.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "deflate" | "zlib" => Self::Deflate,
            _ => Self::None,
        }
    }

    /// Get the codec name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Deflate => "deflate",
        }
    }
}

impl std::fmt::Display for GeoTiffCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
