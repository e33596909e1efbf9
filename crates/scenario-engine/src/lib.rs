//! Land-cover scenario editing.
//!
//! Given a classified land-cover raster and a user drawing, this crate
//! produces a new raster in which the drawn region carries a target class,
//! cut to a tile-aligned square that keeps the source's pixel grid.
//!
//! # Architecture
//!
//! ```text
//! ScenarioRequest { drawing, class_value }
//!      │
//!      ▼
//! ScenarioPipeline::run(source, request)
//!      │
//!      ├─► crop_buffered     drawing bounds ± one extent on each side
//!      │
//!      ├─► pad_to_tile       square, multiple of tile_size, backfilled
//!      │                     from the source at the same positions
//!      │
//!      ├─► rasterize         even-odd test of every pixel center
//!      │
//!      └─► composite         stamp class_value where the mask is marked
//!               │
//!               ▼
//!          ScenarioRaster ──► export ──► encode_geotiff ──► bytes
//! ```
//!
//! # Example
//!
//! ```ignore
//! use scenario_engine::{read_geotiff, PipelineConfig, ScenarioPipeline, ScenarioRequest};
//!
//! let pipeline = ScenarioPipeline::new(PipelineConfig::default())?;
//! let source = read_geotiff("landcover.tif", pipeline.config().crs)?;
//!
//! let request = ScenarioRequest::new(drawing, 9);
//! let output = pipeline.run_and_export(&source, &request)?;
//! std::fs::write("scenario.tif", &output.geotiff)?;
//! ```

pub mod composite;
pub mod config;
pub mod crop;
pub mod error;
pub mod export;
pub mod geotiff;
pub mod pad;
pub mod pipeline;
pub mod raster;
pub mod rasterize;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use composite::composite;
pub use config::{GeoTiffCompression, PipelineConfig};
pub use crop::{crop_buffered, CropWindow};
pub use error::{ErrorKind, Result, ScenarioError};
pub use export::{export, ExportMetadata, ExportedRaster};
pub use geotiff::{decode_geotiff, encode_geotiff, read_geotiff, write_geotiff};
pub use pad::{pad_to_tile, PadOptions};
pub use pipeline::{ScenarioOutput, ScenarioPipeline};
pub use raster::{Grid, Raster};
pub use rasterize::{rasterize, Mask};
pub use service::ScenarioService;
pub use types::{ScenarioRaster, ScenarioRequest};
