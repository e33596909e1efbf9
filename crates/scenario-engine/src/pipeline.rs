//! Scenario pipeline orchestration.
//!
//! Every stage takes owned or borrowed input and returns a fresh value; the
//! source raster is never modified, so one source can back any number of
//! concurrent runs.

use geo_common::{BoundingBox, GeographicBounds};
use projection::{transform_for, GeoTransform};
use serde::Serialize;

use crate::composite::composite;
use crate::config::PipelineConfig;
use crate::crop::crop_buffered;
use crate::error::{Result, ScenarioError};
use crate::export::{export, ExportMetadata};
use crate::geotiff::encode_geotiff;
use crate::pad::{pad_to_tile, PadOptions};
use crate::raster::Raster;
use crate::rasterize::{rasterize, Mask};
use crate::types::{ScenarioRaster, ScenarioRequest};

/// Everything a client needs after a scenario edit: the GeoTIFF bytes, their
/// description, and the extent to frame on a map.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutput {
    pub scenario_bbox: BoundingBox,
    pub metadata: ExportMetadata,
    #[serde(skip)]
    pub geotiff: Vec<u8>,
}

/// Runs crop, pad, rasterize and composite for one configured CRS and tile
/// size.
pub struct ScenarioPipeline {
    config: PipelineConfig,
    transform: Box<dyn GeoTransform>,
}

impl std::fmt::Debug for ScenarioPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioPipeline")
            .field("config", &self.config)
            .field("transform", &self.transform.crs())
            .finish()
    }
}

impl ScenarioPipeline {
    /// Validate `config` and build the transform for its CRS.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(ScenarioError::Config)?;
        let transform = transform_for(config.crs)?;
        Ok(Self { config, transform })
    }

    /// Use a caller-supplied transform instead of the configured CRS's.
    pub fn with_transform(config: PipelineConfig, transform: Box<dyn GeoTransform>) -> Result<Self> {
        config.validate().map_err(ScenarioError::Config)?;
        if transform.crs() != config.crs {
            return Err(ScenarioError::Config(format!(
                "transform produces {} but the pipeline is configured for {}",
                transform.crs(),
                config.crs
            )));
        }
        Ok(Self { config, transform })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn transform(&self) -> &dyn GeoTransform {
        self.transform.as_ref()
    }

    /// Produce the edited raster for `request` over `source`.
    pub fn run(&self, source: &Raster, request: &ScenarioRequest) -> Result<ScenarioRaster> {
        if source.crs() != self.config.crs {
            return Err(ScenarioError::Config(format!(
                "source raster is in {} but the pipeline is configured for {}",
                source.crs(),
                self.config.crs
            )));
        }

        let region =
            GeographicBounds::from_polygons(&request.drawing).ok_or(ScenarioError::EmptyCropRegion)?;

        tracing::info!(
            polygons = request.drawing.len(),
            class_value = request.class_value,
            source_width = source.width(),
            source_height = source.height(),
            "Starting scenario edit"
        );

        let transform = self.transform();
        let cropped = crop_buffered(source, &region, transform)?;
        tracing::debug!(width = cropped.width(), height = cropped.height(), "Cropped");

        let padded = pad_to_tile(&cropped, source, &PadOptions::from(&self.config))?;
        tracing::debug!(size = padded.width(), "Padded to tile size");

        let mask = rasterize(&padded, &request.drawing, transform, Mask::MARKED)?;
        tracing::debug!(marked = mask.marked_count(), "Rasterized drawing");

        let edited = composite(&padded, &mask, request.class_value)?;
        let scenario = ScenarioRaster::new(edited, source.bbox(), request.class_value);

        tracing::info!(
            scenario_id = %scenario.id,
            created_at = %scenario.created_at,
            width = scenario.raster.width(),
            height = scenario.raster.height(),
            edited_pixels = mask.marked_count(),
            "Scenario edit complete"
        );

        Ok(scenario)
    }

    /// Run the pipeline, then export and encode the result as a GeoTIFF.
    pub fn run_and_export(&self, source: &Raster, request: &ScenarioRequest) -> Result<ScenarioOutput> {
        let scenario = self.run(source, request)?;
        let exported = export(&scenario)?;
        let geotiff = encode_geotiff(&exported, self.config.compression)?;

        let mut metadata = exported.metadata();
        metadata.scenario_id = Some(scenario.id);
        metadata.created_at = Some(scenario.created_at);

        tracing::debug!(
            scenario_id = %scenario.id,
            bytes = geotiff.len(),
            compression = %self.config.compression,
            "Exported scenario"
        );

        Ok(ScenarioOutput {
            scenario_bbox: scenario.scenario_bbox(),
            metadata,
            geotiff,
        })
    }
}
