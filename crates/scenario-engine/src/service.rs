//! Async front door for the scenario pipeline.
//!
//! The pipeline is CPU-bound and synchronous. `ScenarioService` moves each run
//! onto Tokio's blocking pool so async callers (a CLI, a web handler) stay
//! responsive, and independent scenarios run in parallel.
//!
//! # Example
//!
//! ```rust,ignore
//! let service = ScenarioService::new(PipelineConfig::from_env())?;
//! let source = Arc::new(read_geotiff("landcover.tif", service.config().crs)?);
//!
//! let output = service.submit(source, request).await?;
//! tokio::fs::write("scenario.tif", &output.geotiff).await?;
//! ```

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::{Result, ScenarioError};
use crate::pipeline::{ScenarioOutput, ScenarioPipeline};
use crate::raster::Raster;
use crate::types::ScenarioRequest;

/// Shares one pipeline across concurrent scenario submissions.
#[derive(Debug, Clone)]
pub struct ScenarioService {
    pipeline: Arc<ScenarioPipeline>,
}

impl ScenarioService {
    /// Create a service with a freshly built pipeline.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self::from_pipeline(ScenarioPipeline::new(config)?))
    }

    pub fn from_pipeline(pipeline: ScenarioPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        self.pipeline.config()
    }

    /// Run one scenario edit off the async runtime and return the encoded
    /// result.
    pub async fn submit(&self, source: Arc<Raster>, request: ScenarioRequest) -> Result<ScenarioOutput> {
        let pipeline = Arc::clone(&self.pipeline);

        tokio::task::spawn_blocking(move || pipeline.run_and_export(&source, &request))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Scenario worker failed");
                ScenarioError::Internal(format!("scenario worker failed: {}", e))
            })?
    }
}
