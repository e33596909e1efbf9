//! Scenario request and result types.

use chrono::{DateTime, Utc};
use geo_common::{BoundingBox, Polygon};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::raster::Raster;

/// What the user asked for: stamp `class_value` wherever `drawing` covers
/// the land-cover map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    /// Independently drawn shapes; a pixel is edited if it is inside any.
    pub drawing: Vec<Polygon>,
    /// Target land-cover class.
    pub class_value: u8,
}

impl ScenarioRequest {
    pub fn new(drawing: Vec<Polygon>, class_value: u8) -> Self {
        Self {
            drawing,
            class_value,
        }
    }
}

/// The edited raster plus its provenance.
#[derive(Debug, Clone)]
pub struct ScenarioRaster {
    /// Unique id for logging and downstream correlation.
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Cropped, padded and composited raster.
    pub raster: Raster,
    /// Bbox of the source raster the scenario was cut from.
    pub source_bbox: BoundingBox,
    /// Class stamped into the drawn region.
    pub edited_class: u8,
}

impl ScenarioRaster {
    pub fn new(raster: Raster, source_bbox: BoundingBox, edited_class: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            raster,
            source_bbox,
            edited_class,
        }
    }

    /// Extent of the final raster, for framing a map view.
    pub fn scenario_bbox(&self) -> BoundingBox {
        self.raster.bbox()
    }
}
