//! Leaflet-based HTML map with the building footprints as an overlay.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::BoundingBox;

pub const DEFAULT_ZOOM: u8 = 14;
pub const LAYER_NAME: &str = "Buildings by Height";

const LEAFLET_VERSION: &str = "1.9.4";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("layer data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders a GeoJSON file into a standalone HTML map
pub trait MapRenderer: Send + Sync {
    fn render(
        &self,
        geojson_path: &Path,
        bbox: &BoundingBox,
        output: &Path,
    ) -> Result<(), RenderError>;
}

#[derive(Debug, Clone)]
pub struct LeafletRenderer {
    zoom: u8,
    layer_name: String,
}

impl Default for LeafletRenderer {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            layer_name: LAYER_NAME.to_string(),
        }
    }
}

impl LeafletRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the HTML document for an already parsed layer
    pub fn to_html(&self, layer: &Value, bbox: &BoundingBox) -> Result<String, RenderError> {
        let (lat, lon) = bbox.center_hint();
        let style = json!({ "color": "blue", "fillOpacity": 0.5 });

        Ok(format!(
            include_str!("template.html"),
            version = LEAFLET_VERSION,
            lat = lat,
            lon = lon,
            zoom = self.zoom,
            style = script_safe(&serde_json::to_string(&style)?),
            layer_name = script_safe(&serde_json::to_string(&self.layer_name)?),
            data = script_safe(&serde_json::to_string(layer)?),
        ))
    }
}

impl MapRenderer for LeafletRenderer {
    fn render(
        &self,
        geojson_path: &Path,
        bbox: &BoundingBox,
        output: &Path,
    ) -> Result<(), RenderError> {
        let content = fs::read_to_string(geojson_path).map_err(|source| RenderError::Io {
            path: geojson_path.display().to_string(),
            source,
        })?;
        let layer: Value = serde_json::from_str(&content)?;

        let html = self.to_html(&layer, bbox)?;
        fs::write(output, html).map_err(|source| RenderError::Io {
            path: output.display().to_string(),
            source,
        })?;

        debug!("Wrote map {}", output.display());
        Ok(())
    }
}

/// Keep inline JSON from terminating the surrounding `<script>` element
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
