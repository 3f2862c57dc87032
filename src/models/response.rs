//! JSON bodies returned by the download endpoint.

use serde::Serialize;
use serde_json::Value;

use super::BoundingBox;

/// Successful download response
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    /// Resolved bounding box
    pub bbox: BoundingBox,

    /// Relative path of the written GeoJSON file
    pub output_file: String,

    /// Outer `None` when rendering is disabled (field omitted),
    /// inner `None` when rendering failed (serialized as `null`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_file: Option<Option<String>>,

    /// Summary produced by the statistics extractor
    pub stats: Value,

    /// Parsed GeoJSON document, `null` if the download wrote nothing
    pub geojson: Option<Value>,
}

impl DownloadResponse {
    /// JSON form of the response, dropping the `geojson` key entirely when not wanted
    pub fn to_json(&self, include_geojson: bool) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if !include_geojson {
            if let Some(object) = value.as_object_mut() {
                object.remove("geojson");
            }
        }
        Ok(value)
    }
}

/// Error body, sent with no other fields
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
