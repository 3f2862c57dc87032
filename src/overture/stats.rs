//! Summary statistics over a downloaded building GeoJSON file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geo::{BoundingRect, ChamberlainDuquetteArea, Rect};
use geojson::{Feature, GeoJson};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Produces an aggregate statistics mapping for a GeoJSON file
pub trait StatsExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Value>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl HeightStats {
    fn from_heights(mut heights: Vec<f64>) -> Option<Self> {
        if heights.is_empty() {
            return None;
        }
        heights.sort_by(|a, b| a.total_cmp(b));

        let n = heights.len();
        let median = if n % 2 == 0 {
            (heights[n / 2 - 1] + heights[n / 2]) / 2.0
        } else {
            heights[n / 2]
        };

        Some(Self {
            min: heights[0],
            max: heights[n - 1],
            mean: heights.iter().sum::<f64>() / n as f64,
            median,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingStats {
    pub total_buildings: usize,
    /// Buildings carrying a numeric `height`
    pub has_height: usize,
    /// Buildings carrying a primary name
    pub has_name: usize,
    /// Total bounds `[min_lon, min_lat, max_lon, max_lat]`
    pub bbox: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_stats: Option<HeightStats>,
    /// Sum of footprint areas in square metres
    pub footprint_area_m2: f64,
}

/// Reads Overture building GeoJSON and summarizes it.
///
/// Unreadable input is reported inside the mapping as `{"error": ...}`
/// rather than failing the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonStats;

impl GeoJsonStats {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize_file(&self, path: &Path) -> Result<BuildingStats> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let geojson = content
            .parse::<GeoJson>()
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(summarize(geojson))
    }
}

impl StatsExtractor for GeoJsonStats {
    fn extract(&self, path: &Path) -> Result<Value> {
        match self.summarize_file(path) {
            Ok(stats) => {
                debug!(
                    "{} buildings in {}",
                    stats.total_buildings,
                    path.display()
                );
                Ok(serde_json::to_value(stats)?)
            }
            Err(e) => {
                warn!("Error extracting statistics: {:#}", e);
                Ok(json!({ "error": format!("{:#}", e) }))
            }
        }
    }
}

fn primary_name(feature: &Feature) -> Option<&Value> {
    let props = feature.properties.as_ref()?;
    props
        .get("names")
        .and_then(|names| names.get("primary"))
        .or_else(|| props.get("names.primary"))
        .filter(|v| !v.is_null())
}

fn merge_rect(acc: Option<Rect<f64>>, rect: Rect<f64>) -> Rect<f64> {
    match acc {
        None => rect,
        Some(a) => Rect::new(
            geo::coord! {
                x: a.min().x.min(rect.min().x),
                y: a.min().y.min(rect.min().y),
            },
            geo::coord! {
                x: a.max().x.max(rect.max().x),
                y: a.max().y.max(rect.max().y),
            },
        ),
    }
}

pub fn summarize(geojson: GeoJson) -> BuildingStats {
    let features: Vec<Feature> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature::from(g)],
    };

    let mut heights = Vec::new();
    let mut has_name = 0;
    let mut bounds: Option<Rect<f64>> = None;
    let mut area = 0.0;

    for feature in &features {
        if let Some(h) = feature.property("height").and_then(Value::as_f64) {
            heights.push(h);
        }
        if primary_name(feature).is_some() {
            has_name += 1;
        }

        let Some(geometry) = feature.geometry.clone() else {
            continue;
        };
        match geo_types::Geometry::<f64>::try_from(geometry) {
            Ok(geom) => {
                if let Some(rect) = geom.bounding_rect() {
                    bounds = Some(merge_rect(bounds, rect));
                }
                area += geom.chamberlain_duquette_unsigned_area();
            }
            Err(e) => debug!("Skipping unconvertible geometry: {}", e),
        }
    }

    BuildingStats {
        total_buildings: features.len(),
        has_height: heights.len(),
        has_name,
        bbox: bounds.map(|r| [r.min().x, r.min().y, r.max().x, r.max().y]),
        height_stats: HeightStats::from_heights(heights),
        footprint_area_m2: area,
    }
}
