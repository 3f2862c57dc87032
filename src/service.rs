//! Building download service: naming, collaborator calls and response assembly.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::map::{LeafletRenderer, MapRenderer};
use crate::models::{BoundingBox, DownloadResponse};
use crate::overture::{FootprintDownloader, GeoJsonStats, OvertureCli, StatsExtractor};

/// Second-granularity stamp shared by the GeoJSON and map file of a request
pub fn timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d_%H%M%S").to_string()
}

pub fn geojson_file_name(stamp: &str) -> String {
    format!("buildings_{}.geojson", stamp)
}

pub fn map_file_name(stamp: &str) -> String {
    format!("map_{}.html", stamp)
}

async fn bounded<T, F>(stage: &'static str, after: Duration, fut: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| ServiceError::Timeout { stage, after })?
}

/// Runs one download request end to end
pub struct BuildingService {
    config: ServiceConfig,
    downloader: Arc<dyn FootprintDownloader>,
    stats: Arc<dyn StatsExtractor>,
    renderer: Option<Arc<dyn MapRenderer>>,
}

impl BuildingService {
    /// Create the service and its output directories
    pub fn new(
        config: ServiceConfig,
        downloader: Arc<dyn FootprintDownloader>,
        stats: Arc<dyn StatsExtractor>,
        renderer: Option<Arc<dyn MapRenderer>>,
    ) -> anyhow::Result<Self> {
        let config = ServiceConfig {
            render_maps: renderer.is_some(),
            ..config
        };
        config.ensure_dirs()?;

        Ok(Self {
            config,
            downloader,
            stats,
            renderer,
        })
    }

    /// Wire the Overture CLI, GeoJSON statistics and, when enabled, the Leaflet renderer
    pub fn from_config(config: ServiceConfig) -> anyhow::Result<Self> {
        let downloader = Arc::new(OvertureCli::new(config.overture_program.clone()));
        let renderer: Option<Arc<dyn MapRenderer>> = if config.render_maps {
            Some(Arc::new(LeafletRenderer::new()))
        } else {
            None
        };
        Self::new(config, downloader, Arc::new(GeoJsonStats::new()), renderer)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn renders_maps(&self) -> bool {
        self.renderer.is_some()
    }

    pub async fn download(&self, bbox: BoundingBox) -> Result<DownloadResponse, ServiceError> {
        let stamp = timestamp(&Local::now());
        let output_file = self.config.output_dir.join(geojson_file_name(&stamp));
        let limit = self.config.collaborator_timeout();

        info!("Downloading buildings for {} to {}", bbox, output_file.display());

        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        bounded("download", limit, async {
            self.downloader
                .download(&bbox, &output_file)
                .await
                .map_err(ServiceError::Download)
        })
        .await?;

        let stats = self.extract_stats(&output_file, limit).await?;

        let map_file = match &self.renderer {
            Some(renderer) => Some(
                self.render_map(Arc::clone(renderer), &output_file, bbox, &stamp, limit)
                    .await,
            ),
            None => None,
        };

        let geojson = read_geojson(&output_file).await?;
        if geojson.is_none() {
            warn!("Download produced no file at {}", output_file.display());
        }

        Ok(DownloadResponse {
            bbox,
            output_file: output_file.display().to_string(),
            map_file,
            stats,
            geojson,
        })
    }

    async fn extract_stats(&self, path: &Path, limit: Duration) -> Result<Value, ServiceError> {
        let stats = Arc::clone(&self.stats);
        let path = path.to_path_buf();

        bounded("statistics", limit, async move {
            tokio::task::spawn_blocking(move || stats.extract(&path))
                .await?
                .map_err(ServiceError::Stats)
        })
        .await
    }

    /// Best effort: any failure yields `None`
    async fn render_map(
        &self,
        renderer: Arc<dyn MapRenderer>,
        geojson_path: &Path,
        bbox: BoundingBox,
        stamp: &str,
        limit: Duration,
    ) -> Option<String> {
        let map_path: PathBuf = self.config.map_dir.join(map_file_name(stamp));
        let input = geojson_path.to_path_buf();
        let output = map_path.clone();

        let task = tokio::task::spawn_blocking(move || renderer.render(&input, &bbox, &output));

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(Ok(()))) => {
                debug!("Rendered map {}", map_path.display());
                Some(map_path.display().to_string())
            }
            Ok(Ok(Err(e))) => {
                warn!("Map rendering failed: {}", e);
                None
            }
            Ok(Err(e)) => {
                warn!("Map rendering task failed: {}", e);
                None
            }
            Err(_) => {
                warn!("Map rendering timed out after {}s", limit.as_secs());
                None
            }
        }
    }
}

async fn read_geojson(path: &Path) -> Result<Option<Value>, ServiceError> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(None);
    }
    let content = tokio::fs::read_to_string(path).await?;
    Ok(Some(serde_json::from_str(&content)?))
}
