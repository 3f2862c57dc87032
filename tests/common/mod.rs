#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use futures::future::{BoxFuture, FutureExt};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use footprints::api::{router, AppState};
use footprints::map::{LeafletRenderer, MapRenderer, RenderError};
use footprints::overture::{FootprintDownloader, GeoJsonStats, StatsExtractor};
use footprints::{BoundingBox, BuildingService, ServiceConfig};

/// What the fake downloader does when called
#[derive(Clone)]
pub enum Behavior {
    /// Write a small feature collection to the output path
    Write,
    /// Return success without writing anything
    WriteNothing,
    /// Return an error
    Fail,
    /// Never finish within the test timeout
    Hang,
}

pub struct FakeDownloader {
    behavior: Behavior,
    pub calls: Mutex<Vec<BoundingBox>>,
}

impl FakeDownloader {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }
}

pub fn sample_buildings() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-122.45, 37.75], [-122.449, 37.75], [-122.449, 37.751], [-122.45, 37.751], [-122.45, 37.75]]]
            },
            "properties": {"height": 21.0, "names": {"primary": "Test Hall"}}
        }]
    })
}

impl FootprintDownloader for FakeDownloader {
    fn download<'a>(
        &'a self,
        bbox: &'a BoundingBox,
        output: &'a Path,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        async move {
            self.calls.lock().unwrap().push(*bbox);
            match self.behavior {
                Behavior::Write => {
                    tokio::fs::write(output, sample_buildings().to_string()).await?;
                    Ok(())
                }
                Behavior::WriteNothing => Ok(()),
                Behavior::Fail => anyhow::bail!("overture unavailable"),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                }
            }
        }
        .boxed()
    }
}

pub struct FailingRenderer;

impl MapRenderer for FailingRenderer {
    fn render(&self, _: &Path, _: &BoundingBox, output: &Path) -> Result<(), RenderError> {
        Err(RenderError::Io {
            path: output.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        })
    }
}

/// Sleeps past the one second test timeout, blocking its worker thread
pub struct SlowRenderer;

impl MapRenderer for SlowRenderer {
    fn render(&self, _: &Path, _: &BoundingBox, _: &Path) -> Result<(), RenderError> {
        std::thread::sleep(Duration::from_secs(2));
        Ok(())
    }
}

pub struct FailingStats;

impl StatsExtractor for FailingStats {
    fn extract(&self, _: &Path) -> anyhow::Result<Value> {
        anyhow::bail!("corrupt parquet footer")
    }
}

pub struct SlowStats;

impl StatsExtractor for SlowStats {
    fn extract(&self, _: &Path) -> anyhow::Result<Value> {
        std::thread::sleep(Duration::from_secs(2));
        Ok(json!({}))
    }
}

pub fn test_config(root: &Path) -> ServiceConfig {
    ServiceConfig {
        output_dir: root.join("geojson_files"),
        map_dir: root.join("MAP_file"),
        collaborator_timeout_secs: 1,
        ..ServiceConfig::default()
    }
}

pub fn app(
    config: ServiceConfig,
    downloader: Arc<FakeDownloader>,
    renderer: Option<Arc<dyn MapRenderer>>,
) -> Router {
    app_with_stats(config, downloader, Arc::new(GeoJsonStats::new()), renderer)
}

pub fn app_with_stats(
    config: ServiceConfig,
    downloader: Arc<FakeDownloader>,
    stats: Arc<dyn StatsExtractor>,
    renderer: Option<Arc<dyn MapRenderer>>,
) -> Router {
    let service = BuildingService::new(config, downloader, stats, renderer).unwrap();
    router(Arc::new(AppState { service }))
}

pub fn leaflet() -> Option<Arc<dyn MapRenderer>> {
    Some(Arc::new(LeafletRenderer::new()))
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}
