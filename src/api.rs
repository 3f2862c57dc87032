//! HTTP API for building footprint downloads.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ValidationStatus;
use crate::error::ServiceError;
use crate::models::{normalize, ErrorBody};
use crate::service::BuildingService;

/// Application state shared across handlers
pub struct AppState {
    pub service: BuildingService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/download_buildings", get(download_buildings_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    render_maps: bool,
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        render_maps: state.service.renders_maps(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQueryParams {
    /// Bounding box: "min_lon,min_lat,max_lon,max_lat"
    pub bbox: Option<String>,
    // Kept as raw strings so a bad number is reported like a bad bbox segment
    pub min_lon: Option<String>,
    pub min_lat: Option<String>,
    pub max_lon: Option<String>,
    pub max_lat: Option<String>,
}

/// Failures after the bounding box was accepted
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorBody::new(self.0.to_string()))).into_response()
    }
}

/// Download building footprints for a bounding box
async fn download_buildings_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadQueryParams>,
) -> Result<Response, ApiError> {
    let bbox = match normalize(
        params.bbox.as_deref(),
        params.min_lon.as_deref(),
        params.min_lat.as_deref(),
        params.max_lon.as_deref(),
        params.max_lat.as_deref(),
    ) {
        Ok(bbox) => bbox,
        Err(e) => {
            info!("Rejected bounding box: {}", e);
            let status = match state.service.config().validation_status {
                ValidationStatus::Ok => StatusCode::OK,
                ValidationStatus::BadRequest => StatusCode::BAD_REQUEST,
            };
            return Ok((status, Json(ErrorBody::new(e.to_string()))).into_response());
        }
    };

    let response = state.service.download(bbox).await.map_err(|e| {
        error!("Building download failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(response).into_response())
}
