//! Errors raised while serving a download request.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("building download failed: {0:#}")]
    Download(anyhow::Error),

    #[error("statistics extraction failed: {0:#}")]
    Stats(anyhow::Error),

    #[error("{stage} did not finish within {}s", .after.as_secs())]
    Timeout { stage: &'static str, after: Duration },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid GeoJSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ServiceError::Timeout { .. })
    }
}
