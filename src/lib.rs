//! Footprints - building footprint downloads over HTTP
//!
//! This library provides the shared request handling for the serve and fetch binaries.

pub mod api;
pub mod config;
pub mod error;
pub mod map;
pub mod models;
pub mod overture;
pub mod service;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use models::{normalize, BboxError, BoundingBox};
pub use service::BuildingService;
