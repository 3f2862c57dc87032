//! Request and response models for the building download endpoint.

pub mod bbox;
pub mod response;

pub use bbox::{normalize, BboxError, BoundingBox};
pub use response::{DownloadResponse, ErrorBody};
