//! Standalone HTML map rendering for downloaded footprints.

mod leaflet;

pub use leaflet::{LeafletRenderer, MapRenderer, RenderError, DEFAULT_ZOOM, LAYER_NAME};
