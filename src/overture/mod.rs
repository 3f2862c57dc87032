//! Overture Maps building footprints: download and summary statistics.

mod downloader;
mod stats;

pub use downloader::{FootprintDownloader, OvertureCli};
pub use stats::{BuildingStats, GeoJsonStats, HeightStats, StatsExtractor};
