//! One-shot building footprint download.
//!
//! Runs the same pipeline as a single `/download_buildings` request and
//! prints the response JSON to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use footprints::config::ConfigArgs;
use footprints::{normalize, BuildingService};

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Download building footprints for one bounding box")]
struct Args {
    /// Bounding box: "min_lon,min_lat,max_lon,max_lat"
    #[arg(long, allow_hyphen_values = true)]
    bbox: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    min_lon: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    min_lat: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    max_lon: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    max_lat: Option<String>,

    /// Omit the GeoJSON document from the printed output
    #[arg(long)]
    no_geojson: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let bbox = normalize(
        args.bbox.as_deref(),
        args.min_lon.as_deref(),
        args.min_lat.as_deref(),
        args.max_lon.as_deref(),
        args.max_lat.as_deref(),
    )?;

    let service = BuildingService::from_config(args.config.resolve()?)?;
    let response = service
        .download(bbox)
        .await
        .context("Building download failed")?;

    info!(
        "Wrote {}{}",
        response.output_file,
        response
            .map_file
            .as_ref()
            .and_then(|m| m.as_deref())
            .map(|m| format!(" and {}", m))
            .unwrap_or_default()
    );

    let output = response.to_json(!args.no_geojson)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
