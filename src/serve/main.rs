//! HTTP server for building footprint downloads.
//!
//! Accepts a bounding box, downloads Overture building footprints for it,
//! summarizes them and optionally renders an HTML map.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use footprints::api::{router, AppState};
use footprints::config::ConfigArgs;
use footprints::BuildingService;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Building footprint download server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    listen: String,

    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = args.config.resolve()?;

    info!("Footprints Server");
    info!(
        "Using {} for downloads, map rendering {}",
        config.overture_program,
        if config.render_maps { "enabled" } else { "disabled" }
    );

    let service = BuildingService::from_config(config)?;
    let state = Arc::new(AppState { service });

    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
