use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Status code used for bounding box validation failures
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// 200 OK with an error body
    #[default]
    Ok,
    /// 400 Bad Request with an error body
    BadRequest,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    /// Where downloaded GeoJSON files are written
    pub output_dir: PathBuf,
    /// Where rendered HTML maps are written
    pub map_dir: PathBuf,
    /// Render an HTML map for every download
    pub render_maps: bool,
    /// Upper bound on each collaborator call
    pub collaborator_timeout_secs: u64,
    /// Overture Maps command-line tool
    pub overture_program: String,
    pub validation_status: ValidationStatus,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("geojson_files"),
            map_dir: PathBuf::from("MAP_file"),
            render_maps: false,
            collaborator_timeout_secs: 300,
            overture_program: "overturemaps".to_string(),
            validation_status: ValidationStatus::Ok,
        }
    }
}

impl ServiceConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: ServiceConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    /// Create the output directories. Safe to call repeatedly.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;
        info!("GeoJSON output directory: {}", self.output_dir.display());

        if self.render_maps {
            fs::create_dir_all(&self.map_dir).with_context(|| {
                format!("Failed to create map directory {}", self.map_dir.display())
            })?;
            info!("Map output directory: {}", self.map_dir.display());
        }

        Ok(())
    }
}

/// Command-line options shared by the binaries. Flags override the file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for downloaded GeoJSON files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Directory for rendered HTML maps
    #[arg(long)]
    pub map_dir: Option<PathBuf>,

    /// Render an HTML map for every download
    #[arg(long)]
    pub render_maps: bool,

    /// Turn map rendering off even if the config file enables it
    #[arg(long, conflicts_with = "render_maps")]
    pub no_render_maps: bool,

    /// Timeout in seconds for each download, statistics or render call
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Overture Maps command-line tool
    #[arg(long)]
    pub overture_program: Option<String>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config from {}", path.display());
                ServiceConfig::load_from_file(path)?
            }
            None => ServiceConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.map_dir {
            config.map_dir = dir.clone();
        }
        if self.render_maps {
            config.render_maps = true;
        }
        if self.no_render_maps {
            config.render_maps = false;
        }
        if let Some(secs) = self.timeout_secs {
            config.collaborator_timeout_secs = secs;
        }
        if let Some(program) = &self.overture_program {
            config.overture_program = program.clone();
        }

        Ok(config)
    }
}
