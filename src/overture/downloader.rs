//! Building footprint download through the Overture Maps CLI.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use tokio::process::Command;
use tracing::debug;

use crate::models::BoundingBox;

/// Writes the building footprints inside a bounding box to a GeoJSON file
pub trait FootprintDownloader: Send + Sync {
    fn download<'a>(&'a self, bbox: &'a BoundingBox, output: &'a Path)
        -> BoxFuture<'a, Result<()>>;
}

/// Runs `overturemaps download` as a child process
#[derive(Debug, Clone)]
pub struct OvertureCli {
    program: String,
}

impl OvertureCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the CLI for one download
    pub fn command_args(bbox: &BoundingBox, output: &Path) -> Vec<OsString> {
        // `=` keeps a negative longitude from being read as a flag
        vec![
            "download".into(),
            format!("--bbox={}", bbox.to_query_string()).into(),
            "-f".into(),
            "geojson".into(),
            "--type=building".into(),
            "-o".into(),
            output.as_os_str().to_owned(),
        ]
    }
}

impl Default for OvertureCli {
    fn default() -> Self {
        Self::new("overturemaps")
    }
}

impl FootprintDownloader for OvertureCli {
    fn download<'a>(
        &'a self,
        bbox: &'a BoundingBox,
        output: &'a Path,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let args = Self::command_args(bbox, output);
            debug!("Running {} {:?}", self.program, args);

            // Dropping the future (e.g. on timeout) kills the child
            let result = Command::new(&self.program)
                .args(&args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .with_context(|| format!("Failed to run {}", self.program))?;

            if !result.status.success() {
                let stderr = String::from_utf8_lossy(&result.stderr);
                anyhow::bail!(
                    "{} exited with {}: {}",
                    self.program,
                    result.status,
                    stderr.trim()
                );
            }

            debug!("{} wrote {}", self.program, output.display());
            Ok(())
        }
        .boxed()
    }
}
