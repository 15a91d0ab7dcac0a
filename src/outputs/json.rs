//! JSON snapshot output.
//!
//! The snapshot serializes the full [`RankedResult`] so other tooling can
//! consume the run's outcome without scraping the HTML page. It is an
//! optional side output: failure to write it is logged by the caller and
//! never blocks the page update.

use crate::models::RankedResult;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write a [`RankedResult`] to `path` as pretty-printed JSON.
///
/// Parent directories are created as needed. The file is replaced whole on
/// each run; there is no append semantics and no cross-run state.
///
/// # Arguments
///
/// * `result` - The ranked articles to serialize
/// * `path` - Destination file path
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation, or
/// the write fails.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn write_snapshot(result: &RankedResult, path: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(result)?;

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, json).await?;
    info!(path = %path, "Wrote JSON snapshot");
    Ok(())
}
