//! Saving restored images
//!
//! The result arrives as base64 in memory; saving decodes it and writes the
//! bytes as-is. The suggested name is `restored-<original file name>`.

use std::path::{Path, PathBuf};

use crate::error::{RestoreError, Result};
use crate::state::RestorationResult;

/// Write a restored image to `destination`
pub async fn save_result(result: &RestorationResult, destination: &Path) -> Result<()> {
    let bytes = result.decode()?;

    tokio::fs::write(destination, &bytes).await.map_err(|e| {
        tracing::error!("❌ Failed to write {}: {}", destination.display(), e);
        RestoreError::Io(e.to_string())
    })?;

    tracing::info!("💾 Saved restored image: {} ({} bytes)", destination.display(), bytes.len());
    Ok(())
}

/// Directory the save dialog opens in
///
/// Downloads, then Pictures, then the home directory.
pub fn default_download_dir() -> Option<PathBuf> {
    dirs::download_dir()
        .or_else(dirs::picture_dir)
        .or_else(dirs::home_dir)
}
