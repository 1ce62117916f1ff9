// Cache directory adapter - Allocates temporary output files

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Allocates output paths inside a cache directory
pub struct CacheDirAdapter {
    dir: PathBuf,
}

impl CacheDirAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default cache location under the system temp directory
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("mediaops")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete every file in the cache directory, returning how many went
    pub fn purge(&self) -> MediaResult<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in WalkDir::new(&self.dir).min_depth(1) {
            let entry = entry.map_err(|e| MediaError::Io(e.into()))?;
            if entry.file_type().is_file() {
                match std::fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Failed to remove cache file"
                    ),
                }
            }
        }

        info!(dir = %self.dir.display(), removed, "Cache purged");
        Ok(removed)
    }
}

#[async_trait]
impl CachePort for CacheDirAdapter {
    async fn new_path(&self, extension: &str) -> MediaResult<Option<String>> {
        if extension.is_empty() {
            return Ok(None);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        // A single exclusive create; short enough to run inline
        let prefix = format!("media-{}-", Local::now().format("%Y%m%d%H%M%S"));
        let placeholder = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&format!(".{}", extension))
            .tempfile_in(&self.dir)?;

        // The name stays reserved for us; ffmpeg must be the one creating the
        // file, so the placeholder is removed.
        let path = placeholder.path().to_string_lossy().into_owned();
        placeholder.close()?;

        debug!(path = %path, "Allocated cache path");
        Ok(Some(path))
    }
}
