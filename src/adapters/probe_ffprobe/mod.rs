//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` and keeps the stdout of the last query around, the way the
//! engine expects its side channel to behave.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFprobe-based probe adapter
///
/// `last_output` is shared by every caller of the adapter: queries must be
/// serialized, or one caller can read another caller's output.
pub struct FfprobeAdapter {
    binary: String,
    last_output: Mutex<String>,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter running `binary`
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            last_output: Mutex::new(String::new()),
        }
    }

    fn store_output(&self, output: String) -> MediaResult<()> {
        let mut last = self
            .last_output
            .lock()
            .map_err(|_| MediaError::Probe("last output lock poisoned".to_string()))?;
        *last = output;
        Ok(())
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn run_query(&self, command: &str) -> MediaResult<ExecutionOutcome> {
        let args = shell_words::split(command)
            .map_err(|e| MediaError::Probe(format!("Invalid command string: {}", e)))?;

        debug!(binary = %self.binary, ?args, "Running ffprobe query");
        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| MediaError::Probe(format!("Failed to start {}: {}", self.binary, e)))?;

        self.store_output(String::from_utf8_lossy(&output.stdout).into_owned())?;
        Ok(ExecutionOutcome::new(output.status.code().unwrap_or(-1)))
    }

    async fn last_output(&self) -> MediaResult<String> {
        self.last_output
            .lock()
            .map(|last| last.clone())
            .map_err(|_| MediaError::Probe("last output lock poisoned".to_string()))
    }

    async fn full_info(&self, path: &str) -> MediaResult<serde_json::Value> {
        let output = Command::new(&self.binary)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(|e| MediaError::Probe(format!("Failed to start {}: {}", self.binary, e)))?;

        if !output.status.success() {
            return Err(MediaError::Probe(format!(
                "ffprobe could not read {} (return code {})",
                path,
                output.status.code().unwrap_or(-1)
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| MediaError::Probe(format!("Invalid ffprobe output: {}", e)))
    }
}
