//! FFmpeg execution adapter
//!
//! Runs command strings through the `ffmpeg` binary as a child process.

use std::collections::VecDeque;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Lines of ffmpeg stderr kept for error reports
const STDERR_TAIL_LINES: usize = 20;

/// FFmpeg-based execution adapter
pub struct FfmpegExecAdapter {
    binary: String,
    cancel_tx: broadcast::Sender<()>,
}

impl FfmpegExecAdapter {
    /// Create new FFmpeg adapter running `binary`
    pub fn new(binary: impl Into<String>) -> Self {
        let (cancel_tx, _) = broadcast::channel(4);
        Self {
            binary: binary.into(),
            cancel_tx,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

#[async_trait]
impl ExecutePort for FfmpegExecAdapter {
    async fn run(&self, command: &str) -> MediaResult<ExecutionOutcome> {
        let args = shell_words::split(command)
            .map_err(|e| MediaError::execution(-1, format!("Invalid command string: {}", e)))?;

        let mut cancel_rx = self.cancel_tx.subscribe();
        let mut child = Command::new(&self.binary)
            .args(["-hide_banner", "-nostdin"])
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                MediaError::execution(-1, format!("Failed to start {}: {}", self.binary, e))
            })?;

        debug!(binary = %self.binary, ?args, "Spawned ffmpeg");

        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
                tail
            })
        });

        let status = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancel_rx.recv() => None,
        };

        let status = match status {
            Some(status) => status?,
            None => {
                info!("Cancel received, killing ffmpeg");
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill ffmpeg");
                }
                return Ok(ExecutionOutcome::new(ExecutionOutcome::CANCELLED));
            }
        };

        let return_code = status.code().unwrap_or(ExecutionOutcome::CANCELLED);
        if return_code != 0 {
            let tail = match stderr_task {
                Some(task) => task.await.unwrap_or_default(),
                None => VecDeque::new(),
            };
            let stderr = Vec::from(tail).join("\n");
            warn!(return_code, stderr = %stderr, "ffmpeg exited with failure");
        }

        Ok(ExecutionOutcome::new(return_code))
    }

    fn cancel(&self) {
        // No receiver means nothing is running
        let _ = self.cancel_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_command_string() {
        let adapter = FfmpegExecAdapter::new("ffmpeg");
        let err = adapter.run("-i \"unterminated").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let adapter = FfmpegExecAdapter::new("/nonexistent/bin/ffmpeg-missing");
        let err = adapter.run("-i \"in.mp4\" \"out.mp3\"").await.unwrap_err();
        assert!(matches!(err, MediaError::Execution { return_code: -1, .. }));
    }

    #[test]
    fn test_cancel_without_running_command_is_noop() {
        let adapter = FfmpegExecAdapter::new("ffmpeg");
        adapter.cancel();
        assert_eq!(adapter.binary(), "ffmpeg");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_kills_running_command() {
        use crate::adapters::mock::script_binary;
        use std::sync::Arc;
        use std::time::Duration;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let binary = script_binary(temp_dir.path(), "ffmpeg", "exec sleep 30");
        let adapter = Arc::new(FfmpegExecAdapter::new(binary));

        let running = tokio::spawn({
            let adapter = Arc::clone(&adapter);
            async move { adapter.run("-i \"in.mp4\" \"out.mp4\"").await }
        });
        tokio::time::sleep(Duration::from_millis(300)).await;
        adapter.cancel();

        let outcome = tokio::time::timeout(Duration::from_secs(5), running)
            .await
            .expect("cancelled command did not stop")
            .unwrap()
            .unwrap();
        assert_eq!(outcome.return_code, ExecutionOutcome::CANCELLED);
        assert!(!outcome.is_success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_is_reported() {
        use crate::adapters::mock::script_binary;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let binary = script_binary(temp_dir.path(), "ffmpeg", "echo broken >&2\nexit 3");
        let adapter = FfmpegExecAdapter::new(binary);

        let outcome = adapter.run("-i \"in.mp4\" \"out.mp3\"").await.unwrap();
        assert_eq!(outcome.return_code, 3);
    }
}
