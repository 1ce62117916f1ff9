//! In-memory adapters that record their calls
//!
//! Used by tests and by the CLI `--dry-run` mode.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::json;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Executor that records commands and answers with a fixed outcome
pub struct MockExecuteAdapter {
    return_code: i32,
    failure: Option<String>,
    commands: Mutex<Vec<String>>,
    cancels: AtomicUsize,
}

impl MockExecuteAdapter {
    pub fn new() -> Self {
        Self::with_return_code(0)
    }

    pub fn with_return_code(return_code: i32) -> Self {
        Self {
            return_code,
            failure: None,
            commands: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
        }
    }

    /// Executor whose `run` itself errors
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::with_return_code(-1)
        }
    }

    pub fn commands(&self) -> Vec<String> {
        lock(&self.commands).clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl Default for MockExecuteAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutePort for MockExecuteAdapter {
    async fn run(&self, command: &str) -> MediaResult<ExecutionOutcome> {
        lock(&self.commands).push(command.to_string());
        match &self.failure {
            Some(message) => Err(MediaError::execution(self.return_code, message.clone())),
            None => Ok(ExecutionOutcome::new(self.return_code)),
        }
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

struct ProbeAnswers {
    query_return_code: i32,
    size_output: String,
    full_info: serde_json::Value,
}

/// Prober answering with canned ffprobe JSON
pub struct MockProbeAdapter {
    answers: Mutex<ProbeAnswers>,
    queries: Mutex<Vec<String>>,
    full_info_calls: AtomicUsize,
}

impl MockProbeAdapter {
    /// Prober describing a video file
    pub fn video(duration_ms: u64, size_bytes: u64, width: u32, height: u32) -> Self {
        Self::from_answers(
            json!({
                "programs": [],
                "streams": [{ "width": width, "height": height }],
                "format": { "size": size_bytes.to_string() }
            })
            .to_string(),
            Self::full_info_json(duration_ms, size_bytes),
        )
    }

    /// Prober describing an audio file
    pub fn audio(duration_ms: u64, size_bytes: u64) -> Self {
        Self::from_answers(
            json!({
                "programs": [],
                "streams": [],
                "format": { "size": size_bytes.to_string() }
            })
            .to_string(),
            Self::full_info_json(duration_ms, size_bytes),
        )
    }

    fn from_answers(size_output: String, full_info: serde_json::Value) -> Self {
        Self {
            answers: Mutex::new(ProbeAnswers {
                query_return_code: 0,
                size_output,
                full_info,
            }),
            queries: Mutex::new(Vec::new()),
            full_info_calls: AtomicUsize::new(0),
        }
    }

    fn full_info_json(duration_ms: u64, size_bytes: u64) -> serde_json::Value {
        json!({
            "format": {
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                "duration": format!("{:.6}", duration_ms as f64 / 1000.0),
                "size": size_bytes.to_string(),
                "bit_rate": "1200000"
            },
            "streams": []
        })
    }

    /// Make the size query report `return_code`
    pub fn with_query_return_code(self, return_code: i32) -> Self {
        lock(&self.answers).query_return_code = return_code;
        self
    }

    /// Replace the size query output
    pub fn with_size_output(self, output: &str) -> Self {
        lock(&self.answers).size_output = output.to_string();
        self
    }

    /// Change the duration reported from now on
    pub fn set_duration_ms(&self, duration_ms: u64) {
        let mut answers = lock(&self.answers);
        answers.full_info["format"]["duration"] =
            json!(format!("{:.6}", duration_ms as f64 / 1000.0));
    }

    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }

    pub fn query_count(&self) -> usize {
        lock(&self.queries).len()
    }

    pub fn full_info_count(&self) -> usize {
        self.full_info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbePort for MockProbeAdapter {
    async fn run_query(&self, command: &str) -> MediaResult<ExecutionOutcome> {
        lock(&self.queries).push(command.to_string());
        Ok(ExecutionOutcome::new(lock(&self.answers).query_return_code))
    }

    async fn last_output(&self) -> MediaResult<String> {
        Ok(lock(&self.answers).size_output.clone())
    }

    async fn full_info(&self, _path: &str) -> MediaResult<serde_json::Value> {
        self.full_info_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.answers).full_info.clone())
    }
}

enum CacheAnswer {
    Path(String),
    Nothing,
    Failure(String),
}

/// Cache allocator with a canned answer
pub struct MockCacheAdapter {
    answer: CacheAnswer,
    requested: Mutex<Vec<String>>,
}

impl MockCacheAdapter {
    pub fn with_path(path: &str) -> Self {
        Self::from_answer(CacheAnswer::Path(path.to_string()))
    }

    /// Allocator that answers `None`
    pub fn empty() -> Self {
        Self::from_answer(CacheAnswer::Nothing)
    }

    pub fn failing(message: &str) -> Self {
        Self::from_answer(CacheAnswer::Failure(message.to_string()))
    }

    fn from_answer(answer: CacheAnswer) -> Self {
        Self {
            answer,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_extensions(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

#[async_trait]
impl CachePort for MockCacheAdapter {
    async fn new_path(&self, extension: &str) -> MediaResult<Option<String>> {
        lock(&self.requested).push(extension.to_string());
        match &self.answer {
            CacheAnswer::Path(path) => Ok(Some(path.clone())),
            CacheAnswer::Nothing => Ok(None),
            CacheAnswer::Failure(message) => Err(MediaError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message.clone(),
            ))),
        }
    }
}

/// Write an executable shell script standing in for ffmpeg or ffprobe
#[cfg(all(test, unix))]
pub(crate) fn script_binary(dir: &std::path::Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}
