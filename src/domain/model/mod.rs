// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::utils::PathUtils;

/// Kind of media a handle points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl FromStr for MediaKind {
    type Err = MediaError;

    fn from_str(kind_str: &str) -> MediaResult<Self> {
        match kind_str.to_lowercase().as_str() {
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            _ => Err(MediaError::Precondition(format!(
                "Invalid media kind: {}. Valid kinds: audio, video",
                kind_str
            ))),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Caller-held reference to one media file plus its cached metadata.
///
/// The extension is always derived from the current path, and the cached
/// details always describe the current path: changing the path drops them.
#[derive(Debug, Clone)]
pub struct MediaHandle {
    full_path: String,
    kind: MediaKind,
    extension: Option<String>,
    cached_details: Option<MediaDetails>,
}

impl MediaHandle {
    pub fn new(full_path: impl Into<String>, kind: MediaKind) -> Self {
        let full_path = full_path.into();
        let extension = PathUtils::get_extension(&full_path);
        Self {
            full_path,
            kind,
            extension,
            cached_details: None,
        }
    }

    /// Point the handle at another file, invalidating cached details
    pub fn set_full_path(&mut self, full_path: impl Into<String>) {
        self.cached_details = None;
        self.full_path = full_path.into();
        self.extension = PathUtils::get_extension(&self.full_path);
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Extension of the current path, `None` when the path is unusable
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn cached_details(&self) -> Option<&MediaDetails> {
        self.cached_details.as_ref()
    }

    /// Check the input path before any operation
    pub fn check_input(&self) -> CheckResult {
        match self.extension {
            Some(_) => CheckResult::passed(None),
            None => CheckResult::failed(MediaError::InputPath),
        }
    }

    pub(crate) fn store_details(&mut self, details: MediaDetails) {
        self.cached_details = Some(details);
    }
}

/// Details shared by audio and video snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDetails {
    pub duration_ms: u64,
    pub size_bytes: u64,
    pub extension: String,
    pub format_name: Option<String>,
    pub bit_rate: Option<u64>,
}

/// Video snapshot: audio fields plus frame dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub duration_ms: u64,
    pub size_bytes: u64,
    pub extension: String,
    pub format_name: Option<String>,
    pub bit_rate: Option<u64>,
    pub width: u32,
    pub height: u32,
}

/// Immutable metadata snapshot of a probed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaDetails {
    Audio(AudioDetails),
    Video(VideoDetails),
}

impl MediaDetails {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaDetails::Audio(_) => MediaKind::Audio,
            MediaDetails::Video(_) => MediaKind::Video,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            MediaDetails::Audio(d) => d.duration_ms,
            MediaDetails::Video(d) => d.duration_ms,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        match self {
            MediaDetails::Audio(d) => d.size_bytes,
            MediaDetails::Video(d) => d.size_bytes,
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            MediaDetails::Audio(d) => &d.extension,
            MediaDetails::Video(d) => &d.extension,
        }
    }

    /// Frame dimensions, video only
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            MediaDetails::Audio(_) => None,
            MediaDetails::Video(d) => Some((d.width, d.height)),
        }
    }
}

/// One caller-supplied option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    /// Primitive type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Boolean(_) => "boolean",
            OptionValue::Integer(_) | OptionValue::Float(_) => "number",
            OptionValue::Text(_) => "string",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

/// Operation-specific options, keyed by option name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationOptions(BTreeMap<String, OptionValue>);

impl OperationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Parse options from a JSON object
    pub fn from_json(json: &str) -> MediaResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MediaError::options("options", format!("Invalid options JSON: {}", e)))
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    /// Text value of `key`, if present and textual
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(OptionValue::as_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Operations that accept options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Cut,
    ConvertTo,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Cut => write!(f, "cut"),
            Operation::ConvertTo => write!(f, "convertTo"),
        }
    }
}

/// Outcome of one validation step.
///
/// An output path can only be present on a passed check.
#[derive(Debug)]
pub struct CheckResult {
    outcome: Result<Option<String>, MediaError>,
}

impl CheckResult {
    /// Passed check, optionally carrying the resolved output path
    pub fn passed(output_file_path: Option<String>) -> Self {
        Self {
            outcome: Ok(output_file_path),
        }
    }

    pub fn failed(error: MediaError) -> Self {
        Self { outcome: Err(error) }
    }

    pub fn is_correct(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Failure message, empty on success
    pub fn message(&self) -> String {
        match &self.outcome {
            Ok(_) => String::new(),
            Err(e) => e.to_string(),
        }
    }

    pub fn output_file_path(&self) -> Option<&str> {
        match &self.outcome {
            Ok(path) => path.as_deref(),
            Err(_) => None,
        }
    }

    pub fn error(&self) -> Option<&MediaError> {
        self.outcome.as_ref().err()
    }

    /// Convert into a `Result` for `?` propagation
    pub fn into_result(self) -> MediaResult<Option<String>> {
        self.outcome
    }
}

/// Return code reported by an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub return_code: i32,
}

impl ExecutionOutcome {
    /// Return code ffmpeg reports for a cancelled command
    pub const CANCELLED: i32 = 255;

    pub fn new(return_code: i32) -> Self {
        Self { return_code }
    }

    pub fn is_success(&self) -> bool {
        self.return_code == 0
    }
}

/// Result of a trim or convert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutput {
    pub output_file_path: String,
    pub return_code: i32,
}

#[cfg(test)]
mod tests;
