// Details cache - Memoizes probed metadata on the media handle

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::ProbePort;
use crate::utils::PathUtils;

/// Fetches media details, reusing the handle's cached snapshot when allowed
pub struct DetailsCache {
    probe_port: Arc<dyn ProbePort>,
}

impl DetailsCache {
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Like [`get_details`](Self::get_details) for callers holding an untyped
    /// `force` flag. Anything but a boolean is a precondition failure and no
    /// probing happens.
    pub async fn get_details_checked(
        &self,
        handle: &mut MediaHandle,
        force: &OptionValue,
    ) -> MediaResult<MediaDetails> {
        let force = force.as_bool().ok_or_else(|| {
            MediaError::Precondition(format!(
                "Parameter force should be boolean. {} given",
                force.type_name()
            ))
        })?;
        self.get_details(handle, force).await
    }

    /// Return the details of the handle's current file.
    ///
    /// Without `force` a cached snapshot is returned as is. Otherwise two
    /// probe calls are made, size/dimensions first, then the full
    /// information; the combined snapshot replaces the cache. A failed probe
    /// leaves the cache untouched.
    pub async fn get_details(
        &self,
        handle: &mut MediaHandle,
        force: bool,
    ) -> MediaResult<MediaDetails> {
        if !force {
            if let Some(details) = handle.cached_details() {
                debug!(path = %handle.full_path(), "Using cached media details");
                return Ok(details.clone());
            }
        }

        let path = handle.full_path().to_string();
        info!(path = %path, force, "Probing media details");

        // The full query below runs error-suppressed and omits size and
        // dimensions, so this query has to come first.
        let outcome = self
            .probe_port
            .run_query(&Self::size_query_command(&path))
            .await
            .map_err(into_probe_error)?;
        if !outcome.is_success() {
            warn!(path = %path, return_code = outcome.return_code, "Size query failed");
            return Err(MediaError::Probe(format!(
                "Failed to execute command (return code {})",
                outcome.return_code
            )));
        }

        let raw = self.probe_port.last_output().await.map_err(into_probe_error)?;
        let size_info: Value = serde_json::from_str(&raw)
            .map_err(|e| MediaError::Probe(format!("Invalid size query output: {}", e)))?;

        let full_info = self
            .probe_port
            .full_info(&path)
            .await
            .map_err(into_probe_error)?;

        let details = Self::combine(handle.kind(), &path, &size_info, &full_info)?;
        handle.store_details(details.clone());
        debug!(path = %path, duration_ms = details.duration_ms(), "Media details cached");

        Ok(details)
    }

    /// Size and dimension query run before the full probe
    pub fn size_query_command(path: &str) -> String {
        format!(
            "-i {} -v error -select_streams v:0 -show_entries format=size \
             -show_entries stream=size,width,height -of json",
            PathUtils::quote(path)
        )
    }

    fn combine(
        kind: MediaKind,
        path: &str,
        size_info: &Value,
        full_info: &Value,
    ) -> MediaResult<MediaDetails> {
        let format = &full_info["format"];

        let duration_secs = number_field(&format["duration"])
            .ok_or_else(|| MediaError::Probe("Media duration is missing".to_string()))?;
        let duration_ms = (duration_secs * 1000.0).round() as u64;

        let size_bytes = number_field(&size_info["format"]["size"])
            .or_else(|| number_field(&format["size"]))
            .ok_or_else(|| MediaError::Probe("Media size is missing".to_string()))?
            as u64;

        let extension = PathUtils::get_extension(path).unwrap_or_default();
        let format_name = format["format_name"].as_str().map(str::to_string);
        let bit_rate = number_field(&format["bit_rate"]).map(|b| b as u64);

        match kind {
            MediaKind::Audio => Ok(MediaDetails::Audio(AudioDetails {
                duration_ms,
                size_bytes,
                extension,
                format_name,
                bit_rate,
            })),
            MediaKind::Video => {
                let stream = &size_info["streams"][0];
                let width = number_field(&stream["width"]).ok_or_else(|| {
                    MediaError::Probe("Video stream width is missing".to_string())
                })?;
                let height = number_field(&stream["height"]).ok_or_else(|| {
                    MediaError::Probe("Video stream height is missing".to_string())
                })?;

                Ok(MediaDetails::Video(VideoDetails {
                    duration_ms,
                    size_bytes,
                    extension,
                    format_name,
                    bit_rate,
                    width: width as u32,
                    height: height as u32,
                }))
            }
        }
    }
}

/// ffprobe prints most numbers as strings
fn number_field(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite() && *n >= 0.0)
}

fn into_probe_error(error: MediaError) -> MediaError {
    match error {
        MediaError::Probe(_) => error,
        other => MediaError::Probe(other.to_string()),
    }
}
