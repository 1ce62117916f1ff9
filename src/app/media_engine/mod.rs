// Media engine - Orchestrates probe, trim and convert operations

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::app::details_cache::DetailsCache;
use crate::app::path_resolver::{AllocationPolicy, PathResolver};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;
use crate::utils::{PathUtils, TimeCodec};

/// Runs media operations against injected executor, prober and allocator.
///
/// The engine keeps no state between calls: cached details live on the
/// [`MediaHandle`], and the executor is shared by every call.
pub struct MediaEngine {
    execute_port: Arc<dyn ExecutePort>,
    details_cache: DetailsCache,
    path_resolver: PathResolver,
}

impl MediaEngine {
    /// Create new media engine with injected ports
    pub fn new(
        execute_port: Arc<dyn ExecutePort>,
        probe_port: Arc<dyn ProbePort>,
        cache_port: Arc<dyn CachePort>,
        policy: AllocationPolicy,
    ) -> Self {
        Self {
            execute_port,
            details_cache: DetailsCache::new(probe_port),
            path_resolver: PathResolver::new(cache_port, policy),
        }
    }

    /// Probe the handle's file, using cached details unless `force` is set
    pub async fn probe(&self, handle: &mut MediaHandle, force: bool) -> MediaResult<MediaDetails> {
        handle.check_input().into_result()?;
        self.details_cache.get_details(handle, force).await
    }

    /// Probe with an untyped `force` flag, rejecting non-boolean values
    pub async fn probe_checked(
        &self,
        handle: &mut MediaHandle,
        force: &OptionValue,
    ) -> MediaResult<MediaDetails> {
        handle.check_input().into_result()?;
        self.details_cache.get_details_checked(handle, force).await
    }

    /// Cut `[from, to]` out of the handle's file without re-encoding.
    ///
    /// Bounds are checked against the probed duration before an output path
    /// is resolved, so an out-of-range request never allocates or executes.
    pub async fn trim(
        &self,
        handle: &mut MediaHandle,
        options: &OperationOptions,
    ) -> MediaResult<OperationOutput> {
        info!(path = %handle.full_path(), "Starting trim operation");

        handle.check_input().into_result()?;
        OptionValidator::validate(options, Operation::Cut, handle.kind()).into_result()?;

        let details = self.details_cache.get_details(handle, false).await?;
        let from_ms = Self::option_ms(options, "from")?;
        let to_ms = Self::option_ms(options, "to")?;
        let duration_ms = details.duration_ms();

        if to_ms > duration_ms {
            return Err(MediaError::DurationBounds {
                bound: TrimBound::To,
                requested_ms: to_ms,
                duration_ms,
            });
        }
        if from_ms > duration_ms {
            return Err(MediaError::DurationBounds {
                bound: TrimBound::From,
                requested_ms: from_ms,
                duration_ms,
            });
        }
        if to_ms < from_ms {
            return Err(MediaError::options(
                "to",
                "The option \"to\" can not be lower than the option \"from\"",
            ));
        }

        let extension = handle.extension().ok_or(MediaError::InputPath)?.to_string();
        let output = self
            .resolve_output(handle, options.get_text("outputFilePath"), &extension)
            .await?;

        // ffmpeg takes a length for the second boundary, not an end time
        let length = TimeCodec::to_time_string(to_ms - from_ms);
        let command = Self::build_trim_command(
            handle.full_path(),
            &TimeCodec::to_time_string(from_ms),
            &length,
            &output,
        );

        self.dispatch(&command, output).await
    }

    /// Re-encode the handle's file into another format.
    ///
    /// Without options, or without an `extension` option, the kind's default
    /// target format is used.
    pub async fn convert(
        &self,
        handle: &mut MediaHandle,
        options: Option<&OperationOptions>,
    ) -> MediaResult<OperationOutput> {
        info!(path = %handle.full_path(), "Starting convert operation");

        let mut options = options
            .cloned()
            .unwrap_or_else(|| default_convert_options(handle.kind()));
        if options.get("extension").is_none() {
            if let Some(default) = default_convert_options(handle.kind()).get("extension") {
                options.insert("extension", default.clone());
            }
        }

        handle.check_input().into_result()?;
        OptionValidator::validate(&options, Operation::ConvertTo, handle.kind()).into_result()?;

        let extension = options
            .get_text("extension")
            .map(str::to_lowercase)
            .ok_or_else(|| {
                MediaError::options("extension", "The option \"extension\" is required")
            })?;
        let output = self
            .resolve_output(handle, options.get_text("outputFilePath"), &extension)
            .await?;

        let command = Self::build_convert_command(handle.full_path(), &output);
        self.dispatch(&command, output).await
    }

    /// Forward a cancel request to the executor.
    ///
    /// Affects whichever command is running; the pending operation reports
    /// the executor's outcome on its own.
    pub fn cancel(&self) {
        info!("Cancelling current media command");
        self.execute_port.cancel();
    }

    pub fn allocation_policy(&self) -> AllocationPolicy {
        self.path_resolver.policy()
    }

    /// Stream-copy command: seek to `from`, keep `length`
    pub fn build_trim_command(input: &str, from: &str, length: &str, output: &str) -> String {
        format!(
            "-ss {} -i {} -t {} -c copy {}",
            from,
            PathUtils::quote(input),
            length,
            PathUtils::quote(output)
        )
    }

    /// Re-encode command from input to output, codecs picked by the output format
    pub fn build_convert_command(input: &str, output: &str) -> String {
        format!("-i {} {}", PathUtils::quote(input), PathUtils::quote(output))
    }

    async fn resolve_output(
        &self,
        handle: &MediaHandle,
        requested: Option<&str>,
        extension: &str,
    ) -> MediaResult<String> {
        let output = self
            .path_resolver
            .resolve(requested, extension)
            .await
            .into_result()?
            .ok_or(MediaError::OutputAllocation)?;

        // ffmpeg cannot write over the file it is reading
        if output == handle.full_path() {
            return Err(MediaError::OutputPath);
        }

        Ok(output)
    }

    fn option_ms(options: &OperationOptions, key: &str) -> MediaResult<u64> {
        let text = options.get_text(key).ok_or_else(|| {
            MediaError::options(key, format!("The option \"{}\" is required", key))
        })?;
        TimeCodec::to_milliseconds(text)
            .map_err(|e| MediaError::options(key, format!("The option \"{}\": {}", key, e)))
    }

    async fn dispatch(
        &self,
        command: &str,
        output_file_path: String,
    ) -> MediaResult<OperationOutput> {
        debug!(command, "Dispatching media command");

        let outcome = self.execute_port.run(command).await.map_err(|e| {
            error!(error = %e, "Media command could not run");
            match e {
                MediaError::Execution { .. } => e,
                other => MediaError::execution(-1, other.to_string()),
            }
        })?;

        if !outcome.is_success() {
            error!(return_code = outcome.return_code, "Media command failed");
            return Err(MediaError::execution(
                outcome.return_code,
                format!("command \"{}\" returned a non-zero code", command),
            ));
        }

        info!(output = %output_file_path, "Media command completed");
        Ok(OperationOutput {
            output_file_path,
            return_code: outcome.return_code,
        })
    }
}
