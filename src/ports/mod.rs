// Ports - Interface definitions (contracts) for external collaborators

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for running media-processing commands
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run an opaque command string and report its return code
    async fn run(&self, command: &str) -> MediaResult<ExecutionOutcome>;

    /// Cancel whichever command is currently running.
    ///
    /// Best effort and synchronous: the pending `run` reports its own outcome.
    fn cancel(&self);
}

/// Port for media metadata queries
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Run a probe command; its output becomes available via `last_output`
    async fn run_query(&self, command: &str) -> MediaResult<ExecutionOutcome>;

    /// Output of the last `run_query` call (JSON encoded)
    async fn last_output(&self) -> MediaResult<String>;

    /// Full media information for a file, as ffprobe JSON
    async fn full_info(&self, path: &str) -> MediaResult<serde_json::Value>;
}

/// Port for allocating temporary output files
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Allocate a fresh output path for `extension`, `None` when unavailable
    async fn new_path(&self, extension: &str) -> MediaResult<Option<String>>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Get configuration value
    async fn get_config(&self, key: &str) -> MediaResult<Option<String>>;

    /// Get configuration value with default
    async fn get_config_or_default(&self, key: &str, default: &str) -> MediaResult<String>;

    /// Set configuration value
    async fn set_config(&self, key: &str, value: &str) -> MediaResult<()>;

    /// Load configuration from file
    async fn load_config(&self, file_path: &str) -> MediaResult<()>;

    /// Validate configuration
    async fn validate_config(&self) -> MediaResult<()>;

    /// Get all configuration keys
    async fn get_all_config_keys(&self) -> MediaResult<Vec<String>>;
}
