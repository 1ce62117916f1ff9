// Path resolver - Picks the output path for an operation

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::CachePort;

/// Whether output paths may be allocated from the cache when none is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationPolicy {
    Enabled,
    Disabled,
}

impl AllocationPolicy {
    pub fn from_flag(allowed: bool) -> Self {
        if allowed {
            AllocationPolicy::Enabled
        } else {
            AllocationPolicy::Disabled
        }
    }
}

/// Resolves explicit or cache-allocated output paths
pub struct PathResolver {
    cache_port: Arc<dyn CachePort>,
    policy: AllocationPolicy,
}

impl PathResolver {
    pub fn new(cache_port: Arc<dyn CachePort>, policy: AllocationPolicy) -> Self {
        Self { cache_port, policy }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// Resolve the output path.
    ///
    /// A non-empty `requested` path is returned verbatim without touching the
    /// filesystem. Otherwise a fresh path for `extension` is allocated; any
    /// allocator failure, empty answer or disabled policy maps to
    /// [`MediaError::OutputAllocation`].
    pub async fn resolve(&self, requested: Option<&str>, extension: &str) -> CheckResult {
        if let Some(path) = requested.filter(|p| !p.is_empty()) {
            debug!(output = %path, "Using explicit output path");
            return CheckResult::passed(Some(path.to_string()));
        }

        if self.policy == AllocationPolicy::Disabled {
            warn!("Cache allocation is disabled and no output path was given");
            return CheckResult::failed(MediaError::OutputAllocation);
        }

        match self.cache_port.new_path(extension).await {
            Ok(Some(path)) if !path.is_empty() => {
                debug!(output = %path, extension, "Allocated output path from cache");
                CheckResult::passed(Some(path))
            }
            Ok(_) => {
                warn!(extension, "Cache allocator returned no path");
                CheckResult::failed(MediaError::OutputAllocation)
            }
            Err(e) => {
                warn!(extension, error = %e, "Cache allocator failed");
                CheckResult::failed(MediaError::OutputAllocation)
            }
        }
    }
}
