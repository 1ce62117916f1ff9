//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::{debug, info};

use crate::adapters::TomlConfigAdapter;
use crate::domain::errors::*;
use crate::ports::ConfigPort;
use crate::utils::logging::{LogFormat, LogLevel};

pub const FFMPEG_BINARY: &str = "ffmpeg_binary";
pub const FFPROBE_BINARY: &str = "ffprobe_binary";
pub const CACHE_DIR: &str = "cache_dir";
pub const ALLOW_CACHE_ALLOCATION: &str = "allow_cache_allocation";
pub const LOG_LEVEL: &str = "log_level";
pub const LOG_FORMAT: &str = "log_format";

/// Environment variables and the keys they override
const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("MEDIAOPS_FFMPEG_BINARY", FFMPEG_BINARY),
    ("MEDIAOPS_FFPROBE_BINARY", FFPROBE_BINARY),
    ("MEDIAOPS_CACHE_DIR", CACHE_DIR),
    ("MEDIAOPS_ALLOW_CACHE_ALLOCATION", ALLOW_CACHE_ALLOCATION),
    ("MEDIAOPS_LOG_LEVEL", LOG_LEVEL),
    ("MEDIAOPS_LOG_FORMAT", LOG_FORMAT),
];

/// Values given on the command line; `None` leaves the lower layers alone
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

/// Typed view of the configuration the engine is built from
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub ffmpeg_binary: String,
    pub ffprobe_binary: String,
    pub cache_dir: PathBuf,
    pub allow_cache_allocation: bool,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl EngineSettings {
    /// Read and type every key from the config port
    pub async fn from_config(config: &dyn ConfigPort) -> MediaResult<Self> {
        config.validate_config().await?;

        let allow_cache_allocation = config
            .get_config_or_default(ALLOW_CACHE_ALLOCATION, "true")
            .await?
            .parse::<bool>()
            .map_err(|e| MediaError::Config(format!("{}: {}", ALLOW_CACHE_ALLOCATION, e)))?;

        let default_cache_dir = std::env::temp_dir().join("mediaops");

        Ok(Self {
            ffmpeg_binary: config.get_config_or_default(FFMPEG_BINARY, "ffmpeg").await?,
            ffprobe_binary: config.get_config_or_default(FFPROBE_BINARY, "ffprobe").await?,
            cache_dir: PathBuf::from(
                config
                    .get_config_or_default(CACHE_DIR, &default_cache_dir.to_string_lossy())
                    .await?,
            ),
            allow_cache_allocation,
            log_level: config.get_config_or_default(LOG_LEVEL, "info").await?.parse()?,
            log_format: config.get_config_or_default(LOG_FORMAT, "pretty").await?.parse()?,
        })
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config: &TomlConfigAdapter,
    overrides: &ConfigOverrides,
) -> MediaResult<EngineSettings> {
    // Defaults are already present in TomlConfigAdapter::new()
    load_config_file(config, overrides.config_file.as_ref()).await?;
    load_environment_variables(config, |name| std::env::var(name).ok()).await?;
    apply_cli_overrides(config, overrides).await?;

    let settings = EngineSettings::from_config(config).await?;
    debug!(?settings, "Configuration hierarchy initialized");
    Ok(settings)
}

/// Load an explicit file, or the default one when it exists
async fn load_config_file(
    config: &TomlConfigAdapter,
    explicit: Option<&PathBuf>,
) -> MediaResult<()> {
    match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config.load_config(&path.to_string_lossy()).await
        }
        None => {
            let path = TomlConfigAdapter::default_config_path();
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                config.load_config(&path.to_string_lossy()).await
            } else {
                debug!("No config file at {}", path.display());
                Ok(())
            }
        }
    }
}

/// Apply `MEDIAOPS_*` variables found through `lookup`
pub async fn load_environment_variables<F>(config: &dyn ConfigPort, lookup: F) -> MediaResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;
    for (env_var, key) in ENV_MAPPINGS {
        if let Some(value) = lookup(env_var) {
            debug!("Found environment override: {} = {}", env_var, value);
            config.set_config(key, &value).await?;
            env_overrides += 1;
        }
    }

    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    Ok(env_overrides)
}

async fn apply_cli_overrides(
    config: &dyn ConfigPort,
    overrides: &ConfigOverrides,
) -> MediaResult<()> {
    if let Some(level) = &overrides.log_level {
        config.set_config(LOG_LEVEL, level).await?;
    }
    if let Some(format) = &overrides.log_format {
        config.set_config(LOG_FORMAT, format).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_settings() {
        let config = TomlConfigAdapter::new();
        let settings = EngineSettings::from_config(&config).await.unwrap();
        assert_eq!(settings.ffmpeg_binary, "ffmpeg");
        assert_eq!(settings.ffprobe_binary, "ffprobe");
        assert!(settings.allow_cache_allocation);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.log_format, LogFormat::Pretty);
    }

    #[tokio::test]
    async fn test_precedence_cli_over_env_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mediaops.toml");
        std::fs::write(
            &path,
            "[mediaops]\nlog_level = \"warn\"\n\
             ffmpeg_binary = \"/file/ffmpeg\"\ncache_dir = \"/file/cache\"\n",
        )
        .unwrap();

        let config = TomlConfigAdapter::new();
        load_config_file(&config, Some(&path)).await.unwrap();

        let env: HashMap<&str, &str> = [
            ("MEDIAOPS_FFMPEG_BINARY", "/env/ffmpeg"),
            ("MEDIAOPS_LOG_LEVEL", "error"),
        ]
        .into_iter()
        .collect();
        let applied =
            load_environment_variables(&config, |name| env.get(name).map(|v| v.to_string()))
                .await
                .unwrap();
        assert_eq!(applied, 2);

        let overrides = ConfigOverrides {
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        apply_cli_overrides(&config, &overrides).await.unwrap();

        let settings = EngineSettings::from_config(&config).await.unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.ffmpeg_binary, "/env/ffmpeg");
        assert_eq!(settings.cache_dir, PathBuf::from("/file/cache"));
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_error() {
        let config = TomlConfigAdapter::new();
        let overrides = ConfigOverrides {
            config_file: Some(PathBuf::from("/nonexistent/mediaops.toml")),
            ..Default::default()
        };
        let err = initialize_configuration_hierarchy(&config, &overrides)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn test_invalid_boolean_rejected() {
        let config = TomlConfigAdapter::new();
        config.set_config(ALLOW_CACHE_ALLOCATION, "sometimes").await.unwrap();
        assert!(EngineSettings::from_config(&config).await.is_err());
    }
}
