// TOML config adapter - Configuration management using TOML files

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::logging::{LogFormat, LogLevel};

/// Table holding our keys inside the TOML file
const CONFIG_SECTION: &str = "mediaops";

/// Keys whose values must parse as booleans
const BOOLEAN_KEYS: &[&str] = &["allow_cache_allocation"];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: RwLock<HashMap<String, String>>,
    config_file_path: RwLock<Option<PathBuf>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the default values
    pub fn new() -> Self {
        Self {
            config: RwLock::new(Self::default_values()),
            config_file_path: RwLock::new(None),
        }
    }

    fn default_values() -> HashMap<String, String> {
        let cache_dir = std::env::temp_dir().join("mediaops");
        [
            ("ffmpeg_binary", "ffmpeg".to_string()),
            ("ffprobe_binary", "ffprobe".to_string()),
            ("cache_dir", cache_dir.to_string_lossy().into_owned()),
            ("allow_cache_allocation", "true".to_string()),
            ("log_level", "info".to_string()),
            ("log_format", "pretty".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Get default config file path
    pub fn default_config_path() -> PathBuf {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            PathBuf::from(appdata).join("MediaOps").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config").join("mediaops").join("config.toml")
        } else {
            PathBuf::from("mediaops.toml")
        }
    }

    /// Path of the last loaded file, if any
    pub fn loaded_file(&self) -> Option<PathBuf> {
        self.config_file_path.read().ok().and_then(|p| p.clone())
    }

    fn read(&self) -> MediaResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.config
            .read()
            .map_err(|_| MediaError::Config("configuration lock poisoned".to_string()))
    }

    fn write(&self) -> MediaResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.config
            .write()
            .map_err(|_| MediaError::Config("configuration lock poisoned".to_string()))
    }

    /// Merge the `[mediaops]` table of a TOML document into the config
    pub fn merge_toml(&self, toml_content: &str) -> MediaResult<()> {
        let parsed: toml::Table = toml::from_str(toml_content)
            .map_err(|e| MediaError::Config(format!("Failed to parse TOML config: {}", e)))?;

        let section = match parsed.get(CONFIG_SECTION) {
            Some(toml::Value::Table(table)) => table,
            Some(_) => {
                return Err(MediaError::Config(format!(
                    "[{}] must be a table",
                    CONFIG_SECTION
                )))
            }
            None => return Ok(()),
        };

        let mut config = self.write()?;
        for (key, value) in section {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => {
                    return Err(MediaError::Config(format!(
                        "Unsupported value for {}: {}",
                        key, other
                    )))
                }
            };
            config.insert(key.clone(), value);
        }

        Ok(())
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> MediaResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> MediaResult<String> {
        Ok(self
            .read()?
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set_config(&self, key: &str, value: &str) -> MediaResult<()> {
        self.write()?.insert(key.to_string(), value.to_string());
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &str) -> MediaResult<()> {
        let path = PathBuf::from(file_path);

        if !path.exists() {
            return Err(MediaError::Config(format!(
                "Config file does not exist: {}",
                file_path
            )));
        }

        let content = std::fs::read_to_string(&path)?;
        self.merge_toml(&content)?;

        if let Ok(mut config_path) = self.config_file_path.write() {
            *config_path = Some(path);
        }

        Ok(())
    }

    async fn validate_config(&self) -> MediaResult<()> {
        let config = self.read()?;

        if let Some(log_level) = config.get("log_level") {
            log_level.parse::<LogLevel>()?;
        }

        if let Some(log_format) = config.get("log_format") {
            log_format.parse::<LogFormat>()?;
        }

        for key in BOOLEAN_KEYS {
            if let Some(value) = config.get(*key) {
                value.parse::<bool>().map_err(|e| {
                    MediaError::Config(format!("Invalid boolean value for {}: {}", key, e))
                })?;
            }
        }

        for key in ["ffmpeg_binary", "ffprobe_binary", "cache_dir"] {
            if config.get(key).map_or(true, |v| v.trim().is_empty()) {
                return Err(MediaError::Config(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }

    async fn get_all_config_keys(&self) -> MediaResult<Vec<String>> {
        let mut keys: Vec<String> = self.read()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
