//! Configuration loading for lyrebird
//!
//! TOML configuration resolved in priority order:
//! 1. Explicit path argument (highest priority)
//! 2. `LYREBIRD_CONFIG` environment variable
//! 3. `~/.config/lyrebird/config.toml` (platform config dir)
//! 4. Compiled defaults (fallback)
//!
//! A missing file at a default location falls back to defaults; a missing
//! file at an explicitly given path is a configuration error, as is any
//! file that fails to parse.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an alternate config file location
pub const CONFIG_ENV_VAR: &str = "LYREBIRD_CONFIG";

/// Match validation policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Base similarity threshold before adaptive shortening
    #[serde(default = "default_base_threshold")]
    pub base_threshold: f64,

    /// Minimum pairwise artist similarity accepted by the
    /// extension-collab rule (empirically chosen, tunable)
    #[serde(default = "default_extension_collab_floor")]
    pub extension_collab_floor: f64,
}

fn default_base_threshold() -> f64 {
    0.75
}

fn default_extension_collab_floor() -> f64 {
    0.20
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            base_threshold: default_base_threshold(),
            extension_collab_floor: default_extension_collab_floor(),
        }
    }
}

/// Fetch scheduling knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-task timeout for a single provider fetch, in seconds.
    /// Fixed and not renewable; a timed-out provider is never retried
    /// within the same request.
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,
}

fn default_task_timeout_secs() -> u64 {
    12
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            task_timeout_secs: default_task_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Root TOML configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Load configuration following the documented priority order.
pub fn load_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return read_toml_config(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(env_path);
        if !path.exists() {
            return Err(Error::Config(format!(
                "{} points to missing file: {}",
                CONFIG_ENV_VAR,
                path.display()
            )));
        }
        return read_toml_config(&path);
    }

    if let Some(path) = default_config_path() {
        if path.exists() {
            return read_toml_config(&path);
        }
    }

    Ok(TomlConfig::default())
}

/// Default per-user config file location, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyrebird").join("config.toml"))
}

/// Read and parse a TOML config file.
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Write a TOML config file, creating parent directories as needed.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
