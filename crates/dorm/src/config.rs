//! Configuration loading
//!
//! # Hierarchy
//!
//! Later layers override earlier ones:
//! 1. Built-in defaults
//! 2. Global config: `<platform config dir>/dorm/config.toml`
//! 3. Project config: `.dorm/config.toml`
//! 4. Environment variables: `DORM_*`
//! 5. CLI flags
//!
//! # Example Config
//!
//! ```toml
//! snapshot_path = "data/snapshot.json"
//! outbox_path = "data/outbox.db"
//! log_level = "debug"
//! json_output = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Backend snapshot the commands operate on
    pub snapshot_path: String,
    /// SQLite file recording produced intents
    pub outbox_path: String,
    pub log_level: String,
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: ".dorm/snapshot.json".to_string(),
            outbox_path: ".dorm/outbox.db".to_string(),
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl Config {
    /// Take every value from `other` that differs from the default
    fn merge(&mut self, other: Self) {
        let defaults = Self::default();
        if other.snapshot_path != defaults.snapshot_path {
            self.snapshot_path = other.snapshot_path;
        }
        if other.outbox_path != defaults.outbox_path {
            self.outbox_path = other.outbox_path;
        }
        if other.log_level != defaults.log_level {
            self.log_level = other.log_level;
        }
        if other.json_output != defaults.json_output {
            self.json_output = other.json_output;
        }
    }

    /// Apply `DORM_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns error if `DORM_JSON` is not a boolean.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("DORM_SNAPSHOT") {
            self.snapshot_path = value;
        }

        if let Some(value) = lookup("DORM_OUTBOX") {
            self.outbox_path = value;
        }

        if let Some(value) = lookup("DORM_LOG_LEVEL") {
            self.log_level = value;
        }

        if let Some(value) = lookup("DORM_JSON") {
            self.json_output = value
                .parse()
                .map_err(|e| Error::InvalidConfig(format!("Invalid DORM_JSON value: {e}")))?;
        }

        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if a path is empty or the log level is unknown.
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_path.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "snapshot_path cannot be empty".to_string(),
            ));
        }
        if self.outbox_path.trim().is_empty() {
            return Err(Error::InvalidConfig("outbox_path cannot be empty".to_string()));
        }
        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Load configuration from every layer except CLI flags.
///
/// # Errors
///
/// Returns error if:
/// - A config file is malformed TOML
/// - An environment override is invalid
/// - The merged config fails validation
pub async fn load_config() -> Result<Config> {
    let global = global_config_path();
    let project = project_config_path()?;
    load_layers(global.as_deref(), Some(&project), |key| std::env::var(key).ok()).await
}

/// Load defaults, then the given files if they exist, then `lookup` overrides.
///
/// # Errors
///
/// See [`load_config`].
pub async fn load_layers(
    global: Option<&Path>,
    project: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config = Config::default();

    for path in [global, project].into_iter().flatten() {
        if path.exists() {
            let layer = load_toml_file(path).await?;
            config.merge(layer);
        }
    }

    config.apply_env(lookup)?;
    config.validate()?;
    Ok(config)
}

fn project_config_path() -> Result<PathBuf> {
    std::env::current_dir()
        .map(|dir| dir.join(".dorm/config.toml"))
        .map_err(|e| Error::io(Path::new("."), e))
}

fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "dorm")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

async fn load_toml_file(path: &Path) -> Result<Config> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| Error::Parse(format!("Failed to parse config {}: {e}", path.display())))
}
