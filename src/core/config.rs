//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Database file used when nothing else is configured
pub const DEFAULT_DATABASE: &str = "trackside.db";

/// Busy timeout used when nothing else is configured
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Project-local config file, read from the working directory
const LOCAL_CONFIG_FILE: &str = "trackside.yaml";

/// Trackside configuration with layered hierarchy
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database: Option<PathBuf>,

    /// How long to wait on a locked database before failing
    pub busy_timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/trackside/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Working directory config (./trackside.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Read one YAML config file; missing or unreadable files contribute nothing
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };

        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Settings taken from `TRACKSIDE_*` variables
    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        let mut config = Config::default();

        if let Some(database) = var("TRACKSIDE_DATABASE") {
            config.database = Some(PathBuf::from(database));
        }
        if let Some(timeout) = var("TRACKSIDE_BUSY_TIMEOUT_MS") {
            match timeout.trim().parse() {
                Ok(ms) => config.busy_timeout_ms = Some(ms),
                Err(_) => warn!(value = %timeout, "ignoring non-numeric TRACKSIDE_BUSY_TIMEOUT_MS"),
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "trackside")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.busy_timeout_ms.is_some() {
            self.busy_timeout_ms = other.busy_timeout_ms;
        }
    }

    /// Database path, falling back to `trackside.db` in the working directory
    pub fn database(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS))
    }
}
