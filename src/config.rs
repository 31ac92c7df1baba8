use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::scores::DEFAULT_CAPACITY;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter handed to env_logger, e.g. "warn" or "fifteen=debug".
    pub log_level: String,
    /// Where log lines go while the terminal UI owns the screen.
    pub log_file: PathBuf,
    /// Fixed RNG seed for reproducible shuffles.
    pub seed: Option<u64>,
    pub scores: ScoresConfig,
    pub replay: ReplayConfig,
    pub ui: UiConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoresConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub capacity: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Store the start position with each score so it can be replayed.
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How often the timer display refreshes while waiting for input.
    pub tick_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_file: PathBuf::from("fifteen.log"),
            seed: None,
            scores: ScoresConfig::default(),
            replay: ReplayConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ScoresConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("fifteen-scores.txt"),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_millis: 250 }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
