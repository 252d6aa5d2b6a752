//! Application configuration.
//!
//! Values are resolved in order of precedence, highest first:
//! 1. Environment variables (`BABY_TRACKER_DATA_DIR`, `BABY_TRACKER_BIND`, `BABY_TRACKER_TZ`)
//! 2. `config.yaml` in the data directory
//! 3. Defaults
//!
//! The data directory itself can only come from the environment or the default,
//! since the YAML file lives inside it.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::models::timestamp::parse_zone;

pub const DATA_DIR_ENV: &str = "BABY_TRACKER_DATA_DIR";
pub const BIND_ENV: &str = "BABY_TRACKER_BIND";
pub const TIMEZONE_ENV: &str = "BABY_TRACKER_TZ";

const CONFIG_FILE_NAME: &str = "config.yaml";
const DATA_DIR_NAME: &str = "Baby Tracker";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub bind_address: String,
    /// Display zone used when a request does not name one
    pub default_timezone: Tz,
}

/// Optional overrides read from `config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub bind_address: Option<String>,
    pub default_timezone: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to look up environment variables
    pub fn load_with<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let data_directory = env(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_directory);

        let file = read_file_config(&data_directory)?;

        let bind_address = env(BIND_ENV)
            .or(file.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let default_timezone = parse_zone(env(TIMEZONE_ENV).or(file.default_timezone).as_deref());

        let config = Self {
            data_directory,
            bind_address,
            default_timezone,
        };
        info!(
            "Configuration: data_directory={}, bind_address={}, default_timezone={}",
            config.data_directory.display(),
            config.bind_address,
            config.default_timezone.name()
        );
        Ok(config)
    }
}

/// `~/Documents/Baby Tracker`, falling back to the working directory
fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

fn read_file_config(data_directory: &Path) -> Result<FileConfig> {
    let path = data_directory.join(CONFIG_FILE_NAME);
    if !path.exists() {
        debug!("No config file at {}", path.display());
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&contents).with_context(|| format!("Invalid config file {}", path.display()))
}
