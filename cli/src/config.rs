use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct Config {
    pub cache_path: PathBuf,
    pub endpoint_url: String,
    pub timeout: Duration,
}

/// Optional `config.json` in the data directory.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    endpoint_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl Config {
    /// Load the data directory and endpoint settings.
    ///
    /// The endpoint comes from `PANTAU_ENDPOINT` or `config.json`. With
    /// neither set, every remote call fails fast and the tool runs purely
    /// against the local cache.
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "pantau").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let file = read_config_file(&data_dir.join("config.json"))?;
        let endpoint_url = std::env::var("PANTAU_ENDPOINT")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or(file.endpoint_url)
            .unwrap_or_default();
        let timeout = Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        Ok(Config {
            cache_path: data_dir.join("pantau.db"),
            endpoint_url,
            timeout,
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}
