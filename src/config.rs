use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use tracing::debug;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
const API_KEY_ENV: &str = "BACKEND_API_KEY";

/// Where listings come from
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Mock,
    Backend,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub data_source: DataSource,
    /// JSON file replacing the bundled fixtures
    pub fixtures_path: Option<PathBuf>,
    /// Artificial delay applied to every mock call
    pub mock_latency_ms: u64,
    pub backend_url: Option<String>,
    pub backend_api_key: Option<String>,
    /// Directory holding the wishlist and review blobs
    pub storage_dir: PathBuf,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: DataSource::Mock,
            fixtures_path: None,
            mock_latency_ms: 300,
            backend_url: None,
            backend_api_key: None,
            storage_dir: PathBuf::from(".stay-scout"),
            page_size: 12,
        }
    }
}

impl Config {
    /// Mock data with no artificial latency
    pub fn for_tests() -> Self {
        Self {
            mock_latency_ms: 0,
            ..Self::default()
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse config")
    }
}

/// Load the TOML file named by `CONFIG_PATH`, falling back to defaults when unset
pub fn read_config() -> Result<Config> {
    dotenv().ok();

    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            debug!("Reading config from {}", path);
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {path}"))?;
            Config::from_toml(&raw)?
        }
        Err(_) => {
            debug!("{} not set, using default config", CONFIG_PATH_ENV);
            Config::default()
        }
    };

    if config.backend_api_key.is_none() {
        config.backend_api_key = env::var(API_KEY_ENV).ok();
    }

    Ok(config)
}
