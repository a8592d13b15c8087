use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::client;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the history API
    pub base_url: String,

    /// Client identifier sent as the User-Agent header
    pub user_agent: String,

    /// Per-call timeout for history checks, in seconds
    pub check_timeout_secs: u64,

    /// Per-call timeout for profile analysis (slower endpoint), in seconds
    pub analyze_timeout_secs: u64,

    /// Per-call timeout for the rate-limit status endpoint, in seconds
    pub status_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Delay between consecutive batch requests, in seconds
    pub delay_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://monibags.xyz".to_string(),
            user_agent: client::USER_AGENT.to_string(),
            check_timeout_secs: 30,
            analyze_timeout_secs: 60,
            status_timeout_secs: 10,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { delay_secs: 2.0 }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config.with_env_overrides());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config.with_env_overrides())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("handlecheck").join("config.toml"))
    }

    /// `HANDLECHECK_API_URL` wins over the file, so a build can be pointed
    /// at a staging instance without editing it.
    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("HANDLECHECK_API_URL") {
            self.api.base_url = url;
        }
        self
    }
}
