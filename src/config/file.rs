//! File-based configuration loading
//!
//! Reads client settings from a JSON file. Keys are snake_case.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::settings::{ApiConfig, LoggingConfig, Settings};
use crate::services::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// File name searched for by [`ClientFile::load_default`]
pub const CONFIG_FILE_NAME: &str = "openai-client.json";

/// Client configuration loaded from a JSON file
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientFile {
    /// API key (can be empty if using env var)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub organization: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for ClientFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFile")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("timeout", &self.timeout)
            .field("logging", &self.logging)
            .finish()
    }
}

impl ClientFile {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let config = ::config::Config::builder()
            .add_source(::config::File::from(path).format(::config::FileFormat::Json))
            .build()
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let file: ClientFile = config
            .try_deserialize()
            .context("Failed to parse config JSON")?;

        debug!("Loaded configuration for {}", file.base_url);
        Ok(file)
    }

    /// Candidate locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("openai-client").join(CONFIG_FILE_NAME));
        }
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
        paths
    }

    /// Load configuration from default locations
    /// Searches in order:
    /// 1. ~/.config/openai-client/openai-client.json
    /// 2. ./openai-client.json
    pub fn load_default() -> Result<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        anyhow::bail!(
            "Configuration file not found. Please create one at:\n\
             - ~/.config/openai-client/{name} (recommended)\n\
             - ./{name} (current directory)",
            name = CONFIG_FILE_NAME
        )
    }

    /// Convert into validated settings
    ///
    /// An empty `api_key` falls back to the `OPENAI_API_KEY` environment
    /// variable.
    pub fn into_settings(self) -> Result<Settings> {
        let api_key = if self.api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            self.api_key
        };

        let settings = Settings {
            api: ApiConfig {
                api_key,
                base_url: self.base_url,
                organization: self.organization.filter(|org| !org.trim().is_empty()),
                timeout: self.timeout,
            },
            logging: self.logging,
        };

        settings.validate()?;
        Ok(settings)
    }
}
