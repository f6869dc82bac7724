//! Client settings
//!
//! Loaded from the environment (a `.env` file is honoured) and validated
//! before a client is built from them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing_subscriber::EnvFilter;

use crate::services::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API connection settings
    pub api: ApiConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// API connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token
    pub api_key: String,
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Sent as `OpenAI-Organization` when present
    pub organization: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the environment
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();

        let organization = std::env::var("OPENAI_ORGANIZATION")
            .ok()
            .filter(|org| !org.trim().is_empty());

        let settings = Self {
            api: ApiConfig {
                api_key: std::env::var("OPENAI_API_KEY")
                    .context("OPENAI_API_KEY environment variable not set")?,
                base_url: get_env_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL),
                organization,
                timeout: get_env_or_default("REQUEST_TIMEOUT", &DEFAULT_TIMEOUT_SECS.to_string())
                    .parse()
                    .context("Invalid timeout value")?,
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Settings for `api_key` with every other value at its default
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                api_key: api_key.into(),
                base_url: DEFAULT_BASE_URL.to_string(),
                organization: None,
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Check that the settings can produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.api.api_key.is_empty() {
            anyhow::bail!("API key cannot be empty");
        }

        if self.api.api_key.contains(char::is_whitespace) {
            anyhow::bail!("API key cannot contain whitespace characters");
        }

        if !self.api.base_url.starts_with("http") {
            anyhow::bail!("Invalid base URL format, should start with 'http'");
        }

        if self.api.timeout == 0 {
            anyhow::bail!("Timeout cannot be 0");
        }

        // Same syntax as RUST_LOG: a bare level or target=level directives
        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            anyhow::bail!("Invalid log level '{}': {}", self.logging.level, e);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let mut settings = Settings::with_api_key("sk-test-key");
        assert!(settings.validate().is_ok());

        settings.api.api_key = "sk test".to_string();
        assert!(settings.validate().is_err());

        settings.api.api_key = "sk-test-key".to_string();
        settings.api.timeout = 0;
        assert!(settings.validate().is_err());

        settings.api.timeout = 10;
        settings.logging.format = "xml".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_log_level_accepts_directives() {
        let mut settings = Settings::with_api_key("sk-test-key");

        for level in ["debug", "openai_client=debug", "warn,openai_client::services=trace"] {
            settings.logging.level = level.to_string();
            assert!(settings.validate().is_ok(), "{} should be accepted", level);
        }

        settings.logging.level = "openai_client=loud".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = Settings::with_api_key("sk-very-secret");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-very-secret"));
    }
}
