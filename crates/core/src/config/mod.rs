//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (THORNS_*)
//! 2. TOML config file (if THORNS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (THORNS_*)
/// 2. TOML config file (if THORNS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Client identifier sent as the User-Agent of every outbound request.
    ///
    /// Set via THORNS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Origin the API and image paths are resolved against.
    ///
    /// Set via THORNS_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the API below `base_url`, with leading and trailing slash.
    ///
    /// Set via THORNS_API_PATH environment variable.
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Directory holding the per-domain snapshot files.
    ///
    /// Set via THORNS_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via THORNS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_user_agent() -> String {
    "thorns-cache/0.1".into()
}

fn default_base_url() -> String {
    "https://fractalthorns.com".into()
}

fn default_api_path() -> String {
    "/api/v1/".into()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./__apicache__")
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            base_url: default_base_url(),
            api_path: default_api_path(),
            cache_dir: default_cache_dir(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Origin without a trailing slash, ready for path concatenation.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Full URL prefix that endpoint names are appended to.
    pub fn api_root(&self) -> String {
        let path = self.api_path.trim_matches('/');
        if path.is_empty() { format!("{}/", self.origin()) } else { format!("{}/{}/", self.origin(), path) }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `THORNS_`
    /// 2. TOML file from `THORNS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("THORNS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("THORNS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
