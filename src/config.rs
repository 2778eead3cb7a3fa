//! Gate configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3002/api";
pub const DEFAULT_STORAGE_DIR: &str = ".chatgate";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{0}`: expected http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Base URL of the session verification service, without trailing slash.
    pub api_base_url: String,
    /// Directory holding persisted store state.
    pub storage_dir: PathBuf,
    pub connect_timeout_secs: u64,
}

impl GateConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `CHATGATE_API_BASE_URL`: default `http://127.0.0.1:3002/api`
    /// - `CHATGATE_STORAGE_DIR`: default `.chatgate`
    /// - `CHATGATE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url =
            std::env::var("CHATGATE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let storage_dir = std::env::var("CHATGATE_STORAGE_DIR").unwrap_or_else(|_| DEFAULT_STORAGE_DIR.to_string());
        let connect_timeout_secs = env_parse_u64("CHATGATE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS);
        Self::new(api_base_url, storage_dir, connect_timeout_secs)
    }

    /// Build config from explicit values, validating and normalizing the URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn new(
        api_base_url: impl Into<String>,
        storage_dir: impl Into<PathBuf>,
        connect_timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(&api_base_url.into())?;
        Ok(Self { api_base_url, storage_dir: storage_dir.into(), connect_timeout_secs })
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
