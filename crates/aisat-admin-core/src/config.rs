//! Application configuration management.
//!
//! This module handles loading and saving the console configuration, which
//! includes the API base URL, the directory holding the local panel pages,
//! request timeouts and the offline trust policy.
//!
//! Configuration is stored at `~/.config/aisat-admin/config.json`. A few
//! fields can be overridden from the environment (or a `.env` file loaded
//! by the binary) without touching the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::OfflinePolicy;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "aisat-admin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Settings (key/value session store) file name
const SETTINGS_FILE: &str = "settings.json";

/// Default remote service
pub const DEFAULT_API_BASE_URL: &str = "https://jimboyaczon.pythonanywhere.com";

/// Default directory of the local panel pages, relative to the working directory
const DEFAULT_PAGES_DIR: &str = "sideload";

/// Login, registration and verification calls.
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 5;

/// User creation and presence calls.
const DEFAULT_ADMIN_TIMEOUT_SECS: u64 = 10;

const ENV_API_BASE_URL: &str = "AISAT_API_BASE_URL";
const ENV_PAGES_DIR: &str = "AISAT_PAGES_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub pages_dir: PathBuf,
    pub auth_timeout_secs: u64,
    pub admin_timeout_secs: u64,
    /// Keep a cached session usable when the verification server is unreachable
    pub trust_offline_sessions: bool,
    /// Keep the password and bearer token in the OS keychain instead of settings.json
    pub secure_storage: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            pages_dir: PathBuf::from(DEFAULT_PAGES_DIR),
            auth_timeout_secs: DEFAULT_AUTH_TIMEOUT_SECS,
            admin_timeout_secs: DEFAULT_ADMIN_TIMEOUT_SECS,
            trust_offline_sessions: true,
            secure_storage: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `AISAT_*` environment variables on top of the loaded values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            debug!(url = %url, "API base URL overridden from environment");
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup(ENV_PAGES_DIR).filter(|v| !v.trim().is_empty()) {
            self.pages_dir = PathBuf::from(dir);
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Location of the persisted key/value session store
    pub fn settings_path(&self) -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(SETTINGS_FILE))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn admin_timeout(&self) -> Duration {
        Duration::from_secs(self.admin_timeout_secs)
    }

    pub fn offline_policy(&self) -> OfflinePolicy {
        if self.trust_offline_sessions {
            OfflinePolicy::Trust
        } else {
            OfflinePolicy::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.auth_timeout(), Duration::from_secs(5));
        assert_eq!(config.admin_timeout(), Duration::from_secs(10));
        assert_eq!(config.offline_policy(), OfflinePolicy::Trust);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"trust_offline_sessions": false}"#).unwrap();
        assert_eq!(config.offline_policy(), OfflinePolicy::Reject);
        assert_eq!(config.pages_dir, PathBuf::from("sideload"));
        assert!(config.secure_storage);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_API_BASE_URL => Some("http://localhost:5000/".to_string()),
            ENV_PAGES_DIR => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "http://localhost:5000");
        // Blank values are ignored
        assert_eq!(config.pages_dir, PathBuf::from("sideload"));
    }
}
