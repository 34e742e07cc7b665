//! Client configuration from the environment.

use crate::settings::FileSettingsStore;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub settings_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            settings_path: FileSettingsStore::default_path(),
        }
    }
}

impl ClientConfig {
    /// Read `SPELLING_API_URL`, `SPELLING_API_TIMEOUT_SECS` and
    /// `SPELLING_SETTINGS_PATH`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("SPELLING_API_URL").filter(|s| !s.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup("SPELLING_API_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "ignoring invalid SPELLING_API_TIMEOUT_SECS"),
            }
        }

        if let Some(path) = lookup("SPELLING_SETTINGS_PATH").filter(|s| !s.trim().is_empty()) {
            config.settings_path = PathBuf::from(path);
        }

        config
    }
}
