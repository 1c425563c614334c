use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{TaskboardError, TaskboardResult};

pub const DEFAULT_AUTH_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_URL: &str = "http://localhost:8081";
pub const DEFAULT_BOARD_REFRESH_SECS: u64 = 30;
pub const DEFAULT_NOTIFICATION_POLL_SECS: u64 = 120;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the authentication service (login, register, profile, users).
    pub auth_url: String,
    /// Base URL of the kanban service (boards, tasks, notifications).
    pub api_url: String,
    pub board_refresh_secs: u64,
    pub notification_poll_secs: u64,
    pub request_timeout_secs: u64,
    /// Where the session key/value store lives. Defaults to the data dir.
    pub storage_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            board_refresh_secs: DEFAULT_BOARD_REFRESH_SECS,
            notification_poll_secs: DEFAULT_NOTIFICATION_POLL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_path: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring config at {}: {}", config_path.display(), e);
                    }
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> TaskboardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TaskboardError::Config(e.to_string()))
    }

    pub fn effective_storage_path(&self) -> PathBuf {
        if let Some(path) = &self.storage_path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("taskboard").join("session.json"))
            .unwrap_or_else(|| PathBuf::from(".taskboard-session.json"))
    }

    pub fn board_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.board_refresh_secs.max(1))
    }

    pub fn notification_poll_interval(&self) -> Duration {
        Duration::from_secs(self.notification_poll_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
