use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the concert REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Whether the concert list re-fetches on a timer while the app runs.
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl RefreshConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// User-configurable file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where the logged-in user session is persisted between runs.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: default_auto_refresh(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            session_file: default_session_file(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    4000
}

fn default_request_timeout_ms() -> u64 {
    15000
}

fn default_auto_refresh() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    30
}

fn default_session_file() -> PathBuf {
    platform::data_dir().join("session.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.refresh.auto_refresh);
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.refresh.period(), Duration::from_secs(30));
        assert!(config.api.base_url.starts_with("http://"));
        assert!(config.paths.session_file.ends_with("concert-connect/session.json"));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [refresh]
            interval_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.refresh.interval_secs, 5);
        assert!(config.refresh.auto_refresh);
        assert_eq!(config.api.connect_timeout_ms, 4000);
    }

    #[test]
    fn test_interval_floor_is_one_second() {
        let refresh = RefreshConfig {
            auto_refresh: true,
            interval_secs: 0,
        };
        assert_eq!(refresh.period(), Duration::from_secs(1));
    }
}
