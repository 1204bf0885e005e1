//! Configuration handling for the TUI

use crate::api::DEFAULT_BASE_URL;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TuiConfig {
    /// Base URL of the intake API
    pub api_base_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Write logs here instead of the data directory
    pub log_file: Option<PathBuf>,
    /// Keep provinces, municipalities and hire statuses for the whole process
    pub cache_reference_data: Option<bool>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("cu", "intake", "staff-intake-tui")
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where logs go: the configured file, else `intake.log` in the data directory
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_local_dir().join("intake.log"))
        })
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: TuiConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn cache_reference_data(&self) -> bool {
        self.cache_reference_data.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:3000");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.cache_reference_data());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = TuiConfig {
            api_base_url: Some("https://rrhh.example.cu".to_string()),
            request_timeout_secs: Some(30),
            log_file: Some(PathBuf::from("/tmp/intake.log")),
            cache_reference_data: Some(false),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(parsed.api_base_url(), "https://rrhh.example.cu");
        assert_eq!(parsed.request_timeout(), Duration::from_secs(30));
        assert!(!parsed.cache_reference_data());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: TuiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, TuiConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"api_base_url": "http://10.0.0.5:8080", "theme": "dark"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.api_base_url(), "http://10.0.0.5:8080");
    }

    #[test]
    fn test_log_path_prefers_configured_file() {
        let config = TuiConfig {
            log_file: Some(PathBuf::from("/tmp/intake.log")),
            ..Default::default()
        };
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/intake.log")));
    }

    #[test]
    fn test_default_log_path_is_in_data_dir() {
        let expected =
            TuiConfig::project_dirs().map(|dirs| dirs.data_local_dir().join("intake.log"));
        assert_eq!(TuiConfig::default().log_path(), expected);
    }

    #[test]
    fn test_blank_url_and_zero_timeout_fall_back() {
        let config = TuiConfig {
            api_base_url: Some("  ".to_string()),
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.api_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = tokio_test::assert_ok!(TuiConfig::load_from(&dir.path().join("config.json")));
        assert_eq!(config, TuiConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"request_timeout_secs": 5, "log_file": "intake.log"}"#).unwrap();

        let config = TuiConfig::load_from(&path).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.log_file, Some(PathBuf::from("intake.log")));
        assert_eq!(config.api_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        tokio_test::assert_err!(TuiConfig::load_from(&path));
    }
}
