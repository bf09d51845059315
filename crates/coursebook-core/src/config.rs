//! Application configuration management.
//!
//! The configuration holds the backend URL, the last email used to sign in,
//! and an optional override for the data directory.
//!
//! Configuration is stored at `~/.config/coursebook/config.json`. Environment
//! variables take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "coursebook";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:9000";

pub const ENV_API_URL: &str = "COURSEBOOK_API_URL";
pub const ENV_EMAIL: &str = "COURSEBOOK_EMAIL";
pub const ENV_PASSWORD: &str = "COURSEBOOK_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Default location of the config file.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Backend URL: environment, then config file, then the default.
    pub fn api_base_url(&self) -> String {
        Self::resolve(std::env::var(ENV_API_URL).ok(), self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Email to prefill in the login form.
    pub fn login_email(&self) -> String {
        Self::resolve(std::env::var(ENV_EMAIL).ok(), self.last_email.clone()).unwrap_or_default()
    }

    pub fn login_password(&self) -> String {
        std::env::var(ENV_PASSWORD).unwrap_or_default()
    }

    fn resolve(env: Option<String>, file: Option<String>) -> Option<String> {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| file.filter(|v| !v.trim().is_empty()))
    }

    /// Directory for the session storage and logs.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_env_over_file() {
        assert_eq!(
            Config::resolve(Some("http://env".into()), Some("http://file".into())),
            Some("http://env".to_string())
        );
        assert_eq!(
            Config::resolve(None, Some("http://file".into())),
            Some("http://file".to_string())
        );
        assert_eq!(
            Config::resolve(Some("  ".into()), Some("http://file".into())),
            Some("http://file".to_string())
        );
        assert_eq!(Config::resolve(None, None), None);
    }

    #[test]
    fn test_data_dir_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/coursebook-test")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/coursebook-test"));
        assert_eq!(
            config.log_dir().unwrap(),
            PathBuf::from("/tmp/coursebook-test/logs")
        );
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = Config {
            api_base_url: Some("http://localhost:9000".to_string()),
            last_email: Some("test@example.com".to_string()),
            data_dir: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.last_email, config.last_email);
        assert_eq!(back.api_base_url, config.api_base_url);
    }

    #[test]
    fn test_save_to_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        assert!(Config::load_from(&path).unwrap().last_email.is_none());

        let config = Config {
            last_email: Some("test@example.com".to_string()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let back = Config::load_from(&path).unwrap();
        assert_eq!(back.last_email.as_deref(), Some("test@example.com"));
    }

    #[test]
    fn test_missing_fields_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.api_base_url.is_none());
        assert!(config.last_email.is_none());
    }
}
