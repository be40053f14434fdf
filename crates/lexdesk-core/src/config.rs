//! LexDesk configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LexError, Result};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexDeskConfig {
    /// JSON data file read by the case store. `~` is expanded by the caller.
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

fn default_data_path() -> String { "~/.lexdesk/data.json".into() }

impl Default for LexDeskConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl LexDeskConfig {
    /// Load config from the default path (~/.lexdesk/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LexError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| LexError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| LexError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.notifications.poll_interval_secs == 0 {
            return Err(LexError::Config(
                "notifications.poll_interval_secs must be greater than 0".into(),
            ));
        }
        if self.notifications.fetch_timeout_secs == 0 {
            return Err(LexError::Config(
                "notifications.fetch_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.data_path.trim().is_empty() {
            return Err(LexError::Config("data_path cannot be empty".into()));
        }
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the LexDesk home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lexdesk")
    }
}

/// Reminder engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Upper bound for one cycle's pair of fetches.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub locale: Locale,
}

fn default_poll_interval_secs() -> u64 { 60 }
fn default_fetch_timeout_secs() -> u64 { 30 }

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            locale: Locale::default(),
        }
    }
}

impl NotificationSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Language of reminder texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LexDeskConfig::default();
        assert_eq!(config.notifications.poll_interval_secs, 60);
        assert_eq!(config.notifications.fetch_timeout_secs, 30);
        assert_eq!(config.notifications.locale, Locale::En);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: LexDeskConfig = toml::from_str(
            r#"
            [notifications]
            locale = "ar"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_path, "~/.lexdesk/data.json");
        assert_eq!(config.notifications.locale, Locale::Ar);
        assert_eq!(config.notifications.poll_interval_secs, 60);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = std::env::temp_dir().join("lexdesk-test-config-zero");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[notifications]\npoll_interval_secs = 0\n").unwrap();

        let err = LexDeskConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, LexError::Config(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("lexdesk-test-config-save");
        let path = dir.join("config.toml");
        let mut config = LexDeskConfig::default();
        config.notifications.poll_interval_secs = 15;
        config.save_to(&path).unwrap();

        let loaded = LexDeskConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(&dir).ok();
    }
}
