//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "storage": { "layout": "consolidated", "blobKey": "staffhub_db" },
//!   "registration": { "defaultRole": "admin", "minPasswordLength": 6 },
//!   "navigation": { "verifyRedirectDelayMs": 1500 }
//! }
//! ```
//! Fields this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;
use crate::domain::Role;

/// Key holding the consolidated blob unless configured otherwise
pub const DEFAULT_BLOB_KEY: &str = "staffhub_db";

/// How collections map onto storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageLayout {
    /// One key holding `{accounts, departments, employees, requests}`
    #[default]
    Consolidated,
    /// One key per collection (`accounts`, `departments`, `employees`, `myRequests`)
    PerEntity,
}

impl FromStr for StorageLayout {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "consolidated" | "single" => Ok(StorageLayout::Consolidated),
            "per-entity" | "perentity" | "keyed" => Ok(StorageLayout::PerEntity),
            other => Err(Error::Config(format!("unknown storage layout '{}'", other))),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    storage: StorageSettings,
    #[serde(default)]
    registration: RegistrationSettings,
    #[serde(default)]
    navigation: NavigationSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageSettings {
    #[serde(default)]
    layout: StorageLayout,
    #[serde(default)]
    blob_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationSettings {
    #[serde(default)]
    default_role: Option<Role>,
    #[serde(default)]
    min_password_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigationSettings {
    #[serde(default)]
    verify_redirect_delay_ms: Option<u64>,
}

/// Staffhub configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_layout: StorageLayout,
    pub blob_key: String,
    /// Role given to self-registered accounts
    pub default_role: Role,
    pub min_password_length: usize,
    /// Delay between a simulated verification and the redirect to login
    pub verify_redirect_delay: Duration,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_layout: StorageLayout::Consolidated,
            blob_key: DEFAULT_BLOB_KEY.to_string(),
            default_role: Role::Admin,
            min_password_length: 6,
            verify_redirect_delay: Duration::from_millis(1500),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unreadable settings file yields defaults. Environment
    /// overrides (for CI/testing):
    /// - `STAFFHUB_STORAGE_LAYOUT`: `consolidated` or `per-entity`
    /// - `STAFFHUB_DEFAULT_ROLE`: `user` or `admin`
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(data_dir)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load `settings.json` alone, ignoring environment overrides
    pub fn load_file(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Ok(Self::from_settings(raw))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(layout) = std::env::var("STAFFHUB_STORAGE_LAYOUT") {
            self.storage_layout = layout.parse()?;
        }
        if let Ok(role) = std::env::var("STAFFHUB_DEFAULT_ROLE") {
            self.default_role = role.parse()?;
        }
        Ok(())
    }

    fn from_settings(raw: SettingsFile) -> Self {
        let defaults = Self::default();
        Self {
            storage_layout: raw.storage.layout,
            blob_key: raw
                .storage
                .blob_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .unwrap_or(defaults.blob_key),
            default_role: raw.registration.default_role.unwrap_or(defaults.default_role),
            min_password_length: raw
                .registration
                .min_password_length
                .unwrap_or(defaults.min_password_length),
            verify_redirect_delay: raw
                .navigation
                .verify_redirect_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.verify_redirect_delay),
            _raw_settings: raw,
        }
    }

    /// Save config to the data directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        settings.storage.layout = self.storage_layout;
        settings.storage.blob_key = Some(self.blob_key.clone());
        settings.registration.default_role = Some(self.default_role);
        settings.registration.min_password_length = Some(self.min_password_length);
        settings.navigation.verify_redirect_delay_ms =
            Some(self.verify_redirect_delay.as_millis() as u64);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::from_settings(SettingsFile::default());
        assert_eq!(config.storage_layout, StorageLayout::Consolidated);
        assert_eq!(config.blob_key, DEFAULT_BLOB_KEY);
        assert_eq!(config.default_role, Role::Admin);
        assert_eq!(config.min_password_length, 6);
        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn test_reads_settings_and_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{
                "storage": { "layout": "perEntity" },
                "registration": { "defaultRole": "user", "minPasswordLength": 8 },
                "theme": "dark"
            }"#,
        )
        .unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let raw: SettingsFile = serde_json::from_str(&content).unwrap();
        let config = Config::from_settings(raw);
        assert_eq!(config.storage_layout, StorageLayout::PerEntity);
        assert_eq!(config.default_role, Role::User);
        assert_eq!(config.min_password_length, 8);

        config.save(dir.path()).unwrap();
        let saved = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["storage"]["layout"], "perEntity");
        assert_eq!(value["navigation"]["verifyRedirectDelayMs"], 1500);
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let config = Config::load_file(dir.path()).unwrap();
        assert_eq!(config.blob_key, DEFAULT_BLOB_KEY);
    }

    #[test]
    fn test_layout_parsing() {
        assert_eq!("per_entity".parse::<StorageLayout>().unwrap(), StorageLayout::PerEntity);
        assert_eq!("Consolidated".parse::<StorageLayout>().unwrap(), StorageLayout::Consolidated);
        assert!("sharded".parse::<StorageLayout>().is_err());
    }
}
