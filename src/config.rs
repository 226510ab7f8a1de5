//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/super-admin/...` paths are appended to.
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Where the settings editor reads its catalog and sends updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsBackend {
    /// Built-in catalog and branch list, save is acknowledged locally.
    #[default]
    Local,
    /// Branches and updates go through the REST API.
    Remote,
}

/// Settings editor options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub backend: SettingsBackend,
}

/// Local storage locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the session key-value file holding the cached `user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

/// Panel shown at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPanel {
    #[default]
    Dashboard,
    Appointments,
    Settings,
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Seconds the "saved" banner stays visible.
    #[serde(default = "default_banner_secs")]
    pub banner_secs: u64,
    #[serde(default)]
    pub start_panel: StartPanel,
}

fn default_banner_secs() -> u64 {
    3
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("API base URL cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.api.timeout_secs > 600 {
            return Err(ConfigError::Validation(
                "Request timeout cannot exceed 600 seconds".to_string(),
            ));
        }
        if self.ui.banner_secs < 1 {
            return Err(ConfigError::Validation(
                "Banner duration must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the session store file, falling back to the platform data dir.
    pub fn session_path(&self) -> PathBuf {
        self.storage
            .session_file
            .clone()
            .unwrap_or_else(|| data_dir().join("session.json"))
    }
}

/// Platform data directory for logs and the session store.
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "hospital", "super-admin")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            banner_secs: default_banner_secs(),
            start_panel: StartPanel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://hospital.local".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let mut config = AppConfig::default();

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 601;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 15;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://admin.example.org/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.settings.backend, SettingsBackend::Local);
        assert_eq!(config.ui.banner_secs, 3);
        assert_eq!(config.ui.start_panel, StartPanel::Dashboard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_backend_parses() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://10.0.0.5:8000"

            [settings]
            backend = "remote"

            [ui]
            start_panel = "appointments"
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.backend, SettingsBackend::Remote);
        assert_eq!(config.ui.start_panel, StartPanel::Appointments);
    }

    #[test]
    fn test_session_path_override() {
        let mut config = AppConfig::default();
        config.storage.session_file = Some(PathBuf::from("/tmp/custom-session.json"));
        assert_eq!(config.session_path(), PathBuf::from("/tmp/custom-session.json"));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("super-admin-config-{}.toml", std::process::id()));
        let mut config = AppConfig::default();
        config.api.base_url = "https://hq.example.org".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.api.base_url, "https://hq.example.org"),
            other => panic!("unexpected load result: {other:?}"),
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("super-admin-config-does-not-exist.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));
    }
}
