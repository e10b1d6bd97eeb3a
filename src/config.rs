//! Configuration management for SCHOA
//!
//! TOML configuration with built-in defaults.
//! Location: ~/.schoa/config.toml (or `--config <path>`)
//!
//! The model credential never lives in the file: the file names the
//! environment variable it is read from, once, at startup.

use crate::errors::{Result, SchoaError};
use crate::gateway::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEXT_TEMPERATURE};
use crate::views::ViewKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the model credential by default
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Terminal display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub show_spinner: bool,
    pub default_view: String,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub history_file: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: DEFAULT_TEXT_TEMPERATURE,
            timeout_secs: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            show_spinner: true,
            default_view: "clinical".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            history_file: "~/.schoa/history".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SchoaError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| SchoaError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from ~/.schoa/config.toml if present, built-in defaults otherwise
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".schoa").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.gemini.endpoint.trim().is_empty() {
            return Err(SchoaError::ConfigError("endpoint must not be empty".to_string()));
        }

        if self.gemini.model.trim().is_empty() {
            return Err(SchoaError::ConfigError("model must not be empty".to_string()));
        }

        if self.gemini.api_key_env.trim().is_empty() {
            return Err(SchoaError::ConfigError("api_key_env must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(SchoaError::ConfigError(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.gemini.timeout_secs == Some(0) {
            return Err(SchoaError::ConfigError(
                "timeout_secs must be greater than 0 when set".to_string(),
            ));
        }

        if ViewKind::parse(&self.display.default_view).is_none() {
            return Err(SchoaError::ConfigError(format!(
                "Invalid default view: {}",
                self.display.default_view
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SchoaError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SchoaError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SchoaError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Read the credential from the configured environment variable.
    ///
    /// Absence is not an error here; it yields an empty key.
    pub fn api_key(&self) -> String {
        std::env::var(&self.gemini.api_key_env).unwrap_or_default()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.gemini.timeout_secs.map(Duration::from_secs)
    }

    /// View the shell opens on
    pub fn default_view(&self) -> ViewKind {
        ViewKind::parse(&self.display.default_view).unwrap_or_default()
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn history_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.history_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.api_key_env, "API_KEY");
        assert_eq!(config.gemini.temperature, 0.2);
        assert!(config.gemini.timeout_secs.is_none());
        assert_eq!(config.default_view(), ViewKind::Clinical);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_temperature() {
        let mut config = Config::default();
        config.gemini.temperature = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.gemini.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.gemini.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_view() {
        let mut config = Config::default();
        config.display.default_view = "billing".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gemini]\nmodel = \"gemini-test\"\n").unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.gemini.model, "gemini-test");
        assert_eq!(config.gemini.endpoint, DEFAULT_ENDPOINT);
        assert!(config.display.show_spinner);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.gemini.timeout_secs = Some(30);
        config.display.default_view = "search".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(loaded.default_view(), ViewKind::Search);
    }

    #[test]
    fn test_unreadable_file_is_config_error() {
        let result = Config::load_from_file(Path::new("/nonexistent/schoa.toml"));
        assert!(matches!(result, Err(SchoaError::ConfigError(_))));
    }

    #[test]
    fn test_api_key_from_named_variable() {
        let mut config = Config::default();
        config.gemini.api_key_env = "SCHOA_TEST_KEY_FROM_ENV".to_string();
        std::env::set_var("SCHOA_TEST_KEY_FROM_ENV", "secret");
        assert_eq!(config.api_key(), "secret");

        config.gemini.api_key_env = "SCHOA_TEST_KEY_UNSET".to_string();
        assert_eq!(config.api_key(), "");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.schoa/history");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        assert_eq!(Config::expand_path(path).to_string_lossy(), path);
    }
}
