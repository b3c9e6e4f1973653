use crate::errors::SousChefResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default hosted model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Default API base; overridable so tests can point at a dead endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default persona instruction sent with chat turns.
pub const DEFAULT_PERSONA: &str =
    "You are a professional Sous-Chef for a developer portfolio. \
     Answer concisely using culinary metaphors.";

/// Configuration for the generation pipeline.
///
/// `api_key` absent or empty means demo mode: every generation call
/// short-circuits to `Unavailable` without network access.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SousChefConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub api_base: Option<String>,
    pub persona: Option<String>,
}

impl Default for SousChefConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_name: Some(DEFAULT_MODEL.to_string()),
            api_base: Some(DEFAULT_API_BASE.to_string()),
            persona: Some(DEFAULT_PERSONA.to_string()),
        }
    }
}

impl SousChefConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> SousChefResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                crate::errors::SousChefError::ConfigError(format!(
                    "Failed to read config file: {}",
                    e
                ))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::errors::SousChefError::ConfigError(format!(
                    "Failed to parse config file: {}",
                    e
                ))
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> SousChefResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            crate::errors::SousChefError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                crate::errors::SousChefError::ConfigError(format!(
                    "Failed to create config directory: {}",
                    e
                ))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            crate::errors::SousChefError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base: other.api_base.clone().or_else(|| self.api_base.clone()),
            persona: other.persona.clone().or_else(|| self.persona.clone()),
        }
    }

    /// Overlays the `GEMINI_API_KEY` environment variable (sourcing a .env
    /// file first if one is present) on top of this config.
    pub fn with_env_overrides(mut self) -> Self {
        dotenvy::dotenv().ok();
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> SousChefResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        crate::errors::SousChefError::ConfigError("Could not determine home directory".to_string())
    })?;

    let config_dir = home_dir.join(".config").join(app_name);

    Ok(config_dir)
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> SousChefResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
