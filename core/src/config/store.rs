//! Settings persistence
//!
//! The settings live in the platform config directory through confy
//! (`kwyd/settings.toml`). Explicit paths are supported for replay
//! scripts and tests.

use std::path::{Path, PathBuf};

use kwyd_types::LootSettings;

use super::ConfigError;

pub const APP_NAME: &str = "kwyd";
pub const CONFIG_NAME: &str = "settings";

/// Extension trait for LootSettings persistence
pub trait LootSettingsExt: Sized {
    /// Load from the config directory, falling back to defaults on any error.
    fn load() -> Self;
    /// Load from the config directory, reporting errors.
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    /// Load from a TOML file. A missing file yields defaults.
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
}

impl LootSettingsExt for LootSettings {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Failed to load settings, using defaults");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        let settings: LootSettings = confy::load(APP_NAME, CONFIG_NAME)?;
        Ok(settings.sanitized())
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self.sanitized()).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: LootSettings =
            toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(settings.sanitized())
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.sanitized())?;
        std::fs::write(path, content).map_err(|source| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }
}
