//! Configuration management.
//!
//! This module loads connection profiles and client settings from a TOML
//! file. The file is only ever read; passwords live in the OS keyring.

mod profile;
mod settings;

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use profile::Profile;
pub use settings::Settings;

/// The configuration file name.
const CONFIG_FILE: &str = "config.toml";

/// The application directory name under the platform config dir.
const APP_DIR: &str = "jira-rpc";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[source] io::Error),

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value in the configuration is invalid.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The requested profile does not exist.
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Client settings.
    pub settings: Settings,
    /// Connection profiles.
    pub profiles: Vec<Profile>,
}

impl Config {
    /// Get the path of the configuration file.
    ///
    /// - Linux: `~/.config/jira-rpc/config.toml`
    /// - macOS: `~/Library/Application Support/jira-rpc/config.toml`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\jira-rpc\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let base_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load the configuration from `path`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, cannot be parsed, or
    /// fails validation.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e)),
        };

        let config = Self::from_toml(&contents)?;
        info!(
            path = %path.display(),
            profiles = config.profiles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the settings, every profile and the default profile reference.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        if let Some(name) = &self.settings.default_profile {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "default profile '{}' is not defined",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Get the default profile, or the first one if none is set.
    pub fn default_profile(&self) -> Result<&Profile> {
        match &self.settings.default_profile {
            Some(name) => self.profile(name),
            None => self
                .profiles
                .first()
                .ok_or_else(|| ConfigError::ProfileNotFound("default".to_string())),
        }
    }
}
