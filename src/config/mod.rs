//! # Platform Configuration
//!
//! Loaded from a TOML file. Every field has a default, and a missing file
//! means "all defaults".
//!
//! ```toml
//! packages_dir = "packages/workdo"
//! always_active = ["Base"]
//! auto_enable = ["Hrm", "Account"]
//! channel_buffer = 64
//! default_plan = "Free"
//! currency = "USD"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Root scanned for `<vendor>/<package>/module.json`.
    pub packages_dir: PathBuf,
    /// Modules every user has, whether or not they are AddOns.
    pub always_active: Vec<String>,
    /// Modules enabled when first registered.
    pub auto_enable: Vec<String>,
    /// Capacity of each actor's request channel.
    pub channel_buffer: usize,
    /// Plan assigned to newly registered companies.
    pub default_plan: String,
    pub currency: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            packages_dir: PathBuf::from("packages"),
            always_active: vec!["Base".to_string()],
            auto_enable: Vec::new(),
            channel_buffer: 32,
            default_plan: "Free".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl PlatformConfig {
    /// Loads and validates `path`. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                field: "channel_buffer".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "currency".to_string(),
                message: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
