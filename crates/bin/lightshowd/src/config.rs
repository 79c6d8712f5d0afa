//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `lightshow.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use lightshow_domain::setup::LightingSetup;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Where the lighting setup lives.
    pub lighting: LightingConfig,
    /// Event bus settings.
    pub events: EventsConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Lighting setup location.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Path of the TOML file describing scenes, exhibitions, triggers and lights.
    pub setup_path: PathBuf,
}

/// In-process event bus configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity.
    pub capacity: usize,
}

impl Config {
    /// Load configuration from `lightshow.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("lightshow.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LIGHTSHOW_SETUP") {
            self.lighting.setup_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("LIGHTSHOW_EVENTS_CAPACITY") {
            if let Ok(capacity) = val.parse() {
                self.events.capacity = capacity;
            }
        }
        if let Ok(val) = std::env::var("LIGHTSHOW_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.events.capacity == 0 {
            return Err(ConfigError::Validation(
                "event bus capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Read and parse the lighting setup file.
    ///
    /// Unlike `lightshow.toml`, the setup file is mandatory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid setup.
    pub fn load_setup(&self) -> Result<LightingSetup, ConfigError> {
        let content = std::fs::read_to_string(&self.lighting.setup_path)?;
        parse_setup(&content)
    }
}

/// Parse a lighting setup from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML, missing required fields
/// or unknown keys.
pub fn parse_setup(content: &str) -> Result<LightingSetup, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lightshowd=info,lightshow_app=info".to_string(),
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            setup_path: PathBuf::from("lighting.toml"),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
