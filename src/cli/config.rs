// Server Configuration Module
// Handles configuration from files and environment variables.

use crate::{ConfigurationError, TypingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub typing: TypingSection,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.typing_config()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if let Some(hour) = self.simulation.hour {
            if hour > 23 {
                return Err(ConfigError::Validation(format!(
                    "simulation.{}",
                    ConfigurationError::Hour(hour)
                )));
            }
        }
        if !self.simulation.time_scale.is_finite() || self.simulation.time_scale < 0.0 {
            return Err(ConfigError::Validation(format!(
                "simulation.time_scale must be a non-negative number, got {}",
                self.simulation.time_scale
            )));
        }
        Ok(())
    }

    /// Build the typing profile: a named profile, then explicit overrides
    pub fn typing_config(&self) -> Result<TypingConfig, ConfigurationError> {
        let mut config = match self.typing.profile {
            Some(ref name) => TypingConfig::from_name(name)?,
            None => TypingConfig::default(),
        };
        if let Some(wpm) = self.typing.words_per_minute {
            config.words_per_minute = wpm;
        }
        if let Some(variance) = self.typing.variance_fraction {
            config.variance_fraction = variance;
        }
        if let Some(accuracy) = self.typing.accuracy {
            config.accuracy = accuracy;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Server network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Typing profile configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TypingSection {
    /// Named profile (e.g., "average", "fast", "hunt-and-peck")
    pub profile: Option<String>,
    /// Custom words per minute
    pub words_per_minute: Option<f64>,
    /// Custom per-character jitter (0.15 = ±15%)
    pub variance_fraction: Option<f64>,
    /// Custom first-try accuracy (0.0-1.0)
    pub accuracy: Option<f64>,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for reproducible timing; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fixed hour of day for the speed multiplier; local clock when unset
    #[serde(default)]
    pub hour: Option<u32>,
    /// Multiplier on playback delays (1.0 = real time)
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

fn default_time_scale() -> f64 {
    1.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            hour: None,
            time_scale: default_time_scale(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(String),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}
