//! Deployment Configuration
//!
//! Handles loading and saving the deployment configuration from TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shade_node::DeploymentConfig;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Full configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadeConfig {
    /// Network name (local, testnet)
    pub network: String,

    /// Addresses, verifier key and token metadata
    pub deployment: DeploymentConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ShadeConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Create configuration for a specific network
    pub fn for_network(network: &str) -> Result<Self, ConfigError> {
        match network {
            "local" => Ok(Self::local()),
            "testnet" => Ok(Self::testnet()),
            other => Err(ConfigError::Invalid(format!("Unknown network: {}", other))),
        }
    }

    /// Local development configuration with a well-known verifier key
    pub fn local() -> Self {
        Self {
            network: "local".to_string(),
            deployment: DeploymentConfig::local(),
            logging: LoggingSettings::default(),
        }
    }

    /// Testnet configuration with a fresh verifier key
    pub fn testnet() -> Self {
        Self {
            network: "testnet".to_string(),
            deployment: DeploymentConfig::generate("testnet"),
            logging: LoggingSettings {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        self.deployment
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,

    /// Output format (text, json)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Get default data directory
pub fn default_data_dir(network: &str) -> PathBuf {
    let base = directories::ProjectDirs::from("network", "shade", "shade")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".shade"));

    base.join(network)
}

/// Get default config file path
pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Get default state snapshot path
pub fn default_state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("state.bin")
}
