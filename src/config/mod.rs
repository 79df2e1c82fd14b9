//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::models::League;
use crate::storage::StorageConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Fixture API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the env var holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_season")]
    pub season: i32,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "https://v3.football.api-sports.io".to_string()
}

fn default_api_key_env() -> String {
    "API_FOOTBALL_KEY".to_string()
}

fn default_season() -> i32 {
    2025
}

fn default_timeout() -> u64 {
    10
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            season: default_season(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub fixtures: FixturesConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Leagues fixtures are imported for
    #[serde(default = "default_leagues")]
    pub leagues: Vec<League>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_leagues() -> Vec<League> {
    vec![
        League::new(253, "Major League Soccer", "MLS"),
        League::new(15, "FIFA Club World Cup", "CWC"),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            fixtures: FixturesConfig::default(),
            server: ServerConfig::default(),
            leagues: default_leagues(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(self.data_dir.clone())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixtures.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Fixtures timeout must be greater than 0".to_string(),
            ));
        }

        if Url::parse(&self.fixtures.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Fixtures base_url is not a valid URL: {}",
                self.fixtures.base_url
            )));
        }

        if self.fixtures.season <= 0 {
            return Err(ConfigError::ValidationError(
                "Season must be a positive year".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for league in &self.leagues {
            if league.id <= 0 {
                return Err(ConfigError::ValidationError(format!(
                    "League id must be positive: {}",
                    league.id
                )));
            }
            if !seen.insert(league.id) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate league id: {}",
                    league.id
                )));
            }
        }

        Ok(())
    }
}
