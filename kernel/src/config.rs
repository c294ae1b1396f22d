// Provider Configuration
//
// Tunables for both cache providers, loadable from JSON.
// Every field has a built-in default.

use serde::{Deserialize, Serialize};

/// Default time-to-live for remote cache entries.
pub const DEFAULT_TTL_SECONDS: u64 = 600;

/// Default chunk width in UTF-16 units, kept under the 50,000 unit cell ceiling.
pub const DEFAULT_CHUNK_SIZE: usize = 49_500;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for all providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub remote: RemoteConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Lifetime of every entry written by `apply`.
    pub ttl_seconds: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Maximum UTF-16 units per value cell.
    pub chunk_size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl CacheConfig {
    /// Built-in configuration (used if none is provided).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: CacheConfig =
            serde_json::from_str(data).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.chunk_size == 0 {
            return Err(ConfigError::Invalid("grid.chunk_size must be positive".into()));
        }
        if self.remote.ttl_seconds == 0 {
            return Err(ConfigError::Invalid("remote.ttl_seconds must be positive".into()));
        }
        Ok(())
    }
}
