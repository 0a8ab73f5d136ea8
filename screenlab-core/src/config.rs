//! Screener configuration — TOML file with compiled-in defaults.
//!
//! Every field has a default; a missing file means defaults, a present file
//! overrides only what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Timeframe;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Bound on each provider request.
    pub request_timeout_secs: u64,
    /// How long a fetched history stays reusable; 0 disables the cache.
    pub cache_ttl_secs: u64,
    /// Timeframe selected on startup.
    pub default_timeframe: Timeframe,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            cache_ttl_secs: 300,
            default_timeframe: Timeframe::OneYear,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ScreenerConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Defaults when the file is absent; parse errors still surface.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
