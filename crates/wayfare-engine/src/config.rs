//! # Engine Configuration
//!
//! Configuration for the backend client and geocoding waits.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WAYFARE_BACKEND_URL=http://localhost:8000                          │
//! │     WAYFARE_REQUEST_TIMEOUT_SECS=15                                    │
//! │     WAYFARE_GEOCODE_TIMEOUT_SECS=5                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/wayfare/engine.toml (Linux)                              │
//! │     ~/Library/Application Support/com.wayfare.app/engine.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     backend on localhost:8000, 15s request wait, 5s geocode wait       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! [backend]
//! base_url = "http://localhost:8000"
//! request_timeout_secs = 15
//!
//! [geocode]
//! lookup_timeout_secs = 5
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{EngineError, EngineResult};

/// Config file name under the platform config directory.
const CONFIG_FILE_NAME: &str = "engine.toml";

// =============================================================================
// Settings Sections
// =============================================================================

/// Route backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL the `/get_route` and `/predict` operations join onto.
    pub base_url: String,

    /// Bounded wait for one route request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// Geocoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeSettings {
    /// Bounded wait for one reverse lookup, in seconds.
    pub lookup_timeout_secs: u64,
}

impl Default for GeocodeSettings {
    fn default() -> Self {
        GeocodeSettings {
            lookup_timeout_secs: 5,
        }
    }
}

// =============================================================================
// Engine Config
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Route backend settings.
    pub backend: BackendSettings,

    /// Geocoding settings.
    pub geocode: GeocodeSettings,
}

impl EngineConfig {
    /// Loads configuration: defaults, then the config file (if present),
    /// then environment overrides. The result is validated.
    pub fn load() -> EngineResult<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => {
                debug!("no config file, using defaults");
                EngineConfig::default()
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;

        info!(backend_url = %config.backend.base_url, "engine configuration loaded");
        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigLoadFailed(format!("{}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| EngineError::ConfigLoadFailed(format!("{}: {e}", path.display())))
    }

    /// The platform config file location, when one can be determined.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "wayfare", "wayfare")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn apply_env_overrides(&mut self) -> EngineResult<()> {
        if let Ok(value) = std::env::var("WAYFARE_BACKEND_URL") {
            self.backend.base_url = value;
        }
        if let Ok(value) = std::env::var("WAYFARE_REQUEST_TIMEOUT_SECS") {
            self.backend.request_timeout_secs = value.parse().map_err(|_| {
                EngineError::InvalidConfig("WAYFARE_REQUEST_TIMEOUT_SECS must be an integer".into())
            })?;
        }
        if let Ok(value) = std::env::var("WAYFARE_GEOCODE_TIMEOUT_SECS") {
            self.geocode.lookup_timeout_secs = value.parse().map_err(|_| {
                EngineError::InvalidConfig("WAYFARE_GEOCODE_TIMEOUT_SECS must be an integer".into())
            })?;
        }
        Ok(())
    }

    /// Validates the configuration before anything is built from it.
    pub fn validate(&self) -> EngineResult<()> {
        let url: Url = self
            .backend
            .base_url
            .parse()
            .map_err(|e| EngineError::InvalidUrl(format!("{}: {e}", self.backend.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EngineError::InvalidUrl(format!(
                "{}: expected http or https",
                self.backend.base_url
            )));
        }

        if self.backend.request_timeout_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.geocode.lookup_timeout_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "lookup_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Bounded wait for one route request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    /// Bounded wait for one reverse lookup.
    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode.lookup_timeout_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.geocode_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://10.0.0.5:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.backend.request_timeout_secs, 15);
        assert_eq!(config.geocode.lookup_timeout_secs, 5);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.backend.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.backend.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.geocode.lookup_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
