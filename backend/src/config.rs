//! Application configuration.
//!
//! Settings are read from a TOML file (`gtm.toml`) and then overridden by
//! environment variables:
//!
//! - `HOST`, `PORT`: server bind address (default `0.0.0.0:8080`)
//! - `GTM_SNAPSHOT_PATH`: JSON snapshot for the local repository
//! - `GTM_DEFAULT_PROXIMITY_KM`: proximity used when a request gives none
//! - `GTM_REPRESENTATIVE`: `first`, `centroid` or `largest`
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 9000
//!
//! [repository]
//! type = "local"
//! snapshot_path = "data/sites.json"
//!
//! [model]
//! default_proximity_km = 0.0
//! representative = "first"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::algorithms::{GuideCurveSettings, ProximityThreshold, RepresentativePolicy};

pub const CONFIG_FILE_NAME: &str = "gtm.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub repository: RepositorySettings,
    pub model: ModelSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum request body size in bytes
    pub body_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            body_limit: 32 * 1024 * 1024,
        }
    }
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: "local".to_string(),
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub default_proximity_km: ProximityThreshold,
    pub representative: RepresentativePolicy,
    pub guide_curves: GuideCurveSettings,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Searches for `gtm.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|p| p.exists())
    }

    /// Default file (if any) plus process environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_default_file() {
            Some(path) => {
                log::info!("Using configuration file {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// [`AppConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?;
        }
        if let Some(path) = lookup("GTM_SNAPSHOT_PATH") {
            self.repository.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(km) = lookup("GTM_DEFAULT_PROXIMITY_KM") {
            let value: f64 = km
                .parse()
                .with_context(|| {
                    format!("GTM_DEFAULT_PROXIMITY_KM must be a number, got '{}'", km)
                })?;
            self.model.default_proximity_km = ProximityThreshold::new(value)?;
        }
        if let Some(policy) = lookup("GTM_REPRESENTATIVE") {
            self.model.representative = policy.parse()?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
