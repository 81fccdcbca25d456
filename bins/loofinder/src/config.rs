//! Configuration for the loofinder CLI
//!
//! Loaded from TOML. Every field has a default, so an empty or missing file
//! is a valid configuration.

use anyhow::{bail, Context, Result};
use loofinder_geo::GeoPoint;
use loofinder_places::FALLBACK_LOCATION;
use loofinder_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Map clustering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Radius in kilometers within which markers merge
    pub radius_km: f64,
    /// Number of clustering results kept for reuse
    pub cache_capacity: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius_km: 0.5,
            cache_capacity: 32,
        }
    }
}

/// Where to search from when no location is given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub default_latitude: f64,
    pub default_longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_latitude: FALLBACK_LOCATION.latitude,
            default_longitude: FALLBACK_LOCATION.longitude,
        }
    }
}

impl LocationConfig {
    /// The fallback origin as a point
    pub fn default_point(&self) -> GeoPoint {
        GeoPoint::new(self.default_latitude, self.default_longitude)
    }
}

/// Nearby search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search radius in kilometers
    pub radius_km: f64,
    /// Maximum results listed
    pub limit: usize,
    /// Minimum rating applied unless overridden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_km: 5.0,
            limit: 20,
            min_rating: None,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "loofinder_geo=debug"
    pub level: String,
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            show_target: false,
        }
    }
}

impl LoggingConfig {
    pub fn telemetry(&self, verbose: bool) -> TelemetryConfig {
        TelemetryConfig {
            log_level: if verbose { "debug".to_string() } else { self.level.clone() },
            show_target: self.show_target,
            ..TelemetryConfig::default()
        }
    }
}

impl Config {
    /// Load from `path`, or the first file found in the standard locations,
    /// or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let config = match &config_path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };

        config.validate()?;
        Ok((config, config_path))
    }

    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject values that would make clustering or search meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.cluster.radius_km.is_finite() {
            bail!("cluster.radius_km must be a finite number");
        }
        if self.cluster.cache_capacity == 0 {
            bail!("cluster.cache_capacity must be at least 1");
        }
        if !self.location.default_point().is_valid() {
            bail!(
                "location default ({}, {}) is not a valid coordinate",
                self.location.default_latitude,
                self.location.default_longitude
            );
        }
        if !(self.search.radius_km.is_finite() && self.search.radius_km >= 0.0) {
            bail!("search.radius_km must be a non-negative number");
        }
        if self.search.limit == 0 {
            bail!("search.limit must be at least 1");
        }
        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = ["loofinder.toml", ".loofinder.toml"].into_iter().map(PathBuf::from);
    let user = dirs::config_dir().map(|dir| dir.join("loofinder").join("config.toml"));

    local.chain(user).find(|candidate| candidate.is_file())
}
