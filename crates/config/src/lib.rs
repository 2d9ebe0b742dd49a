#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for mirrorcheck
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/mirrorcheck/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

mod core;

pub use crate::core::{CacheConfig, DiscoveryConfig, IgnoreConfig, NetworkConfig, ValidationConfig};

use mirrorcheck_errors::{ConfigError, Error};
use mirrorcheck_types::{ChecksumProviderKind, PolicyKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Mirror base URLs; the built-in list is used when absent
    #[serde(default)]
    pub mirrors: Option<Vec<String>>,

    #[serde(default)]
    pub ignore: Vec<IgnoreConfig>,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("mirrorcheck").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading configuration");
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // MIRRORCHECK_ORIGIN
        if let Ok(origin) = std::env::var("MIRRORCHECK_ORIGIN") {
            self.validation.origin = Some(origin);
        }

        // MIRRORCHECK_REPOSITORY
        if let Ok(repository) = std::env::var("MIRRORCHECK_REPOSITORY") {
            self.validation.repository = Some(PathBuf::from(repository));
        }

        // MIRRORCHECK_POLICY
        if let Ok(policy) = std::env::var("MIRRORCHECK_POLICY") {
            self.validation.policy = match policy.as_str() {
                "collision" => PolicyKind::Collision,
                "compare" => PolicyKind::Compare,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "MIRRORCHECK_POLICY".to_string(),
                        value: policy,
                    }
                    .into())
                }
            };
        }

        // MIRRORCHECK_PROVIDER
        if let Ok(provider) = std::env::var("MIRRORCHECK_PROVIDER") {
            self.validation.provider = match provider.as_str() {
                "nexus" => ChecksumProviderKind::Nexus,
                "artifactory" => ChecksumProviderKind::Artifactory,
                "akamai" => ChecksumProviderKind::Akamai,
                "nginx" => ChecksumProviderKind::Nginx,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "MIRRORCHECK_PROVIDER".to_string(),
                        value: provider,
                    }
                    .into())
                }
            };
        }

        // MIRRORCHECK_MAX_CONCURRENT_TASKS
        if let Ok(tasks) = std::env::var("MIRRORCHECK_MAX_CONCURRENT_TASKS") {
            self.validation.max_concurrent_tasks =
                tasks.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "MIRRORCHECK_MAX_CONCURRENT_TASKS".to_string(),
                    value: tasks,
                })?;
        }

        // MIRRORCHECK_MIN_REQUEST_DISTANCE_MS
        if let Ok(distance) = std::env::var("MIRRORCHECK_MIN_REQUEST_DISTANCE_MS") {
            self.network.min_request_distance_ms =
                distance.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "MIRRORCHECK_MIN_REQUEST_DISTANCE_MS".to_string(),
                    value: distance,
                })?;
        }

        // MIRRORCHECK_CACHE_DIR
        if let Ok(dir) = std::env::var("MIRRORCHECK_CACHE_DIR") {
            self.cache.dir = Some(PathBuf::from(dir));
        }

        Ok(())
    }

    /// Check values serde cannot reject on its own
    ///
    /// # Errors
    ///
    /// Returns an error for a zero task cap or an `[[ignore]]` rule without criteria.
    pub fn validate(&self) -> Result<(), Error> {
        if self.validation.max_concurrent_tasks == 0 {
            return Err(ConfigError::InvalidValue {
                field: "validation.max_concurrent_tasks".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if let Some(index) = self
            .ignore
            .iter()
            .position(|rule| rule.kind.is_none() && rule.artifact_pattern.is_none())
        {
            return Err(ConfigError::Invalid {
                message: format!("ignore rule #{} has neither kind nor artifact_pattern", index + 1),
            }
            .into());
        }

        Ok(())
    }

    /// Get the cache directory (with default)
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|dir| dir.join("mirrorcheck"))
                .unwrap_or_else(|| PathBuf::from(".mirrorcheck-cache"))
        })
    }
}
