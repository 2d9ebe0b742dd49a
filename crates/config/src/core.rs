//! Configuration sections

use mirrorcheck_errors::ErrorKind;
use mirrorcheck_types::{ChecksumProviderKind, PolicyKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to validate and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Base URL the repository is published under
    pub origin: Option<String>,
    /// Directory or manifest file holding the artifacts
    pub repository: Option<PathBuf>,
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default)]
    pub provider: ChecksumProviderKind,
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,
    #[serde(default = "default_validation_timeout")]
    pub timeout_secs: u64,
    /// Only files whose repository-relative path matches are validated
    pub include_pattern: Option<String>,
    /// Files whose repository-relative path matches are skipped
    pub exclude_pattern: Option<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            origin: None,
            repository: None,
            policy: PolicyKind::default(),
            provider: ChecksumProviderKind::default(),
            max_concurrent_tasks: default_max_concurrent_tasks(),
            timeout_secs: default_validation_timeout(),
            include_pattern: None,
            exclude_pattern: None,
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Minimum spacing between consecutive requests
    #[serde(default = "default_min_request_distance")]
    pub min_request_distance_ms: u64,
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            min_request_distance_ms: default_min_request_distance(),
            max_idle_connections: default_max_idle_connections(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Fingerprint cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            dir: None,
        }
    }
}

/// Online repository discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Unbounded when absent
    pub max_depth: Option<usize>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            max_depth: None,
        }
    }
}

/// One `[[ignore]]` rule; matches when every present field matches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    pub kind: Option<ErrorKind>,
    pub artifact_pattern: Option<String>,
}

// Default value functions for serde
fn default_max_concurrent_tasks() -> usize {
    1000
}

fn default_validation_timeout() -> u64 {
    3600 // 1 hour
}

fn default_min_request_distance() -> u64 {
    10
}

fn default_max_idle_connections() -> usize {
    75_000
}

fn default_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("mirrorcheck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cache_enabled() -> bool {
    true
}

fn default_manifest() -> PathBuf {
    PathBuf::from("repository-entities.txt")
}
