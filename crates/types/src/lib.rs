#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for mirrorcheck
//!
//! This crate provides the data model shared by the comparison engine:
//! artifacts, remote mirrors and the closed sets of checksum providers and
//! comparison policies.

pub mod artifact;
pub mod mirror;

pub use artifact::Artifact;
pub use mirror::RemoteMirror;
pub use url::Url;

use serde::{Deserialize, Serialize};

/// Repository manager product whose content-identity convention a mirror follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumProviderKind {
    /// `ETag: "{SHA1{<hex>}}"`
    Nexus,
    /// `X-Checksum-Sha1: <hex>`
    Artifactory,
    /// `ETag: "<md5>:<timestamp>"`
    Akamai,
    /// `ETag: "<mtime-hex>-<size-hex>"`
    Nginx,
}

impl std::fmt::Display for ChecksumProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nexus => write!(f, "nexus"),
            Self::Artifactory => write!(f, "artifactory"),
            Self::Akamai => write!(f, "akamai"),
            Self::Nginx => write!(f, "nginx"),
        }
    }
}

impl Default for ChecksumProviderKind {
    fn default() -> Self {
        Self::Nexus
    }
}

impl clap::ValueEnum for ChecksumProviderKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Nexus, Self::Artifactory, Self::Akamai, Self::Nginx]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Nexus => clap::builder::PossibleValue::new("nexus"),
            Self::Artifactory => clap::builder::PossibleValue::new("artifactory"),
            Self::Akamai => clap::builder::PossibleValue::new("akamai"),
            Self::Nginx => clap::builder::PossibleValue::new("nginx"),
        })
    }
}

/// How a missing artifact on a mirror is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Mirrors must not serve different bytes; absence is expected
    Collision,
    /// Mirrors must be a superset of the origin; absence is an error
    Compare,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collision => write!(f, "collision"),
            Self::Compare => write!(f, "compare"),
        }
    }
}

impl Default for PolicyKind {
    fn default() -> Self {
        Self::Collision
    }
}

impl clap::ValueEnum for PolicyKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Collision, Self::Compare]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Collision => clap::builder::PossibleValue::new("collision"),
            Self::Compare => clap::builder::PossibleValue::new("compare"),
        })
    }
}
