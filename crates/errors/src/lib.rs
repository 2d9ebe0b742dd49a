#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for mirrorcheck
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone so recorded errors can be snapshotted
//! out of a validation context.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub mod checksum;
pub mod compare;
pub mod config;
pub mod network;
pub mod storage;

// Re-export all error types at the root
pub use checksum::ChecksumError;
pub use compare::CompareError;
pub use config::ConfigError;
pub use network::NetworkError;
pub use storage::StorageError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),

    #[error("{0}")]
    Compare(#[from] CompareError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        #[cfg_attr(feature = "serde", serde(with = "io_kind_as_str"))]
        kind: std::io::ErrorKind,
        message: String,
        #[cfg_attr(feature = "serde", serde(with = "opt_path_buf"))]
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// Classification used by validation reports and ignore filters
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::TransportFailure,
            Error::Checksum(ChecksumError::Unavailable { .. }) => ErrorKind::ChecksumUnavailable,
            Error::Checksum(_) | Error::Storage(_) | Error::Io { .. } => ErrorKind::Io,
            Error::Compare(err) => match err {
                CompareError::MirrorRemoved { .. } => ErrorKind::MirrorRemoved,
                CompareError::ArtifactNotFound { .. } => ErrorKind::ArtifactNotFound,
                CompareError::UnexpectedStatus { .. } => ErrorKind::UnexpectedMirrorStatus,
                CompareError::Collision { .. } => ErrorKind::Collision,
                CompareError::DriverTimeout { .. } => ErrorKind::DriverTimeout,
            },
            Error::Config(_) => ErrorKind::Config,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for mirrorcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a recorded error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ErrorKind {
    MirrorRemoved,
    ChecksumUnavailable,
    ArtifactNotFound,
    UnexpectedMirrorStatus,
    TransportFailure,
    Collision,
    DriverTimeout,
    Config,
    Io,
    Internal,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::MirrorRemoved,
        ErrorKind::ChecksumUnavailable,
        ErrorKind::ArtifactNotFound,
        ErrorKind::UnexpectedMirrorStatus,
        ErrorKind::TransportFailure,
        ErrorKind::Collision,
        ErrorKind::DriverTimeout,
        ErrorKind::Config,
        ErrorKind::Io,
        ErrorKind::Internal,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MirrorRemoved => "mirror-removed",
            ErrorKind::ChecksumUnavailable => "checksum-unavailable",
            ErrorKind::ArtifactNotFound => "artifact-not-found",
            ErrorKind::UnexpectedMirrorStatus => "unexpected-mirror-status",
            ErrorKind::TransportFailure => "transport-failure",
            ErrorKind::Collision => "collision",
            ErrorKind::DriverTimeout => "driver-timeout",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "kind".to_string(),
                value: s.to_string(),
            })
    }
}

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Network(err) => err.user_message(),
            Error::Checksum(err) => err.user_message(),
            Error::Compare(err) => err.user_message(),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_hint(),
            Error::Checksum(err) => err.user_hint(),
            Error::Compare(err) => err.user_hint(),
            Error::Storage(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            Error::Compare(err) => err.is_retryable(),
            Error::Storage(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_code(),
            Error::Checksum(err) => err.user_code(),
            Error::Compare(err) => err.user_code(),
            Error::Storage(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
            Error::Io { .. } => Some("error.io"),
        }
    }
}

// Serde helper modules for optional path and io::ErrorKind as string
#[cfg(feature = "serde")]
mod io_kind_as_str {
    use serde::{Deserialize, Deserializer, Serializer};
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(kind: &std::io::ErrorKind, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format!("{kind:?}"))
    }
    pub fn deserialize<'de, D>(deserializer: D) -> Result<std::io::ErrorKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // Best effort mapping; default to Other
        Ok(match s.as_str() {
            "NotFound" => std::io::ErrorKind::NotFound,
            "PermissionDenied" => std::io::ErrorKind::PermissionDenied,
            "ConnectionRefused" => std::io::ErrorKind::ConnectionRefused,
            "ConnectionReset" => std::io::ErrorKind::ConnectionReset,
            "AlreadyExists" => std::io::ErrorKind::AlreadyExists,
            "InvalidInput" => std::io::ErrorKind::InvalidInput,
            "InvalidData" => std::io::ErrorKind::InvalidData,
            "TimedOut" => std::io::ErrorKind::TimedOut,
            "UnexpectedEof" => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::Other,
        })
    }
}

#[cfg(feature = "serde")]
mod opt_path_buf {
    use serde::{Deserialize, Deserializer, Serializer};
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(path: &Option<std::path::PathBuf>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match path {
            Some(pb) => s.serialize_some(&pb.display().to_string()),
            None => s.serialize_none(),
        }
    }
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<std::path::PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;
        Ok(opt.map(std::path::PathBuf::from))
    }
}
