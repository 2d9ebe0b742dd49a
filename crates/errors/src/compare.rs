//! Mirror comparison outcomes that are recorded as validation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum CompareError {
    #[error("remote repository [{mirror}] was removed: {reason}")]
    MirrorRemoved { mirror: String, reason: String },

    #[error("remote repository [{mirror}] doesn't contain artifact {uri}")]
    ArtifactNotFound { mirror: String, uri: String },

    #[error("remote repository [{mirror}] returned {status_line} for artifact {uri}")]
    UnexpectedStatus {
        mirror: String,
        uri: String,
        status_line: String,
    },

    #[error(
        "remote repository [{mirror}] contains artifact {remote} with different content than {local}"
    )]
    Collision {
        mirror: String,
        local: String,
        remote: String,
    },

    #[error("validation did not finish within {timeout_secs}s, {outstanding} tasks abandoned")]
    DriverTimeout { timeout_secs: u64, outstanding: usize },
}

impl UserFacingError for CompareError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Collision { .. } => {
                Some("Two repositories serve different bytes for the same path; one of them must be fixed.")
            }
            Self::DriverTimeout { .. } => {
                Some("Raise validation.timeout_secs or reduce the mirror list.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. } | Self::DriverTimeout { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MirrorRemoved { .. } => "compare.mirror_removed",
            Self::ArtifactNotFound { .. } => "compare.artifact_not_found",
            Self::UnexpectedStatus { .. } => "compare.unexpected_status",
            Self::Collision { .. } => "compare.collision",
            Self::DriverTimeout { .. } => "compare.driver_timeout",
        };
        Some(code)
    }
}
