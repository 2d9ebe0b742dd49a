//! Fingerprint extraction error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ChecksumError {
    #[error("remote repository returned unknown headers, unable to parse artifact hash for {uri}")]
    Unavailable { uri: String },

    #[error("failed to compute {algorithm} digest of {path}: {message}")]
    LocalDigestFailed {
        path: String,
        algorithm: String,
        message: String,
    },
}

impl UserFacingError for ChecksumError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable { .. } => {
                Some("The mirror may be served by a different repository manager; check the configured provider.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Unavailable { .. } => "checksum.unavailable",
            Self::LocalDigestFailed { .. } => "checksum.local_digest_failed",
        };
        Some(code)
    }
}
