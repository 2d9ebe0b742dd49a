use serde::{Deserialize, Serialize};

use mirrorcheck_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureContext {
    /// Stable error code, e.g. `compare.collision`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod cache;
pub mod discovery;
pub mod general;
pub mod mirror;
pub mod validation;

pub use cache::*;
pub use discovery::*;
pub use general::*;
pub use mirror::*;
pub use validation::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Warnings and configuration notices
    General(GeneralEvent),

    /// Mirror liveness probing
    Mirror(MirrorEvent),

    /// Artifact comparison against mirrors
    Validation(ValidationEvent),

    /// Origin directory-listing crawl
    Discovery(DiscoveryEvent),

    /// Persistent fingerprint caches
    Cache(CacheEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Validation(ValidationEvent::TimedOut { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Mirror(MirrorEvent::Removed { .. })
            | Self::Validation(ValidationEvent::ArtifactFailed { .. })
            | Self::Discovery(DiscoveryEvent::ListingFailed { .. }) => Level::WARN,

            Self::Mirror(MirrorEvent::Live { .. })
            | Self::Validation(ValidationEvent::ArtifactIgnored { .. })
            | Self::Discovery(DiscoveryEvent::ListingFetched { .. }) => Level::DEBUG,

            Self::Validation(ValidationEvent::ArtifactChecked { .. })
            | Self::Discovery(DiscoveryEvent::ArtifactFound { .. }) => Level::TRACE,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "mirrorcheck::events::general",
            Self::Mirror(_) => "mirrorcheck::events::mirror",
            Self::Validation(_) => "mirrorcheck::events::validation",
            Self::Discovery(_) => "mirrorcheck::events::discovery",
            Self::Cache(_) => "mirrorcheck::events::cache",
        }
    }
}
