use serde::{Deserialize, Serialize};

use super::FailureContext;
use mirrorcheck_errors::ErrorKind;

/// Artifact comparison events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValidationEvent {
    /// Comparison run started
    Started {
        origin: String,
        policy: String,
        artifacts: usize,
        mirrors: usize,
    },

    /// One artifact compared cleanly against one mirror
    ArtifactChecked { artifact: String, mirror: String },

    /// A failure was recorded for an artifact
    ArtifactFailed {
        artifact: String,
        mirror: String,
        kind: ErrorKind,
        failure: FailureContext,
    },

    /// A failure matched an ignore rule and was set aside
    ArtifactIgnored {
        artifact: String,
        kind: ErrorKind,
    },

    /// The run exceeded its deadline; outstanding tasks were abandoned
    TimedOut { timeout_secs: u64, outstanding: usize },

    /// Comparison run finished
    Completed {
        artifacts: usize,
        errors: usize,
        ignored: usize,
        warnings: usize,
        duration_ms: u64,
    },
}
