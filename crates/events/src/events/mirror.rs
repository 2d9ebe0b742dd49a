use serde::{Deserialize, Serialize};

/// Mirror liveness probe events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MirrorEvent {
    /// Probing of the configured mirror list started
    ProbeStarted { mirrors: usize },

    /// Mirror answered the probe and stays in the working set
    Live { mirror: String, status: u16 },

    /// Mirror was dropped from the working set
    Removed { mirror: String, reason: String },

    /// Probing finished
    ProbeCompleted { live: usize, removed: usize },
}
