use serde::{Deserialize, Serialize};

/// Fingerprint cache events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CacheEvent {
    /// Entries were preloaded from disk
    Loaded { source: String, entries: usize },
}
