use serde::{Deserialize, Serialize};

/// Directory-listing crawl events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DiscoveryEvent {
    /// Crawl started at the origin root
    Started { origin: String, manifest: String },

    /// A listing page was fetched and parsed
    ListingFetched {
        url: String,
        directories: usize,
        files: usize,
    },

    /// A listing page could not be fetched; the subtree is skipped
    ListingFailed { url: String, error: String },

    /// A leaf artifact was appended to the manifest
    ArtifactFound { url: String },

    /// Crawl finished
    Completed {
        artifacts: usize,
        listings: usize,
        duration_ms: u64,
    },
}
