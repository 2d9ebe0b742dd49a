#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Online repository discovery
//!
//! Flattens a repository that is only reachable over HTTP into a manifest
//! of leaf artifact URLs by crawling its directory-listing pages. Listings
//! are expected to be HTML tables whose cells link to entries; a target
//! ending in `/` is a directory, anything else is a leaf.
//!
//! Leaves are appended to the manifest as soon as they are found, so a
//! partial manifest survives an interrupted crawl. Hierarchies are assumed
//! to be acyclic: without a depth bound, a listing that links back into
//! itself is crawled forever.

mod listing;

pub use listing::{parse_listing, Listing};

use mirrorcheck_errors::{Error, NetworkError, StorageError};
use mirrorcheck_events::{AppEvent, DiscoveryEvent, EventEmitter, EventSender};
use mirrorcheck_net::NetClient;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "repository-entities.txt";

/// Outcome of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscoveryReport {
    /// Leaves appended to the manifest
    pub artifacts: usize,
    /// Listing pages fetched
    pub listings: usize,
    /// Listing pages that could not be fetched
    pub failed_listings: usize,
}

/// Directory-listing crawler
pub struct OnlineRepositoryDiscovery {
    client: NetClient,
    root: Url,
    manifest: PathBuf,
    max_depth: Option<usize>,
    tx: Option<EventSender>,
}

impl EventEmitter for OnlineRepositoryDiscovery {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl OnlineRepositoryDiscovery {
    /// Crawl `root` into `manifest`
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a valid URL.
    pub fn new(client: NetClient, root: &str, manifest: impl Into<PathBuf>) -> Result<Self, Error> {
        let mut root = root.trim().to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        let root = Url::parse(&root).map_err(|e| NetworkError::InvalidUrl(format!("{root}: {e}")))?;

        Ok(Self {
            client,
            root,
            manifest: manifest.into(),
            max_depth: None,
            tx: None,
        })
    }

    /// Skip directories nested deeper than `max_depth` below the root
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Crawl the hierarchy depth-first, appending every leaf to the manifest
    ///
    /// A sub-listing that cannot be fetched is skipped with an event; the
    /// rest of the hierarchy is still crawled.
    ///
    /// # Errors
    ///
    /// Returns an error if the root listing cannot be fetched or the
    /// manifest cannot be written.
    pub async fn discover(&self) -> Result<DiscoveryReport, Error> {
        let started = Instant::now();
        self.emit(AppEvent::Discovery(DiscoveryEvent::Started {
            origin: self.root.to_string(),
            manifest: self.manifest.display().to_string(),
        }));

        let mut manifest = self.open_manifest().await?;
        let mut report = DiscoveryReport::default();
        let mut stack = vec![(self.root.clone(), 0_usize)];

        while let Some((page, depth)) = stack.pop() {
            let body = match self.client.body_as_string(page.as_str()).await {
                Ok(body) => body,
                Err(e) if page == self.root => return Err(e),
                Err(e) => {
                    report.failed_listings += 1;
                    self.emit(AppEvent::Discovery(DiscoveryEvent::ListingFailed {
                        url: page.to_string(),
                        error: e.to_string(),
                    }));
                    continue;
                }
            };
            report.listings += 1;

            let listing = parse_listing(&page, &body);
            self.emit(AppEvent::Discovery(DiscoveryEvent::ListingFetched {
                url: page.to_string(),
                directories: listing.directories.len(),
                files: listing.files.len(),
            }));

            for file in listing.files {
                self.append(&mut manifest, &file).await?;
                report.artifacts += 1;
                self.emit(AppEvent::Discovery(DiscoveryEvent::ArtifactFound {
                    url: file.to_string(),
                }));
            }

            let child_depth = depth + 1;
            if self.max_depth.is_some_and(|max| child_depth > max) {
                if !listing.directories.is_empty() {
                    self.emit_warning_with_context(
                        format!("skipping {} directories below depth limit", listing.directories.len()),
                        page.to_string(),
                    );
                }
                continue;
            }

            // reversed so the first directory of a listing is crawled first
            for directory in listing.directories.into_iter().rev() {
                stack.push((directory, child_depth));
            }
        }

        self.emit(AppEvent::Discovery(DiscoveryEvent::Completed {
            artifacts: report.artifacts,
            listings: report.listings,
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }));

        Ok(report)
    }

    async fn open_manifest(&self) -> Result<tokio::fs::File, Error> {
        if let Some(parent) = self.manifest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io_with_path(&e, parent))?;
        }

        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.manifest)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.manifest).into())
    }

    async fn append(&self, manifest: &mut tokio::fs::File, leaf: &Url) -> Result<(), Error> {
        let io_error = |e: std::io::Error| -> Error { StorageError::from_io_with_path(&e, &self.manifest).into() };

        manifest
            .write_all(format!("{leaf}\n").as_bytes())
            .await
            .map_err(io_error)?;
        manifest.flush().await.map_err(io_error)
    }
}
