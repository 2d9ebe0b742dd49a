#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Fingerprint caches for mirrorcheck
//!
//! A cache maps an artifact URI to the fingerprint resolved for it. Entries
//! live in a concurrent in-memory map and are mirrored to an append-only
//! log, one `<uri> <fingerprint>` line per entry. Caches are advisory: the
//! files may be deleted at any time and are reloaded wholesale at startup.

mod hosts;
mod writer;

pub use hosts::HostCaches;
pub use writer::{CacheWriter, FileCacheWriter, MemoryCacheWriter, NoopCacheWriter};

use dashmap::DashMap;
use mirrorcheck_errors::{Error, StorageError};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory fingerprint map backed by an append-only log
pub struct FingerprintCache {
    entries: DashMap<String, String>,
    writer: Arc<dyn CacheWriter>,
    write_lock: Mutex<()>,
}

impl FingerprintCache {
    /// Create an empty cache persisting through `writer`
    #[must_use]
    pub fn new(writer: Arc<dyn CacheWriter>) -> Self {
        Self {
            entries: DashMap::new(),
            writer,
            write_lock: Mutex::new(()),
        }
    }

    /// Create an empty cache that keeps entries for the run and persists nothing
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(NoopCacheWriter))
    }

    /// Load a cache from `path`, appending new entries to the same file
    ///
    /// A missing file yields an empty cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let cache = Self::new(Arc::new(FileCacheWriter::new(path)));

        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                for (uri, fingerprint) in parse_lines(&content) {
                    cache.entries.insert(uri.to_string(), fingerprint.to_string());
                }
                tracing::debug!(path = %path.display(), entries = cache.len(), "fingerprint cache loaded");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StorageError::from_io_with_path(&e, path).into()),
        }

        Ok(cache)
    }

    /// Fingerprint previously recorded for `uri`
    #[must_use]
    pub fn get(&self, uri: &str) -> Option<String> {
        self.entries.get(uri).map(|entry| entry.value().clone())
    }

    /// Record a fingerprint, appending it to the backing log
    ///
    /// Writes are serialized; the map entry becomes visible only after the
    /// append was attempted. The first fingerprint recorded for a URI wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the append fails. The in-memory entry is still
    /// recorded in that case.
    pub async fn insert(&self, uri: &str, fingerprint: &str) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;

        if self.entries.contains_key(uri) {
            return Ok(());
        }

        let appended = self.writer.append(uri, fingerprint).await;
        self.entries.insert(uri.to_string(), fingerprint.to_string());
        appended
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FingerprintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintCache")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Local and per-host remote caches owned by one validation run
#[derive(Debug)]
pub struct CacheSet {
    /// Fingerprints of origin artifacts
    pub local: FingerprintCache,
    /// Fingerprints of mirror artifacts, one cache per host
    pub remote: HostCaches,
}

impl CacheSet {
    /// File holding the local cache inside a cache directory
    pub const LOCAL_FILE: &'static str = "local.txt";
    /// Directory holding the per-host caches inside a cache directory
    pub const REMOTE_DIR: &'static str = "remote";

    /// Load both caches from `dir`, starting empty where no file exists
    ///
    /// # Errors
    ///
    /// Returns an error if an existing cache file cannot be read.
    pub async fn load(dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            local: FingerprintCache::load(&dir.join(Self::LOCAL_FILE)).await?,
            remote: HostCaches::load(&dir.join(Self::REMOTE_DIR)).await?,
        })
    }

    /// Caches that never touch the filesystem
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            local: FingerprintCache::in_memory(),
            remote: HostCaches::in_memory(),
        }
    }
}

/// Parse `<uri> <fingerprint>` lines, skipping blank and malformed ones
pub(crate) fn parse_lines(content: &str) -> impl Iterator<Item = (&str, &str)> {
    content.lines().filter_map(|line| {
        let (uri, fingerprint) = line.trim_end().split_once(' ')?;
        let fingerprint = fingerprint.trim();
        if uri.is_empty() || fingerprint.is_empty() {
            None
        } else {
            Some((uri, fingerprint))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        let content = "https://a/x.jar 0a1b\n\nmalformed\nhttps://a/y.pom  ff00 \n";
        let parsed: Vec<_> = parse_lines(content).collect();
        assert_eq!(
            parsed,
            vec![("https://a/x.jar", "0a1b"), ("https://a/y.pom", "ff00")]
        );
    }

    #[tokio::test]
    async fn test_first_fingerprint_wins() {
        let writer = Arc::new(MemoryCacheWriter::default());
        let cache = FingerprintCache::new(writer.clone());

        cache.insert("https://a/x.jar", "aaaa").await.unwrap();
        cache.insert("https://a/x.jar", "bbbb").await.unwrap();

        assert_eq!(cache.get("https://a/x.jar").as_deref(), Some("aaaa"));
        assert_eq!(writer.lines(), vec!["https://a/x.jar aaaa".to_string()]);
    }

    #[tokio::test]
    async fn test_in_memory_cache_serves_entries_without_a_log() {
        let caches = CacheSet::in_memory();
        caches.local.insert("https://a/x.jar", "aaaa").await.unwrap();
        caches
            .remote
            .for_host("a")
            .insert("https://a/x.jar", "bbbb")
            .await
            .unwrap();

        assert_eq!(caches.local.get("https://a/x.jar").as_deref(), Some("aaaa"));
        assert_eq!(caches.remote.entries(), 1);
    }
}
