//! Per-host remote fingerprint caches

use crate::FingerprintCache;
use dashmap::DashMap;
use mirrorcheck_errors::{Error, StorageError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CACHE_EXTENSION: &str = "txt";

/// One [`FingerprintCache`] per mirror host
///
/// With a directory, each host is persisted to `<dir>/<host>.txt`; without
/// one, every host cache is memory-only.
#[derive(Debug, Default)]
pub struct HostCaches {
    dir: Option<PathBuf>,
    hosts: DashMap<String, Arc<FingerprintCache>>,
}

impl HostCaches {
    /// Memory-only host caches
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load every `<host>.txt` file found in `dir`
    ///
    /// A missing directory yields an empty set; it is created on the first append.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its cache files cannot be read.
    pub async fn load(dir: &Path) -> Result<Self, Error> {
        let caches = Self {
            dir: Some(dir.to_path_buf()),
            hosts: DashMap::new(),
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(caches),
            Err(e) => return Err(StorageError::from_io_with_path(&e, dir).into()),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, dir))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CACHE_EXTENSION) {
                continue;
            }
            let Some(host) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let cache = FingerprintCache::load(&path).await?;
            caches.hosts.insert(host.to_string(), Arc::new(cache));
        }

        Ok(caches)
    }

    /// Cache for `host`, created empty on first use
    #[must_use]
    pub fn for_host(&self, host: &str) -> Arc<FingerprintCache> {
        let key = host_key(host);
        self.hosts
            .entry(key.clone())
            .or_insert_with(|| {
                Arc::new(match &self.dir {
                    Some(dir) => FingerprintCache::new(Arc::new(crate::FileCacheWriter::new(
                        dir.join(format!("{key}.{CACHE_EXTENSION}")),
                    ))),
                    None => FingerprintCache::in_memory(),
                })
            })
            .clone()
    }

    /// Number of hosts with a cache
    #[must_use]
    pub fn hosts(&self) -> usize {
        self.hosts.len()
    }

    /// Total entries across every host
    #[must_use]
    pub fn entries(&self) -> usize {
        self.hosts.iter().map(|cache| cache.len()).sum()
    }
}

/// File stem for a host; ports arrive as `host:port`
fn host_key(host: &str) -> String {
    host.replace(':', "_")
}
