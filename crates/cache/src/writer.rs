//! Persistence sinks for fingerprint caches

use async_trait::async_trait;
use mirrorcheck_errors::{Error, StorageError};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

/// Destination for newly recorded cache entries
#[async_trait]
pub trait CacheWriter: Send + Sync {
    /// Append one `<uri> <fingerprint>` entry
    async fn append(&self, uri: &str, fingerprint: &str) -> Result<(), Error>;
}

/// Appends entries to a flat text file, creating it and its parent directory on demand
#[derive(Debug, Clone)]
pub struct FileCacheWriter {
    path: PathBuf,
}

impl FileCacheWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CacheWriter for FileCacheWriter {
    async fn append(&self, uri: &str, fingerprint: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io_with_path(&e, parent))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.path))?;

        file.write_all(format!("{uri} {fingerprint}\n").as_bytes())
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.path))?;
        file.flush()
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.path))?;

        Ok(())
    }
}

/// Discards every entry; used when persistence is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheWriter;

#[async_trait]
impl CacheWriter for NoopCacheWriter {
    async fn append(&self, _uri: &str, _fingerprint: &str) -> Result<(), Error> {
        Ok(())
    }
}

/// Keeps appended lines in memory so tests can observe what would be persisted
#[derive(Debug, Default)]
pub struct MemoryCacheWriter {
    lines: Mutex<Vec<String>>,
}

impl MemoryCacheWriter {
    /// Snapshot of every appended line, in append order
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CacheWriter for MemoryCacheWriter {
    async fn append(&self, uri: &str, fingerprint: &str) -> Result<(), Error> {
        self.lines
            .lock()
            .map_err(|_| Error::internal("memory cache writer poisoned"))?
            .push(format!("{uri} {fingerprint}"));
        Ok(())
    }
}
