//! Candidate artifact enumeration and origin-relative path mapping

use crate::filter::{has_artifact_extension, FileFilter, ARTIFACT_EXTENSIONS};
use mirrorcheck_errors::{ConfigError, Error, StorageError};
use mirrorcheck_types::{Artifact, RemoteMirror};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Where the artifacts under validation come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repository {
    /// Repository laid out on disk
    Directory(PathBuf),
    /// Flat file with one artifact path or URL per line
    Manifest(PathBuf),
}

impl Repository {
    /// Classify an existing path
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or cannot be stat'ed.
    pub async fn detect(path: &Path) -> Result<Self, Error> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, path))?;

        if metadata.is_dir() {
            Ok(Self::Directory(path.to_path_buf()))
        } else {
            Ok(Self::Manifest(path.to_path_buf()))
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Manifest(path) => path,
        }
    }

    /// Enumerate candidate artifacts
    ///
    /// Directory walks keep files with an allowed extension that `filter`
    /// accepts; entries that cannot be read are skipped with a warning.
    /// Manifest entries are filtered by extension only.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk task dies or the manifest cannot be read.
    pub async fn artifacts(&self, filter: Arc<dyn FileFilter>) -> Result<Vec<Artifact>, Error> {
        match self {
            Self::Directory(root) => {
                let root = root.clone();
                tokio::task::spawn_blocking(move || walk_directory(&root, filter.as_ref()))
                    .await
                    .map_err(|e| Error::internal(format!("directory walk panicked: {e}")))
            }
            Self::Manifest(path) => read_manifest(path).await,
        }
    }

    /// Path of `artifact` relative to the origin, used to address it on every mirror
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not live under the origin or
    /// the repository root.
    pub fn relative_path(&self, artifact: &Artifact, origin: &RemoteMirror) -> Result<String, Error> {
        let unmappable = || -> Error {
            ConfigError::InvalidValue {
                field: "artifact".to_string(),
                value: format!("{artifact} is not located under {}", self.base_for(artifact, origin)),
            }
            .into()
        };

        match artifact {
            Artifact::Remote(url) => origin.relativize(url).ok_or_else(unmappable),
            Artifact::Local(path) => {
                let relative = match self {
                    Self::Directory(root) => path.strip_prefix(root).ok(),
                    Self::Manifest(_) if path.is_relative() => Some(path.as_path()),
                    Self::Manifest(manifest) => manifest
                        .parent()
                        .and_then(|dir| path.strip_prefix(dir).ok()),
                };
                relative.and_then(slash_path).ok_or_else(unmappable)
            }
        }
    }

    /// File on disk holding a local artifact's bytes
    #[must_use]
    pub fn local_file(&self, artifact: &Artifact) -> Option<PathBuf> {
        let path = artifact.local_path()?;
        match self {
            Self::Manifest(manifest) if path.is_relative() => {
                Some(manifest.parent().unwrap_or(Path::new("")).join(path))
            }
            _ => Some(path.to_path_buf()),
        }
    }

    fn base_for(&self, artifact: &Artifact, origin: &RemoteMirror) -> String {
        if artifact.is_remote() {
            origin.to_string()
        } else {
            self.path().display().to_string()
        }
    }
}

fn walk_directory(root: &Path, filter: &dyn FileFilter) -> Vec<Artifact> {
    let mut artifacts = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    path = %e.path().unwrap_or(root).display(),
                    error = %e,
                    "skipping unreadable entry"
                );
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_artifact_extension(entry.path()) {
            continue;
        }

        let accepted = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(slash_path)
            .is_some_and(|relative| filter.accept(&relative));

        if accepted {
            artifacts.push(Artifact::Local(entry.into_path()));
        }
    }

    artifacts.sort();
    artifacts
}

async fn read_manifest(path: &Path) -> Result<Vec<Artifact>, Error> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::from_io_with_path(&e, path))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Artifact::parse)
        .filter(|artifact| {
            artifact
                .extension()
                .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext.as_str()))
        })
        .collect())
}

/// Join normal path components with `/`; `None` for paths that escape upwards
fn slash_path(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
