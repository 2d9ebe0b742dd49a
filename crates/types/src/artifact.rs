//! Artifact identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// A single repository file, addressed either on disk or over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Artifact {
    Local(PathBuf),
    Remote(Url),
}

impl Artifact {
    /// Interpret a manifest line: absolute http(s) URLs become remote
    /// artifacts, anything else is a filesystem path.
    #[must_use]
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        match Url::parse(entry) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::Local(PathBuf::from(entry)),
        }
    }

    /// Canonical string form used as a cache and report key
    #[must_use]
    pub fn uri(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.to_string(),
        }
    }

    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Final path segment, used for extension filtering
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Local(path) => path.file_name().and_then(|n| n.to_str()),
            Self::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty()),
        }
    }

    /// Lowercased file extension, if any
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
