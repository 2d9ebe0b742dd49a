//! Remote mirror endpoints

use mirrorcheck_errors::{Error, NetworkError};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A remote repository expected to mirror the origin
///
/// The base URL always ends with `/` so relative artifact paths can be
/// joined onto it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteMirror {
    url: Url,
}

impl RemoteMirror {
    /// Parse and normalise a mirror base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or is not http(s).
    pub fn parse(base: &str) -> Result<Self, Error> {
        let mut normalised = base.trim().to_string();
        if !normalised.ends_with('/') {
            normalised.push('/');
        }
        let url = Url::parse(&normalised)
            .map_err(|e| NetworkError::InvalidUrl(format!("{base}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetworkError::InvalidUrl(format!("{base}: unsupported scheme")).into());
        }
        Ok(Self { url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Host name used to shard the remote fingerprint cache
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("unknown")
    }

    /// URL of `relative_path` on this mirror
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn artifact_url(&self, relative_path: &str) -> Result<Url, Error> {
        self.url
            .join(relative_path.trim_start_matches('/'))
            .map_err(|e| NetworkError::InvalidUrl(format!("{}{relative_path}: {e}", self.url)).into())
    }

    /// Path of `url` relative to this mirror, if it lives underneath it
    #[must_use]
    pub fn relativize(&self, url: &Url) -> Option<String> {
        url.as_str()
            .strip_prefix(self.url.as_str())
            .map(ToString::to_string)
    }
}

impl fmt::Display for RemoteMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_appends_trailing_slash() {
        let mirror = RemoteMirror::parse("https://repo.example/maven2").unwrap();
        assert_eq!(mirror.as_str(), "https://repo.example/maven2/");
        assert_eq!(mirror.host(), "repo.example");
    }

    #[test]
    fn test_identity_is_the_normalised_url() {
        let bare = RemoteMirror::parse("https://repo.example/maven2").unwrap();
        let slashed = RemoteMirror::parse(" https://repo.example/maven2/ ").unwrap();
        assert_eq!(bare, slashed);

        let set: std::collections::HashSet<_> = [bare, slashed].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_artifact_url_joins_relative_path() {
        let mirror = RemoteMirror::parse("https://repo.example/maven2/").unwrap();
        let url = mirror.artifact_url("org/a/1.0/a-1.0.jar").unwrap();
        assert_eq!(url.as_str(), "https://repo.example/maven2/org/a/1.0/a-1.0.jar");
    }

    #[test]
    fn test_relativize_strips_base() {
        let mirror = RemoteMirror::parse("https://repo.example/ga/").unwrap();
        let url = Url::parse("https://repo.example/ga/org/a/a.jar").unwrap();
        assert_eq!(mirror.relativize(&url).as_deref(), Some("org/a/a.jar"));

        let other = Url::parse("https://other.example/ga/org/a/a.jar").unwrap();
        assert_eq!(mirror.relativize(&other), None);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(RemoteMirror::parse("ftp://repo.example/").is_err());
    }
}
