#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Content fingerprints for local files and remote mirrors
//!
//! Each repository manager exposes the identity of a served file in its
//! own way. A [`ChecksumProvider`] knows one such convention: how to read
//! the fingerprint out of a HEAD response and how to compute the matching
//! value for a file on disk.
//!
//! | Provider    | Remote source                     | Local value            |
//! |-------------|-----------------------------------|------------------------|
//! | Nexus       | `ETag: "{SHA1{<hex>}}"`           | SHA-1 of the bytes     |
//! | Artifactory | `X-Checksum-Sha1: <hex>`          | SHA-1 of the bytes     |
//! | Akamai      | `ETag: "<md5>:<timestamp>"`       | MD5 of the bytes       |
//! | Nginx       | `ETag: "<mtime-hex>-<size-hex>"`  | mtime and size of file |

mod headers;
mod resolve;

pub use resolve::resolve;

use mirrorcheck_errors::{ChecksumError, Error};
use mirrorcheck_hash::HashAlgorithm;
use mirrorcheck_types::ChecksumProviderKind;
use reqwest::header::HeaderMap;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Fingerprint convention of one repository manager product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumProvider {
    kind: ChecksumProviderKind,
}

impl ChecksumProvider {
    #[must_use]
    pub fn new(kind: ChecksumProviderKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn kind(self) -> ChecksumProviderKind {
        self.kind
    }

    /// Digest used for local bytes; `None` when the fingerprint is not content based
    #[must_use]
    pub fn algorithm(self) -> Option<HashAlgorithm> {
        match self.kind {
            ChecksumProviderKind::Nexus | ChecksumProviderKind::Artifactory => {
                Some(HashAlgorithm::Sha1)
            }
            ChecksumProviderKind::Akamai => Some(HashAlgorithm::Md5),
            ChecksumProviderKind::Nginx => None,
        }
    }

    /// Fingerprint of a file on disk, comparable with [`Self::remote_fingerprint`]
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or stat'ed.
    pub async fn local_fingerprint(self, path: &Path) -> Result<String, Error> {
        match self.algorithm() {
            Some(algorithm) => algorithm.hash_file(path).await,
            None => mtime_size_fingerprint(path).await,
        }
    }

    /// Fingerprint advertised in the headers of a successful HEAD response
    ///
    /// # Errors
    ///
    /// Returns `ChecksumError::Unavailable` if the expected header is
    /// missing or does not follow the provider's format.
    pub fn remote_fingerprint(self, uri: &str, headers: &HeaderMap) -> Result<String, Error> {
        let parsed = match self.kind {
            ChecksumProviderKind::Nexus => headers::nexus(headers),
            ChecksumProviderKind::Artifactory => headers::artifactory(headers),
            ChecksumProviderKind::Akamai => headers::akamai(headers),
            ChecksumProviderKind::Nginx => headers::nginx(headers),
        };

        parsed.map(str::to_string).ok_or_else(|| {
            ChecksumError::Unavailable {
                uri: uri.to_string(),
            }
            .into()
        })
    }
}

impl From<ChecksumProviderKind> for ChecksumProvider {
    fn from(kind: ChecksumProviderKind) -> Self {
        Self::new(kind)
    }
}

/// `<mtime-hex>-<size-hex>`, the same identity nginx puts in its ETag
async fn mtime_size_fingerprint(path: &Path) -> Result<String, Error> {
    let digest_failed = |message: String| ChecksumError::LocalDigestFailed {
        path: path.display().to_string(),
        algorithm: "mtime-size".to_string(),
        message,
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| digest_failed(e.to_string()))?;
    let modified = metadata
        .modified()
        .map_err(|e| digest_failed(e.to_string()))?
        .duration_since(UNIX_EPOCH)
        .map_err(|e| digest_failed(e.to_string()))?;

    Ok(format!("{:x}-{:x}", modified.as_secs(), metadata.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, ETAG};

    #[test]
    fn test_algorithm_per_provider() {
        assert_eq!(
            ChecksumProvider::new(ChecksumProviderKind::Nexus).algorithm(),
            Some(HashAlgorithm::Sha1)
        );
        assert_eq!(
            ChecksumProvider::new(ChecksumProviderKind::Akamai).algorithm(),
            Some(HashAlgorithm::Md5)
        );
        assert_eq!(
            ChecksumProvider::new(ChecksumProviderKind::Nginx).algorithm(),
            None
        );
    }

    #[test]
    fn test_missing_header_is_unavailable() {
        let provider = ChecksumProvider::new(ChecksumProviderKind::Artifactory);
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static("\"{SHA1{abc}}\""));

        let err = provider
            .remote_fingerprint("https://repo.example/a.jar", &headers)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Checksum(ChecksumError::Unavailable { .. })
        ));
        assert_eq!(err.kind(), mirrorcheck_errors::ErrorKind::ChecksumUnavailable);
    }
}
