#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Content digests for local artifacts
//!
//! Repository managers advertise SHA-1 or MD5 identities for the files they
//! serve, so local artifacts are hashed with the same algorithm before being
//! compared. Digests are rendered as lowercase hex.

use md5::Md5;
use mirrorcheck_errors::{ChecksumError, Error};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Size of chunks for streaming hash computation
const CHUNK_SIZE: usize = 64 * 1024; // 64KB

/// Digest algorithm used to fingerprint local bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha1,
    Md5,
}

impl HashAlgorithm {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Md5 => "md5",
        }
    }

    /// Hex digest of an in-memory byte slice
    #[must_use]
    pub fn hash_data(self, data: &[u8]) -> String {
        match self {
            Self::Sha1 => hex::encode(Sha1::digest(data)),
            Self::Md5 => hex::encode(Md5::digest(data)),
        }
    }

    /// Hex digest of a file, streamed in fixed-size chunks
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read.
    pub async fn hash_file(self, path: &Path) -> Result<String, Error> {
        match self {
            Self::Sha1 => digest_file::<Sha1>(path, self).await,
            Self::Md5 => digest_file::<Md5>(path, self).await,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

async fn digest_file<D: Digest>(path: &Path, algorithm: HashAlgorithm) -> Result<String, Error> {
    let failed = |e: std::io::Error| ChecksumError::LocalDigestFailed {
        path: path.display().to_string(),
        algorithm: algorithm.name().to_string(),
        message: e.to_string(),
    };

    let mut file = File::open(path).await.map_err(failed)?;
    let mut hasher = D::new();
    let mut buffer = vec![0; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buffer).await.map_err(failed)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Case-insensitive fingerprint comparison
#[must_use]
pub fn fingerprints_match(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}
