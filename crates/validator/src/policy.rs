//! Per-mirror comparison rules

use mirrorcheck_cache::FingerprintCache;
use mirrorcheck_checksum::{resolve, ChecksumProvider};
use mirrorcheck_errors::{CompareError, Error, ErrorKind};
use mirrorcheck_hash::fingerprints_match;
use mirrorcheck_net::NetClient;
use mirrorcheck_types::{Artifact, PolicyKind, RemoteMirror};

/// Comparison of one artifact against one mirror
///
/// Both policies share the transport handling and differ only in how an
/// artifact missing from the mirror is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Absence is expected; only differing content is an error
    Collision,
    /// The mirror must contain every artifact
    Compare,
}

impl Policy {
    /// Component name recorded with every error
    #[must_use]
    pub fn source(self) -> &'static str {
        match self {
            Self::Collision => "remote-repository-collision",
            Self::Compare => "remote-repository-compare",
        }
    }

    /// Compare `local_fingerprint` with the fingerprint `mirror` serves for `relative_path`
    ///
    /// # Errors
    ///
    /// Returns the failure to record: a collision, a missing artifact under
    /// [`Policy::Compare`], an unexpected status, a transport failure or an
    /// unavailable checksum.
    pub async fn check(
        self,
        target: &CheckTarget<'_>,
        mirror: &RemoteMirror,
        cache: Option<&FingerprintCache>,
    ) -> Result<(), Error> {
        match resolve(
            target.provider,
            target.client,
            mirror,
            target.relative_path,
            cache,
        )
        .await
        {
            Ok(remote) if fingerprints_match(&remote, target.local_fingerprint) => Ok(()),
            Ok(_) => Err(CompareError::Collision {
                mirror: mirror.to_string(),
                local: target.artifact.uri(),
                remote: mirror.artifact_url(target.relative_path)?.to_string(),
            }
            .into()),
            Err(e) if e.kind() == ErrorKind::ArtifactNotFound && self == Self::Collision => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl From<PolicyKind> for Policy {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Collision => Self::Collision,
            PolicyKind::Compare => Self::Compare,
        }
    }
}

/// Artifact-side inputs of a comparison, fixed for every mirror
#[derive(Clone, Copy)]
pub struct CheckTarget<'a> {
    pub provider: ChecksumProvider,
    pub client: &'a NetClient,
    pub artifact: &'a Artifact,
    pub relative_path: &'a str,
    pub local_fingerprint: &'a str,
}
