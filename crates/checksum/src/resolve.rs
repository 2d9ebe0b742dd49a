//! Remote fingerprint resolution

use crate::ChecksumProvider;
use mirrorcheck_cache::FingerprintCache;
use mirrorcheck_errors::{CompareError, Error};
use mirrorcheck_net::{status_line, NetClient};
use mirrorcheck_types::RemoteMirror;
use tracing::{debug, trace, warn};

/// Resolve the fingerprint of `relative_path` on `mirror`
///
/// A fingerprint already present in `cache` for the exact URL is returned
/// without touching the network. Otherwise a HEAD request is issued:
/// `200` yields the advertised fingerprint (recorded in `cache`), `404`
/// fails with `ArtifactNotFound` and any other status fails with
/// `UnexpectedStatus` carrying the raw status line.
///
/// # Errors
///
/// Returns an error for a non-200 answer, a transport failure, or a
/// response without a parseable fingerprint header.
pub async fn resolve(
    provider: ChecksumProvider,
    client: &NetClient,
    mirror: &RemoteMirror,
    relative_path: &str,
    cache: Option<&FingerprintCache>,
) -> Result<String, Error> {
    let url = mirror.artifact_url(relative_path)?;
    let uri = url.as_str();

    if let Some(fingerprint) = cache.and_then(|cache| cache.get(uri)) {
        trace!(%uri, "fingerprint cache hit");
        return Ok(fingerprint);
    }

    let response = client.head(uri).await?;

    match response.status().as_u16() {
        200 => {
            let fingerprint = provider.remote_fingerprint(uri, response.headers())?;
            debug!(%uri, %fingerprint, provider = %provider.kind(), "remote fingerprint resolved");

            if let Some(cache) = cache {
                if let Err(e) = cache.insert(uri, &fingerprint).await {
                    warn!(%uri, error = %e, "failed to persist fingerprint");
                }
            }
            Ok(fingerprint)
        }
        404 => Err(CompareError::ArtifactNotFound {
            mirror: mirror.to_string(),
            uri: uri.to_string(),
        }
        .into()),
        _ => Err(CompareError::UnexpectedStatus {
            mirror: mirror.to_string(),
            uri: uri.to_string(),
            status_line: status_line(&response),
        }
        .into()),
    }
}
