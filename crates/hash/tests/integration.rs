//! Integration tests for hash crate

#[cfg(test)]
mod tests {
    use mirrorcheck_errors::{ChecksumError, Error};
    use mirrorcheck_hash::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_empty_file_digests() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.jar");
        tokio::fs::write(&file_path, b"").await.unwrap();

        assert_eq!(
            HashAlgorithm::Sha1.hash_file(&file_path).await.unwrap(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            HashAlgorithm::Md5.hash_file(&file_path).await.unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[tokio::test]
    async fn test_missing_file_reports_digest_failure() {
        let dir = tempdir().unwrap();
        let err = HashAlgorithm::Sha1
            .hash_file(&dir.path().join("missing.jar"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Checksum(ChecksumError::LocalDigestFailed { .. })
        ));
    }
}
