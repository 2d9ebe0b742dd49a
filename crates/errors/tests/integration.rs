//! Integration tests for error types

#[cfg(test)]
mod tests {
    use mirrorcheck_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://example.com".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[test]
    fn test_compare_error_classification() {
        let not_found: Error = CompareError::ArtifactNotFound {
            mirror: "https://repo.example/".into(),
            uri: "https://repo.example/a/a.jar".into(),
        }
        .into();
        assert_eq!(not_found.kind(), ErrorKind::ArtifactNotFound);

        let collision: Error = CompareError::Collision {
            mirror: "https://repo.example/".into(),
            local: "/repo/a/a.jar".into(),
            remote: "https://repo.example/a/a.jar".into(),
        }
        .into();
        assert_eq!(collision.kind(), ErrorKind::Collision);
        assert!(collision.to_string().contains("/repo/a/a.jar"));
        assert!(collision.to_string().contains("https://repo.example/a/a.jar"));
    }

    #[test]
    fn test_checksum_unavailable_classification() {
        let err: Error = ChecksumError::Unavailable {
            uri: "https://repo.example/a.jar".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ChecksumUnavailable);
        assert_eq!(err.user_code(), Some("checksum.unavailable"));
    }

    #[test]
    fn test_error_kind_round_trips_through_str() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<ErrorKind>().unwrap(), kind);
        }
        assert!("no-such-kind".parse::<ErrorKind>().is_err());
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::PathNotFound {
            path: "/srv/repo".into(),
        };
        assert_eq!(err.to_string(), "path not found: /srv/repo");
    }

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let storage_err = StorageError::from_io_with_path(&io_err, std::path::Path::new("/x"));
        assert!(matches!(storage_err, StorageError::PermissionDenied { .. }));
    }
}
