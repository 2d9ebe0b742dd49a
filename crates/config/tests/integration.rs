//! Integration tests for config

#[cfg(test)]
mod tests {
    use mirrorcheck_config::*;
    use mirrorcheck_errors::{ConfigError, Error, ErrorKind};
    use mirrorcheck_types::{ChecksumProviderKind, PolicyKind};
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 7] = [
        "MIRRORCHECK_ORIGIN",
        "MIRRORCHECK_REPOSITORY",
        "MIRRORCHECK_POLICY",
        "MIRRORCHECK_PROVIDER",
        "MIRRORCHECK_MAX_CONCURRENT_TASKS",
        "MIRRORCHECK_MIN_REQUEST_DISTANCE_MS",
        "MIRRORCHECK_CACHE_DIR",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
mirrors = ["https://repo1.maven.org/maven2/", "https://maven.aliyun.com/repository/public/"]

[validation]
origin = "https://repo.example.com/releases/"
repository = "/srv/releases"
policy = "compare"
provider = "artifactory"
max_concurrent_tasks = 50
timeout_secs = 120
exclude_pattern = "^snapshots/"

[network]
min_request_distance_ms = 25

[cache]
enabled = false

[discovery]
manifest = "entities.txt"
max_depth = 4

[[ignore]]
kind = "artifact-not-found"

[[ignore]]
kind = "collision"
artifact_pattern = "\\.pom$"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(
            config.validation.origin.as_deref(),
            Some("https://repo.example.com/releases/")
        );
        assert_eq!(
            config.validation.repository,
            Some(PathBuf::from("/srv/releases"))
        );
        assert_eq!(config.validation.policy, PolicyKind::Compare);
        assert_eq!(config.validation.provider, ChecksumProviderKind::Artifactory);
        assert_eq!(config.validation.max_concurrent_tasks, 50);
        assert_eq!(config.validation.timeout_secs, 120);
        assert_eq!(config.validation.exclude_pattern.as_deref(), Some("^snapshots/"));
        assert_eq!(config.network.min_request_distance_ms, 25);
        assert_eq!(config.network.connect_timeout_secs, 30);
        assert!(!config.cache.enabled);
        assert_eq!(config.discovery.manifest, PathBuf::from("entities.txt"));
        assert_eq!(config.discovery.max_depth, Some(4));
        assert_eq!(config.mirrors.as_ref().map(Vec::len), Some(2));

        assert_eq!(config.ignore.len(), 2);
        assert_eq!(config.ignore[0].kind, Some(ErrorKind::ArtifactNotFound));
        assert_eq!(config.ignore[0].artifact_pattern, None);
        assert_eq!(config.ignore[1].kind, Some(ErrorKind::Collision));
        assert_eq!(config.ignore[1].artifact_pattern.as_deref(), Some("\\.pom$"));
        config.validate().unwrap();
    }

    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = Config::load_from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.validation.origin, None);
        assert_eq!(config.validation.policy, PolicyKind::Collision);
        assert_eq!(config.validation.provider, ChecksumProviderKind::Nexus);
        assert_eq!(config.validation.max_concurrent_tasks, 1000);
        assert_eq!(config.validation.timeout_secs, 3600);
        assert_eq!(config.network.min_request_distance_ms, 10);
        assert_eq!(config.network.max_idle_connections, 75_000);
        assert!(config.cache.enabled);
        assert_eq!(
            config.discovery.manifest,
            PathBuf::from("repository-entities.txt")
        );
        assert!(config.mirrors.is_none());
        assert!(config.ignore.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let path = std::path::Path::new("/nonexistent/mirrorcheck.toml");
        let err = Config::load_from_file(path).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[validation\npolicy = ").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[tokio::test]
    async fn test_unknown_policy_in_file_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[validation]\npolicy = \"strict\"").unwrap();

        assert!(Config::load_from_file(temp_file.path()).await.is_err());
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("MIRRORCHECK_ORIGIN", "https://repo.example.com/");
        std::env::set_var("MIRRORCHECK_REPOSITORY", "/tmp/repo");
        std::env::set_var("MIRRORCHECK_POLICY", "compare");
        std::env::set_var("MIRRORCHECK_PROVIDER", "nginx");
        std::env::set_var("MIRRORCHECK_MAX_CONCURRENT_TASKS", "16");
        std::env::set_var("MIRRORCHECK_MIN_REQUEST_DISTANCE_MS", "0");
        std::env::set_var("MIRRORCHECK_CACHE_DIR", "/tmp/mirrorcheck-cache");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(
            config.validation.origin.as_deref(),
            Some("https://repo.example.com/")
        );
        assert_eq!(config.validation.repository, Some(PathBuf::from("/tmp/repo")));
        assert_eq!(config.validation.policy, PolicyKind::Compare);
        assert_eq!(config.validation.provider, ChecksumProviderKind::Nginx);
        assert_eq!(config.validation.max_concurrent_tasks, 16);
        assert_eq!(config.network.min_request_distance_ms, 0);
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/mirrorcheck-cache"));

        clear_env();
    }

    #[test]
    fn test_merge_env_invalid_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("MIRRORCHECK_MAX_CONCURRENT_TASKS", "lots");
        let mut config = Config::default();
        let err = config.merge_env().unwrap_err();
        match err {
            Error::Config(ConfigError::InvalidValue { field, value }) => {
                assert_eq!(field, "MIRRORCHECK_MAX_CONCURRENT_TASKS");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        clear_env();
        std::env::set_var("MIRRORCHECK_PROVIDER", "s3");
        assert!(Config::default().merge_env().is_err());

        clear_env();
    }

    #[test]
    fn test_validate_rejects_empty_ignore_rule() {
        let config = Config {
            ignore: vec![IgnoreConfig::default()],
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_task_cap() {
        let mut config = Config::default();
        config.validation.max_concurrent_tasks = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_cache_dir_default_is_named_after_tool() {
        let dir = Config::default().cache_dir();
        assert!(dir.ends_with("mirrorcheck") || dir.ends_with(".mirrorcheck-cache"));
    }
}
