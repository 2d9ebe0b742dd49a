//! Integration tests for types

#[cfg(test)]
mod tests {
    use mirrorcheck_types::*;

    #[test]
    fn test_provider_serialization() {
        let json = serde_json::to_string(&ChecksumProviderKind::Artifactory).unwrap();
        assert_eq!(json, r#""artifactory""#);
        let parsed: ChecksumProviderKind = serde_json::from_str(r#""nginx""#).unwrap();
        assert_eq!(parsed, ChecksumProviderKind::Nginx);
    }

    #[test]
    fn test_policy_default_is_collision() {
        assert_eq!(PolicyKind::default(), PolicyKind::Collision);
        assert_eq!(PolicyKind::Compare.to_string(), "compare");
    }

    #[test]
    fn test_artifact_relative_to_origin() {
        let origin = RemoteMirror::parse("https://origin.example/ga").unwrap();
        let artifact = Artifact::parse("https://origin.example/ga/org/x/1/x-1.pom");
        let Artifact::Remote(url) = &artifact else {
            panic!("expected remote artifact");
        };
        let relative = origin.relativize(url).unwrap();
        let mirror = RemoteMirror::parse("https://mirror.example/maven2/").unwrap();
        assert_eq!(
            mirror.artifact_url(&relative).unwrap().as_str(),
            "https://mirror.example/maven2/org/x/1/x-1.pom"
        );
    }
}
