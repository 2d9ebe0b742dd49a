//! Ignore filters for recorded errors and secondary filters for candidate files

use mirrorcheck_errors::{ConfigError, Error, ErrorKind};
use mirrorcheck_types::Artifact;
use regex::Regex;
use std::path::Path;

/// Decides whether a recorded error is set aside instead of failing the run
pub trait ExceptionFilter: Send + Sync {
    fn should_ignore(&self, error: &Error, artifact: Option<&Artifact>) -> bool;
}

impl<F> ExceptionFilter for F
where
    F: Fn(&Error, Option<&Artifact>) -> bool + Send + Sync,
{
    fn should_ignore(&self, error: &Error, artifact: Option<&Artifact>) -> bool {
        self(error, artifact)
    }
}

/// Matches when every present criterion matches
///
/// A rule without criteria matches nothing.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRule {
    kind: Option<ErrorKind>,
    artifact_pattern: Option<Regex>,
}

impl IgnoreRule {
    /// Rule matching every error of `kind`
    #[must_use]
    pub fn kind(kind: ErrorKind) -> Self {
        Self {
            kind: Some(kind),
            artifact_pattern: None,
        }
    }

    /// Build a rule from its optional parts
    ///
    /// # Errors
    ///
    /// Returns an error if `artifact_pattern` is not a valid regex.
    pub fn new(kind: Option<ErrorKind>, artifact_pattern: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            kind,
            artifact_pattern: artifact_pattern.map(compile).transpose()?,
        })
    }
}

impl ExceptionFilter for IgnoreRule {
    fn should_ignore(&self, error: &Error, artifact: Option<&Artifact>) -> bool {
        if self.kind.is_none() && self.artifact_pattern.is_none() {
            return false;
        }

        let kind_matches = self.kind.is_none_or(|kind| error.kind() == kind);
        let artifact_matches = self.artifact_pattern.as_ref().is_none_or(|pattern| {
            artifact.is_some_and(|artifact| pattern.is_match(&artifact.uri()))
        });

        kind_matches && artifact_matches
    }
}

/// Secondary filter applied to files found under a repository directory
pub trait FileFilter: Send + Sync {
    /// `relative_path` uses `/` separators and is relative to the repository root
    fn accept(&self, relative_path: &str) -> bool;
}

impl<F> FileFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accept(&self, relative_path: &str) -> bool {
        self(relative_path)
    }
}

/// Include/exclude regex pair; both optional
#[derive(Debug, Clone, Default)]
pub struct PatternFileFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl PatternFileFilter {
    /// # Errors
    ///
    /// Returns an error if either pattern is not a valid regex.
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            include: include.map(compile).transpose()?,
            exclude: exclude.map(compile).transpose()?,
        })
    }
}

impl FileFilter for PatternFileFilter {
    fn accept(&self, relative_path: &str) -> bool {
        self.include
            .as_ref()
            .is_none_or(|include| include.is_match(relative_path))
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.is_match(relative_path))
    }
}

/// Lowercased extensions of files that are compared against mirrors
pub const ARTIFACT_EXTENSIONS: [&str; 9] = [
    "pom", "jar", "war", "ear", "par", "rar", "zip", "aar", "apklib",
];

/// Whether `path` carries one of [`ARTIFACT_EXTENSIONS`]
#[must_use]
pub fn has_artifact_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ARTIFACT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| {
        ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrorcheck_errors::CompareError;

    fn not_found() -> Error {
        CompareError::ArtifactNotFound {
            mirror: "https://m/".to_string(),
            uri: "https://m/org/a/a.jar".to_string(),
        }
        .into()
    }

    #[test]
    fn test_ignore_rule_requires_all_criteria() {
        let artifact = Artifact::parse("/repo/org/a/a.jar");
        let other = Artifact::parse("/repo/org/b/b.jar");

        let rule = IgnoreRule::new(Some(ErrorKind::ArtifactNotFound), Some("org/a/")).unwrap();
        assert!(rule.should_ignore(&not_found(), Some(&artifact)));
        assert!(!rule.should_ignore(&not_found(), Some(&other)));
        assert!(!rule.should_ignore(&not_found(), None));

        let kind_only = IgnoreRule::kind(ErrorKind::ArtifactNotFound);
        assert!(kind_only.should_ignore(&not_found(), None));

        assert!(!IgnoreRule::default().should_ignore(&not_found(), Some(&artifact)));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = IgnoreRule::new(None, Some("(")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_closure_filter() {
        let filter = |error: &Error, _: Option<&Artifact>| error.kind() == ErrorKind::ArtifactNotFound;
        assert!(filter.should_ignore(&not_found(), None));
    }

    #[test]
    fn test_pattern_file_filter() {
        let filter = PatternFileFilter::new(Some("^org/"), Some("-sources\\.jar$")).unwrap();
        assert!(filter.accept("org/a/1.0/a-1.0.jar"));
        assert!(!filter.accept("org/a/1.0/a-1.0-sources.jar"));
        assert!(!filter.accept("com/b/1.0/b-1.0.jar"));
        assert!(PatternFileFilter::default().accept("anything"));
    }

    #[test]
    fn test_artifact_extensions() {
        assert!(has_artifact_extension(Path::new("a/b-1.0.JAR")));
        assert!(has_artifact_extension(Path::new("a/b-1.0.apklib")));
        assert!(!has_artifact_extension(Path::new("a/b-1.0.jar.sha1")));
        assert!(!has_artifact_extension(Path::new("a/maven-metadata.xml")));
    }
}
