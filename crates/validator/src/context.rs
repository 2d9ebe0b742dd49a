//! Thread-safe sink for errors recorded during a validation run

use crate::filter::ExceptionFilter;
use mirrorcheck_errors::{Error, ErrorKind};
use mirrorcheck_types::Artifact;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One recorded failure
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Component that recorded the error, e.g. `remote-repository-collision`
    pub source: String,
    /// Artifact the error belongs to; `None` for run-level problems such as a removed mirror
    pub artifact: Option<Artifact>,
    pub error: Error,
}

impl ValidationError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Errors, ignored errors and warnings of one validation run
///
/// Every error passed to [`ValidatorContext::add_error`] lands in exactly one
/// of the error or ignored-error lists. Warnings never affect success.
#[derive(Default)]
pub struct ValidatorContext {
    filters: Vec<Box<dyn ExceptionFilter>>,
    errors: Mutex<Vec<ValidationError>>,
    ignored: Mutex<Vec<ValidationError>>,
    warnings: Mutex<Vec<ValidationError>>,
}

impl ValidatorContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an ignore filter; filters are consulted in insertion order
    #[must_use]
    pub fn with_filter(mut self, filter: impl ExceptionFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Record an error, routing it to the ignored list when a filter matches
    ///
    /// Returns `true` when the error counts against the run.
    pub fn add_error(
        &self,
        source: impl Into<String>,
        artifact: Option<&Artifact>,
        error: Error,
    ) -> bool {
        let ignored = self
            .filters
            .iter()
            .any(|filter| filter.should_ignore(&error, artifact));

        let record = ValidationError {
            source: source.into(),
            artifact: artifact.cloned(),
            error,
        };

        if ignored {
            lock(&self.ignored).push(record);
        } else {
            lock(&self.errors).push(record);
        }
        !ignored
    }

    /// Record a non-fatal problem that does not affect success
    pub fn add_warning(&self, source: impl Into<String>, error: Error) {
        lock(&self.warnings).push(ValidationError {
            source: source.into(),
            artifact: None,
            error,
        });
    }

    #[must_use]
    pub fn errors(&self) -> Vec<ValidationError> {
        lock(&self.errors).clone()
    }

    #[must_use]
    pub fn errors_for(&self, artifact: &Artifact) -> Vec<ValidationError> {
        lock(&self.errors)
            .iter()
            .filter(|e| e.artifact.as_ref() == Some(artifact))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn errors_of_kind(&self, kind: ErrorKind) -> Vec<ValidationError> {
        lock(&self.errors)
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn exceptions(&self) -> Vec<Error> {
        lock(&self.errors).iter().map(|e| e.error.clone()).collect()
    }

    #[must_use]
    pub fn exceptions_of_kind(&self, kind: ErrorKind) -> Vec<Error> {
        lock(&self.errors)
            .iter()
            .filter(|e| e.kind() == kind)
            .map(|e| e.error.clone())
            .collect()
    }

    #[must_use]
    pub fn ignored_errors(&self) -> Vec<ValidationError> {
        lock(&self.ignored).clone()
    }

    #[must_use]
    pub fn ignored_exceptions(&self) -> Vec<Error> {
        lock(&self.ignored).iter().map(|e| e.error.clone()).collect()
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<ValidationError> {
        lock(&self.warnings).clone()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        lock(&self.errors).len()
    }

    /// `true` iff no non-ignored error was recorded
    #[must_use]
    pub fn is_success(&self) -> bool {
        lock(&self.errors).is_empty()
    }
}

impl std::fmt::Debug for ValidatorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorContext")
            .field("filters", &self.filters.len())
            .field("errors", &lock(&self.errors).len())
            .field("ignored", &lock(&self.ignored).len())
            .field("warnings", &lock(&self.warnings).len())
            .finish()
    }
}

// a panicking recorder must not hide everything recorded before it
fn lock(list: &Mutex<Vec<ValidationError>>) -> MutexGuard<'_, Vec<ValidationError>> {
    list.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::IgnoreRule;
    use mirrorcheck_errors::{CompareError, NetworkError};

    fn collision(mirror: &str) -> Error {
        CompareError::Collision {
            mirror: mirror.to_string(),
            local: "a.jar".to_string(),
            remote: format!("{mirror}a.jar"),
        }
        .into()
    }

    #[test]
    fn test_errors_and_queries() {
        let ctx = ValidatorContext::new();
        let a = Artifact::parse("/repo/a.jar");
        let b = Artifact::parse("/repo/b.jar");

        assert!(ctx.add_error("test", Some(&a), collision("https://m1/")));
        assert!(ctx.add_error(
            "test",
            Some(&b),
            NetworkError::Timeout {
                url: "https://m1/b.jar".to_string()
            }
            .into()
        ));

        assert!(!ctx.is_success());
        assert_eq!(ctx.error_count(), 2);
        assert_eq!(ctx.errors_for(&a).len(), 1);
        assert_eq!(ctx.errors_of_kind(ErrorKind::TransportFailure).len(), 1);
        assert_eq!(ctx.exceptions_of_kind(ErrorKind::Collision).len(), 1);
        assert_eq!(ctx.exceptions().len(), 2);
    }

    #[test]
    fn test_ignored_errors_do_not_fail_the_run() {
        let ctx = ValidatorContext::new().with_filter(IgnoreRule::kind(ErrorKind::Collision));
        let a = Artifact::parse("/repo/a.jar");

        assert!(!ctx.add_error("test", Some(&a), collision("https://m1/")));

        assert!(ctx.is_success());
        assert!(ctx.errors().is_empty());
        assert_eq!(ctx.ignored_errors().len(), 1);
        assert_eq!(ctx.ignored_exceptions().len(), 1);
    }

    #[test]
    fn test_warnings_do_not_fail_the_run() {
        let ctx = ValidatorContext::new();
        ctx.add_warning(
            "test",
            CompareError::MirrorRemoved {
                mirror: "https://gone/".to_string(),
                reason: "403 Forbidden".to_string(),
            }
            .into(),
        );
        assert!(ctx.is_success());
        assert_eq!(ctx.warnings().len(), 1);
        assert_eq!(ctx.warnings()[0].kind(), ErrorKind::MirrorRemoved);
    }
}
