//! Run summaries printed at the end of a command

use mirrorcheck_discovery::DiscoveryReport;
use mirrorcheck_errors::{Error, ErrorKind, UserFacingError};
use mirrorcheck_validator::{ValidationError, ValidatorContext};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Process exit code for a clean run
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code when at least one non-ignored error was recorded
pub const EXIT_ERRORS: i32 = 1;
/// Process exit code for a fatal condition (timeout, configuration)
pub const EXIT_FATAL: i32 = 2;

/// One recorded failure as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl From<&ValidationError> for ReportEntry {
    fn from(recorded: &ValidationError) -> Self {
        Self {
            source: recorded.source.clone(),
            artifact: recorded.artifact.as_ref().map(mirrorcheck_types::Artifact::uri),
            message: recorded.error.user_message().into_owned(),
            code: recorded.error.user_code(),
        }
    }
}

/// Outcome of `mirrorcheck validate`
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub origin: String,
    pub policy: String,
    pub success: bool,
    pub error_count: usize,
    /// Errors grouped by classification
    pub errors: BTreeMap<&'static str, Vec<ReportEntry>>,
    pub warnings: Vec<ReportEntry>,
    pub ignored: usize,
    /// Set when the run itself failed, e.g. on timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
    pub duration_ms: u64,
}

impl ValidationReport {
    pub fn new(
        origin: &str,
        policy: &str,
        ctx: &ValidatorContext,
        outcome: Result<(), &Error>,
        duration_ms: u64,
    ) -> Self {
        let mut grouped: BTreeMap<ErrorKind, Vec<ReportEntry>> = BTreeMap::new();
        for recorded in ctx.errors() {
            grouped
                .entry(recorded.kind())
                .or_default()
                .push(ReportEntry::from(&recorded));
        }

        let fatal = outcome.err().map(|e| e.user_message().into_owned());

        Self {
            origin: origin.to_string(),
            policy: policy.to_string(),
            success: ctx.is_success() && fatal.is_none(),
            error_count: ctx.error_count(),
            errors: grouped
                .into_iter()
                .map(|(kind, entries)| (kind.as_str(), entries))
                .collect(),
            warnings: ctx.warnings().iter().map(ReportEntry::from).collect(),
            ignored: ctx.ignored_errors().len(),
            fatal,
            duration_ms,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.fatal.is_some() {
            EXIT_FATAL
        } else if self.success {
            EXIT_SUCCESS
        } else {
            EXIT_ERRORS
        }
    }
}

/// Outcome of `mirrorcheck discover`
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverySummary {
    pub origin: String,
    pub manifest: String,
    pub artifacts: usize,
    pub listings: usize,
    pub failed_listings: usize,
}

impl DiscoverySummary {
    pub fn new(origin: &str, manifest: &Path, report: DiscoveryReport) -> Self {
        Self {
            origin: origin.to_string(),
            manifest: manifest.display().to_string(),
            artifacts: report.artifacts,
            listings: report.listings,
            failed_listings: report.failed_listings,
        }
    }
}

/// Result of any command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandOutput {
    Validate(ValidationReport),
    Discover(DiscoverySummary),
}

impl CommandOutput {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validate(report) => report.exit_code(),
            Self::Discover(_) => EXIT_SUCCESS,
        }
    }
}
