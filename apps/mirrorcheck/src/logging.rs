//! Structured logging integration for events
//!
//! Converts domain events received from the library crates into tracing
//! records with structured fields.

use mirrorcheck_events::{
    AppEvent, CacheEvent, DiscoveryEvent, GeneralEvent, MirrorEvent, ValidationEvent,
};
use tracing::{debug, error, info, trace, warn};

/// Log an `AppEvent` at the level it carries, with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    match event {
        AppEvent::General(general) => log_general(general),
        AppEvent::Mirror(mirror) => log_mirror(mirror),
        AppEvent::Validation(validation) => log_validation(validation),
        AppEvent::Discovery(discovery) => log_discovery(discovery),
        AppEvent::Cache(cache) => log_cache(cache),
    }
}

fn log_general(event: &GeneralEvent) {
    match event {
        GeneralEvent::Warning { message, context } => {
            warn!(target: "mirrorcheck::events::general", context = ?context, "{message}");
        }
        GeneralEvent::ConfigurationLoaded {
            origin,
            repository,
            policy,
            provider,
            mirrors,
            max_concurrent_tasks,
        } => {
            info!(
                target: "mirrorcheck::events::general",
                origin = %origin,
                repository = %repository,
                policy = %policy,
                provider = %provider,
                mirrors = mirrors,
                max_concurrent_tasks = max_concurrent_tasks,
                "Configuration loaded"
            );
        }
    }
}

fn log_mirror(event: &MirrorEvent) {
    match event {
        MirrorEvent::ProbeStarted { mirrors } => {
            info!(target: "mirrorcheck::events::mirror", mirrors = mirrors, "Probing mirrors");
        }
        MirrorEvent::Live { mirror, status } => {
            debug!(
                target: "mirrorcheck::events::mirror",
                mirror = %mirror,
                status = status,
                "Mirror is live"
            );
        }
        MirrorEvent::Removed { mirror, reason } => {
            warn!(
                target: "mirrorcheck::events::mirror",
                mirror = %mirror,
                reason = %reason,
                "Mirror removed"
            );
        }
        MirrorEvent::ProbeCompleted { live, removed } => {
            info!(
                target: "mirrorcheck::events::mirror",
                live = live,
                removed = removed,
                "Mirror probe completed"
            );
        }
    }
}

fn log_validation(event: &ValidationEvent) {
    match event {
        ValidationEvent::Started {
            origin,
            policy,
            artifacts,
            mirrors,
        } => {
            info!(
                target: "mirrorcheck::events::validation",
                origin = %origin,
                policy = %policy,
                artifacts = artifacts,
                mirrors = mirrors,
                "Validation started"
            );
        }
        ValidationEvent::ArtifactChecked { artifact, mirror } => {
            trace!(
                target: "mirrorcheck::events::validation",
                artifact = %artifact,
                mirror = %mirror,
                "Artifact matches"
            );
        }
        ValidationEvent::ArtifactFailed {
            artifact,
            mirror,
            kind,
            failure,
        } => {
            warn!(
                target: "mirrorcheck::events::validation",
                artifact = %artifact,
                mirror = %mirror,
                kind = kind.as_str(),
                code = ?failure.code,
                retryable = failure.retryable,
                hint = ?failure.hint,
                "{}",
                failure.message
            );
        }
        ValidationEvent::ArtifactIgnored { artifact, kind } => {
            debug!(
                target: "mirrorcheck::events::validation",
                artifact = %artifact,
                kind = kind.as_str(),
                "Error ignored"
            );
        }
        ValidationEvent::TimedOut {
            timeout_secs,
            outstanding,
        } => {
            error!(
                target: "mirrorcheck::events::validation",
                timeout_secs = timeout_secs,
                outstanding = outstanding,
                "Validation timed out"
            );
        }
        ValidationEvent::Completed {
            artifacts,
            errors,
            ignored,
            warnings,
            duration_ms,
        } => {
            info!(
                target: "mirrorcheck::events::validation",
                artifacts = artifacts,
                errors = errors,
                ignored = ignored,
                warnings = warnings,
                duration_ms = duration_ms,
                "Validation completed"
            );
        }
    }
}

fn log_discovery(event: &DiscoveryEvent) {
    match event {
        DiscoveryEvent::Started { origin, manifest } => {
            info!(
                target: "mirrorcheck::events::discovery",
                origin = %origin,
                manifest = %manifest,
                "Discovery started"
            );
        }
        DiscoveryEvent::ListingFetched {
            url,
            directories,
            files,
        } => {
            debug!(
                target: "mirrorcheck::events::discovery",
                url = %url,
                directories = directories,
                files = files,
                "Listing fetched"
            );
        }
        DiscoveryEvent::ListingFailed { url, error } => {
            warn!(
                target: "mirrorcheck::events::discovery",
                url = %url,
                error = %error,
                "Listing skipped"
            );
        }
        DiscoveryEvent::ArtifactFound { url } => {
            trace!(target: "mirrorcheck::events::discovery", url = %url, "Artifact found");
        }
        DiscoveryEvent::Completed {
            artifacts,
            listings,
            duration_ms,
        } => {
            info!(
                target: "mirrorcheck::events::discovery",
                artifacts = artifacts,
                listings = listings,
                duration_ms = duration_ms,
                "Discovery completed"
            );
        }
    }
}

fn log_cache(event: &CacheEvent) {
    match event {
        CacheEvent::Loaded { source, entries } => {
            info!(
                target: "mirrorcheck::events::cache",
                source = %source,
                entries = entries,
                "Fingerprint cache loaded"
            );
        }
    }
}
