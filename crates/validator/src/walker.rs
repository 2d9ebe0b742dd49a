//! Bounded-concurrency comparison of every artifact against every live mirror

use crate::artifacts::Repository;
use crate::context::ValidatorContext;
use crate::filter::{FileFilter, PatternFileFilter};
use crate::policy::{CheckTarget, Policy};
use futures::FutureExt;
use mirrorcheck_cache::CacheSet;
use mirrorcheck_checksum::{resolve, ChecksumProvider};
use mirrorcheck_errors::{CompareError, ConfigError, Error};
use mirrorcheck_events::{
    AppEvent, EventEmitter, EventSender, MirrorEvent, ValidationEvent,
};
use mirrorcheck_net::NetClient;
use mirrorcheck_types::{Artifact, ChecksumProviderKind, RemoteMirror};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, trace};

/// Default cap on concurrently running artifact tasks
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 1000;

/// Default deadline for a whole run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Compares a repository against its origin and a list of mirrors
#[derive(Clone)]
pub struct MirrorValidator {
    shared: Arc<Shared>,
}

struct Shared {
    origin: RemoteMirror,
    mirrors: Vec<RemoteMirror>,
    repository: Repository,
    provider: ChecksumProvider,
    policy: Policy,
    client: NetClient,
    caches: Option<Arc<CacheSet>>,
    file_filter: Arc<dyn FileFilter>,
    max_concurrent_tasks: usize,
    timeout: Duration,
    events: Option<EventSender>,
}

impl EventEmitter for Shared {
    fn event_sender(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

impl MirrorValidator {
    #[must_use]
    pub fn builder() -> MirrorValidatorBuilder {
        MirrorValidatorBuilder::new()
    }

    #[must_use]
    pub fn origin(&self) -> &RemoteMirror {
        &self.shared.origin
    }

    #[must_use]
    pub fn policy(&self) -> Policy {
        self.shared.policy
    }

    /// Run one validation, recording every per-artifact failure in `ctx`
    ///
    /// Mirrors are probed once up front; mirrors answering `403` or failing
    /// to answer are dropped for the run and recorded as warnings. Each
    /// artifact then gets its own task, at most `max_concurrent_tasks` at a
    /// time, which walks the live mirrors sequentially.
    ///
    /// Success is read from `ctx` afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts cannot be enumerated or if the run
    /// exceeds its deadline. Tasks still running at the deadline are
    /// abandoned, not cancelled.
    pub async fn validate(&self, ctx: &Arc<ValidatorContext>) -> Result<(), Error> {
        let started = std::time::Instant::now();
        let deadline = Instant::now() + self.shared.timeout;

        let mirrors: Arc<[RemoteMirror]> = self.shared.probe_mirrors(ctx).await.into();
        let artifacts = self
            .shared
            .repository
            .artifacts(self.shared.file_filter.clone())
            .await?;

        self.shared
            .emit(AppEvent::Validation(ValidationEvent::Started {
                origin: self.shared.origin.to_string(),
                policy: self.shared.policy.source().to_string(),
                artifacts: artifacts.len(),
                mirrors: mirrors.len(),
            }));

        let total = artifacts.len();
        let semaphore = Arc::new(Semaphore::new(self.shared.max_concurrent_tasks));
        let mut tasks = JoinSet::new();
        let mut pending = artifacts.into_iter();

        while let Some(artifact) = pending.next() {
            let permit = match timeout_at(deadline, semaphore.clone().acquire_owned()).await {
                Ok(Ok(permit)) => permit,
                Ok(Err(_)) => return Err(Error::internal("task semaphore closed")),
                Err(_) => {
                    reap(&mut tasks);
                    let outstanding = tasks.len() + 1 + pending.len();
                    return Err(self.abandon(&mut tasks, outstanding));
                }
            };

            let shared = self.shared.clone();
            let mirrors = mirrors.clone();
            let ctx = ctx.clone();
            tasks.spawn(async move {
                let _permit = permit;
                shared.run_task(&mirrors, &ctx, artifact).await;
            });

            reap(&mut tasks);
        }

        loop {
            match timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(joined)) => log_join(joined),
                Ok(None) => break,
                Err(_) => {
                    reap(&mut tasks);
                    let outstanding = tasks.len();
                    return Err(self.abandon(&mut tasks, outstanding));
                }
            }
        }

        self.shared
            .emit(AppEvent::Validation(ValidationEvent::Completed {
                artifacts: total,
                errors: ctx.error_count(),
                ignored: ctx.ignored_errors().len(),
                warnings: ctx.warnings().len(),
                duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            }));

        Ok(())
    }

    fn abandon(&self, tasks: &mut JoinSet<()>, outstanding: usize) -> Error {
        tasks.detach_all();
        let timeout_secs = self.shared.timeout.as_secs();

        self.shared
            .emit(AppEvent::Validation(ValidationEvent::TimedOut {
                timeout_secs,
                outstanding,
            }));

        CompareError::DriverTimeout {
            timeout_secs,
            outstanding,
        }
        .into()
    }
}

impl Shared {
    /// Curated mirrors plus the origin, minus every mirror that fails its probe
    async fn probe_mirrors(&self, ctx: &ValidatorContext) -> Vec<RemoteMirror> {
        let mut candidates = self.mirrors.clone();
        if !candidates.contains(&self.origin) {
            candidates.push(self.origin.clone());
        }

        self.emit(AppEvent::Mirror(MirrorEvent::ProbeStarted {
            mirrors: candidates.len(),
        }));

        let mut live = Vec::with_capacity(candidates.len());
        let mut removed = 0;
        for mirror in candidates {
            let reason = match self.client.head(mirror.as_str()).await {
                Ok(response) if response.status().as_u16() == 403 => {
                    Some(mirrorcheck_net::status_line(&response))
                }
                Ok(response) => {
                    self.emit(AppEvent::Mirror(MirrorEvent::Live {
                        mirror: mirror.to_string(),
                        status: response.status().as_u16(),
                    }));
                    None
                }
                Err(e) => Some(e.to_string()),
            };

            match reason {
                None => live.push(mirror),
                Some(reason) => {
                    removed += 1;
                    self.emit(AppEvent::Mirror(MirrorEvent::Removed {
                        mirror: mirror.to_string(),
                        reason: reason.clone(),
                    }));
                    ctx.add_warning(
                        self.policy.source(),
                        CompareError::MirrorRemoved {
                            mirror: mirror.to_string(),
                            reason,
                        }
                        .into(),
                    );
                }
            }
        }

        self.emit(AppEvent::Mirror(MirrorEvent::ProbeCompleted {
            live: live.len(),
            removed,
        }));

        live
    }

    async fn run_task(&self, mirrors: &[RemoteMirror], ctx: &ValidatorContext, artifact: Artifact) {
        trace!(artifact = %artifact, "validating");

        let outcome = AssertUnwindSafe(self.compare_artifact(mirrors, ctx, &artifact))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(error)) => self.record(ctx, &artifact, None, error),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                self.record(
                    ctx,
                    &artifact,
                    None,
                    Error::internal(format!("comparison task panicked: {message}")),
                );
            }
        }
    }

    /// Errors returned here abort this artifact only; per-mirror failures
    /// are recorded and the walk continues with the next mirror
    async fn compare_artifact(
        &self,
        mirrors: &[RemoteMirror],
        ctx: &ValidatorContext,
        artifact: &Artifact,
    ) -> Result<(), Error> {
        let relative_path = self.repository.relative_path(artifact, &self.origin)?;
        let local_fingerprint = self.local_fingerprint(artifact, &relative_path).await?;

        let target = CheckTarget {
            provider: self.provider,
            client: &self.client,
            artifact,
            relative_path: &relative_path,
            local_fingerprint: &local_fingerprint,
        };

        for mirror in mirrors {
            let cache = self
                .caches
                .as_ref()
                .map(|caches| caches.remote.for_host(mirror.host()));

            match self.policy.check(&target, mirror, cache.as_deref()).await {
                Ok(()) => self.emit(AppEvent::Validation(ValidationEvent::ArtifactChecked {
                    artifact: artifact.uri(),
                    mirror: mirror.to_string(),
                })),
                Err(error) => self.record(ctx, artifact, Some(mirror), error),
            }
        }

        Ok(())
    }

    /// Fingerprint of the artifact as served by the origin
    async fn local_fingerprint(&self, artifact: &Artifact, relative_path: &str) -> Result<String, Error> {
        match self.repository.local_file(artifact) {
            Some(path) => self.provider.local_fingerprint(&path).await,
            None => {
                resolve(
                    self.provider,
                    &self.client,
                    &self.origin,
                    relative_path,
                    self.caches.as_ref().map(|caches| &caches.local),
                )
                .await
            }
        }
    }

    fn record(
        &self,
        ctx: &ValidatorContext,
        artifact: &Artifact,
        mirror: Option<&RemoteMirror>,
        error: Error,
    ) {
        let kind = error.kind();
        debug!(artifact = %artifact, %kind, error = %error, "comparison failed");

        if ctx.add_error(self.policy.source(), Some(artifact), error.clone()) {
            self.emit_artifact_failed(
                artifact.uri(),
                mirror.map(ToString::to_string).unwrap_or_default(),
                kind,
                &error,
            );
        } else {
            self.emit(AppEvent::Validation(ValidationEvent::ArtifactIgnored {
                artifact: artifact.uri(),
                kind,
            }));
        }
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        debug!(error = %e, "comparison task did not complete");
    }
}

/// Join every task that has already finished so `tasks.len()` counts only running ones
fn reap(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.try_join_next() {
        log_join(joined);
    }
}

/// Builder for [`MirrorValidator`]
pub struct MirrorValidatorBuilder {
    origin: Option<RemoteMirror>,
    repository: Option<Repository>,
    mirrors: Vec<RemoteMirror>,
    provider: ChecksumProviderKind,
    policy: Policy,
    client: Option<NetClient>,
    caches: Option<Arc<CacheSet>>,
    file_filter: Option<Arc<dyn FileFilter>>,
    max_concurrent_tasks: usize,
    timeout: Duration,
    events: Option<EventSender>,
}

impl Default for MirrorValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorValidatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: None,
            repository: None,
            mirrors: Vec::new(),
            provider: ChecksumProviderKind::default(),
            policy: Policy::Collision,
            client: None,
            caches: None,
            file_filter: None,
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
            timeout: DEFAULT_TIMEOUT,
            events: None,
        }
    }

    /// Set the origin whose artifacts are under validation
    #[must_use]
    pub fn with_origin(mut self, origin: RemoteMirror) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the repository to enumerate
    #[must_use]
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set the mirrors to compare against; the origin is always added
    #[must_use]
    pub fn with_mirrors(mut self, mirrors: impl IntoIterator<Item = RemoteMirror>) -> Self {
        self.mirrors = mirrors.into_iter().collect();
        self
    }

    /// Set the fingerprint convention
    #[must_use]
    pub fn with_provider(mut self, provider: ChecksumProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Set the comparison policy
    #[must_use]
    pub fn with_policy(mut self, policy: impl Into<Policy>) -> Self {
        self.policy = policy.into();
        self
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, client: NetClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Enable fingerprint caching
    #[must_use]
    pub fn with_caches(mut self, caches: Arc<CacheSet>) -> Self {
        self.caches = Some(caches);
        self
    }

    /// Secondary filter for files found under a repository directory
    #[must_use]
    pub fn with_file_filter(mut self, filter: impl FileFilter + 'static) -> Self {
        self.file_filter = Some(Arc::new(filter));
        self
    }

    #[must_use]
    pub fn with_max_concurrent_tasks(mut self, max: usize) -> Self {
        self.max_concurrent_tasks = max;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.events = Some(tx);
        self
    }

    /// Build the validator
    ///
    /// # Errors
    ///
    /// Returns an error if the origin or repository is missing, the task
    /// cap is zero, or a default network client cannot be created.
    pub fn build(self) -> Result<MirrorValidator, Error> {
        let origin = self.origin.ok_or_else(|| ConfigError::MissingField {
            field: "validation.origin".to_string(),
        })?;
        let repository = self.repository.ok_or_else(|| ConfigError::MissingField {
            field: "validation.repository".to_string(),
        })?;
        if self.max_concurrent_tasks == 0 {
            return Err(ConfigError::InvalidValue {
                field: "validation.max_concurrent_tasks".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        let client = match self.client {
            Some(client) => client,
            None => NetClient::with_defaults()?,
        };

        Ok(MirrorValidator {
            shared: Arc::new(Shared {
                origin,
                mirrors: self.mirrors,
                repository,
                provider: ChecksumProvider::new(self.provider),
                policy: self.policy,
                client,
                caches: self.caches,
                file_filter: self
                    .file_filter
                    .unwrap_or_else(|| Arc::new(PatternFileFilter::default())),
                max_concurrent_tasks: self.max_concurrent_tasks,
                timeout: self.timeout,
                events: self.events,
            }),
        })
    }
}
