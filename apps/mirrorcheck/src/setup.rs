//! Startup checks and component initialization

use crate::error::CliError;
use mirrorcheck_cache::CacheSet;
use mirrorcheck_config::Config;
use mirrorcheck_discovery::OnlineRepositoryDiscovery;
use mirrorcheck_errors::{ConfigError, Error, StorageError};
use mirrorcheck_events::{AppEvent, CacheEvent, EventEmitter, EventSender, GeneralEvent};
use mirrorcheck_net::{NetClient, NetConfig};
use mirrorcheck_types::RemoteMirror;
use mirrorcheck_validator::{
    default_mirrors, IgnoreRule, MirrorValidator, PatternFileFilter, Repository,
    ValidatorContext,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Everything a validation run needs, after startup checks passed
pub struct PreparedRun {
    pub validator: MirrorValidator,
    pub ctx: Arc<ValidatorContext>,
}

/// Startup checks and component wiring
pub struct SystemSetup {
    config: Config,
    tx: EventSender,
}

impl EventEmitter for SystemSetup {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl SystemSetup {
    pub fn new(config: Config, tx: EventSender) -> Self {
        Self { config, tx }
    }

    /// Run startup checks and build the validator
    pub async fn initialize(&self) -> Result<PreparedRun, CliError> {
        info!("Initializing mirrorcheck components");

        let net = self.net_client()?;
        let origin = self.origin()?;
        let repository = self.prepare_repository(&net, &origin).await?;

        let mirrors = self.mirrors()?;
        if mirrors.is_empty() {
            self.emit_warning_with_context(
                "mirror list is empty",
                "only the origin will be compared against",
            );
        }

        let caches = self.load_caches().await?;
        let ctx = Arc::new(self.context()?);
        let file_filter = PatternFileFilter::new(
            self.config.validation.include_pattern.as_deref(),
            self.config.validation.exclude_pattern.as_deref(),
        )?;

        self.emit(AppEvent::General(GeneralEvent::ConfigurationLoaded {
            origin: origin.to_string(),
            repository: repository.path().display().to_string(),
            policy: self.config.validation.policy.to_string(),
            provider: self.config.validation.provider.to_string(),
            mirrors: mirrors.len(),
            max_concurrent_tasks: self.config.validation.max_concurrent_tasks,
        }));

        let validator = MirrorValidator::builder()
            .with_origin(origin)
            .with_repository(repository)
            .with_mirrors(mirrors)
            .with_provider(self.config.validation.provider)
            .with_policy(self.config.validation.policy)
            .with_net(net)
            .with_caches(caches)
            .with_file_filter(file_filter)
            .with_max_concurrent_tasks(self.config.validation.max_concurrent_tasks)
            .with_timeout(Duration::from_secs(self.config.validation.timeout_secs))
            .with_event_sender(self.tx.clone())
            .build()?;

        info!("Initialization completed");
        Ok(PreparedRun { validator, ctx })
    }

    /// HTTP client built from the `[network]` section
    pub fn net_client(&self) -> Result<NetClient, CliError> {
        let network = &self.config.network;
        let client = NetClient::new(NetConfig {
            timeout: Duration::from_secs(network.timeout_secs),
            connect_timeout: Duration::from_secs(network.connect_timeout_secs),
            pool_max_idle_per_host: network.max_idle_connections,
            min_request_distance: Duration::from_millis(network.min_request_distance_ms),
            user_agent: network.user_agent.clone(),
            ..NetConfig::default()
        })?;
        Ok(client)
    }

    fn origin(&self) -> Result<RemoteMirror, CliError> {
        let origin = self
            .config
            .validation
            .origin
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "validation.origin".to_string(),
            })?;
        Ok(RemoteMirror::parse(origin)?)
    }

    /// Classify the repository, crawling the origin when it does not exist locally
    async fn prepare_repository(
        &self,
        net: &NetClient,
        origin: &RemoteMirror,
    ) -> Result<Repository, CliError> {
        let path = self
            .config
            .validation
            .repository
            .clone()
            .unwrap_or_else(|| self.config.discovery.manifest.clone());

        match Repository::detect(&path).await {
            Ok(Repository::Directory(dir)) => {
                ensure_not_empty(&dir).await?;
                Ok(Repository::Directory(dir))
            }
            Ok(manifest) => {
                debug!(manifest = %manifest.path().display(), "using manifest repository");
                Ok(manifest)
            }
            Err(Error::Storage(StorageError::PathNotFound { .. })) => {
                self.discover_into(net, origin, path).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn discover_into(
        &self,
        net: &NetClient,
        origin: &RemoteMirror,
        manifest: PathBuf,
    ) -> Result<Repository, CliError> {
        let status = net.status_code(origin.as_str()).await?;
        if status != 200 {
            return Err(CliError::Setup(format!(
                "repository {} does not exist and origin {origin} answered {status}",
                manifest.display()
            )));
        }

        info!(origin = %origin, manifest = %manifest.display(), "repository not found locally, crawling origin");
        let report = OnlineRepositoryDiscovery::new(net.clone(), origin.as_str(), manifest.clone())?
            .with_max_depth(self.config.discovery.max_depth)
            .with_event_sender(self.tx.clone())
            .discover()
            .await?;

        if report.artifacts == 0 {
            return Err(CliError::Setup(format!(
                "no artifacts found under {origin}"
            )));
        }

        Ok(Repository::Manifest(manifest))
    }

    fn mirrors(&self) -> Result<Vec<RemoteMirror>, CliError> {
        let mirrors = match &self.config.mirrors {
            Some(list) => list
                .iter()
                .map(|mirror| RemoteMirror::parse(mirror))
                .collect::<Result<Vec<_>, _>>()?,
            None => default_mirrors()?,
        };
        Ok(mirrors)
    }

    async fn load_caches(&self) -> Result<Arc<CacheSet>, CliError> {
        if !self.config.cache.enabled {
            debug!("fingerprint caches disabled");
            return Ok(Arc::new(CacheSet::in_memory()));
        }

        let dir = self.config.cache_dir();
        let caches = CacheSet::load(&dir).await?;

        self.emit(AppEvent::Cache(CacheEvent::Loaded {
            source: dir.join(CacheSet::LOCAL_FILE).display().to_string(),
            entries: caches.local.len(),
        }));
        self.emit(AppEvent::Cache(CacheEvent::Loaded {
            source: dir.join(CacheSet::REMOTE_DIR).display().to_string(),
            entries: caches.remote.entries(),
        }));

        Ok(Arc::new(caches))
    }

    fn context(&self) -> Result<ValidatorContext, CliError> {
        let mut ctx = ValidatorContext::new();
        for rule in &self.config.ignore {
            ctx = ctx.with_filter(IgnoreRule::new(
                rule.kind,
                rule.artifact_pattern.as_deref(),
            )?);
        }
        Ok(ctx)
    }
}

async fn ensure_not_empty(dir: &Path) -> Result<(), CliError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| Error::io_with_path(&e, dir))?;
    let first = entries
        .next_entry()
        .await
        .map_err(|e| Error::io_with_path(&e, dir))?;

    if first.is_none() {
        return Err(ConfigError::Invalid {
            message: format!("repository directory {} is empty", dir.display()),
        }
        .into());
    }
    Ok(())
}
