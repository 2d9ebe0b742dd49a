//! mirrorcheck - verify that public mirrors serve what the origin publishes
//!
//! This is the CLI application that wires configuration, startup checks and
//! the validator and discovery crates together.

mod cli;
mod display;
mod error;
mod logging;
mod report;
mod setup;

use crate::cli::{Cli, Commands, DiscoverArgs, ValidateArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::report::{CommandOutput, DiscoverySummary, ValidationReport, EXIT_FATAL};
use crate::setup::SystemSetup;
use clap::Parser;
use mirrorcheck_config::Config;
use mirrorcheck_discovery::OnlineRepositoryDiscovery;
use mirrorcheck_events::{EventReceiver, EventSender};
use std::process;
use std::time::Instant;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(EXIT_FATAL);
        }
    }
}

/// Main application logic; returns the process exit code
async fn run(cli: Cli) -> Result<i32, CliError> {
    info!("Starting mirrorcheck v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.command);
    config.validate()?;

    let (event_sender, event_receiver) = mirrorcheck_events::channel();
    let renderer = OutputRenderer::new(cli.global.json);

    let output = execute_command_with_events(cli.command, config, event_sender, event_receiver)
        .await?;

    renderer.render(&output)?;

    info!("Command completed");
    Ok(output.exit_code())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    config: Config,
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
) -> Result<CommandOutput, CliError> {
    let mut command_future = Box::pin(execute_command(command, config, event_sender));
    let mut channel_open = true;

    loop {
        select! {
            // Command completed
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    logging::log_event_with_tracing(&event);
                }
                return result;
            }

            // Event received
            event = event_receiver.recv(), if channel_open => {
                match event {
                    Some(event) => logging::log_event_with_tracing(&event),
                    None => channel_open = false,
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: Config,
    tx: EventSender,
) -> Result<CommandOutput, CliError> {
    match command {
        Commands::Validate(_) => validate(config, tx).await,
        Commands::Discover(args) => discover(config, &args, tx).await,
    }
}

async fn validate(config: Config, tx: EventSender) -> Result<CommandOutput, CliError> {
    let setup = SystemSetup::new(config, tx);
    let run = setup.initialize().await?;

    let started = Instant::now();
    let outcome = run.validator.validate(&run.ctx).await;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if let Err(e) = &outcome {
        error!(error = %e, "validation aborted");
    }

    Ok(CommandOutput::Validate(ValidationReport::new(
        run.validator.origin().as_str(),
        run.validator.policy().source(),
        &run.ctx,
        outcome.as_ref().map(|_| ()),
        duration_ms,
    )))
}

async fn discover(
    config: Config,
    args: &DiscoverArgs,
    tx: EventSender,
) -> Result<CommandOutput, CliError> {
    let origin = args
        .origin
        .clone()
        .or_else(|| config.validation.origin.clone())
        .ok_or_else(|| {
            CliError::InvalidArguments("--origin is required when no origin is configured".into())
        })?;
    let manifest = args
        .output
        .clone()
        .unwrap_or_else(|| config.discovery.manifest.clone());

    if !args.append {
        match tokio::fs::remove_file(&manifest).await {
            Ok(()) => info!(manifest = %manifest.display(), "replacing existing manifest"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(mirrorcheck_errors::Error::io_with_path(&e, &manifest).into()),
        }
    }

    let net = SystemSetup::new(config.clone(), tx.clone()).net_client()?;
    let report = OnlineRepositoryDiscovery::new(net, &origin, manifest.clone())?
        .with_max_depth(args.max_depth.or(config.discovery.max_depth))
        .with_event_sender(tx)
        .discover()
        .await?;

    Ok(CommandOutput::Discover(DiscoverySummary::new(
        &origin, &manifest, report,
    )))
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled: bool) {
    let default_filter = if debug_enabled {
        "debug,hyper=info,reqwest=info"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if json_mode {
        // JSON lines on stderr; stdout carries the report
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(debug_enabled)
            .with_env_filter(filter)
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, command: &Commands) {
    if let Commands::Validate(ValidateArgs {
        origin,
        repository,
        policy,
        provider,
        max_concurrent_tasks,
        timeout,
        no_cache,
    }) = command
    {
        if let Some(origin) = origin {
            config.validation.origin = Some(origin.clone());
        }
        if let Some(repository) = repository {
            config.validation.repository = Some(repository.clone());
        }
        if let Some(policy) = policy {
            config.validation.policy = *policy;
        }
        if let Some(provider) = provider {
            config.validation.provider = *provider;
        }
        if let Some(tasks) = max_concurrent_tasks {
            config.validation.max_concurrent_tasks = *tasks;
        }
        if let Some(timeout) = timeout {
            config.validation.timeout_secs = *timeout;
        }
        if *no_cache {
            config.cache.enabled = false;
        }
    }
}
