//! Command line interface definition

use clap::{Args, Parser, Subcommand};
use mirrorcheck_types::{ChecksumProviderKind, PolicyKind};
use std::path::PathBuf;

/// mirrorcheck - verify that public mirrors serve what the origin publishes
#[derive(Parser)]
#[command(name = "mirrorcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify that published artifacts match what public mirrors serve")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compare every artifact of a repository against the configured mirrors
    #[command(alias = "v")]
    Validate(ValidateArgs),

    /// Crawl the origin's directory listings into a manifest file
    Discover(DiscoverArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Base URL the repository is published under
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,

    /// Repository directory or manifest file
    #[arg(long, value_name = "PATH")]
    pub repository: Option<PathBuf>,

    /// Comparison policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,

    /// Checksum provider the mirrors follow
    #[arg(long, value_enum)]
    pub provider: Option<ChecksumProviderKind>,

    /// Maximum number of artifacts compared at once
    #[arg(long, value_name = "N")]
    pub max_concurrent_tasks: Option<usize>,

    /// Abandon the run after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not read or write the fingerprint caches
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args)]
pub struct DiscoverArgs {
    /// Root of the directory listings to crawl
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,

    /// Manifest file to write
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Skip directories nested deeper than this below the root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Append to an existing manifest instead of replacing it
    #[arg(long)]
    pub append: bool,
}
