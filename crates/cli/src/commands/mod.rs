//! CLI command definitions and execution
//!
//! Each subcommand lives in its own module and exposes
//! `execute(args, output_config) -> ExitCode`.

use std::sync::Arc;

use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};
use s3sync_core::{ConfigManager, DEFAULT_CONCURRENCY, SyncEngine, SyncOptions};
use s3sync_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod configure;
mod delete;
mod get;
mod list;
mod put;
mod sync;

/// s3-sync - keep a local directory and an S3 bucket in step
///
/// Transfers only the files whose modification time shows they are newer on
/// the sending side.
#[derive(Parser, Debug)]
#[command(name = "s3-sync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Maximum number of transfers in flight
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    pub concurrency: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store access credentials
    Configure(configure::ConfigureArgs),

    /// Upload a local directory to a bucket
    Put(put::PutArgs),

    /// Download a bucket into a local directory
    Get(get::GetArgs),

    /// List buckets or the objects in a bucket
    List(list::ListArgs),

    /// Delete every object in a bucket
    Delete(delete::DeleteArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    let options = SyncOptions {
        concurrency: cli.concurrency,
    };

    match cli.command {
        Commands::Configure(args) => configure::execute(args, output_config).await,
        Commands::Put(args) => put::execute(args, options, output_config).await,
        Commands::Get(args) => get::execute(args, options, output_config).await,
        Commands::List(args) => list::execute(args, options, output_config).await,
        Commands::Delete(args) => delete::execute(args, options, output_config).await,
    }
}

/// Load the stored credentials and build an engine on top of an S3 client
///
/// Reports the failure through `formatter` and returns the exit code to use.
async fn connect(formatter: &Formatter, options: SyncOptions) -> Result<SyncEngine, ExitCode> {
    let credentials = ConfigManager::new()
        .and_then(|manager| manager.load())
        .map_err(|e| {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        })?;

    let client = S3Client::new(&credentials).await.map_err(|e| {
        formatter.error(&format!("Failed to create S3 client: {e}"));
        ExitCode::NetworkError
    })?;

    Ok(SyncEngine::new(Arc::new(client), options))
}
