//! get command - Download a bucket
//!
//! Downloads every object unless the local copy is strictly newer. Missing
//! directories under the destination are created.

use std::path::PathBuf;

use clap::Args;
use s3sync_core::SyncOptions;

use super::sync::{self, Direction};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download a bucket into a local directory
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Source bucket
    pub bucket: String,

    /// Local destination directory (created if missing)
    pub dest_dir: PathBuf,

    /// Only show what would be downloaded
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the get command
pub async fn execute(args: GetArgs, options: SyncOptions, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let engine = match super::connect(&formatter, options).await {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let dest_dir = args.dest_dir;
    sync::run(
        engine,
        &args.bucket,
        Direction::Pull,
        args.dry_run,
        &formatter,
        async |engine| engine.plan_pull(&args.bucket, &dest_dir).await,
    )
    .await
}
