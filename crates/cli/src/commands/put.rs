//! put command - Upload a directory
//!
//! Uploads every file under a local directory whose modification time is newer
//! than the object stored under the same key.

use std::path::PathBuf;

use clap::Args;
use s3sync_core::SyncOptions;

use super::sync::{self, Direction};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a local directory to a bucket
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local directory to upload
    pub source_dir: PathBuf,

    /// Destination bucket
    pub bucket: String,

    /// Only show what would be uploaded
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the put command
pub async fn execute(args: PutArgs, options: SyncOptions, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    if !args.source_dir.is_dir() {
        formatter.error(&format!(
            "Source is not a directory: {}",
            args.source_dir.display()
        ));
        return ExitCode::UsageError;
    }

    let engine = match super::connect(&formatter, options).await {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let source_dir = args.source_dir;
    sync::run(
        engine,
        &args.bucket,
        Direction::Push,
        args.dry_run,
        &formatter,
        async |engine| engine.plan_push(&source_dir, &args.bucket).await,
    )
    .await
}
