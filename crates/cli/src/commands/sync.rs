//! Shared driver for the put and get commands

use std::sync::Arc;

use s3sync_core::{
    Result, SyncEngine, SyncPlan, SyncResult, TransferFailure, TransferObserver, TransferTask,
};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Direction of a sync pass, used for wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Push,
    Pull,
}

impl Direction {
    fn verb(self) -> &'static str {
        match self {
            Direction::Push => "uploaded",
            Direction::Pull => "downloaded",
        }
    }

    fn progress_label(self) -> &'static str {
        match self {
            Direction::Push => "Uploading",
            Direction::Pull => "Downloading",
        }
    }
}

#[derive(Debug, Serialize)]
struct SyncOutput<'a> {
    status: &'static str,
    bucket: &'a str,
    transferred: usize,
    skipped: usize,
    failed: usize,
    failures: &'a [TransferFailure],
}

#[derive(Debug, Serialize)]
struct DryRunOutput<'a> {
    dry_run: bool,
    bucket: &'a str,
    planned: &'a [TransferTask],
    total_bytes: u64,
    skipped: usize,
    rejected: &'a [TransferFailure],
}

/// Plan a sync pass, then either report the plan or run it
///
/// `plan` performs the scan and listing; fatal errors there end the command
/// before anything is transferred.
pub(crate) async fn run<F>(
    engine: SyncEngine,
    bucket: &str,
    direction: Direction,
    dry_run: bool,
    formatter: &Formatter,
    plan: F,
) -> ExitCode
where
    F: AsyncFnOnce(&SyncEngine) -> Result<SyncPlan>,
{
    let spinner = ProgressBar::spinner(formatter.config(), "Comparing local and remote files...");
    let planned = plan(&engine).await;
    spinner.finish_and_clear();

    let plan = match planned {
        Ok(plan) => plan,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if dry_run {
        report_plan(bucket, direction, &plan, formatter);
        return ExitCode::Success;
    }

    let progress = Arc::new(ProgressBar::new(
        formatter.config(),
        plan.tasks.len() as u64,
        direction.progress_label(),
    ));
    let observer: Arc<dyn TransferObserver> = progress.clone();
    let result = engine
        .with_observer(observer)
        .execute(bucket, plan)
        .await;
    progress.finish_and_clear();

    report_result(bucket, direction, &result, formatter);

    if result.is_complete() {
        ExitCode::Success
    } else {
        ExitCode::GeneralError
    }
}

fn report_plan(bucket: &str, direction: Direction, plan: &SyncPlan, formatter: &Formatter) {
    if formatter.is_json() {
        formatter.json(&DryRunOutput {
            dry_run: true,
            bucket,
            planned: &plan.tasks,
            total_bytes: plan.total_bytes,
            skipped: plan.skipped,
            rejected: &plan.rejected,
        });
        return;
    }

    for task in &plan.tasks {
        let line = match task {
            TransferTask::Upload { source, key } => {
                format!("Would upload: {} -> {bucket}/{key}", source.display())
            }
            TransferTask::Download { key, destination } => {
                format!("Would download: {bucket}/{key} -> {}", destination.display())
            }
        };
        formatter.println(&line);
    }
    for failure in &plan.rejected {
        formatter.warning(&format!("Would skip {}: {}", failure.key, failure.message));
    }
    formatter.println(&format!(
        "{} object(s) ({}) would be {}, {} already up to date.",
        plan.tasks.len(),
        humansize::format_size(plan.total_bytes, humansize::BINARY),
        direction.verb(),
        plan.skipped
    ));
}

fn report_result(bucket: &str, direction: Direction, result: &SyncResult, formatter: &Formatter) {
    if formatter.is_json() {
        formatter.json(&SyncOutput {
            status: if result.is_complete() {
                "success"
            } else {
                "partial"
            },
            bucket,
            transferred: result.success_count,
            skipped: result.skipped_count,
            failed: result.failure_count(),
            failures: &result.failures,
        });
        return;
    }

    for failure in &result.failures {
        formatter.error(&format!("{}: {}", failure.key, failure.message));
    }

    formatter.success(&format!(
        "Successfully {} {} objects!",
        direction.verb(),
        result.success_count
    ));
    if result.skipped_count > 0 {
        formatter.println(&format!(
            "{} object(s) already up to date.",
            result.skipped_count
        ));
    }
    if !result.is_complete() {
        formatter.warning(&format!(
            "{} object(s) could not be {}.",
            result.failure_count(),
            direction.verb()
        ));
    }
}
