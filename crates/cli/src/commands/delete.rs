//! delete command - Empty a bucket
//!
//! Removes every object in a bucket, one at a time, after the user confirms
//! by typing `yes`.

use clap::Args;
use console::Term;
use s3sync_core::{DeleteSummary, SyncOptions};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Delete every object in a bucket
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Bucket to empty
    pub bucket: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the delete command
pub async fn execute(
    args: DeleteArgs,
    options: SyncOptions,
    output_config: OutputConfig,
) -> ExitCode {
    let formatter = Formatter::new(output_config);

    if !args.force && !confirm(&args.bucket, &formatter) {
        formatter.println("Delete cancelled.");
        return ExitCode::Success;
    }

    let engine = match super::connect(&formatter, options).await {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let summary = match engine.delete_all(&args.bucket).await {
        Ok(summary) => summary,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    report(&summary, &formatter);

    if summary.failed_keys.is_empty() {
        ExitCode::Success
    } else {
        ExitCode::GeneralError
    }
}

fn confirm(bucket: &str, formatter: &Formatter) -> bool {
    let term = Term::stderr();
    let prompt = format!(
        "Delete ALL objects in {}? Type 'yes' to confirm: ",
        formatter.bold(bucket)
    );
    if term.write_str(&prompt).is_err() {
        return false;
    }
    match term.read_line() {
        Ok(answer) => is_confirmation(&answer),
        Err(e) => {
            tracing::debug!("Could not read confirmation: {e}");
            false
        }
    }
}

fn is_confirmation(answer: &str) -> bool {
    answer.trim() == "yes"
}

fn report(summary: &DeleteSummary, formatter: &Formatter) {
    if formatter.is_json() {
        formatter.json(summary);
        return;
    }

    for key in &summary.failed_keys {
        formatter.error(&format!("Failed to delete {key}"));
    }
    formatter.success(&format!(
        "Successfully deleted {} out of {} objects!",
        summary.deleted_count, summary.total_count
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_answers() {
        assert!(is_confirmation("yes"));
        assert!(is_confirmation("yes\n"));
        assert!(!is_confirmation("YES"));
        assert!(!is_confirmation("Yes"));
        assert!(!is_confirmation("y"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("no"));
    }
}
