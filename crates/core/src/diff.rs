//! Timestamp-based transfer decisions
//!
//! Timestamps are compared at one-second granularity. The two directions use
//! different skip rules:
//!
//! - push skips when the local file is *not newer* than the remote object
//! - pull skips only when the local file is *strictly newer* than the object
//!
//! An equal timestamp therefore skips an upload but repeats a download.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use jiff::Timestamp;

use crate::inventory::RemoteInventory;
use crate::path::{is_directory_marker, key_to_local_path};
use crate::scanner::{LocalFileEntry, local_modified_at};
use crate::traits::RemoteObjectEntry;
use crate::transfer::{FailureKind, TransferFailure, TransferTask};

/// Whether a local file must be uploaded
pub fn should_upload(local_modified: Timestamp, remote_modified: Option<Timestamp>) -> bool {
    match remote_modified {
        Some(remote) => local_modified.as_second() > remote.as_second(),
        None => true,
    }
}

/// Whether a remote object must be downloaded
pub fn should_download(local_modified: Option<Timestamp>, remote_modified: Timestamp) -> bool {
    match local_modified {
        Some(local) => local.as_second() <= remote_modified.as_second(),
        None => true,
    }
}

/// Work list produced by diffing one side against the other
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Transfers that must run
    pub tasks: Vec<TransferTask>,

    /// Items already up to date
    pub skipped: usize,

    /// Bytes the planned transfers will move, as far as sizes are known
    pub total_bytes: u64,

    /// Items that cannot be transferred at all
    pub rejected: Vec<TransferFailure>,
}

/// Plan the uploads needed to bring the bucket up to date with local files
pub fn plan_push(entries: &[LocalFileEntry], inventory: &RemoteInventory) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for entry in entries {
        let remote = inventory.last_modified(&entry.relative_key);
        if should_upload(entry.modified_at, remote) {
            plan.tasks.push(TransferTask::Upload {
                source: entry.absolute_path.clone(),
                key: entry.relative_key.clone(),
            });
            plan.total_bytes += entry.size_bytes;
        } else {
            tracing::debug!("Skipping upload of {}: remote is up to date", entry.relative_key);
            plan.skipped += 1;
        }
    }

    plan
}

/// Plan the downloads needed to bring `destination` up to date with the bucket
pub fn plan_pull(objects: &[RemoteObjectEntry], destination: &Path) -> SyncPlan {
    let mut plan = SyncPlan::default();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for object in objects {
        if is_directory_marker(&object.key) {
            tracing::debug!("Skipping directory marker {}", object.key);
            plan.skipped += 1;
            continue;
        }

        let local_path = match key_to_local_path(destination, &object.key) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Refusing to download {}: {e}", object.key);
                plan.rejected.push(TransferFailure::new(
                    &object.key,
                    FailureKind::InvalidKey,
                    e.to_string(),
                ));
                continue;
            }
        };

        // Keys such as `a//b` and `a/b` share one local path; the first one wins
        if !claimed.insert(local_path.clone()) {
            tracing::warn!(
                "Refusing to download {}: another object maps to {}",
                object.key,
                local_path.display()
            );
            plan.rejected.push(TransferFailure::new(
                &object.key,
                FailureKind::InvalidKey,
                format!("{} is already claimed by another key", local_path.display()),
            ));
            continue;
        }

        if should_download(local_modified_at(&local_path), object.last_modified) {
            plan.tasks.push(TransferTask::Download {
                key: object.key.clone(),
                destination: local_path,
            });
            plan.total_bytes += object.size_bytes.unwrap_or(0);
        } else {
            tracing::debug!("Skipping download of {}: local copy is newer", object.key);
            plan.skipped += 1;
        }
    }

    plan
}
