//! Bounded-concurrency transfer scheduling
//!
//! Every [`TransferTask`] runs as its own tokio task. A semaphore caps how many
//! are in flight; the dispatch loop waits for a free slot before spawning the
//! next one. Failures are recorded per task and never affect siblings. The
//! caller only sees the aggregate once every task has finished.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};

use crate::traits::ObjectStore;

/// Number of transfers allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 8;

/// One unit of transfer work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum TransferTask {
    /// Upload a local file to `key`
    Upload { source: PathBuf, key: String },
    /// Download `key` into a local file
    Download { key: String, destination: PathBuf },
}

impl TransferTask {
    /// Object key involved in this transfer
    pub fn key(&self) -> &str {
        match self {
            TransferTask::Upload { key, .. } | TransferTask::Download { key, .. } => key,
        }
    }

    /// Local file involved in this transfer
    pub fn local_path(&self) -> &Path {
        match self {
            TransferTask::Upload { source, .. } => source,
            TransferTask::Download { destination, .. } => destination,
        }
    }
}

/// Why a single item could not be transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The storage service rejected or aborted the request
    Transfer,
    /// The local file could not be opened, created or written
    LocalIo,
    /// The object key cannot be mapped to a local path
    InvalidKey,
}

/// A failed item with the reason it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferFailure {
    pub key: String,
    pub kind: FailureKind,
    pub message: String,
}

impl TransferFailure {
    pub fn new(key: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Aggregate outcome of one sync pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncResult {
    /// Transfers that completed successfully
    pub success_count: usize,

    /// Items that were already up to date
    pub skipped_count: usize,

    /// Items that failed, in completion order
    pub failures: Vec<TransferFailure>,
}

impl SyncResult {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when no item failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Receives a callback as each transfer finishes
///
/// Callbacks arrive on the dispatching task, in completion order.
pub trait TransferObserver: Send + Sync {
    fn on_finished(&self, key: &str, success: bool);
}

/// Runs transfer tasks with a fixed concurrency ceiling
#[derive(Clone)]
pub struct TransferScheduler {
    concurrency: usize,
    observer: Option<Arc<dyn TransferObserver>>,
}

impl TransferScheduler {
    /// Create a scheduler; a concurrency of zero is raised to one
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            observer: None,
        }
    }

    /// Attach an observer notified once per finished task
    pub fn with_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every task and wait for all of them to finish
    pub async fn run(
        &self,
        store: Arc<dyn ObjectStore>,
        bucket: &str,
        tasks: Vec<TransferTask>,
    ) -> SyncResult {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let bucket: Arc<str> = Arc::from(bucket);
        let mut join_set = JoinSet::new();
        let mut keys: HashMap<Id, String> = HashMap::new();
        let mut result = SyncResult::default();
        let total = tasks.len();

        tracing::info!(
            "Starting {total} transfer(s) on bucket {bucket} with concurrency {}",
            self.concurrency
        );

        for task in tasks {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                self.record_failure(
                    &mut result,
                    TransferFailure::new(task.key(), FailureKind::Transfer, "scheduler closed"),
                );
                continue;
            };

            let store = Arc::clone(&store);
            let bucket = Arc::clone(&bucket);
            let key = task.key().to_string();
            let handle = join_set.spawn(async move {
                let outcome = execute_task(store.as_ref(), &bucket, &task).await;
                drop(permit);
                outcome
            });
            keys.insert(handle.id(), key);

            while let Some(joined) = join_set.try_join_next_with_id() {
                self.record(&mut result, &mut keys, joined);
            }
        }

        while let Some(joined) = join_set.join_next_with_id().await {
            self.record(&mut result, &mut keys, joined);
        }

        tracing::info!(
            "Finished {total} transfer(s): {} succeeded, {} failed",
            result.success_count,
            result.failure_count()
        );
        result
    }

    fn record(
        &self,
        result: &mut SyncResult,
        keys: &mut HashMap<Id, String>,
        joined: std::result::Result<(Id, Result<(), TransferFailure>), JoinError>,
    ) {
        match joined {
            Ok((id, Ok(()))) => {
                let key = keys.remove(&id).unwrap_or_default();
                tracing::debug!("Transferred {key}");
                result.success_count += 1;
                if let Some(observer) = &self.observer {
                    observer.on_finished(&key, true);
                }
            }
            Ok((id, Err(failure))) => {
                keys.remove(&id);
                self.record_failure(result, failure);
            }
            Err(e) => {
                let key = keys.remove(&e.id()).unwrap_or_default();
                self.record_failure(
                    result,
                    TransferFailure::new(key, FailureKind::Transfer, format!("task aborted: {e}")),
                );
            }
        }
    }

    fn record_failure(&self, result: &mut SyncResult, failure: TransferFailure) {
        tracing::warn!("Failed to transfer {}: {}", failure.key, failure.message);
        if let Some(observer) = &self.observer {
            observer.on_finished(&failure.key, false);
        }
        result.failures.push(failure);
    }
}

impl Default for TransferScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl std::fmt::Debug for TransferScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferScheduler")
            .field("concurrency", &self.concurrency)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

/// Suffix of the file a download streams into before replacing the destination
const PARTIAL_SUFFIX: &str = ".s3sync-part";

/// Sibling of `destination` that receives the body while it downloads
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    destination.with_file_name(name)
}

async fn execute_task(
    store: &dyn ObjectStore,
    bucket: &str,
    task: &TransferTask,
) -> Result<(), TransferFailure> {
    match task {
        TransferTask::Upload { source, key } => {
            let file = tokio::fs::File::open(source).await.map_err(|e| {
                TransferFailure::new(
                    key,
                    FailureKind::LocalIo,
                    format!("failed to open {}: {e}", source.display()),
                )
            })?;

            store
                .put_object(bucket, key, file)
                .await
                .map_err(|e| TransferFailure::new(key, FailureKind::Transfer, e.to_string()))
        }
        TransferTask::Download { key, destination } => {
            let mut body = store
                .get_object(bucket, key)
                .await
                .map_err(|e| TransferFailure::new(key, FailureKind::Transfer, e.to_string()))?;

            let local_io = |e: std::io::Error| {
                TransferFailure::new(
                    key,
                    FailureKind::LocalIo,
                    format!("failed to write {}: {e}", destination.display()),
                )
            };

            if let Some(parent) = destination.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(local_io)?;
            }

            // The existing local copy stays in place until the new body is complete
            let partial = partial_path(destination);
            let mut file = tokio::fs::File::create(&partial)
                .await
                .map_err(local_io)?;

            let mut copied = match tokio::io::copy(&mut body, &mut file).await {
                Ok(_) => file.flush().await.map_err(local_io),
                Err(e) => Err(TransferFailure::new(
                    key,
                    FailureKind::Transfer,
                    format!("body stream interrupted: {e}"),
                )),
            };
            drop(file);

            if copied.is_ok() {
                copied = tokio::fs::rename(&partial, destination)
                    .await
                    .map_err(local_io);
            }
            if copied.is_err() {
                let _ = tokio::fs::remove_file(&partial).await;
            }
            copied
        }
    }
}
