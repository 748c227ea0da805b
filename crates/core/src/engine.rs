//! Sync engine
//!
//! Ties the scanner, inventory fetcher, diff rules and transfer scheduler
//! together into push, pull, listing and bulk-delete operations.

use std::path::Path;
use std::sync::Arc;

use crate::delete::{DeleteSummary, delete_all_objects};
use crate::diff::{SyncPlan, plan_pull, plan_push};
use crate::error::{Error, Result};
use crate::inventory::{RemoteInventory, fetch_inventory};
use crate::scanner::scan_local_tree;
use crate::traits::{ObjectStore, RemoteObjectEntry};
use crate::transfer::{DEFAULT_CONCURRENCY, SyncResult, TransferObserver, TransferScheduler};

/// Options for a sync pass
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum transfers in flight
    pub concurrency: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Entry point for push, pull and bucket maintenance
pub struct SyncEngine {
    store: Arc<dyn ObjectStore>,
    options: SyncOptions,
    observer: Option<Arc<dyn TransferObserver>>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn ObjectStore>, options: SyncOptions) -> Self {
        Self {
            store,
            options,
            observer: None,
        }
    }

    /// Attach an observer notified as each transfer finishes
    pub fn with_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Work out which uploads a push would perform
    pub async fn plan_push(&self, source_dir: &Path, bucket: &str) -> Result<SyncPlan> {
        let entries = scan_local_tree(source_dir)?;
        let objects = fetch_inventory(self.store.as_ref(), bucket).await?;
        let inventory = RemoteInventory::from_entries(&objects);

        tracing::info!(
            "Comparing {} local file(s) against {} remote object(s)",
            entries.len(),
            inventory.len()
        );
        Ok(plan_push(&entries, &inventory))
    }

    /// Work out which downloads a pull would perform
    pub async fn plan_pull(&self, bucket: &str, dest_dir: &Path) -> Result<SyncPlan> {
        let objects = fetch_inventory(self.store.as_ref(), bucket).await?;

        if dest_dir.exists() && !dest_dir.is_dir() {
            return Err(Error::InvalidPath(format!(
                "{} exists and is not a directory",
                dest_dir.display()
            )));
        }

        tracing::info!(
            "Comparing {} remote object(s) against {}",
            objects.len(),
            dest_dir.display()
        );
        Ok(plan_pull(&objects, dest_dir))
    }

    /// Upload every local file newer than its remote copy
    pub async fn push(&self, source_dir: &Path, bucket: &str) -> Result<SyncResult> {
        let plan = self.plan_push(source_dir, bucket).await?;
        Ok(self.execute(bucket, plan).await)
    }

    /// Download every object not older than its local copy
    pub async fn pull(&self, bucket: &str, dest_dir: &Path) -> Result<SyncResult> {
        let plan = self.plan_pull(bucket, dest_dir).await?;
        Ok(self.execute(bucket, plan).await)
    }

    /// Delete every object in `bucket`, one at a time
    pub async fn delete_all(&self, bucket: &str) -> Result<DeleteSummary> {
        delete_all_objects(self.store.as_ref(), bucket).await
    }

    /// Names of every bucket visible to the credentials
    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        let buckets = self.store.list_buckets().await?;
        if buckets.is_empty() {
            return Err(Error::NoBuckets);
        }
        Ok(buckets)
    }

    /// Every object in `bucket`; empty for an empty bucket
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<RemoteObjectEntry>> {
        fetch_inventory(self.store.as_ref(), bucket).await
    }

    fn scheduler(&self) -> TransferScheduler {
        let scheduler = TransferScheduler::new(self.options.concurrency);
        match &self.observer {
            Some(observer) => scheduler.with_observer(Arc::clone(observer)),
            None => scheduler,
        }
    }

    /// Run a previously computed plan against `bucket`
    ///
    /// Rejected items from the plan are reported as failures alongside the
    /// transfer failures.
    pub async fn execute(&self, bucket: &str, plan: SyncPlan) -> SyncResult {
        let SyncPlan {
            tasks,
            skipped,
            rejected,
            ..
        } = plan;

        let mut result = self
            .scheduler()
            .run(Arc::clone(&self.store), bucket, tasks)
            .await;

        result.skipped_count = skipped;
        result.failures.extend(rejected);
        result
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
