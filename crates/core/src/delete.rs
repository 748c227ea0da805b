//! Bulk deletion of a bucket's contents
//!
//! Objects are deleted one at a time. A failed deletion is counted and the
//! loop moves on.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::inventory::fetch_inventory;
use crate::traits::ObjectStore;

/// Outcome of deleting every object in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    /// Objects removed
    pub deleted_count: usize,

    /// Objects present when the deletion started
    pub total_count: usize,

    /// Keys whose deletion failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_keys: Vec<String>,
}

/// Delete every object in `bucket`
///
/// Returns [`Error::NoObjects`] for an empty bucket.
pub async fn delete_all_objects(store: &dyn ObjectStore, bucket: &str) -> Result<DeleteSummary> {
    let objects = fetch_inventory(store, bucket).await?;
    if objects.is_empty() {
        return Err(Error::NoObjects(bucket.to_string()));
    }

    let total_count = objects.len();
    let mut deleted_count = 0;
    let mut failed_keys = Vec::new();

    for object in objects {
        match store.delete_object(bucket, &object.key).await {
            Ok(()) => {
                tracing::debug!("Deleted {bucket}/{}", object.key);
                deleted_count += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to delete {bucket}/{}: {e}", object.key);
                failed_keys.push(object.key);
            }
        }
    }

    tracing::info!("Deleted {deleted_count} of {total_count} object(s) from {bucket}");
    Ok(DeleteSummary {
        deleted_count,
        total_count,
        failed_keys,
    })
}
