//! Remote inventory retrieval
//!
//! Follows continuation tokens until the listing is exhausted and merges every
//! page into one snapshot of the bucket.

use std::collections::HashMap;

use jiff::Timestamp;

use crate::error::Result;
use crate::traits::{ObjectStore, RemoteObjectEntry};

/// Fetch every object in `bucket`
///
/// A failure on any page aborts the whole fetch; no partial inventory is
/// returned. An empty bucket yields an empty vector.
pub async fn fetch_inventory(
    store: &dyn ObjectStore,
    bucket: &str,
) -> Result<Vec<RemoteObjectEntry>> {
    let mut objects = Vec::new();
    let mut continuation_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store
            .list_objects_page(bucket, continuation_token.take())
            .await?;
        pages += 1;
        objects.extend(page.objects);

        match page.next_continuation_token {
            Some(token) if !token.is_empty() => continuation_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!(
        "Fetched {} object(s) from bucket {bucket} in {pages} page(s)",
        objects.len()
    );
    Ok(objects)
}

/// Key to last-modified lookup built from one inventory snapshot
#[derive(Debug, Clone, Default)]
pub struct RemoteInventory {
    timestamps: HashMap<String, Timestamp>,
}

impl RemoteInventory {
    /// Build the lookup from fetched entries
    pub fn from_entries(entries: &[RemoteObjectEntry]) -> Self {
        let timestamps = entries
            .iter()
            .map(|e| (e.key.clone(), e.last_modified))
            .collect();
        Self { timestamps }
    }

    /// Last modified time of `key`, if present
    pub fn last_modified(&self, key: &str) -> Option<Timestamp> {
        self.timestamps.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
}
