//! ObjectStore trait definition
//!
//! This trait defines the narrow interface the sync engine needs from an
//! S3-compatible storage service. It allows the engine to be decoupled from
//! the specific S3 SDK implementation and to be tested against in-memory stores.

use std::pin::Pin;

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::error::Result;

/// Streaming body of a downloaded object
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send>>;

/// A single object as reported by a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObjectEntry {
    /// Object key
    pub key: String,

    /// Last modified timestamp reported by the service
    pub last_modified: Timestamp,

    /// Size in bytes, when the service reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl RemoteObjectEntry {
    /// Create a new entry without size information
    pub fn new(key: impl Into<String>, last_modified: Timestamp) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size_bytes: None,
        }
    }

    /// Attach a size in bytes
    pub fn with_size(mut self, size: u64) -> Self {
        self.size_bytes = Some(size);
        self
    }
}

/// One page of a paginated object listing
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Objects on this page
    pub objects: Vec<RemoteObjectEntry>,

    /// Token for the next page; `None` on the last page
    pub next_continuation_token: Option<String>,
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List bucket names
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// List one page of objects in a bucket
    async fn list_objects_page(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage>;

    /// Upload a local file as the body of `key`
    async fn put_object(&self, bucket: &str, key: &str, body: tokio::fs::File) -> Result<()>;

    /// Open the body of `key` for streaming
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}
