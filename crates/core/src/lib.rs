//! s3sync-core: Sync engine for the s3-sync CLI
//!
//! This crate provides the core functionality for s3-sync, including:
//! - Credential file management
//! - Local tree scanning and key normalization
//! - Paginated remote inventory retrieval
//! - Timestamp-based push/pull decisions
//! - Bounded-concurrency transfer scheduling
//! - Bulk deletion of bucket contents
//!
//! This crate is designed to be independent of any specific S3 SDK; the
//! storage service is reached only through the [`ObjectStore`] trait.

pub mod config;
pub mod delete;
pub mod diff;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod path;
pub mod scanner;
pub mod traits;
pub mod transfer;

pub use config::{ConfigManager, Credentials};
pub use delete::{DeleteSummary, delete_all_objects};
pub use diff::{SyncPlan, should_download, should_upload};
pub use engine::{SyncEngine, SyncOptions};
pub use error::{Error, Result};
pub use inventory::{RemoteInventory, fetch_inventory};
pub use path::{key_to_local_path, normalize_key};
pub use scanner::{LocalFileEntry, scan_local_tree};
pub use traits::{ObjectPage, ObjectReader, ObjectStore, RemoteObjectEntry};
pub use transfer::{
    DEFAULT_CONCURRENCY, FailureKind, SyncResult, TransferFailure, TransferObserver,
    TransferScheduler, TransferTask,
};
