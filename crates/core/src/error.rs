//! Error types for s3sync-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.
//! Only failures that prevent a sync pass from being planned surface here;
//! per-object transfer failures are recorded in [`crate::SyncResult`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for s3sync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3sync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Credential file does not exist
    #[error("No configuration file found at {}. Run `s3-sync configure` first.", .0.display())]
    ConfigMissing(PathBuf),

    /// Credential file exists but is not in the expected format
    #[error("Corrupt configuration file: {0}. Run `s3-sync configure` to rewrite it.")]
    ConfigCorrupt(String),

    /// Other configuration problem (e.g. no usable config directory)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid local path or object key
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Listing buckets or objects failed
    #[error("Failed to retrieve data from storage: {0}")]
    Retrieval(String),

    /// A single object upload failed
    #[error("Failed to upload object: {0}")]
    Upload(String),

    /// A single object download failed
    #[error("Failed to download object: {0}")]
    Download(String),

    /// A single object deletion failed
    #[error("Failed to delete object: {0}")]
    Delete(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bucket holds no objects where at least one was required
    #[error("No objects found in bucket: {0}")]
    NoObjects(String),

    /// Account holds no buckets
    #[error("No buckets found")]
    NoBuckets,
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigMissing(_) | Error::ConfigCorrupt(_) | Error::Config(_) => 2, // UsageError
            Error::InvalidPath(_) => 2,                                                // UsageError
            Error::Retrieval(_)
            | Error::Upload(_)
            | Error::Download(_)
            | Error::Delete(_) => 3, // NetworkError
            Error::NoObjects(_) | Error::NoBuckets => 5, // NotFound
            _ => 1,                                      // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::ConfigMissing(PathBuf::from("/x")).exit_code(), 2);
        assert_eq!(Error::ConfigCorrupt("test".into()).exit_code(), 2);
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Retrieval("test".into()).exit_code(), 3);
        assert_eq!(Error::Upload("test".into()).exit_code(), 3);
        assert_eq!(Error::NoObjects("b".into()).exit_code(), 5);
        assert_eq!(Error::NoBuckets.exit_code(), 5);
        assert_eq!(Error::Io(std::io::Error::other("disk")).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::NoObjects("photos".into());
        assert_eq!(err.to_string(), "No objects found in bucket: photos");

        let err = Error::InvalidPath("/bad/path".into());
        assert_eq!(err.to_string(), "Invalid path: /bad/path");

        let err = Error::ConfigMissing(PathBuf::from("/tmp/config.cfg"));
        assert!(err.to_string().contains("/tmp/config.cfg"));
    }
}
