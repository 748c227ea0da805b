//! Local tree scanning
//!
//! Enumerates the regular files below a root directory and derives their
//! object keys. Symbolic links and special files are skipped.

use std::path::{Path, PathBuf};

use jiff::Timestamp;
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::normalize_key;

/// A regular file found below the scan root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFileEntry {
    /// Key relative to the scan root, `/`-separated
    pub relative_key: String,

    /// Absolute (or root-joined) path on disk
    pub absolute_path: PathBuf,

    /// Last modification time
    pub modified_at: Timestamp,

    /// Size in bytes
    pub size_bytes: u64,
}

/// Recursively list the regular files below `root`
///
/// The order follows filesystem traversal and is not sorted.
pub fn scan_local_tree(root: &Path) -> Result<Vec<LocalFileEntry>> {
    if !root.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} does not exist or is not a directory",
            root.display()
        )));
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", entry.path().display());
                continue;
            }
        };

        let modified_at = match metadata.modified().map(Timestamp::try_from) {
            Ok(Ok(ts)) => ts,
            _ => {
                tracing::warn!(
                    "Skipping {}: modification time unavailable",
                    entry.path().display()
                );
                continue;
            }
        };

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());

        entries.push(LocalFileEntry {
            relative_key: normalize_key(relative),
            absolute_path: entry.path().to_path_buf(),
            modified_at,
            size_bytes: metadata.len(),
        });
    }

    tracing::debug!("Scanned {} file(s) under {}", entries.len(), root.display());
    Ok(entries)
}

/// Read the modification time of a local file, if it exists as a regular file
pub fn local_modified_at(path: &Path) -> Option<Timestamp> {
    let metadata = std::fs::symlink_metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    metadata
        .modified()
        .ok()
        .and_then(|t| Timestamp::try_from(t).ok())
}
