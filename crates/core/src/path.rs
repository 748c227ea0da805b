//! Path and key conversion
//!
//! Object keys always use `/` separators and never start with a separator,
//! whatever the host path conventions are. Local paths are converted to keys
//! on push and keys are mapped back under a destination root on pull.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Convert a filesystem path into an object key
///
/// Drive prefixes, root separators, `.` and `..` components are dropped and
/// the remaining components are joined with `/`.
pub fn normalize_key(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a key denotes a directory placeholder rather than an object body
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// Map an object key to a local path below `root`
///
/// Keys that would resolve outside `root` are rejected.
pub fn key_to_local_path(root: &Path, key: &str) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    let mut depth = 0usize;

    for segment in key.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }

        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => {
                path.push(part);
                depth += 1;
            }
            _ => {
                return Err(Error::InvalidPath(format!(
                    "object key '{key}' does not map to a path inside {}",
                    root.display()
                )));
            }
        }
    }

    if depth == 0 {
        return Err(Error::InvalidPath(format!("object key '{key}' is empty")));
    }

    Ok(path)
}
