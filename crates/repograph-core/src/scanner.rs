//! Repository traversal.
//!
//! Walks a repository tree and yields a lazy sequence of directory and file
//! visits with root-relative, forward-slash-normalized paths. Directories
//! are always yielded before their contents, so a consumer can upsert a
//! parent directory node before any file beneath it is processed.
//!
//! A fixed set of generated/vendored directory names is skipped (see
//! [`crate::constants::ALWAYS_IGNORED_DIRS`]); every other entry is visited
//! regardless of extension.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::constants::should_ignore_dir;
use crate::errors::RepographError;

/// One visit produced by the repository walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEntry {
    /// A directory below the root. The root itself is never yielded.
    Directory {
        /// Root-relative normalized path.
        path: String,
        /// Root-relative path of the parent directory; empty at top level.
        parent: String,
    },

    /// A file anywhere in the tree.
    File {
        /// Absolute path, for reading content.
        abs_path: PathBuf,
        /// Root-relative normalized path.
        path: String,
        /// Root-relative path of the containing directory; empty at top level.
        parent: String,
    },
}

/// Walk a repository, yielding [`ScanEntry`] items lazily.
///
/// Entries are sorted by file name within each directory, and every
/// directory precedes its contents. Per-entry walk failures are yielded as
/// `Err` items so a consumer can record them without aborting.
pub fn scan_repository(
    root: &Path,
) -> Result<impl Iterator<Item = Result<ScanEntry, RepographError>>, RepographError> {
    if !root.is_dir() {
        return Err(RepographError::RepoRootNotFound(root.to_path_buf()));
    }

    let root_buf = root.to_path_buf();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                if let Some(name) = entry.file_name().to_str() {
                    return !should_ignore_dir(name);
                }
            }
            true
        })
        .build();

    Ok(walker.filter_map(move |item| match item {
        Err(e) => Some(Err(RepographError::Scan {
            path: root_buf.clone(),
            message: e.to_string(),
        })),
        Ok(entry) => {
            if entry.depth() == 0 {
                return None;
            }
            let rel = entry.path().strip_prefix(&root_buf).ok()?;
            let path = normalize_path(rel);
            let parent = parent_of(&path);
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

            if is_dir {
                Some(Ok(ScanEntry::Directory { path, parent }))
            } else {
                Some(Ok(ScanEntry::File {
                    abs_path: entry.into_path(),
                    path,
                    parent,
                }))
            }
        }
    }))
}

/// Join path components with forward slashes, regardless of platform.
pub fn normalize_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// The normalized parent of a normalized relative path; empty at top level.
pub fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
