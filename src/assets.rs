//! Static asset discovery.
//!
//! Walks a directory tree and lists every regular file in it. The server
//! records the list at startup; nothing routes to it yet.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Error;

/// Absolute paths of every regular file under `root`, sorted.
///
/// Symlinks are not followed.
pub fn collect(root: impl AsRef<Path>) -> Result<Vec<PathBuf>, Error> {
    let root = root.as_ref().canonicalize()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
