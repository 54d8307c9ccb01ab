//! Input discovery: find every PDF under a directory tree.
//!
//! Traversal errors (a missing root, an unreadable subdirectory) are skipped
//! rather than propagated, so a bad path yields an empty batch instead of an
//! aborted one.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Recursively collect every non-directory entry under `root` whose name
/// ends in `.pdf`, compared case-insensitively.
///
/// Symlinks to files are kept (the converter follows them); symlinks to
/// directories are not descended into. Results come back in traversal
/// order, which is not sorted.
pub fn find_pdfs(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let root = root.as_ref();
    let pdfs: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), err);
                None
            }
        })
        .filter(|e| !e.file_type().is_dir() && !e.path().is_dir() && is_pdf(e.path()))
        .map(|e| e.into_path())
        .collect();

    debug!("Discovered {} PDFs under {}", pdfs.len(), root.display());
    pdfs
}

/// True when the file name ends in `.pdf` in any letter case, including a
/// file named just `.pdf`.
pub fn is_pdf(path: &Path) -> bool {
    path.file_name().is_some_and(|name| {
        name.to_string_lossy()
            .to_ascii_lowercase()
            .ends_with(".pdf")
    })
}
