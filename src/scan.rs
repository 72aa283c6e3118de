//! Directory scanning.
//!
//! Walks the image root recursively and reports every regular file with a
//! recognized image extension. The directory an image sits in, relative to the
//! root, is its **collection**:
//!
//! ```text
//! src/data/images/                 # Scan root
//! ├── cover.jpg                    # collection "."
//! ├── collectionA/
//! │   ├── sunset-beach.jpg         # collection "collectionA"
//! │   └── notes.txt                # ignored (not an image)
//! └── travel/
//!     └── japan/
//!         └── 001-tokyo.JPG        # collection "travel/japan"
//! ```
//!
//! Extensions are matched case-insensitively against [`IMAGE_EXTENSIONS`].
//! Symbolic links are neither followed nor reported. Directory entries are
//! visited in file-name order so repeated scans report files in the same order,
//! though callers should still treat the result as a set.
//!
//! Any filesystem error (missing root, unreadable subdirectory) aborts the scan.

use crate::catalog::entry_key;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Image root does not exist: {0}")]
    MissingRoot(PathBuf),
    #[error("Image root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// An image file found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedImage {
    /// Full path to the file.
    pub path: PathBuf,
    /// Parent directory relative to the root, `/`-separated; `.` for the root itself.
    pub collection: String,
    /// Base name of the file.
    pub filename: String,
}

impl ScannedImage {
    /// Catalog key for this file: `collection/filename`.
    pub fn key(&self) -> String {
        entry_key(&self.collection, &self.filename)
    }
}

/// Recursively collect all image files under `root`.
pub fn scan(root: &Path) -> Result<Vec<ScannedImage>, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_image(entry.path()) {
            continue;
        }
        // Entries yielded by WalkDir always live under `root`.
        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        images.push(ScannedImage {
            path: entry.path().to_path_buf(),
            collection: collection_of(rel_path),
            filename: entry.file_name().to_string_lossy().into_owned(),
        });
    }

    tracing::debug!(root = %root.display(), count = images.len(), "scanned image root");
    Ok(images)
}

/// Whether the path's extension is one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Collection name for a root-relative file path.
fn collection_of(rel_path: &Path) -> String {
    let parts: Vec<String> = rel_path
        .parent()
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
