//! Shared test utilities.
//!
//! Builders for catalog entries and scan results, filesystem helpers for
//! laying out image trees in a `TempDir`, and [`FixedDates`], a deterministic
//! stand-in for the git date lookup.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = test_config(tmp.path());
//! let img = touch(&config.images_root, "collectionA/sunset-beach.jpg");
//! set_mtime(&img, "2024-03-01");
//! ```

use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::catalog::CatalogEntry;
use crate::config::SyncConfig;
use crate::dates::DateSource;
use crate::scan::ScannedImage;

// =========================================================================
// Builders
// =========================================================================

/// A catalog entry with a generic title and empty description/tags.
pub fn entry(collection: &str, filename: &str, date: &str) -> CatalogEntry {
    CatalogEntry::new(collection, filename, &format!("Title of {filename}"), date)
}

/// A scan result for a file that doesn't exist on disk.
pub fn scanned(collection: &str, filename: &str) -> ScannedImage {
    ScannedImage {
        path: Path::new(collection).join(filename),
        collection: collection.to_string(),
        filename: filename.to_string(),
    }
}

/// Config pointing at `<dir>/images` and `<dir>/metadata.json`, git disabled.
pub fn test_config(dir: &Path) -> SyncConfig {
    let mut config = SyncConfig {
        images_root: dir.join("images"),
        catalog: dir.join("metadata.json"),
        ..SyncConfig::default()
    };
    config.dates.use_git = false;
    fs::create_dir_all(&config.images_root).unwrap();
    config
}

// =========================================================================
// Filesystem helpers
// =========================================================================

/// Create an empty file at `root/rel`, including parent directories.
pub fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, b"fake image").unwrap();
    path
}

/// Set a file's mtime to noon UTC on `date` (`YYYY-MM-DD`).
pub fn set_mtime(path: &Path, date: &str) {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let noon = Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
    let time: SystemTime = noon.into();
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

// =========================================================================
// Extractors
// =========================================================================

pub fn scanned_keys(images: &[ScannedImage]) -> Vec<String> {
    images.iter().map(ScannedImage::key).collect()
}

pub fn catalog_keys(catalog: &[CatalogEntry]) -> Vec<String> {
    catalog.iter().filter_map(CatalogEntry::key).collect()
}

// =========================================================================
// Fake date source
// =========================================================================

/// Date source answering from a fixed filename → date table.
#[derive(Debug, Default)]
pub struct FixedDates {
    by_filename: HashMap<String, String>,
}

impl FixedDates {
    pub fn new(dates: &[(&str, &str)]) -> Self {
        Self {
            by_filename: dates
                .iter()
                .map(|(f, d)| (f.to_string(), d.to_string()))
                .collect(),
        }
    }
}

impl DateSource for FixedDates {
    fn lookup(&self, path: &Path) -> Option<String> {
        let name = path.file_name()?.to_string_lossy();
        self.by_filename.get(name.as_ref()).cloned()
    }
}
