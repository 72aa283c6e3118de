//! Merging scan results into the catalog.
//!
//! The merge is strictly additive/subtractive:
//!
//! - a scanned file with no entry gets a fresh one (generated title, empty
//!   description and tags, resolved date)
//! - an entry with no file is dropped
//! - an entry with a file is left exactly as it was
//!
//! Existing entries are never regenerated. Once an entry exists, its title,
//! description, tags, and date are owned by whoever edits the catalog, even if
//! the underlying file is later touched or recommitted.
//!
//! If the catalog already holds duplicate keys, the first entry wins and the
//! rest are counted as removed. Elements without a string `collection` and
//! `filename` identify no file and are removed too.

use crate::catalog::{Catalog, CatalogEntry};
use crate::dates::{DateSource, resolve_date};
use crate::naming::title_from_filename;
use crate::scan::ScannedImage;
use std::collections::HashSet;

/// Outcome of [`reconcile`].
#[derive(Debug)]
pub struct Reconciliation {
    /// Surviving entries in their prior order, followed by new entries in scan order.
    pub catalog: Catalog,
    /// Keys of the entries created, in scan order.
    pub added: Vec<String>,
    /// Entries dropped, in their prior order.
    pub removed: Vec<CatalogEntry>,
}

impl Reconciliation {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Bring `catalog` in line with the `scanned` files.
///
/// `dates` is only consulted for files that need a new entry.
pub fn reconcile(
    catalog: Catalog,
    scanned: &[ScannedImage],
    dates: &dyn DateSource,
) -> Reconciliation {
    let current: HashSet<String> = scanned.iter().map(ScannedImage::key).collect();

    let mut kept = Catalog::with_capacity(catalog.len());
    let mut removed = Vec::new();
    let mut seen = HashSet::new();
    for entry in catalog {
        match entry.key() {
            Some(key) if current.contains(&key) => {
                if seen.insert(key.clone()) {
                    kept.push(entry);
                } else {
                    tracing::warn!(%key, "dropping duplicate catalog entry");
                    removed.push(entry);
                }
            }
            Some(_) => removed.push(entry),
            None => {
                tracing::warn!(
                    entry = %entry.as_json(),
                    "dropping catalog entry without collection/filename"
                );
                removed.push(entry);
            }
        }
    }

    let mut added = Vec::new();
    for image in scanned {
        let key = image.key();
        if !seen.insert(key.clone()) {
            continue;
        }
        kept.push(new_entry(image, dates));
        added.push(key);
    }

    Reconciliation {
        catalog: kept,
        added,
        removed,
    }
}

/// A fresh entry for a newly discovered file.
pub fn new_entry(image: &ScannedImage, dates: &dyn DateSource) -> CatalogEntry {
    CatalogEntry::new(
        &image.collection,
        &image.filename,
        &title_from_filename(&image.filename),
        &resolve_date(dates, &image.path),
    )
}
