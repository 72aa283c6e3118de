//! Console output for a sync run.
//!
//! ```text
//! Scanning src/data/images for new images and updating metadata...
//! No existing catalog at src/data/metadata.json (or it could not be read); creating a new one.
//! Added metadata for: collectionA/sunset-beach.jpg
//! Added metadata for: travel/japan/tokyo.png
//! Removed 1 entries for missing files.
//! Done! Added 2 new entries and removed 1 missing entries from metadata.json
//! ```
//!
//! Everything but the final summary arrives as a [`SyncEvent`] while the run
//! is in progress, so those lines appear even if writing the catalog fails.
//!
//! `format_*` functions are pure and return lines for testability;
//! `print_*` wrappers write them to stdout.

use crate::sync::{Mode, SyncEvent, SyncReport};
use std::path::Path;

pub fn format_start(images_root: &Path) -> String {
    format!(
        "Scanning {} for new images and updating metadata...",
        images_root.display()
    )
}

/// Lines for one progress event.
pub fn format_sync_event(event: &SyncEvent) -> Vec<String> {
    match event {
        SyncEvent::CatalogFallback { path, .. } => vec![format!(
            "No existing catalog at {} (or it could not be read); creating a new one.",
            path.display()
        )],
        SyncEvent::EntryAdded { key, mode } => {
            let verb = match mode {
                Mode::Write => "Added",
                Mode::DryRun => "Would add",
            };
            vec![format!("{verb} metadata for: {key}")]
        }
        SyncEvent::EntriesRemoved { count, mode } => {
            let verb = match mode {
                Mode::Write => "Removed",
                Mode::DryRun => "Would remove",
            };
            vec![format!("{verb} {count} entries for missing files.")]
        }
    }
}

/// Closing line for a finished run.
pub fn format_summary(report: &SyncReport) -> String {
    let added = report.result.added_count();
    let removed = report.result.removed_count();
    let name = report
        .catalog_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.catalog_path.display().to_string());

    if report.written {
        format!("Done! Added {added} new entries and removed {removed} missing entries from {name}")
    } else {
        format!(
            "Check only: {added} entries to add and {removed} to remove across {} images; {name} not written",
            report.scanned
        )
    }
}

pub fn print_start(images_root: &Path) {
    println!("{}", format_start(images_root));
}

pub fn print_summary(report: &SyncReport) {
    println!("{}", format_summary(report));
}
