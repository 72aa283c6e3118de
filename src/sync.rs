//! The sync pipeline: load → scan → reconcile → write.
//!
//! The catalog travels through the stages as a plain value. Nothing is shared
//! between runs except the catalog file itself.
//!
//! Progress is reported as [`SyncEvent`]s on an optional channel while the run
//! is still going: the loader fallback as soon as it happens, additions and
//! removals before the catalog is written. A failed write therefore still
//! leaves a record of what was about to change.

use crate::catalog::{self, CatalogError, LoadSource};
use crate::config::{ConfigError, SyncConfig};
use crate::dates::{DateSource, GitDates, NoDates};
use crate::reconcile::{Reconciliation, reconcile};
use crate::scan::{self, ScanError};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Scan(#[from] ScanError),
    #[error("Catalog write failed: {0}")]
    Catalog(#[from] CatalogError),
}

/// Whether to persist the reconciled catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite the catalog file.
    Write,
    /// Report what would change, leave the file alone.
    DryRun,
}

/// Progress notifications emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The prior catalog was missing or unreadable; starting from empty.
    CatalogFallback { path: PathBuf, source: LoadSource },
    /// A new entry was created for `key`.
    EntryAdded { key: String, mode: Mode },
    /// Entries were dropped because their files are gone.
    EntriesRemoved { count: usize, mode: Mode },
}

/// Everything a caller needs to report on a run.
#[derive(Debug)]
pub struct SyncReport {
    pub catalog_path: PathBuf,
    pub images_root: PathBuf,
    /// How the prior catalog was obtained.
    pub loaded_from: LoadSource,
    /// Number of image files found.
    pub scanned: usize,
    /// The reconciled catalog, sorted newest first.
    pub result: Reconciliation,
    pub written: bool,
}

/// The date source a config asks for.
pub fn date_source(config: &SyncConfig) -> Box<dyn DateSource> {
    if config.dates.use_git {
        Box::new(GitDates)
    } else {
        Box::new(NoDates)
    }
}

/// Run one sync pass with an explicit date source.
pub fn run_with(
    config: &SyncConfig,
    dates: &dyn DateSource,
    mode: Mode,
    events: Option<Sender<SyncEvent>>,
) -> Result<SyncReport, SyncError> {
    let emit = |event: SyncEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let loaded = catalog::load(&config.catalog);
    if loaded.is_fallback() {
        emit(SyncEvent::CatalogFallback {
            path: config.catalog.clone(),
            source: loaded.source.clone(),
        });
    }

    let scanned = scan::scan(&config.images_root)?;
    let mut result = reconcile(loaded.catalog, &scanned, dates);

    for key in &result.added {
        emit(SyncEvent::EntryAdded {
            key: key.clone(),
            mode,
        });
    }
    if result.removed_count() > 0 {
        emit(SyncEvent::EntriesRemoved {
            count: result.removed_count(),
            mode,
        });
    }

    let written = match mode {
        Mode::Write => {
            catalog::write(&config.catalog, &mut result.catalog)?;
            true
        }
        Mode::DryRun => {
            catalog::sort_by_date(&mut result.catalog);
            false
        }
    };

    tracing::debug!(
        added = result.added_count(),
        removed = result.removed_count(),
        written,
        "sync finished"
    );

    Ok(SyncReport {
        catalog_path: config.catalog.clone(),
        images_root: config.images_root.clone(),
        loaded_from: loaded.source,
        scanned: scanned.len(),
        result,
        written,
    })
}

/// Run one sync pass using the date source selected by `config`.
pub fn run(
    config: &SyncConfig,
    mode: Mode,
    events: Option<Sender<SyncEvent>>,
) -> Result<SyncReport, SyncError> {
    let dates = date_source(config);
    run_with(config, dates.as_ref(), mode, events)
}
