//! # Gallery Catalog
//!
//! Keeps a gallery's `metadata.json` in step with the image files on disk.
//! The filesystem decides *which* images exist; the catalog holds everything a
//! person writes about them (title, description, tags, date).
//!
//! # Pipeline
//!
//! A run is one synchronous pass:
//!
//! ```text
//! 1. Load       metadata.json  →  prior entries      (missing/corrupt → empty)
//! 2. Scan       images/        →  image files        (jpg, jpeg, png, gif, webp)
//! 3. Reconcile  entries + files →  entries           (add new, drop missing)
//! 4. Write      entries        →  metadata.json      (newest first, pretty JSON)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `catalog.toml` loading, defaults, validation |
//! | [`catalog`] | Entry model, forgiving loader, date-sorted writer |
//! | [`scan`] | Recursive image discovery; subdirectory paths become collections |
//! | [`reconcile`] | Additive/subtractive merge of scan results into the catalog |
//! | [`dates`] | Best-effort date lookup (git) with mtime fallback |
//! | [`naming`] | Titles generated from filenames |
//! | [`sync`] | Runs the stages in order and reports the outcome |
//! | [`output`] | Console lines for a run |
//!
//! # Existing Entries Are Never Regenerated
//!
//! Reconciliation only ever adds entries for new files and drops entries for
//! files that are gone. An entry for a file that is still present passes
//! through byte for byte, including keys this tool doesn't know about. Running
//! twice without filesystem changes is a no-op.

pub mod catalog;
pub mod config;
pub mod dates;
pub mod naming;
pub mod output;
pub mod reconcile;
pub mod scan;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_helpers;
