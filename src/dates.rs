//! Date resolution for new catalog entries.
//!
//! A new entry's `date` comes from the first source that produces one:
//!
//! 1. A [`DateSource`], by default the last git commit touching the file
//!    (`git log -1 --format=%cd --date=short <file>`, run from the file's directory).
//! 2. The file's modification time, as a UTC calendar date.
//! 3. Today's UTC date, if the file can't even be stat'ed.
//!
//! Resolution never fails. Sources return `Option` and swallow their own errors:
//! no repository, git not installed, an untracked file, or garbage on stdout
//! all look the same to the caller.

use crate::catalog::parse_date;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Best-effort date lookup for a file.
pub trait DateSource {
    /// A `YYYY-MM-DD` date for `path`, or `None` if this source has nothing.
    fn lookup(&self, path: &Path) -> Option<String>;
}

/// Last commit date from the git repository containing the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitDates;

impl DateSource for GitDates {
    fn lookup(&self, path: &Path) -> Option<String> {
        let dir = path.parent().filter(|d| !d.as_os_str().is_empty())?;
        let output = Command::new("git")
            .args(["log", "-1", "--format=%cd", "--date=short"])
            .arg(path.file_name()?)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .ok()
            .filter(|o| o.status.success())?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let date = stdout.trim();
        // Untracked files produce empty output with a zero exit status.
        parse_date(date).map(|_| date.to_string())
    }
}

/// A source that never has a date; every file falls through to its mtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDates;

impl DateSource for NoDates {
    fn lookup(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// The file's modification time as a UTC `YYYY-MM-DD`.
pub fn mtime_date(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let dt: DateTime<Utc> = modified.into();
    Some(dt.format(DATE_FORMAT).to_string())
}

/// Resolve the date for a newly discovered file. Always returns a date.
pub fn resolve_date(source: &dyn DateSource, path: &Path) -> String {
    if let Some(date) = source.lookup(path) {
        tracing::debug!(path = %path.display(), %date, "date from source");
        return date;
    }
    if let Some(date) = mtime_date(path) {
        tracing::debug!(path = %path.display(), %date, "date from mtime");
        return date;
    }
    let today = Utc::now().format(DATE_FORMAT).to_string();
    tracing::debug!(path = %path.display(), date = %today, "no mtime, using today");
    today
}
