//! The metadata catalog: model, loading, and writing.
//!
//! The catalog is a single JSON array stored at a fixed path (by default
//! `src/data/metadata.json`). Each element describes one image:
//!
//! ```json
//! [
//!   {
//!     "collection": "collectionA",
//!     "filename": "sunset-beach.jpg",
//!     "title": "Sunset Beach",
//!     "description": "",
//!     "tags": [],
//!     "date": "2024-03-01"
//!   }
//! ]
//! ```
//!
//! ## Ownership of fields
//!
//! `collection` and `filename` are derived from the file's location and form the
//! entry's identity. Everything else is seeded once when the entry is created and
//! then belongs to whoever edits the file.
//!
//! Loaded entries are kept as the JSON values they were read as, so an entry
//! that survives a sync is written back with the same keys, values, and key
//! order, whatever shape a person gave it. Typed access goes through accessors
//! that tolerate missing or oddly typed fields. An element without a string
//! `collection` and `filename` has no key; it can never match a file.
//!
//! ## Loading is forgiving, writing is not
//!
//! A missing file, a JSON syntax error, or a top level that isn't an array is
//! treated as an empty catalog (the next write replaces it). A failed write is
//! a hard error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One element of the catalog array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogEntry(Value);

impl CatalogEntry {
    /// A freshly seeded entry: empty description and tags.
    pub fn new(collection: &str, filename: &str, title: &str, date: &str) -> Self {
        Self(json!({
            "collection": collection,
            "filename": filename,
            "title": title,
            "description": "",
            "tags": [],
            "date": date,
        }))
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Parent directory of the image, relative to the scan root.
    pub fn collection(&self) -> Option<&str> {
        self.str_field("collection")
    }

    /// Base name of the image file.
    pub fn filename(&self) -> Option<&str> {
        self.str_field("filename")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// String tags; non-string elements are skipped.
    pub fn tags(&self) -> Vec<&str> {
        self.0
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The raw `date` string, if there is one.
    pub fn date(&self) -> Option<&str> {
        self.str_field("date")
    }

    /// Identity key `collection/filename`, or `None` if either part is missing.
    pub fn key(&self) -> Option<String> {
        Some(entry_key(self.collection()?, self.filename()?))
    }

    /// The entry's date as a calendar date, if it is well-formed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date().and_then(parse_date)
    }

    /// The entry exactly as stored.
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for CatalogEntry {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

pub type Catalog = Vec<CatalogEntry>;

/// Format a `(collection, filename)` pair as a catalog key.
pub fn entry_key(collection: &str, filename: &str) -> String {
    format!("{collection}/{filename}")
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// How the prior catalog state was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadSource {
    /// The file existed and parsed.
    Parsed,
    /// No catalog file yet.
    Missing,
    /// The file exists but couldn't be read or isn't a JSON array; the reason is kept for reporting.
    Unreadable(String),
}

/// Result of [`load`]: the entries plus where they came from.
#[derive(Debug)]
pub struct Loaded {
    pub catalog: Catalog,
    pub source: LoadSource,
}

impl Loaded {
    /// True if the loader substituted an empty catalog.
    pub fn is_fallback(&self) -> bool {
        self.source != LoadSource::Parsed
    }
}

/// Read the catalog at `path`.
///
/// Never fails: a missing file, an I/O error, a JSON syntax error, or a top
/// level that isn't an array all yield an empty catalog. Individual elements
/// are accepted whatever their shape.
pub fn load(path: &Path) -> Loaded {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no catalog file, starting empty");
            return Loaded {
                catalog: Vec::new(),
                source: LoadSource::Missing,
            };
        }
        Err(e) => return unreadable(path, e.to_string()),
    };

    match serde_json::from_str::<Catalog>(&content) {
        Ok(catalog) => {
            tracing::debug!(path = %path.display(), entries = catalog.len(), "loaded catalog");
            Loaded {
                catalog,
                source: LoadSource::Parsed,
            }
        }
        Err(e) => unreadable(path, e.to_string()),
    }
}

fn unreadable(path: &Path, reason: String) -> Loaded {
    tracing::info!(path = %path.display(), %reason, "catalog unreadable, starting empty");
    Loaded {
        catalog: Vec::new(),
        source: LoadSource::Unreadable(reason),
    }
}

/// Sort newest first.
///
/// The sort is stable: entries with the same date keep their relative order.
/// Entries whose date is missing or doesn't parse go last, also in input order.
pub fn sort_by_date(catalog: &mut Catalog) {
    catalog.sort_by_key(|entry| Reverse(entry.parsed_date()));
}

/// Render the catalog as pretty-printed JSON with a two-space indent.
pub fn to_json(catalog: &Catalog) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(catalog)?)
}

/// Sort the catalog by date and overwrite the file at `path`.
///
/// Parent directories are created if needed. The write is not atomic.
pub fn write(path: &Path, catalog: &mut Catalog) -> Result<(), CatalogError> {
    sort_by_date(catalog);
    let json = to_json(catalog)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::entry;
    use tempfile::TempDir;

    // =========================================================================
    // load() tests
    // =========================================================================

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loaded = load(&tmp.path().join("metadata.json"));
        assert!(loaded.catalog.is_empty());
        assert_eq!(loaded.source, LoadSource::Missing);
        assert!(loaded.is_fallback());
    }

    #[test]
    fn load_invalid_json_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(&path, "[{ not json").unwrap();

        let loaded = load(&path);
        assert!(loaded.catalog.is_empty());
        assert!(matches!(loaded.source, LoadSource::Unreadable(_)));
    }

    #[test]
    fn load_non_array_top_level_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(&path, r#"{"collection": "a"}"#).unwrap();

        let loaded = load(&path);
        assert!(loaded.catalog.is_empty());
        assert!(loaded.is_fallback());
    }

    #[test]
    fn load_reads_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(
            &path,
            r#"[{"collection":"A","filename":"x.jpg","title":"X","description":"d","tags":["t"],"date":"2024-01-02"}]"#,
        )
        .unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.source, LoadSource::Parsed);
        assert_eq!(loaded.catalog.len(), 1);
        let e = &loaded.catalog[0];
        assert_eq!(e.key().as_deref(), Some("A/x.jpg"));
        assert_eq!(e.description(), Some("d"));
        assert_eq!(e.tags(), vec!["t"]);
    }

    #[test]
    fn off_schema_entry_does_not_discard_the_rest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(
            &path,
            r#"[
  {"collection":"A","filename":"x.jpg","title":"Custom","description":"written by hand","tags":[],"date":"2020-01-01"},
  {"collection":"A","filename":"y.jpg","description":null,"date":20200101},
  {"title":"no key at all"},
  42
]"#,
        )
        .unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.source, LoadSource::Parsed);
        assert_eq!(loaded.catalog.len(), 4);
        assert_eq!(loaded.catalog[0].title(), Some("Custom"));
        assert_eq!(loaded.catalog[1].key().as_deref(), Some("A/y.jpg"));
        assert_eq!(loaded.catalog[1].title(), None);
        assert_eq!(loaded.catalog[1].description(), None);
        assert_eq!(loaded.catalog[1].parsed_date(), None);
        assert_eq!(loaded.catalog[2].key(), None);
        assert_eq!(loaded.catalog[3].key(), None);
    }

    #[test]
    fn entries_round_trip_with_their_key_order() {
        let json = r#"[
  {
    "date": "2020-01-01",
    "featured": true,
    "collection": "A",
    "tags": [
      "sea"
    ],
    "filename": "x.jpg",
    "title": "X"
  }
]"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(to_json(&catalog).unwrap(), json);
    }

    #[test]
    fn new_entry_has_canonical_shape() {
        let e = CatalogEntry::new("A", "x.jpg", "X", "2024-01-01");
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"{"collection":"A","filename":"x.jpg","title":"X","description":"","tags":[],"date":"2024-01-01"}"#
        );
    }

    // =========================================================================
    // sorting tests
    // =========================================================================

    #[test]
    fn sort_newest_first() {
        let mut catalog = vec![
            entry("A", "old.jpg", "2020-01-01"),
            entry("A", "new.jpg", "2024-06-30"),
            entry("A", "mid.jpg", "2022-03-15"),
        ];
        sort_by_date(&mut catalog);
        let names: Vec<&str> = catalog.iter().filter_map(CatalogEntry::filename).collect();
        assert_eq!(names, vec!["new.jpg", "mid.jpg", "old.jpg"]);
    }

    #[test]
    fn sort_keeps_input_order_for_equal_dates() {
        let mut catalog = vec![
            entry("A", "c.jpg", "2024-01-01"),
            entry("A", "a.jpg", "2024-01-01"),
            entry("A", "b.jpg", "2024-01-01"),
        ];
        sort_by_date(&mut catalog);
        let names: Vec<&str> = catalog.iter().filter_map(CatalogEntry::filename).collect();
        assert_eq!(names, vec!["c.jpg", "a.jpg", "b.jpg"]);
    }

    #[test]
    fn sort_puts_malformed_dates_last() {
        let mut catalog = vec![
            entry("A", "bad.jpg", "someday"),
            entry("A", "old.jpg", "2001-01-01"),
            CatalogEntry::from(json!({"collection": "A", "filename": "none.jpg"})),
            entry("A", "new.jpg", "2023-01-01"),
        ];
        sort_by_date(&mut catalog);
        let names: Vec<&str> = catalog.iter().filter_map(CatalogEntry::filename).collect();
        assert_eq!(names, vec!["new.jpg", "old.jpg", "bad.jpg", "none.jpg"]);
    }

    // =========================================================================
    // write() tests
    // =========================================================================

    #[test]
    fn write_uses_two_space_indent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        let mut catalog = vec![entry("A", "x.jpg", "2024-01-01")];

        write(&path, &mut catalog).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {\n    \"collection\": \"A\""));
        assert!(content.contains("\"tags\": []"));
        assert!(!content.ends_with('\n'));
    }

    #[test]
    fn write_sorts_before_serializing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        let mut catalog = vec![
            entry("A", "old.jpg", "2020-01-01"),
            entry("A", "new.jpg", "2024-01-01"),
        ];

        write(&path, &mut catalog).unwrap();

        let on_disk = load(&path).catalog;
        assert_eq!(on_disk[0].filename(), Some("new.jpg"));
        assert_eq!(on_disk[1].filename(), Some("old.jpg"));
    }

    #[test]
    fn write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src/data/metadata.json");
        write(&path, &mut Vec::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn write_into_a_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = write(tmp.path(), &mut Vec::new());
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn empty_json_array_loads_as_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(&path, "[]").unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.source, LoadSource::Parsed);
        assert!(!loaded.is_fallback());
    }
}
