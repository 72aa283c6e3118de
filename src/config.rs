//! Tool configuration.
//!
//! Settings live in an optional `catalog.toml`. Every key has a default, so the
//! file only needs the values that differ:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! images_root = "src/data/images"     # Directory tree to scan
//! catalog = "src/data/metadata.json"  # Catalog file to read and rewrite
//!
//! [dates]
//! use_git = true                      # Ask git for the last commit date first
//! ```
//!
//! Relative paths are resolved against the directory containing the config
//! file, so the tool behaves the same from any working directory.
//!
//! The user file is laid over the stock defaults as TOML tables, then
//! deserialized. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings loaded from `catalog.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Root of the image tree.
    pub images_root: PathBuf,
    /// Path of the JSON catalog.
    pub catalog: PathBuf,
    /// Date resolution settings.
    pub dates: DatesConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            images_root: PathBuf::from("src/data/images"),
            catalog: PathBuf::from("src/data/metadata.json"),
            dates: DatesConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "images_root must not be empty".into(),
            ));
        }
        if self.catalog.as_os_str().is_empty() {
            return Err(ConfigError::Validation("catalog must not be empty".into()));
        }
        Ok(())
    }

    /// Resolve relative paths against `base`.
    pub fn rebase(mut self, base: &Path) -> Self {
        if self.images_root.is_relative() {
            self.images_root = base.join(&self.images_root);
        }
        if self.catalog.is_relative() {
            self.catalog = base.join(&self.catalog);
        }
        self
    }
}

/// How new entries get their date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatesConfig {
    /// Query git for the last commit date before falling back to mtime.
    pub use_git: bool,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self { use_git: true }
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// [`SyncConfig::default`] as a TOML table, the layer `catalog.toml` sits on.
pub fn stock_defaults_table() -> Result<toml::Table, ConfigError> {
    toml::Table::try_from(SyncConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Lay the keys a user wrote in `catalog.toml` over `defaults`, in place.
///
/// A user `[dates]` section only replaces the keys it names; every other
/// default in that section survives. Top-level keys and scalars inside a
/// section are taken from the user file as-is.
pub fn apply_user_settings(defaults: &mut toml::Table, user: toml::Table) {
    for (key, value) in user {
        match value {
            toml::Value::Table(section) => match defaults.get_mut(&key) {
                Some(toml::Value::Table(existing)) => apply_user_settings(existing, section),
                _ => {
                    defaults.insert(key, toml::Value::Table(section));
                }
            },
            other => {
                defaults.insert(key, other);
            }
        }
    }
}

/// Build the effective settings from the user's `catalog.toml` table, if any.
pub fn resolve_config(user: Option<toml::Table>) -> Result<SyncConfig, ConfigError> {
    let mut settings = stock_defaults_table()?;
    if let Some(user) = user {
        apply_user_settings(&mut settings, user);
    }
    let config: SyncConfig = toml::Value::Table(settings).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`.
///
/// A missing file yields the stock defaults. Relative paths in the result are
/// anchored at the file's directory.
pub fn load_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let user = if path.exists() {
        let content = fs::read_to_string(path)?;
        Some(toml::from_str::<toml::Table>(&content)?)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        None
    };

    Ok(resolve_config(user)?.rebase(base_dir))
}

/// A commented `catalog.toml` with every key at its default.
///
/// Printed by the `gen-config` command.
pub fn stock_config_toml() -> &'static str {
    r#"# Gallery catalog configuration
# =============================
#
# All keys are optional; the values below are the defaults.
# Relative paths are resolved against the directory holding this file.

# Directory tree to scan. Each subdirectory (relative path) becomes a
# collection; recognized extensions are jpg, jpeg, png, gif and webp.
images_root = "src/data/images"

# JSON catalog to read and rewrite.
catalog = "src/data/metadata.json"

[dates]
# Date new entries with the file's last git commit when available.
# When false (or when git has no answer) the file's mtime is used.
use_git = true
"#
}
