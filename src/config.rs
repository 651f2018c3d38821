//! Host environment describing theme locations and the versioning switches.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

const DEFAULT_CONFIG_FILE: &str = "asset-loader.config.json";

/// Process variable that enables filename-based cache-busting when set to `on`.
pub const CACHEBUST_ENV: &str = "CACHEBUST_FILENAME";

/// Process variable that enables mtime-based versioning.
pub const VERSION_MTIME_ENV: &str = "SCRIPT_VERSION_MTIME";

/// Read-only view of the host's theme locations and feature flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeEnvironment {
  /// Public URI of the parent theme directory; seeds the default base URLs.
  pub template_directory_uri: String,
  /// File-system path of the parent theme directory, used for mtime lookups.
  pub template_directory: PathBuf,
  /// Public URI of the active (child) theme directory that local sources are served from.
  pub stylesheet_directory_uri: String,
  /// File-system path of the active (child) theme directory.
  ///
  /// Carried for hosts that need it; the pipeline resolves files against
  /// `template_directory` only.
  pub stylesheet_directory: PathBuf,
  /// Stamp unversioned assets with their file modification time.
  pub version_with_mtime: bool,
  /// Move the version token from the query string into the file name.
  pub cachebust_filenames: bool,
}

impl Default for ThemeEnvironment {
  fn default() -> Self {
    Self {
      template_directory_uri: "/theme".into(),
      template_directory: PathBuf::from("theme"),
      stylesheet_directory_uri: "/theme".into(),
      stylesheet_directory: PathBuf::from("theme"),
      version_with_mtime: false,
      cachebust_filenames: false,
    }
  }
}

impl ThemeEnvironment {
  /// Attempt to load the environment from the provided directory.
  ///
  /// A missing configuration file yields the defaults. A file that exists but fails to load
  /// is logged and also falls back to the defaults.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
      return Self::default();
    }

    Self::from_path(&candidate).unwrap_or_else(|err| {
      warn!(error = %err, "falling back to default theme environment");
      Self::default()
    })
  }

  /// Read the environment from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Overlay the feature flags from the process environment.
  pub fn with_process_env(self) -> Self {
    self.with_env_lookup(|key| std::env::var(key).ok())
  }

  /// Overlay the feature flags from an arbitrary variable lookup.
  ///
  /// Variables that are absent leave the current flag untouched. Cache-busting only turns on
  /// for the exact value `on`.
  pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(value) = lookup(CACHEBUST_ENV) {
      self.cachebust_filenames = value == "on";
    }

    if let Some(value) = lookup(VERSION_MTIME_ENV) {
      self.version_with_mtime = matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
      );
    }

    self
  }
}

/// Errors that can occur while loading the environment file.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// Failed to parse the JSON configuration file.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeMap;
  use tempfile::tempdir;

  fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: BTreeMap<String, String> = pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect();
    move |key: &str| vars.get(key).cloned()
  }

  #[test]
  fn defaults_disable_both_flags() {
    let environment = ThemeEnvironment::default();
    assert!(!environment.version_with_mtime);
    assert!(!environment.cachebust_filenames);
  }

  #[test]
  fn discover_returns_defaults_without_config_file() {
    let temp = tempdir().expect("failed to create temp dir");
    assert_eq!(ThemeEnvironment::discover(temp.path()), ThemeEnvironment::default());
  }

  #[test]
  fn discover_reads_partial_configuration() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"stylesheet_directory_uri": "https://example.com/child", "stylesheet_directory": "/srv/child", "version_with_mtime": true}"#,
    )
    .expect("failed to write config");

    let environment = ThemeEnvironment::discover(temp.path());
    assert_eq!(environment.stylesheet_directory_uri, "https://example.com/child");
    assert_eq!(environment.stylesheet_directory, PathBuf::from("/srv/child"));
    assert!(environment.version_with_mtime);
    assert_eq!(environment.template_directory_uri, "/theme");
  }

  #[test]
  fn discover_falls_back_on_malformed_configuration() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").expect("failed to write config");

    assert_eq!(ThemeEnvironment::discover(temp.path()), ThemeEnvironment::default());
  }

  #[test]
  fn from_path_reports_parse_errors() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("env.json");
    fs::write(&path, "[]").expect("failed to write config");

    let err = ThemeEnvironment::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("failed to parse"));
  }

  #[test]
  fn from_path_reports_read_errors_with_source() {
    let temp = tempdir().expect("failed to create temp dir");
    let err = ThemeEnvironment::from_path(&temp.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().starts_with("failed to read"));
  }

  #[test]
  fn cachebust_requires_exact_on_value() {
    let enabled = ThemeEnvironment::default().with_env_lookup(lookup(&[(CACHEBUST_ENV, "on")]));
    assert!(enabled.cachebust_filenames);

    let disabled = ThemeEnvironment {
      cachebust_filenames: true,
      ..ThemeEnvironment::default()
    }
    .with_env_lookup(lookup(&[(CACHEBUST_ENV, "ON")]));
    assert!(!disabled.cachebust_filenames);
  }

  #[test]
  fn absent_variables_keep_configured_flags() {
    let environment = ThemeEnvironment {
      version_with_mtime: true,
      cachebust_filenames: true,
      ..ThemeEnvironment::default()
    }
    .with_env_lookup(lookup(&[]));

    assert!(environment.version_with_mtime);
    assert!(environment.cachebust_filenames);
  }

  #[test]
  fn mtime_flag_accepts_common_truthy_values() {
    for value in ["1", "true", "TRUE", " on "] {
      let environment =
        ThemeEnvironment::default().with_env_lookup(lookup(&[(VERSION_MTIME_ENV, value)]));
      assert!(environment.version_with_mtime, "{value:?} should enable mtime versioning");
    }

    let environment =
      ThemeEnvironment::default().with_env_lookup(lookup(&[(VERSION_MTIME_ENV, "false")]));
    assert!(!environment.version_with_mtime);
  }
}
