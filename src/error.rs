//! Error taxonomy shared by the loader, the condition registry and the pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::asset::AssetKind;

/// Generic result type used across the crate.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Failures raised while loading a manifest and registering its assets.
#[derive(Debug, Error)]
pub enum LoaderError {
  /// The manifest path does not point at a file.
  #[error("asset manifest cannot be found at {}", .0.display())]
  ManifestNotFound(PathBuf),

  /// The manifest exists but could not be read.
  #[error("failed to read asset manifest {}", .0.display())]
  ManifestRead(PathBuf, #[source] std::io::Error),

  /// The manifest could not be parsed as YAML.
  #[error("failed to parse asset manifest {}", .0.display())]
  ManifestParse(PathBuf, #[source] serde_yaml::Error),

  /// A condition was registered against a handle that can never match.
  #[error("{kind} conditions must target a non-empty handle, got {handle:?}")]
  InvalidCondition {
    /// Asset kind the condition was registered for.
    kind: AssetKind,
    /// Offending handle.
    handle: String,
  },

  /// A read-only descriptor field was written through the dynamic interface.
  #[error("asset field `{0}` is read-only")]
  ReadOnlyField(String),

  /// The base URL of a descriptor was set more than once.
  #[error("base url for `{0}` has already been set")]
  BaseUrlAlreadySet(String),

  /// The modification time of an existing asset file could not be read.
  #[error("failed to read modification time of {}", .0.display())]
  Mtime(PathBuf, #[source] std::io::Error),

  /// The host registration boundary rejected a call.
  #[error(transparent)]
  Host(Box<dyn std::error::Error + Send + Sync>),
}

impl LoaderError {
  /// Wrap an error returned by the host boundary without altering it.
  pub fn host<E>(err: E) -> Self
  where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
  {
    Self::Host(err.into())
  }
}
