use std::fs;
use std::time::UNIX_EPOCH;

use tracing::debug;

use super::paths::asset_file_path;
use crate::asset::AssetDescriptor;
use crate::asset::fields::VERSION;
use crate::config::ThemeEnvironment;
use crate::error::{LoaderError, LoaderResult};

/// Replace every `.` in a version with `_` so it can live inside a file name.
pub fn version_token(version: &str) -> String {
  version.replace('.', "_")
}

/// Default the version of unversioned assets to the file's modification time.
///
/// Only a missing or null version is stamped; an explicit empty string is kept. Only active when mtime versioning is enabled. The resulting version, whether it came from
/// the manifest or from the file, is normalised with [`version_token`].
pub fn version_with_mtime(
  mut asset: AssetDescriptor,
  environment: &ThemeEnvironment,
) -> LoaderResult<AssetDescriptor> {
  if !environment.version_with_mtime {
    return Ok(asset);
  }

  if !asset.exists(VERSION)
    && let Some(path) = asset_file_path(&asset, environment)
    && path.exists()
  {
    let modified = fs::metadata(&path)
      .and_then(|metadata| metadata.modified())
      .map_err(|err| LoaderError::Mtime(path.clone(), err))?;
    let seconds = modified
      .duration_since(UNIX_EPOCH)
      .map_or(0, |elapsed| elapsed.as_secs());
    debug!(handle = asset.handle(), path = %path.display(), seconds, "versioned asset by mtime");
    asset.set_version(Some(seconds.to_string()));
  }

  if let Some(version) = asset.version() {
    asset.set_version(Some(version_token(&version)));
  }

  Ok(asset)
}
