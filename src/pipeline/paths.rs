use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::asset::{AssetDescriptor, AssetKind};
use crate::config::ThemeEnvironment;
use crate::error::LoaderResult;

fn remote_src_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^(https?:)?//").expect("invalid remote src regex"))
}

/// Sources with an `http:`/`https:` scheme or a leading `//` are served as-is.
pub fn is_remote_src(src: &str) -> bool {
  remote_src_pattern().is_match(src)
}

/// Ensure a path or URL ends with exactly one `/`.
pub fn trailing_slash(value: &str) -> String {
  format!("{}/", value.trim_end_matches(['/', '\\']))
}

/// On-disk location of a local asset inside the parent theme directory.
///
/// Scripts live under `js/`, stylesheets relative to the theme root.
pub fn asset_file_path(asset: &AssetDescriptor, environment: &ThemeEnvironment) -> Option<PathBuf> {
  let src = asset.src()?.trim_start_matches('/');
  let root = &environment.template_directory;
  Some(match asset.kind() {
    AssetKind::Script => root.join("js").join(src),
    AssetKind::Style => root.join(src),
  })
}

/// Serve local scripts from `<stylesheet uri>/js/`.
pub fn set_theme_script_path(
  mut asset: AssetDescriptor,
  environment: &ThemeEnvironment,
) -> LoaderResult<AssetDescriptor> {
  if let Some(src) = asset.src().filter(|src| !is_remote_src(src)) {
    let rewritten = format!(
      "{}/js/{}",
      environment.stylesheet_directory_uri.trim_end_matches('/'),
      src
    );
    asset.set_src(rewritten);
  }
  Ok(asset)
}

/// Serve local stylesheets from the stylesheet directory root.
pub fn set_theme_style_path(
  mut asset: AssetDescriptor,
  environment: &ThemeEnvironment,
) -> LoaderResult<AssetDescriptor> {
  if let Some(src) = asset.src().filter(|src| !is_remote_src(src)) {
    let rewritten = format!(
      "{}{}",
      trailing_slash(&environment.stylesheet_directory_uri),
      src
    );
    asset.set_src(rewritten);
  }
  Ok(asset)
}
