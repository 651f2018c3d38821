//! Ordered transformation steps applied to every descriptor before registration.
//!
//! Each step takes ownership of a descriptor, reads the host environment, and hands back the
//! updated descriptor. The order per kind is fixed: path rewriting always runs before
//! cache-busting so that the latter sees absolute URLs whenever the theme provides them.

mod cachebust;
mod paths;
mod placement;
mod version;

use tracing::trace;

use crate::asset::{AssetDescriptor, AssetKind};
use crate::config::ThemeEnvironment;
use crate::error::LoaderResult;

pub use cachebust::{cachebust_file_name, cachebust_src};
pub use paths::{
  asset_file_path, is_remote_src, set_theme_script_path, set_theme_style_path, trailing_slash,
};
pub use placement::place_in_footer;
pub use version::{version_token, version_with_mtime};

/// Signature shared by every pipeline step.
pub type Step = fn(AssetDescriptor, &ThemeEnvironment) -> LoaderResult<AssetDescriptor>;

const SCRIPT_STEPS: &[(&str, Step)] = &[
  ("version_with_mtime", version_with_mtime),
  ("place_in_footer", place_in_footer),
  ("set_theme_script_path", set_theme_script_path),
  ("cachebust_file_name", cachebust_file_name),
];

const STYLE_STEPS: &[(&str, Step)] = &[
  ("version_with_mtime", version_with_mtime),
  ("set_theme_style_path", set_theme_style_path),
  ("cachebust_file_name", cachebust_file_name),
];

/// Fixed sequence of steps for one asset kind.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
  kind: AssetKind,
  steps: &'static [(&'static str, Step)],
}

impl Pipeline {
  /// The pipeline registered for `kind`.
  pub fn for_kind(kind: AssetKind) -> Self {
    let steps = match kind {
      AssetKind::Script => SCRIPT_STEPS,
      AssetKind::Style => STYLE_STEPS,
    };
    Self { kind, steps }
  }

  /// Asset kind this pipeline handles.
  pub fn kind(&self) -> AssetKind {
    self.kind
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&'static str> {
    self.steps.iter().map(|(name, _)| *name).collect()
  }

  /// Apply every step in order, stopping at the first failure.
  pub fn run(
    &self,
    asset: AssetDescriptor,
    environment: &ThemeEnvironment,
  ) -> LoaderResult<AssetDescriptor> {
    self.steps.iter().try_fold(asset, |asset, (name, step)| {
      trace!(kind = %self.kind, handle = asset.handle(), step = *name, "applying pipeline step");
      step(asset, environment)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn script_steps_run_in_fixed_order() {
    assert_eq!(Pipeline::for_kind(AssetKind::Script).step_names(), vec![
      "version_with_mtime",
      "place_in_footer",
      "set_theme_script_path",
      "cachebust_file_name",
    ]);
  }

  #[test]
  fn style_steps_skip_footer_placement() {
    assert_eq!(Pipeline::for_kind(AssetKind::Style).step_names(), vec![
      "version_with_mtime",
      "set_theme_style_path",
      "cachebust_file_name",
    ]);
  }

  #[test]
  fn script_pipeline_resolves_local_source() {
    let environment = ThemeEnvironment {
      stylesheet_directory_uri: "https://example.com/wp-content/themes/child".into(),
      ..ThemeEnvironment::default()
    };
    let asset = AssetDescriptor::script(
      "app",
      json!({"src": "app.js", "deps": [], "version": null, "footer": null}),
    );

    let asset = Pipeline::for_kind(AssetKind::Script)
      .run(asset, &environment)
      .unwrap();

    assert_eq!(
      asset.src(),
      Some("https://example.com/wp-content/themes/child/js/app.js")
    );
    assert_eq!(asset.footer(), Some(true));
    assert_eq!(asset.version(), None);
  }

  #[test]
  fn cachebusting_sees_rewritten_theme_path() {
    let environment = ThemeEnvironment {
      stylesheet_directory_uri: "https://example.com/theme".into(),
      cachebust_filenames: true,
      ..ThemeEnvironment::default()
    };
    let asset = AssetDescriptor::style("main", json!({"src": "css/main.css", "version": "1.4"}));

    let asset = Pipeline::for_kind(AssetKind::Style)
      .run(asset, &environment)
      .unwrap();

    assert_eq!(asset.src(), Some("https://example.com/theme/css/main.1_4.css"));
    assert_eq!(asset.version(), None);
  }
}
