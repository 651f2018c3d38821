use crate::asset::AssetDescriptor;
use crate::config::ThemeEnvironment;
use crate::error::LoaderResult;

/// Place scripts in the footer unless the manifest says otherwise.
pub fn place_in_footer(
  mut asset: AssetDescriptor,
  _environment: &ThemeEnvironment,
) -> LoaderResult<AssetDescriptor> {
  if asset.footer().is_none() {
    asset.set_footer(true);
  }
  Ok(asset)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn defaults_unset_footer_to_true() {
    let asset = AssetDescriptor::script("app", json!({"src": "app.js", "footer": null}));
    let asset = place_in_footer(asset, &ThemeEnvironment::default()).unwrap();
    assert_eq!(asset.footer(), Some(true));
  }

  #[test]
  fn explicit_placement_is_stable_across_runs() {
    let environment = ThemeEnvironment::default();
    for footer in [true, false] {
      let asset = AssetDescriptor::script("app", json!({"src": "app.js", "footer": footer}));
      let once = place_in_footer(asset, &environment).unwrap();
      assert_eq!(once.footer(), Some(footer));
      let twice = place_in_footer(once, &environment).unwrap();
      assert_eq!(twice.footer(), Some(footer));
    }
  }
}
