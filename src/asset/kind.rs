use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields;

/// The two families of front-end assets a manifest can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
  /// A JavaScript file.
  Script,
  /// A stylesheet.
  Style,
}

impl AssetKind {
  /// Every kind, in the order the loader processes them.
  pub const ALL: [AssetKind; 2] = [AssetKind::Script, AssetKind::Style];

  /// Top-level manifest key holding entries of this kind.
  pub fn manifest_key(self) -> &'static str {
    match self {
      Self::Script => "scripts",
      Self::Style => "styles",
    }
  }

  /// Singular name used in log output and error messages.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Script => "script",
      Self::Style => "style",
    }
  }

  /// Kind-specific field forwarded to the host alongside the common ones.
  pub fn placement_field(self) -> &'static str {
    match self {
      Self::Script => fields::FOOTER,
      Self::Style => fields::MEDIA,
    }
  }
}

impl fmt::Display for AssetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_kinds_to_manifest_sections() {
    assert_eq!(AssetKind::Script.manifest_key(), "scripts");
    assert_eq!(AssetKind::Style.manifest_key(), "styles");
  }

  #[test]
  fn scripts_are_processed_before_styles() {
    assert_eq!(AssetKind::ALL, [AssetKind::Script, AssetKind::Style]);
  }

  #[test]
  fn placement_field_depends_on_kind() {
    assert_eq!(AssetKind::Script.placement_field(), "footer");
    assert_eq!(AssetKind::Style.placement_field(), "media");
  }
}
