//! Loading and interpreting the declarative asset manifest.

use std::fs;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::warn;

use crate::asset::{AssetKind, fields};
use crate::config::ThemeEnvironment;
use crate::error::{LoaderError, LoaderResult};
use crate::pipeline::trailing_slash;

/// Deserialised representation of the asset manifest.
///
/// Section maps keep the manifest's declaration order, which is the order assets reach the
/// host.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Manifest {
  /// Script entries keyed by handle.
  #[serde(default, deserialize_with = "null_as_empty")]
  pub scripts: Map<String, Value>,
  /// Stylesheet entries keyed by handle.
  #[serde(default, deserialize_with = "null_as_empty")]
  pub styles: Map<String, Value>,
  /// Base URL overrides keyed by section name (`scripts`, `styles`).
  #[serde(default, deserialize_with = "null_as_empty")]
  pub base_urls: Map<String, Value>,
}

/// Read a section, treating null as empty and scalar keys (`1:`, `true:`) as their text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
  D: Deserializer<'de>,
{
  let Some(section) = Option::<Mapping>::deserialize(deserializer)? else {
    return Ok(Map::new());
  };

  let mut entries = Map::new();
  for (key, value) in section {
    let Some(name) = key_to_string(&key) else {
      warn!(key = ?key, "skipping manifest entry with a non-scalar key");
      continue;
    };
    entries.insert(name, serde_json::to_value(value).map_err(D::Error::custom)?);
  }
  Ok(entries)
}

fn key_to_string(key: &YamlValue) -> Option<String> {
  match key {
    YamlValue::String(text) => Some(text.clone()),
    YamlValue::Number(number) => Some(number.to_string()),
    YamlValue::Bool(flag) => Some(flag.to_string()),
    YamlValue::Null => Some(String::new()),
    _ => None,
  }
}

impl Manifest {
  /// Load a manifest from disk.
  pub fn from_path(path: &Path) -> LoaderResult<Self> {
    if !path.is_file() {
      return Err(LoaderError::ManifestNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)
      .map_err(|err| LoaderError::ManifestRead(path.to_path_buf(), err))?;
    Self::parse(&content).map_err(|err| LoaderError::ManifestParse(path.to_path_buf(), err))
  }

  /// Parse manifest text. JSON documents are accepted as well, being valid YAML.
  ///
  /// An empty document is an empty manifest.
  pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
    if content.trim().is_empty() {
      return Ok(Self::default());
    }

    let document: serde_yaml::Value = serde_yaml::from_str(content)?;
    if document.is_null() {
      return Ok(Self::default());
    }
    serde_yaml::from_value(document)
  }

  /// Entries declared for `kind`, in manifest order.
  pub fn entries(&self, kind: AssetKind) -> &Map<String, Value> {
    match kind {
      AssetKind::Script => &self.scripts,
      AssetKind::Style => &self.styles,
    }
  }

  /// Base URL for `kind`.
  ///
  /// Defaults to the template directory URI with a trailing slash. A manifest entry replaces
  /// the default whenever it is present, even when empty; non-scalar values read as empty.
  pub fn base_url(&self, kind: AssetKind, environment: &ThemeEnvironment) -> String {
    match self.base_urls.get(kind.manifest_key()) {
      Some(value) => fields::scalar_to_string(value).unwrap_or_default(),
      None => trailing_slash(&environment.template_directory_uri),
    }
  }
}
