use serde_json::{Map, Value};

use super::fields::{self, BASE_URL, DATA, DEPS, FOOTER, HANDLE, MEDIA, SRC, VERSION};
use super::kind::AssetKind;
use crate::error::{LoaderError, LoaderResult};

/// Metadata for one script or stylesheet as it flows through the pipeline.
///
/// The handle and the base URL live outside the field map so they cannot be rewritten once
/// assigned. Everything else, including attributes the manifest invents, sits in `fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescriptor {
  kind: AssetKind,
  handle: String,
  base_url: Option<String>,
  fields: Map<String, Value>,
}

impl AssetDescriptor {
  /// Build a descriptor from a manifest entry.
  ///
  /// Entries that are not mappings (an empty `app:` line, for instance) produce a descriptor
  /// with no fields set. Raw `handle`/`base_url` keys are dropped so they cannot shadow the
  /// values owned by the descriptor.
  pub fn new(kind: AssetKind, handle: impl Into<String>, raw: Value) -> Self {
    let mut fields = match raw {
      Value::Object(map) => map,
      _ => Map::new(),
    };
    fields.remove(HANDLE);
    fields.remove(BASE_URL);

    Self {
      kind,
      handle: handle.into(),
      base_url: None,
      fields,
    }
  }

  /// Build a script descriptor.
  pub fn script(handle: impl Into<String>, raw: Value) -> Self {
    Self::new(AssetKind::Script, handle, raw)
  }

  /// Build a stylesheet descriptor.
  pub fn style(handle: impl Into<String>, raw: Value) -> Self {
    Self::new(AssetKind::Style, handle, raw)
  }

  /// Kind this descriptor was built for.
  pub fn kind(&self) -> AssetKind {
    self.kind
  }

  /// Unique handle within the asset kind.
  pub fn handle(&self) -> &str {
    &self.handle
  }

  /// Source URL or path, when the entry carries a string `src`.
  pub fn src(&self) -> Option<&str> {
    self.fields.get(SRC).and_then(Value::as_str)
  }

  /// Dependency handles; empty when unset or not a sequence.
  pub fn deps(&self) -> Vec<String> {
    match self.fields.get(DEPS) {
      Some(Value::Array(items)) => items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect(),
      _ => Vec::new(),
    }
  }

  /// Version rendered as text. Empty strings count as no version.
  pub fn version(&self) -> Option<String> {
    self
      .fields
      .get(VERSION)
      .and_then(fields::scalar_to_string)
      .filter(|version| !version.is_empty())
  }

  /// Auxiliary host data; empty when unset or not a mapping.
  pub fn data(&self) -> Map<String, Value> {
    match self.fields.get(DATA) {
      Some(Value::Object(map)) => map.clone(),
      _ => Map::new(),
    }
  }

  /// Base URL assigned by the loader, if any.
  pub fn base_url(&self) -> Option<&str> {
    self.base_url.as_deref()
  }

  /// Footer placement, `None` until the manifest or the pipeline decides.
  pub fn footer(&self) -> Option<bool> {
    match self.fields.get(FOOTER) {
      None | Some(Value::Null) => None,
      Some(Value::Bool(flag)) => Some(*flag),
      Some(other) => Some(fields::is_truthy(other)),
    }
  }

  /// Stylesheet media query.
  pub fn media(&self) -> Option<&str> {
    self.fields.get(MEDIA).and_then(Value::as_str)
  }

  /// Assign the base URL. Allowed exactly once per descriptor.
  pub fn set_base_url(&mut self, url: impl Into<String>) -> LoaderResult<()> {
    if self.base_url.is_some() {
      return Err(LoaderError::BaseUrlAlreadySet(self.handle.clone()));
    }
    self.base_url = Some(url.into());
    Ok(())
  }

  /// Replace the source URL or path.
  pub fn set_src(&mut self, src: impl Into<String>) {
    self.fields.insert(SRC.to_string(), Value::String(src.into()));
  }

  /// Replace the version; `None` stores an explicit null.
  pub fn set_version(&mut self, version: Option<String>) {
    let value = version.map_or(Value::Null, Value::String);
    self.fields.insert(VERSION.to_string(), value);
  }

  /// Set footer placement.
  pub fn set_footer(&mut self, footer: bool) {
    self.fields.insert(FOOTER.to_string(), Value::Bool(footer));
  }

  /// Read a field by name.
  ///
  /// Missing fields read as null, except `deps` and `data` which always read as containers.
  pub fn get(&self, name: &str) -> Value {
    match name {
      HANDLE => Value::String(self.handle.clone()),
      BASE_URL => self.base_url.clone().map_or(Value::Null, Value::String),
      DEPS => Value::Array(self.deps().into_iter().map(Value::String).collect()),
      DATA => Value::Object(self.data()),
      _ => self.fields.get(name).cloned().unwrap_or(Value::Null),
    }
  }

  /// Write a field by name. Unknown names become new attributes.
  pub fn set(&mut self, name: &str, value: impl Into<Value>) -> LoaderResult<()> {
    if fields::is_read_only(name) {
      return Err(LoaderError::ReadOnlyField(name.to_string()));
    }
    self.fields.insert(name.to_string(), value.into());
    Ok(())
  }

  /// Whether a field holds a non-null value.
  ///
  /// `deps` and `data` only count when they hold a sequence and a mapping, matching [`get`].
  ///
  /// [`get`]: Self::get
  pub fn exists(&self, name: &str) -> bool {
    match name {
      HANDLE => true,
      BASE_URL => self.base_url.is_some(),
      DEPS => matches!(self.fields.get(DEPS), Some(Value::Array(_))),
      DATA => matches!(self.fields.get(DATA), Some(Value::Object(_))),
      _ => self.fields.get(name).is_some_and(|value| !value.is_null()),
    }
  }

  /// Reset a field to null.
  pub fn unset(&mut self, name: &str) -> LoaderResult<()> {
    self.set(name, Value::Null)
  }
}
