//! The registration boundary the loader hands resolved assets to.

use std::convert::Infallible;

use serde::Serialize;
use serde_json::Value;

use crate::asset::AssetKind;

/// Host environment capable of enqueueing scripts and stylesheets.
///
/// Implementations receive fully resolved arguments. Any error they return is propagated to
/// the caller of [`crate::AssetLoader::load`] without modification.
pub trait AssetHost {
  /// Failure type reported by the host.
  type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

  /// Register and enqueue a script.
  fn register_script(
    &mut self,
    handle: &str,
    src: &str,
    deps: &[String],
    version: Option<&str>,
    in_footer: bool,
  ) -> Result<(), Self::Error>;

  /// Register and enqueue a stylesheet.
  fn register_style(
    &mut self,
    handle: &str,
    src: &str,
    deps: &[String],
    version: Option<&str>,
    media: Option<&str>,
  ) -> Result<(), Self::Error>;

  /// Attach auxiliary metadata to a registered script.
  fn add_script_data(&mut self, handle: &str, key: &str, value: &Value)
  -> Result<(), Self::Error>;

  /// Attach auxiliary metadata to a registered stylesheet.
  fn add_style_data(&mut self, handle: &str, key: &str, value: &Value)
  -> Result<(), Self::Error>;
}

/// A registration call captured by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
  /// Asset kind that was registered.
  pub kind: AssetKind,
  /// Asset handle.
  pub handle: String,
  /// Resolved source URL.
  pub src: String,
  /// Dependency handles.
  pub deps: Vec<String>,
  /// Version passed to the host, if any.
  pub version: Option<String>,
  /// Footer placement for scripts.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub in_footer: Option<bool>,
  /// Media query for stylesheets.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub media: Option<String>,
  /// Auxiliary data attached after registration, in call order.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub data: Vec<(String, Value)>,
}

/// In-memory host that records every call, useful for dry runs and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
  registrations: Vec<Registration>,
}

impl RecordingHost {
  /// Create an empty recorder.
  pub fn new() -> Self {
    Self::default()
  }

  /// Every registration in call order.
  pub fn registrations(&self) -> &[Registration] {
    &self.registrations
  }

  /// The registration recorded for `(kind, handle)`, if any.
  pub fn get(&self, kind: AssetKind, handle: &str) -> Option<&Registration> {
    self
      .registrations
      .iter()
      .find(|registration| registration.kind == kind && registration.handle == handle)
  }

  /// Serialise the recorded registrations as prettified JSON.
  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&self.registrations)
  }

  fn attach(&mut self, kind: AssetKind, handle: &str, key: &str, value: &Value) {
    if let Some(registration) = self
      .registrations
      .iter_mut()
      .rev()
      .find(|registration| registration.kind == kind && registration.handle == handle)
    {
      registration.data.push((key.to_string(), value.clone()));
    }
  }
}

impl AssetHost for RecordingHost {
  type Error = Infallible;

  fn register_script(
    &mut self,
    handle: &str,
    src: &str,
    deps: &[String],
    version: Option<&str>,
    in_footer: bool,
  ) -> Result<(), Self::Error> {
    self.registrations.push(Registration {
      kind: AssetKind::Script,
      handle: handle.to_string(),
      src: src.to_string(),
      deps: deps.to_vec(),
      version: version.map(str::to_string),
      in_footer: Some(in_footer),
      media: None,
      data: Vec::new(),
    });
    Ok(())
  }

  fn register_style(
    &mut self,
    handle: &str,
    src: &str,
    deps: &[String],
    version: Option<&str>,
    media: Option<&str>,
  ) -> Result<(), Self::Error> {
    self.registrations.push(Registration {
      kind: AssetKind::Style,
      handle: handle.to_string(),
      src: src.to_string(),
      deps: deps.to_vec(),
      version: version.map(str::to_string),
      in_footer: None,
      media: media.map(str::to_string),
      data: Vec::new(),
    });
    Ok(())
  }

  fn add_script_data(
    &mut self,
    handle: &str,
    key: &str,
    value: &Value,
  ) -> Result<(), Self::Error> {
    self.attach(AssetKind::Script, handle, key, value);
    Ok(())
  }

  fn add_style_data(
    &mut self,
    handle: &str,
    key: &str,
    value: &Value,
  ) -> Result<(), Self::Error> {
    self.attach(AssetKind::Style, handle, key, value);
    Ok(())
  }
}
