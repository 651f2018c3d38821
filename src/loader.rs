//! Orchestrates manifest loading, condition checks, the pipeline and host registration.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::asset::{AssetDescriptor, AssetKind};
use crate::conditions::ConditionRegistry;
use crate::config::ThemeEnvironment;
use crate::error::{LoaderError, LoaderResult};
use crate::host::AssetHost;
use crate::manifest::Manifest;
use crate::pipeline::Pipeline;

/// Why a manifest entry did not reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// A registered condition rejected the asset.
  RejectedByCondition,
  /// The entry has no string `src`.
  MissingSource,
}

/// Outcome of a [`AssetLoader::load`] pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
  /// Assets handed to the host, in registration order.
  pub registered: Vec<(AssetKind, String)>,
  /// Assets skipped, with the reason.
  pub skipped: Vec<(AssetKind, String, SkipReason)>,
}

impl LoadReport {
  /// Returns true when `(kind, handle)` reached the host.
  pub fn is_registered(&self, kind: AssetKind, handle: &str) -> bool {
    self
      .registered
      .iter()
      .any(|(registered_kind, registered)| *registered_kind == kind && registered == handle)
  }

  /// The reason `(kind, handle)` was skipped, if it was.
  pub fn skip_reason(&self, kind: AssetKind, handle: &str) -> Option<SkipReason> {
    self
      .skipped
      .iter()
      .find(|(skipped_kind, skipped, _)| *skipped_kind == kind && skipped == handle)
      .map(|(_, _, reason)| *reason)
  }
}

/// Reads an asset manifest and registers its entries with a host.
pub struct AssetLoader<H> {
  manifest_path: PathBuf,
  environment: ThemeEnvironment,
  conditions: ConditionRegistry,
  host: H,
}

impl<H: AssetHost> AssetLoader<H> {
  /// Create a loader for the manifest at `manifest_path`.
  ///
  /// The manifest is read and parsed immediately so a missing or malformed file is reported
  /// here rather than on the first call to [`AssetLoader::load`].
  pub fn new(
    manifest_path: impl Into<PathBuf>,
    environment: ThemeEnvironment,
    host: H,
  ) -> LoaderResult<Self> {
    let manifest_path = manifest_path.into();
    Manifest::from_path(&manifest_path)?;

    Ok(Self {
      manifest_path,
      environment,
      conditions: ConditionRegistry::new(),
      host,
    })
  }

  /// Gate the script `handle` behind `condition`.
  pub fn add_script_condition<F>(
    &mut self,
    handle: impl Into<String>,
    condition: F,
  ) -> LoaderResult<()>
  where
    F: Fn(&AssetDescriptor) -> bool + 'static,
  {
    self.conditions.register(AssetKind::Script, handle, condition)
  }

  /// Gate the stylesheet `handle` behind `condition`.
  pub fn add_style_condition<F>(
    &mut self,
    handle: impl Into<String>,
    condition: F,
  ) -> LoaderResult<()>
  where
    F: Fn(&AssetDescriptor) -> bool + 'static,
  {
    self.conditions.register(AssetKind::Style, handle, condition)
  }

  /// Registered conditions.
  pub fn conditions(&self) -> &ConditionRegistry {
    &self.conditions
  }

  /// Mutable access to the registered conditions.
  pub fn conditions_mut(&mut self) -> &mut ConditionRegistry {
    &mut self.conditions
  }

  /// Host environment the pipeline reads from.
  pub fn environment(&self) -> &ThemeEnvironment {
    &self.environment
  }

  /// Path of the manifest read on every load.
  pub fn manifest_path(&self) -> &Path {
    &self.manifest_path
  }

  /// The registration host.
  pub fn host(&self) -> &H {
    &self.host
  }

  /// Mutable access to the registration host.
  pub fn host_mut(&mut self) -> &mut H {
    &mut self.host
  }

  /// Consume the loader, returning the host.
  pub fn into_host(self) -> H {
    self.host
  }

  /// Register every manifest entry that passes its conditions.
  ///
  /// Scripts are processed before styles, each in manifest order. Entries without a source
  /// are skipped individually; manifest, file-system and host failures abort the pass.
  pub fn load(&mut self) -> LoaderResult<LoadReport> {
    let manifest = Manifest::from_path(&self.manifest_path)?;
    let mut report = LoadReport::default();

    for kind in AssetKind::ALL {
      let base_url = manifest.base_url(kind, &self.environment);
      let pipeline = Pipeline::for_kind(kind);

      for (handle, raw) in manifest.entries(kind) {
        let mut asset = AssetDescriptor::new(kind, handle.clone(), raw.clone());
        asset.set_base_url(base_url.clone())?;

        if !self.conditions.evaluate_asset(&asset) {
          report
            .skipped
            .push((kind, handle.clone(), SkipReason::RejectedByCondition));
          continue;
        }

        if asset.src().is_none() {
          warn!(%kind, handle = handle.as_str(), "skipping manifest entry without a src");
          report
            .skipped
            .push((kind, handle.clone(), SkipReason::MissingSource));
          continue;
        }

        let asset = pipeline.run(asset, &self.environment)?;
        self.register(&asset)?;
        report.registered.push((kind, handle.clone()));
      }
    }

    info!(
      manifest = %self.manifest_path.display(),
      registered = report.registered.len(),
      skipped = report.skipped.len(),
      "asset manifest loaded"
    );
    Ok(report)
  }

  fn register(&mut self, asset: &AssetDescriptor) -> LoaderResult<()> {
    let handle = asset.handle();
    let src = asset.src().unwrap_or_default();
    let deps = asset.deps();
    let version = asset.version();

    debug!(kind = %asset.kind(), handle, src, version = ?version, "registering asset");
    match asset.kind() {
      AssetKind::Script => self
        .host
        .register_script(
          handle,
          src,
          &deps,
          version.as_deref(),
          asset.footer().unwrap_or(true),
        )
        .map_err(LoaderError::host)?,
      AssetKind::Style => self
        .host
        .register_style(handle, src, &deps, version.as_deref(), asset.media())
        .map_err(LoaderError::host)?,
    }

    for (key, value) in &asset.data() {
      let attached = match asset.kind() {
        AssetKind::Script => self.host.add_script_data(handle, key, value),
        AssetKind::Style => self.host.add_style_data(handle, key, value),
      };
      attached.map_err(LoaderError::host)?;
    }

    Ok(())
  }
}
