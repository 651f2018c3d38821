//! Per-handle predicates deciding whether an asset is registered at all.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::asset::{AssetDescriptor, AssetKind};
use crate::error::{LoaderError, LoaderResult};

/// Predicate over a fully constructed descriptor. Returning `false` skips the asset.
pub type Condition = Box<dyn Fn(&AssetDescriptor) -> bool>;

/// Ordered predicates keyed by asset kind and handle.
#[derive(Default)]
pub struct ConditionRegistry {
  conditions: BTreeMap<AssetKind, BTreeMap<String, Vec<Condition>>>,
}

impl ConditionRegistry {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a predicate for `(kind, handle)`.
  ///
  /// Blank handles can never match a manifest entry and are rejected here rather than being
  /// silently ignored during evaluation.
  pub fn register<F>(
    &mut self,
    kind: AssetKind,
    handle: impl Into<String>,
    predicate: F,
  ) -> LoaderResult<()>
  where
    F: Fn(&AssetDescriptor) -> bool + 'static,
  {
    let handle = handle.into();
    if handle.trim().is_empty() {
      return Err(LoaderError::InvalidCondition { kind, handle });
    }

    self
      .conditions
      .entry(kind)
      .or_default()
      .entry(handle)
      .or_default()
      .push(Box::new(predicate));
    Ok(())
  }

  /// Run the predicates for `(kind, handle)` in registration order.
  ///
  /// Stops at the first rejection. Handles without predicates are accepted.
  pub fn evaluate(&self, kind: AssetKind, handle: &str, asset: &AssetDescriptor) -> bool {
    let Some(conditions) = self
      .conditions
      .get(&kind)
      .and_then(|handles| handles.get(handle))
    else {
      return true;
    };

    for (index, condition) in conditions.iter().enumerate() {
      if !condition(asset) {
        debug!(%kind, handle, condition = index, "asset rejected by condition");
        return false;
      }
    }

    true
  }

  /// Evaluate the predicates registered for the descriptor's own kind and handle.
  pub fn evaluate_asset(&self, asset: &AssetDescriptor) -> bool {
    self.evaluate(asset.kind(), asset.handle(), asset)
  }

  /// Number of predicates registered for `(kind, handle)`.
  pub fn conditions_for(&self, kind: AssetKind, handle: &str) -> usize {
    self
      .conditions
      .get(&kind)
      .and_then(|handles| handles.get(handle))
      .map_or(0, Vec::len)
  }

  /// Total number of registered predicates.
  pub fn len(&self) -> usize {
    self
      .conditions
      .values()
      .flat_map(BTreeMap::values)
      .map(Vec::len)
      .sum()
  }

  /// Returns true when no predicates are registered.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl fmt::Debug for ConditionRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut map = f.debug_map();
    for (kind, handles) in &self.conditions {
      for (handle, conditions) in handles {
        map.entry(&(kind, handle), &conditions.len());
      }
    }
    map.finish()
  }
}
