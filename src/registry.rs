//! Asset-module lookup: bundle handles to resolved descriptors.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ResolveError, Result};
use crate::models::{BundleId, ResolvedAsset};

/// Resolves bundle handles into asset descriptors.
///
/// Lookups are synchronous and free of side effects.
pub trait AssetModules: Send + Sync {
  /// Descriptor registered for `id`, if any.
  fn resolve(&self, id: BundleId) -> Option<ResolvedAsset>;
}

/// Asset manifest layout as written by the bundler.
#[derive(Debug, Default, Deserialize)]
struct AssetManifestFile {
  #[serde(default)]
  assets: Vec<AssetManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct AssetManifestEntry {
  id: BundleId,
  #[serde(flatten)]
  asset: ResolvedAsset,
}

/// In-memory [`AssetModules`] implementation.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
  assets: BTreeMap<BundleId, ResolvedAsset>,
}

impl AssetRegistry {
  /// Load descriptors from a JSON asset manifest.
  ///
  /// A missing manifest yields an empty registry, so every bundle lookup later fails with
  /// [`ResolveError::UnknownBundle`] rather than at start-up.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        log::debug!("no asset manifest at {}", path.display());
        return Ok(Self::default());
      }
      Err(err) => return Err(ResolveError::io(path, err)),
    };

    let file: AssetManifestFile =
      serde_json::from_str(&contents).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
      })?;
    Ok(Self::from(file))
  }

  /// Register or replace the descriptor for `id`.
  pub fn register(&mut self, id: BundleId, asset: ResolvedAsset) -> Option<ResolvedAsset> {
    self.assets.insert(id, asset)
  }

  /// Builder-style variant of [`AssetRegistry::register`].
  pub fn with(mut self, id: BundleId, asset: ResolvedAsset) -> Self {
    self.register(id, asset);
    self
  }

  /// Number of registered descriptors.
  pub fn len(&self) -> usize {
    self.assets.len()
  }

  /// Returns `true` when nothing is registered.
  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }
}

impl AssetModules for AssetRegistry {
  fn resolve(&self, id: BundleId) -> Option<ResolvedAsset> {
    self.assets.get(&id).cloned()
  }
}

impl From<AssetManifestFile> for AssetRegistry {
  fn from(file: AssetManifestFile) -> Self {
    let assets = file
      .assets
      .into_iter()
      .map(|entry| (entry.id, entry.asset))
      .collect();
    Self { assets }
  }
}
