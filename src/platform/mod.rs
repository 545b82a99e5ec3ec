//! Platform capabilities selected when the resolver is composed.
//!
//! A browser runtime serves every asset by URL and never touches storage. Native runtimes
//! differ in how packaged assets are laid out: by name in a resource table, or as files
//! inside the application bundle. Each native layout is one [`PackagedAssets`] implementation.

mod bundle_files;
mod resource_table;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ResolvedAsset;
use crate::storage::AssetStorage;

pub use bundle_files::BundleFiles;
pub use resource_table::ResourceTable;

/// Runtime variants the resolver knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformKind {
  /// Web runtime: assets are URLs served by the page origin.
  Browser,
  /// Packaged assets addressed by name in a resource table.
  ResourceTable,
  /// Packaged assets stored as files inside the application bundle.
  BundleFile,
}

impl Default for PlatformKind {
  fn default() -> Self {
    if cfg!(target_arch = "wasm32") {
      Self::Browser
    } else if cfg!(target_os = "android") {
      Self::ResourceTable
    } else {
      Self::BundleFile
    }
  }
}

impl FromStr for PlatformKind {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "browser" | "web" => Ok(Self::Browser),
      "resource-table" | "android" => Ok(Self::ResourceTable),
      "bundle-file" | "ios" => Ok(Self::BundleFile),
      other => Err(format!(
        "unknown platform `{other}` (expected browser, resource-table or bundle-file)"
      )),
    }
  }
}

impl fmt::Display for PlatformKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Browser => "browser",
      Self::ResourceTable => "resource-table",
      Self::BundleFile => "bundle-file",
    })
  }
}

/// Access to assets packaged with a native application.
#[async_trait]
pub trait PackagedAssets: Send + Sync {
  /// Variant implemented.
  fn kind(&self) -> PlatformKind;

  /// Writable directory used when the caller gives no destination.
  fn default_storage_dir(&self) -> Option<PathBuf>;

  /// Location the asset can be used from without copying, when the layout allows it.
  fn in_place(&self, _asset: &ResolvedAsset) -> Option<PathBuf> {
    None
  }

  /// Place a packaged asset at `destination`.
  ///
  /// The parent directory of `destination` already exists when this is called.
  async fn store(
    &self,
    storage: &dyn AssetStorage,
    asset: &ResolvedAsset,
    destination: &Path,
  ) -> Result<PathBuf>;

  /// Read the full contents of a packaged asset.
  async fn read(&self, storage: &dyn AssetStorage, asset: &ResolvedAsset) -> Result<Vec<u8>>;
}

/// Runtime the resolver is composed for.
pub enum Runtime {
  /// Web runtime; assets stay URLs.
  Browser,
  /// Native runtime with its packaged-asset layout.
  Native(Box<dyn PackagedAssets>),
}

impl Runtime {
  /// Runtime with the stock implementation for `kind`.
  pub fn for_kind(kind: PlatformKind) -> Self {
    match kind {
      PlatformKind::Browser => Self::Browser,
      PlatformKind::ResourceTable => Self::Native(Box::new(ResourceTable)),
      PlatformKind::BundleFile => Self::Native(Box::new(BundleFiles)),
    }
  }

  /// Variant of this runtime.
  pub fn kind(&self) -> PlatformKind {
    match self {
      Self::Browser => PlatformKind::Browser,
      Self::Native(packaged) => packaged.kind(),
    }
  }
}

impl fmt::Debug for Runtime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Runtime").field(&self.kind()).finish()
  }
}
