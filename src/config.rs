//! Resolver configuration loaded from `asset_resolver.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ResolveError, Result};
use crate::platform::PlatformKind;

const DEFAULT_CONFIG_FILE: &str = "asset_resolver.json";

/// Discoverable configuration describing the runtime and where assets live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
  /// Runtime variant the resolver serves.
  pub platform: PlatformKind,
  /// JSON asset manifest mapping bundle ids to descriptors.
  pub manifest: Option<PathBuf>,
  /// Directory holding resource-table entries.
  pub resource_dir: PathBuf,
  /// Base directory for relative bundle-file URIs.
  pub bundle_dir: Option<PathBuf>,
  /// Directory used when a caller gives no destination; platform default when unset.
  pub storage_dir: Option<PathBuf>,
  /// File name used when a caller gives no destination; the asset's own name when unset.
  pub default_file_name: Option<String>,
  /// Extra extension to MIME type entries, taking precedence over the registry.
  pub mime_types: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self {
      platform: PlatformKind::default(),
      manifest: None,
      resource_dir: PathBuf::from("res").join("raw"),
      bundle_dir: None,
      storage_dir: None,
      default_file_name: None,
      mime_types: BTreeMap::new(),
    }
  }
}

impl ResolverConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to default
  /// values so callers can continue operating with sensible assumptions.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    match Self::from_path(&candidate) {
      Some(config) => config.relative_to(dir),
      None => Self::default(),
    }
  }

  /// Read configuration from a specific JSON file, ignoring failures.
  pub fn from_path(path: &Path) -> Option<Self> {
    Self::load(path).ok()
  }

  /// Read configuration from a specific JSON file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|err| ResolveError::io(path, err))?;
    serde_json::from_str(&content).map_err(|source| ResolveError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Anchor relative paths at `dir`, the directory the configuration was read from.
  pub fn relative_to(mut self, dir: &Path) -> Self {
    let anchor = |path: PathBuf| if path.is_relative() { dir.join(path) } else { path };
    self.manifest = self.manifest.map(&anchor);
    self.resource_dir = anchor(self.resource_dir);
    self.bundle_dir = self.bundle_dir.map(&anchor);
    self.storage_dir = self.storage_dir.map(&anchor);
    self
  }
}
