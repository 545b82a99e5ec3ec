//! Values passed into and returned from a single resolution call.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset_paths::is_network_url;

/// Opaque build-time handle of an asset packaged with the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BundleId(pub u32);

impl fmt::Display for BundleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Reference to an asset as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetReference {
  /// Handle resolved through the asset-module lookup.
  BundleId(BundleId),
  /// Remote URL or local path.
  Url(String),
  /// Value that is already usable (for example a parsed JSON document).
  Inline(Value),
}

impl AssetReference {
  /// Classify a loosely typed value: numbers fitting a handle become bundle ids, strings
  /// become URLs, anything else is kept inline.
  pub fn from_value(value: Value) -> Self {
    match value {
      Value::Number(number) => match number.as_u64().and_then(|raw| u32::try_from(raw).ok()) {
        Some(id) => Self::BundleId(BundleId(id)),
        None => Self::Inline(Value::Number(number)),
      },
      Value::String(url) => Self::Url(url),
      other => Self::Inline(other),
    }
  }
}

impl From<BundleId> for AssetReference {
  fn from(id: BundleId) -> Self {
    Self::BundleId(id)
  }
}

impl From<&str> for AssetReference {
  fn from(url: &str) -> Self {
    Self::Url(url.to_string())
  }
}

impl From<String> for AssetReference {
  fn from(url: String) -> Self {
    Self::Url(url)
  }
}

/// Whether a resolved asset is served by a development server or packaged locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetOrigin {
  /// Served over HTTP(S), typically by a live development asset server.
  Network,
  /// Packaged with the application on the local filesystem or resource table.
  Packaged,
}

impl AssetOrigin {
  /// Derive the origin from the URI scheme.
  pub fn of_uri(uri: &str) -> Self {
    if is_network_url(uri) {
      Self::Network
    } else {
      Self::Packaged
    }
  }
}

/// Descriptor produced by looking up a [`BundleId`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "ResolvedAssetRecord")]
pub struct ResolvedAsset {
  /// Access URI: an HTTP URL, a `file://` URL, a path or a resource entry name.
  pub uri: String,
  /// Declared extension, without a leading dot.
  #[serde(rename = "type")]
  pub asset_type: String,
  /// Origin derived from `uri`.
  pub origin: AssetOrigin,
  /// Optional asset name recorded by the bundler.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Optional content hash recorded by the bundler.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hash: Option<String>,
}

impl ResolvedAsset {
  /// Build a descriptor, deriving its origin from the URI.
  pub fn new(uri: impl Into<String>, asset_type: impl Into<String>) -> Self {
    let uri = uri.into();
    Self {
      origin: AssetOrigin::of_uri(&uri),
      asset_type: asset_type.into().trim_start_matches('.').to_string(),
      uri,
      name: None,
      hash: None,
    }
  }

  /// Attach the bundler-provided name.
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Attach the bundler-provided content hash.
  pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
    self.hash = Some(hash.into());
    self
  }
}

/// On-disk shape of a descriptor; the origin is never trusted from input.
#[derive(Debug, Deserialize)]
struct ResolvedAssetRecord {
  uri: String,
  #[serde(rename = "type", default)]
  asset_type: String,
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  hash: Option<String>,
}

impl From<ResolvedAssetRecord> for ResolvedAsset {
  fn from(record: ResolvedAssetRecord) -> Self {
    let mut asset = ResolvedAsset::new(record.uri, record.asset_type);
    asset.name = record.name;
    asset.hash = record.hash;
    asset
  }
}

/// Successful outcome of a resolution call.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
  /// Location on persistent local storage.
  Path(PathBuf),
  /// URL usable directly by the consumer.
  Url(String),
  /// `data:` URL carrying the asset contents.
  DataUrl(String),
  /// Inline reference handed back untouched.
  Inline(Value),
}

impl fmt::Display for Resolved {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Path(path) => write!(f, "{}", path.display()),
      Self::Url(url) | Self::DataUrl(url) => f.write_str(url),
      Self::Inline(value) => write!(f, "{value}"),
    }
  }
}

/// Options for [`crate::AssetResolver::resolve_to_stored_file`].
#[derive(Debug, Clone, Default)]
pub struct StoredFileOptions {
  /// Target file; the platform default is used when absent.
  pub destination: Option<PathBuf>,
  /// On the bundle-file platform, return the packaged location instead of copying.
  pub avoid_copy: bool,
}

impl StoredFileOptions {
  /// Store at an explicit destination.
  pub fn to(destination: impl Into<PathBuf>) -> Self {
    Self {
      destination: Some(destination.into()),
      avoid_copy: false,
    }
  }

  /// Toggle direct access to bundle files.
  pub fn avoid_copy(mut self, avoid_copy: bool) -> Self {
    self.avoid_copy = avoid_copy;
    self
  }
}

/// Options for [`crate::AssetResolver::resolve_to_encoded_data`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodedDataOptions {
  /// Accept a plain URL for network and browser origins instead of a data URL.
  pub allow_url: bool,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn classifies_loose_values() {
    assert_eq!(
      AssetReference::from_value(json!(7)),
      AssetReference::BundleId(BundleId(7))
    );
    assert_eq!(
      AssetReference::from_value(json!("yolov5s/yolov5s.ptl")),
      AssetReference::Url("yolov5s/yolov5s.ptl".into())
    );
    assert_eq!(
      AssetReference::from_value(json!({"labels": ["cat"]})),
      AssetReference::Inline(json!({"labels": ["cat"]}))
    );
  }

  #[test]
  fn keeps_non_handle_numbers_inline() {
    assert_eq!(
      AssetReference::from_value(json!(-1)),
      AssetReference::Inline(json!(-1))
    );
    assert_eq!(
      AssetReference::from_value(json!(1.5)),
      AssetReference::Inline(json!(1.5))
    );
  }

  #[test]
  fn derives_origin_from_uri() {
    let dev = ResolvedAsset::new(
      "http://localhost:8081/assets/model.ptl?platform=android",
      "ptl",
    );
    assert_eq!(dev.origin, AssetOrigin::Network);

    let release = ResolvedAsset::new("file:///app/assets/model.ptl", ".ptl")
      .with_name("model")
      .with_hash("e57fc2e4");
    assert_eq!(release.origin, AssetOrigin::Packaged);
    assert_eq!(release.asset_type, "ptl");
    assert_eq!(release.name.as_deref(), Some("model"));
    assert_eq!(release.hash.as_deref(), Some("e57fc2e4"));
  }

  #[test]
  fn deserialised_descriptors_recompute_origin() {
    let asset: ResolvedAsset = serde_json::from_value(json!({
      "uri": "https://cdn.example.com/env.dds",
      "type": "dds",
      "origin": "packaged",
      "hash": "e57fc2e4"
    }))
    .unwrap();

    assert_eq!(asset.origin, AssetOrigin::Network);
    assert_eq!(asset.hash.as_deref(), Some("e57fc2e4"));
  }

  #[test]
  fn displays_inline_values_as_json() {
    let resolved = Resolved::Inline(json!({"a": 1}));
    assert_eq!(resolved.to_string(), r#"{"a":1}"#);
  }
}
