//! Origin classification shared by both resolution operations.

use std::path::PathBuf;

use serde_json::Value;

use crate::asset_paths::{is_network_url, strip_file_scheme};
use crate::error::{ResolveError, Result};
use crate::models::{AssetOrigin, AssetReference, ResolvedAsset};
use crate::registry::AssetModules;

/// Where the bytes of a non-inline reference come from.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSource {
  /// HTTP(S) URL, either given directly or served by a development asset server.
  Remote {
    /// URL as resolved, query string included.
    url: String,
    /// Whether the URL came out of a bundle descriptor.
    from_bundle: bool,
  },
  /// Asset packaged with the application.
  Packaged(ResolvedAsset),
  /// Plain path or `file://` URL given by the caller.
  LocalFile {
    /// Reference as given.
    url: String,
  },
}

impl AssetSource {
  /// URL of the source as resolved, before any rewriting.
  pub fn url(&self) -> &str {
    match self {
      Self::Remote { url, .. } | Self::LocalFile { url } => url,
      Self::Packaged(asset) => &asset.uri,
    }
  }

  pub(crate) fn local_path(url: &str) -> PathBuf {
    PathBuf::from(strip_file_scheme(url))
  }
}

/// Outcome of classifying a reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
  /// Inline value, returned untouched by every operation.
  Inline(Value),
  /// Reference with bytes to locate.
  Source(AssetSource),
}

/// Decide which branch a reference takes.
///
/// Bundle handles go through the asset-module lookup; unknown handles fail loudly.
pub fn classify(reference: AssetReference, modules: &dyn AssetModules) -> Result<Classified> {
  let source = match reference {
    AssetReference::Inline(value) => return Ok(Classified::Inline(value)),
    AssetReference::BundleId(id) => {
      let asset = modules.resolve(id).ok_or(ResolveError::UnknownBundle(id))?;
      log::debug!("bundle {id} resolved to {} ({:?})", asset.uri, asset.origin);
      match asset.origin {
        AssetOrigin::Network => AssetSource::Remote {
          url: asset.uri,
          from_bundle: true,
        },
        AssetOrigin::Packaged => AssetSource::Packaged(asset),
      }
    }
    AssetReference::Url(url) if is_network_url(&url) => AssetSource::Remote {
      url,
      from_bundle: false,
    },
    AssetReference::Url(url) => AssetSource::LocalFile { url },
  };
  Ok(Classified::Source(source))
}
