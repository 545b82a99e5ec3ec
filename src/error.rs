//! Error type shared by every resolution path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::BundleId;

/// Crate-wide result alias.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;

/// Errors raised while resolving an asset reference.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The asset-module lookup has no descriptor for the handle.
  #[error("unknown bundle identifier {0}")]
  UnknownBundle(BundleId),

  /// A packaged or local asset could not be read or copied.
  #[error("Error reading resource {uri}. Make sure the file exists in the {location}")]
  MissingResource {
    /// URI of the asset as resolved.
    uri: String,
    /// Where the platform expects the asset to live.
    location: &'static str,
    /// Underlying I/O failure.
    #[source]
    source: io::Error,
  },

  /// No destination was supplied and the platform has no writable default.
  #[error("no destination given and no default storage directory is available")]
  NoDestination,

  /// Filesystem operation on a destination failed.
  #[error("failed to access {}", path.display())]
  Io {
    /// Path involved in the failing operation.
    path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    source: io::Error,
  },

  /// A JSON document (configuration or asset manifest) failed to parse.
  #[error("failed to parse {}", path.display())]
  Parse {
    /// Path of the offending document.
    path: PathBuf,
    /// Underlying parse failure.
    #[source]
    source: serde_json::Error,
  },

  /// The transport failed before a response was received.
  #[error("failed to fetch {url}")]
  Fetch {
    /// Requested URL.
    url: String,
    /// Transport error.
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// The server answered with a non-success status.
  #[error("{url} responded with status {status}")]
  HttpStatus {
    /// Requested URL.
    url: String,
    /// HTTP status code.
    status: u16,
  },
}

impl ResolveError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn fetch(
    url: impl Into<String>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::Fetch {
      url: url.into(),
      source: source.into(),
    }
  }
}
