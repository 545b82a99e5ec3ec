use std::path::{Path, PathBuf};

use crate::asset_paths::strip_query;

/// Fallback file name when neither the caller nor the URI supplies one.
const FALLBACK_FILE_NAME: &str = "asset.bin";

/// Last path segment of a URI, ignoring any query string.
pub fn file_name_of(uri: &str) -> Option<&str> {
  strip_query(uri)
    .trim_end_matches('/')
    .rsplit(|c: char| c == '/' || c == '\\')
    .next()
    .filter(|segment| !segment.is_empty() && !segment.contains(':'))
}

/// Directory that has to exist before writing `destination`, if any.
pub fn parent_dir(destination: &Path) -> Option<&Path> {
  destination
    .parent()
    .filter(|parent| !parent.as_os_str().is_empty())
}

/// Compose a destination inside `storage_dir`.
///
/// The explicit `file_name` wins; otherwise the asset keeps its own name so several
/// assets resolved without a destination do not overwrite each other. A name without an
/// extension gets the declared `asset_type` appended.
pub fn default_destination(
  storage_dir: &Path,
  file_name: Option<&str>,
  uri: &str,
  asset_type: Option<&str>,
) -> PathBuf {
  if let Some(name) = file_name.filter(|name| !name.is_empty()) {
    return storage_dir.join(name);
  }

  let Some(name) = file_name_of(uri) else {
    return storage_dir.join(FALLBACK_FILE_NAME);
  };
  match asset_type.filter(|extension| !extension.is_empty()) {
    Some(extension) if !name.contains('.') => storage_dir.join(format!("{name}.{extension}")),
    _ => storage_dir.join(name),
  }
}
