//! Extension to MIME type lookup used when encoding packaged assets.

use std::collections::BTreeMap;

/// Types missing from the registry table but recognised for texture pipelines.
const FALLBACK_TYPES: &[(&str, &str)] = &[("dds", "image/vnd.ms-dds")];

/// MIME lookup with caller-supplied overrides.
#[derive(Debug, Clone, Default)]
pub struct MimeTable {
  overrides: BTreeMap<String, String>,
}

impl MimeTable {
  /// Table with extra entries that take precedence over the registry.
  pub fn with_overrides<I, K, V>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
  {
    let overrides = entries
      .into_iter()
      .map(|(extension, mime)| (normalise_extension(extension.as_ref()), mime.into()))
      .filter(|(extension, _)| !extension.is_empty())
      .collect();
    Self { overrides }
  }

  /// MIME type for an extension (with or without leading dot), if known.
  pub fn lookup(&self, extension: &str) -> Option<&str> {
    let extension = normalise_extension(extension);
    if let Some(mime) = self.overrides.get(&extension) {
      return Some(mime.as_str());
    }

    mime_guess::from_ext(&extension).first_raw().or_else(|| {
      FALLBACK_TYPES
        .iter()
        .find(|(known, _)| *known == extension)
        .map(|(_, mime)| *mime)
    })
  }

  /// MIME type derived from the extension of a path or URL.
  pub fn lookup_path(&self, path: &str) -> Option<&str> {
    let name = crate::asset_paths::file_name_of(path)?;
    let (_, extension) = name.rsplit_once('.')?;
    self.lookup(extension)
  }
}

fn normalise_extension(extension: &str) -> String {
  extension.trim().trim_start_matches('.').to_ascii_lowercase()
}
