use crate::models::ResolvedAsset;

/// Drop everything from the first `?`.
///
/// Development servers append cache-busting parameters (`?platform=android&hash=...`) to
/// bundle URIs; they must not end up in destination paths or confuse consumers that
/// derive file types from the URL.
pub fn strip_query(url: &str) -> &str {
  match url.find('?') {
    Some(index) => &url[..index],
    None => url,
  }
}

/// Remove a leading `file://` scheme, leaving a plain filesystem path.
pub fn strip_file_scheme(uri: &str) -> &str {
  uri.strip_prefix("file://").unwrap_or(uri)
}

/// Name of the resource-table entry holding a packaged asset (`{uri}.{type}`).
pub fn resource_entry_name(asset: &ResolvedAsset) -> String {
  if asset.asset_type.is_empty() {
    asset.uri.clone()
  } else {
    format!("{}.{}", asset.uri, asset.asset_type)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_cache_busting_query() {
    assert_eq!(
      strip_query("http://localhost:8081/assets/yolov5s.ptl?platform=android&hash=e57f"),
      "http://localhost:8081/assets/yolov5s.ptl"
    );
    assert_eq!(strip_query("https://host/a.ptl"), "https://host/a.ptl");
    assert_eq!(strip_query("https://host/a.ptl?x=1?y=2"), "https://host/a.ptl");
  }

  #[test]
  fn strips_only_leading_file_scheme() {
    assert_eq!(
      strip_file_scheme("file:///private/var/App.app/assets/yolov5s.ptl"),
      "/private/var/App.app/assets/yolov5s.ptl"
    );
    assert_eq!(strip_file_scheme("/already/plain"), "/already/plain");
  }

  #[test]
  fn joins_resource_name_and_type() {
    let asset = ResolvedAsset::new("public_yolov5s_yolov5s", "ptl");
    assert_eq!(resource_entry_name(&asset), "public_yolov5s_yolov5s.ptl");

    let untyped = ResolvedAsset::new("public_readme", "");
    assert_eq!(resource_entry_name(&untyped), "public_readme");
  }
}
