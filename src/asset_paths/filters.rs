use regex::Regex;

fn network_scheme() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"))
}

/// Determine whether a URI has to be fetched over the network.
///
/// Development builds serve bundled assets from a live asset server, so a bundle
/// descriptor carrying an `http(s)://` URI is treated the same way as a remote URL.
pub fn is_network_url(value: &str) -> bool {
  network_scheme().is_match(value)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_http_urls() {
    assert!(is_network_url("https://example.com/model.ptl"));
    assert!(is_network_url("HTTP://localhost:8081/assets/model.ptl"));
  }

  #[test]
  fn keeps_local_uris_off_the_network() {
    assert!(!is_network_url("file:///private/var/app/assets/model.ptl"));
    assert!(!is_network_url("/static/media/model.ptl"));
    assert!(!is_network_url("models_yolov5s"));
    assert!(!is_network_url("httpdocs/model.ptl"));
  }
}
