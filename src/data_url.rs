//! Conversion of asset contents into `data:` URLs.

use base64::{Engine as _, engine::general_purpose};

use crate::error::Result;
use crate::fetch::Fetch;
use crate::mime::MimeTable;

/// Marker placed between the media type and a base64 payload.
pub const BASE64_MARKER: &str = ";base64,";

const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Encode `bytes` as a base64 data URL.
///
/// An unknown media type produces `data:;base64,...`, which consumers read as
/// `text/plain;charset=US-ASCII` per RFC 2397 but still decode byte for byte.
pub fn encode_data_url(mime: Option<&str>, bytes: &[u8]) -> String {
  let payload = general_purpose::STANDARD.encode(bytes);
  let mime = mime.unwrap_or_default();
  let mut url = String::with_capacity(5 + mime.len() + BASE64_MARKER.len() + payload.len());
  url.push_str("data:");
  url.push_str(mime);
  url.push_str(BASE64_MARKER);
  url.push_str(&payload);
  url
}

/// Fetch `url` and return its contents as a base64 data URL.
///
/// The media type comes from the response `Content-Type` (parameters dropped), then from
/// the URL extension, and finally defaults to `application/octet-stream`.
pub async fn fetch_to_data_url(fetcher: &dyn Fetch, mime_table: &MimeTable, url: &str) -> Result<String> {
  let payload = fetcher.fetch(url).await?;
  log::debug!("fetched {} bytes from {url}", payload.bytes.len());

  let declared = payload
    .content_type
    .as_deref()
    .and_then(|value| value.split(';').next())
    .map(str::trim)
    .filter(|essence| !essence.is_empty());
  let mime = declared
    .or_else(|| mime_table.lookup_path(url))
    .unwrap_or(DEFAULT_MEDIA_TYPE);

  Ok(encode_data_url(Some(mime), &payload.bytes))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ResolveError;
  use crate::fetch::FetchedPayload;
  use crate::testing::FakeFetcher;

  #[test]
  fn encodes_with_media_type() {
    assert_eq!(
      encode_data_url(Some("image/png"), b"png!"),
      "data:image/png;base64,cG5nIQ=="
    );
  }

  #[test]
  fn keeps_marker_without_media_type() {
    assert_eq!(encode_data_url(None, b"ptl"), "data:;base64,cHRs");
  }

  #[tokio::test]
  async fn uses_declared_content_type_essence() {
    let fetcher = FakeFetcher::default().with(
      "https://host/labels.txt",
      FetchedPayload {
        bytes: b"cat".to_vec(),
        content_type: Some("text/plain; charset=utf-8".into()),
      },
    );

    let url = fetch_to_data_url(&fetcher, &MimeTable::default(), "https://host/labels.txt")
      .await
      .unwrap();
    assert_eq!(url, "data:text/plain;base64,Y2F0");
  }

  #[tokio::test]
  async fn falls_back_to_extension_then_octet_stream() {
    let fetcher = FakeFetcher::default()
      .with("https://host/env.dds", FetchedPayload {
        bytes: vec![1, 2, 3],
        content_type: None,
      })
      .with("https://host/model.ptl", FetchedPayload {
        bytes: vec![1, 2, 3],
        content_type: None,
      });
    let table = MimeTable::default();

    let dds = fetch_to_data_url(&fetcher, &table, "https://host/env.dds").await.unwrap();
    assert!(dds.starts_with("data:image/vnd.ms-dds;base64,"));

    let ptl = fetch_to_data_url(&fetcher, &table, "https://host/model.ptl").await.unwrap();
    assert!(ptl.starts_with("data:application/octet-stream;base64,"));
  }

  #[tokio::test]
  async fn propagates_fetch_failures() {
    let fetcher = FakeFetcher::default();
    let err = fetch_to_data_url(&fetcher, &MimeTable::default(), "https://host/missing.png")
      .await
      .unwrap_err();
    assert!(matches!(err, ResolveError::HttpStatus { status: 404, .. }));
  }
}
