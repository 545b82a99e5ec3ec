//! Network fetch collaborator.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::error::{ResolveError, Result};

/// Raw response body and its declared content type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPayload {
  /// Response body.
  pub bytes: Vec<u8>,
  /// `Content-Type` header value, if the server sent one.
  pub content_type: Option<String>,
}

/// Retrieves the full payload of a URL.
#[async_trait]
pub trait Fetch: Send + Sync {
  /// Fetch `url`, failing on transport errors and non-success statuses.
  async fn fetch(&self, url: &str) -> Result<FetchedPayload>;
}

/// [`Fetch`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  /// Wrap an existing client, for example one configured with timeouts.
  pub fn with_client(client: reqwest::Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl Fetch for HttpFetcher {
  async fn fetch(&self, url: &str) -> Result<FetchedPayload> {
    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|err| ResolveError::fetch(url, err))?;

    let status = response.status();
    if !status.is_success() {
      return Err(ResolveError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let content_type = response
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string);
    let bytes = response
      .bytes()
      .await
      .map_err(|err| ResolveError::fetch(url, err))?;

    Ok(FetchedPayload {
      bytes: bytes.to_vec(),
      content_type,
    })
  }
}
