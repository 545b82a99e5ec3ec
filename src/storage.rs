//! File system collaborator: directories, downloads, copies and reads.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use same_file::is_same_file;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{ResolveError, Result};

/// Asynchronous file operations the resolver delegates byte movement to.
#[async_trait]
pub trait AssetStorage: Send + Sync {
  /// Whether `path` exists.
  async fn exists(&self, path: &Path) -> io::Result<bool>;

  /// Create `path` and every missing parent.
  async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  /// Stream `url` into `destination`, returning the number of bytes written.
  async fn download(&self, url: &str, destination: &Path) -> Result<u64>;

  /// Copy a resource-table entry to `destination`.
  async fn copy_resource(&self, name: &str, destination: &Path) -> io::Result<u64>;

  /// Copy a file to `destination`.
  async fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<u64>;

  /// Read the full contents of a resource-table entry.
  async fn read_resource(&self, name: &str) -> io::Result<Vec<u8>>;

  /// Read the full contents of a file.
  async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`AssetStorage`] over the local filesystem.
///
/// Resource-table entries are files inside `resource_dir`. Relative bundle paths are
/// resolved against `bundle_dir` when one is set.
#[derive(Debug, Clone)]
pub struct LocalStorage {
  resource_dir: PathBuf,
  bundle_dir: Option<PathBuf>,
  client: reqwest::Client,
}

impl LocalStorage {
  /// Storage reading resource-table entries from `resource_dir`.
  pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
    Self {
      resource_dir: resource_dir.into(),
      bundle_dir: None,
      client: reqwest::Client::new(),
    }
  }

  /// Resolve relative bundle paths against `bundle_dir`.
  pub fn with_bundle_dir(mut self, bundle_dir: impl Into<PathBuf>) -> Self {
    self.bundle_dir = Some(bundle_dir.into());
    self
  }

  /// Use a preconfigured HTTP client for downloads.
  pub fn with_client(mut self, client: reqwest::Client) -> Self {
    self.client = client;
    self
  }

  fn resource_path(&self, name: &str) -> PathBuf {
    self.resource_dir.join(name)
  }

  fn source_path(&self, path: &Path) -> PathBuf {
    match &self.bundle_dir {
      Some(base) if path.is_relative() => base.join(path),
      _ => path.to_path_buf(),
    }
  }
}

#[async_trait]
impl AssetStorage for LocalStorage {
  async fn exists(&self, path: &Path) -> io::Result<bool> {
    fs::try_exists(path).await
  }

  async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await
  }

  async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
    let mut response = self
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

    let total = response.content_length();
    log::debug!(
      "begin download {url} -> {} ({} bytes expected)",
      destination.display(),
      total.map_or_else(|| "unknown".to_string(), |len| len.to_string())
    );

    let mut file = fs::File::create(destination)
      .await
      .map_err(|err| ResolveError::io(destination, err))?;
    let mut written = 0u64;
    while let Some(chunk) = response
      .chunk()
      .await
      .map_err(|err| ResolveError::fetch(url, err))?
    {
      file
        .write_all(&chunk)
        .await
        .map_err(|err| ResolveError::io(destination, err))?;
      written += chunk.len() as u64;
      log::debug!("download progress {url}: {written} bytes");
    }
    file
      .flush()
      .await
      .map_err(|err| ResolveError::io(destination, err))?;

    Ok(written)
  }

  async fn copy_resource(&self, name: &str, destination: &Path) -> io::Result<u64> {
    self.copy_file(&self.resource_path(name), destination).await
  }

  async fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<u64> {
    let source = self.source_path(source);
    if is_same_file(&source, destination).unwrap_or(false) {
      return Ok(fs::metadata(&source).await?.len());
    }
    fs::copy(&source, destination).await
  }

  async fn read_resource(&self, name: &str) -> io::Result<Vec<u8>> {
    fs::read(self.resource_path(name)).await
  }

  async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
    fs::read(self.source_path(path)).await
  }
}
