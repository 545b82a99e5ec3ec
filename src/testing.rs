//! In-memory collaborators for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::{ResolveError, Result};
use crate::fetch::{Fetch, FetchedPayload};
use crate::storage::AssetStorage;

/// Operation recorded by [`FakeStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
  Exists(PathBuf),
  CreateDirAll(PathBuf),
  Download { url: String, destination: PathBuf },
  CopyResource { name: String, destination: PathBuf },
  CopyFile { source: PathBuf, destination: PathBuf },
  ReadResource(String),
  ReadFile(PathBuf),
}

#[derive(Default)]
pub struct FakeStorage {
  resources: BTreeMap<String, Vec<u8>>,
  remote: BTreeMap<String, Vec<u8>>,
  files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
  dirs: Mutex<BTreeSet<PathBuf>>,
  read_only: BTreeSet<PathBuf>,
  calls: Mutex<Vec<StorageCall>>,
}

impl FakeStorage {
  pub fn with_resource(mut self, name: &str, bytes: &[u8]) -> Self {
    self.resources.insert(name.to_string(), bytes.to_vec());
    self
  }

  pub fn with_file(self, path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
    self.files.lock().unwrap().insert(path.into(), bytes.to_vec());
    self
  }

  pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
    self.dirs.lock().unwrap().insert(path.into());
    self
  }

  /// Reject directory creation at `path`.
  pub fn with_read_only_dir(mut self, path: impl Into<PathBuf>) -> Self {
    self.read_only.insert(path.into());
    self
  }

  /// Make `url` downloadable with the given body.
  pub fn with_remote(mut self, url: &str, bytes: &[u8]) -> Self {
    self.remote.insert(url.to_string(), bytes.to_vec());
    self
  }

  pub fn calls(&self) -> Vec<StorageCall> {
    self.calls.lock().unwrap().clone()
  }

  pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
    self.files.lock().unwrap().get(path.as_ref()).cloned()
  }

  pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
    self.dirs.lock().unwrap().contains(path.as_ref())
  }

  fn record(&self, call: StorageCall) {
    self.calls.lock().unwrap().push(call);
  }

  fn write(&self, path: &Path, bytes: Vec<u8>) -> u64 {
    let len = bytes.len() as u64;
    self.files.lock().unwrap().insert(path.to_path_buf(), bytes);
    len
  }
}

fn not_found(what: impl std::fmt::Display) -> io::Error {
  io::Error::new(io::ErrorKind::NotFound, format!("{what} not found"))
}

#[async_trait]
impl AssetStorage for FakeStorage {
  async fn exists(&self, path: &Path) -> io::Result<bool> {
    self.record(StorageCall::Exists(path.to_path_buf()));
    Ok(self.dirs.lock().unwrap().contains(path) || self.files.lock().unwrap().contains_key(path))
  }

  async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    self.record(StorageCall::CreateDirAll(path.to_path_buf()));
    if self.read_only.contains(path) {
      return Err(io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("{} is read-only", path.display()),
      ));
    }
    self.dirs.lock().unwrap().insert(path.to_path_buf());
    Ok(())
  }

  async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
    self.record(StorageCall::Download {
      url: url.to_string(),
      destination: destination.to_path_buf(),
    });
    match self.remote.get(url) {
      Some(bytes) => Ok(self.write(destination, bytes.clone())),
      None => Err(ResolveError::HttpStatus {
        url: url.to_string(),
        status: 404,
      }),
    }
  }

  async fn copy_resource(&self, name: &str, destination: &Path) -> io::Result<u64> {
    self.record(StorageCall::CopyResource {
      name: name.to_string(),
      destination: destination.to_path_buf(),
    });
    let bytes = self.resources.get(name).cloned().ok_or_else(|| not_found(name))?;
    Ok(self.write(destination, bytes))
  }

  async fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<u64> {
    self.record(StorageCall::CopyFile {
      source: source.to_path_buf(),
      destination: destination.to_path_buf(),
    });
    let bytes = self
      .file(source)
      .ok_or_else(|| not_found(source.display()))?;
    Ok(self.write(destination, bytes))
  }

  async fn read_resource(&self, name: &str) -> io::Result<Vec<u8>> {
    self.record(StorageCall::ReadResource(name.to_string()));
    self.resources.get(name).cloned().ok_or_else(|| not_found(name))
  }

  async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
    self.record(StorageCall::ReadFile(path.to_path_buf()));
    self.file(path).ok_or_else(|| not_found(path.display()))
  }
}

#[derive(Default)]
pub struct FakeFetcher {
  responses: BTreeMap<String, FetchedPayload>,
  requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
  pub fn with(mut self, url: &str, payload: FetchedPayload) -> Self {
    self.responses.insert(url.to_string(), payload);
    self
  }

  pub fn requests(&self) -> Vec<String> {
    self.requests.lock().unwrap().clone()
  }
}

#[async_trait]
impl Fetch for FakeFetcher {
  async fn fetch(&self, url: &str) -> Result<FetchedPayload> {
    self.requests.lock().unwrap().push(url.to_string());
    self
      .responses
      .get(url)
      .cloned()
      .ok_or_else(|| ResolveError::HttpStatus {
        url: url.to_string(),
        status: 404,
      })
  }
}

/// Raw HTTP/1.1 response with a body and optional content type.
pub fn http_response(status: &str, content_type: Option<&str>, body: &[u8]) -> Vec<u8> {
  let mut head = format!(
    "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n",
    body.len()
  );
  if let Some(content_type) = content_type {
    head.push_str(&format!("content-type: {content_type}\r\n"));
  }
  head.push_str("\r\n");

  let mut response = head.into_bytes();
  response.extend_from_slice(body);
  response
}

/// Serve `response` to the first connection on a loopback port and return its base URL.
pub async fn serve_once(response: Vec<u8>) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
      let read = socket.read(&mut buf).await.unwrap();
      if read == 0 {
        break;
      }
      request.extend_from_slice(&buf[..read]);
    }
    socket.write_all(&response).await.unwrap();
    socket.shutdown().await.unwrap();
  });
  format!("http://{addr}")
}

/// Client that ignores proxy settings from the environment.
pub fn loopback_client() -> reqwest::Client {
  reqwest::Client::builder().no_proxy().build().unwrap()
}
