//! Asset resolution orchestrator: stored files and encoded data.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset_paths::{default_destination, parent_dir, strip_query};
use crate::classify::{AssetSource, Classified, classify};
use crate::config::ResolverConfig;
use crate::data_url::{encode_data_url, fetch_to_data_url};
use crate::error::{ResolveError, Result};
use crate::fetch::{Fetch, HttpFetcher};
use crate::mime::MimeTable;
use crate::models::{AssetReference, EncodedDataOptions, Resolved, StoredFileOptions};
use crate::platform::{PackagedAssets, Runtime};
use crate::registry::{AssetModules, AssetRegistry};
use crate::storage::{AssetStorage, LocalStorage};

const LOCAL_FILE_LOCATION: &str = "local file system";

/// Resolves asset references for one runtime and set of collaborators.
pub struct AssetResolver {
  runtime: Runtime,
  modules: Arc<dyn AssetModules>,
  storage: Arc<dyn AssetStorage>,
  fetcher: Arc<dyn Fetch>,
  mime_table: MimeTable,
  storage_dir: Option<PathBuf>,
  default_file_name: Option<String>,
}

impl AssetResolver {
  /// Compose a resolver from explicit collaborators.
  pub fn new(
    runtime: Runtime,
    modules: Arc<dyn AssetModules>,
    storage: Arc<dyn AssetStorage>,
    fetcher: Arc<dyn Fetch>,
  ) -> Self {
    Self {
      runtime,
      modules,
      storage,
      fetcher,
      mime_table: MimeTable::default(),
      storage_dir: None,
      default_file_name: None,
    }
  }

  /// Compose the stock collaborators described by `config`.
  pub fn from_config(config: &ResolverConfig) -> Result<Self> {
    let modules = match &config.manifest {
      Some(path) => AssetRegistry::load_from_path(path)?,
      None => AssetRegistry::default(),
    };

    let mut storage = LocalStorage::new(&config.resource_dir);
    if let Some(bundle_dir) = &config.bundle_dir {
      storage = storage.with_bundle_dir(bundle_dir);
    }

    let mut resolver = Self::new(
      Runtime::for_kind(config.platform),
      Arc::new(modules),
      Arc::new(storage),
      Arc::new(HttpFetcher::default()),
    )
    .with_mime_table(MimeTable::with_overrides(&config.mime_types));
    resolver.storage_dir = config.storage_dir.clone();
    resolver.default_file_name = config.default_file_name.clone();

    Ok(resolver)
  }

  /// Replace the MIME lookup table.
  pub fn with_mime_table(mut self, mime_table: MimeTable) -> Self {
    self.mime_table = mime_table;
    self
  }

  /// Directory used when no destination is given, instead of the platform default.
  pub fn with_storage_dir(mut self, storage_dir: impl Into<PathBuf>) -> Self {
    self.storage_dir = Some(storage_dir.into());
    self
  }

  /// File name used when no destination is given, instead of the asset's own name.
  pub fn with_default_file_name(mut self, file_name: impl Into<String>) -> Self {
    self.default_file_name = Some(file_name.into());
    self
  }

  /// Runtime this resolver serves.
  pub fn runtime(&self) -> &Runtime {
    &self.runtime
  }

  /// Make the asset available on persistent storage and return where it lives.
  ///
  /// Inline references come back unchanged and browser runtimes get the URL as-is. A
  /// network asset that cannot be downloaded, including when its destination directory
  /// cannot be created, is logged and reported as `Ok(None)`; every other failure is
  /// returned as an error. With `avoid_copy`, layouts that allow direct access return the
  /// packaged location without touching storage.
  pub async fn resolve_to_stored_file(
    &self,
    reference: impl Into<AssetReference>,
    options: &StoredFileOptions,
  ) -> Result<Option<Resolved>> {
    let source = match classify(reference.into(), self.modules.as_ref())? {
      Classified::Inline(value) => return Ok(Some(Resolved::Inline(value))),
      Classified::Source(source) => source,
    };

    let packaged = match &self.runtime {
      Runtime::Browser => return Ok(Some(Resolved::Url(source.url().to_string()))),
      Runtime::Native(packaged) => packaged.as_ref(),
    };
    let requested = options.destination.as_deref();

    match source {
      AssetSource::Remote { url, from_bundle } => {
        let url = if from_bundle { strip_query(&url) } else { url.as_str() };
        let destination = self.destination(requested, packaged, url, None)?;
        if let Err(err) = self.ensure_parent_dir(&destination).await {
          log::warn!("download of {url} to {} failed: {err}", destination.display());
          return Ok(None);
        }
        Ok(self.download(url, destination).await)
      }
      AssetSource::Packaged(asset) => {
        if options.avoid_copy {
          if let Some(in_place) = packaged.in_place(&asset) {
            log::debug!("using {} in place", in_place.display());
            return Ok(Some(Resolved::Path(in_place)));
          }
        }
        let destination =
          self.destination(requested, packaged, &asset.uri, Some(&asset.asset_type))?;
        self.ensure_parent_dir(&destination).await?;
        let stored = packaged
          .store(self.storage.as_ref(), &asset, &destination)
          .await?;
        log::info!("stored {} at {}", asset.uri, stored.display());
        Ok(Some(Resolved::Path(stored)))
      }
      AssetSource::LocalFile { url } => {
        let destination = self.destination(requested, packaged, &url, None)?;
        self.ensure_parent_dir(&destination).await?;
        self
          .storage
          .copy_file(&AssetSource::local_path(&url), &destination)
          .await
          .map_err(|err| ResolveError::MissingResource {
            uri: url.clone(),
            location: LOCAL_FILE_LOCATION,
            source: err,
          })?;
        log::info!("stored {url} at {}", destination.display());
        Ok(Some(Resolved::Path(destination)))
      }
    }
  }

  /// Make the asset available as a `data:` URL, or as a plain URL when allowed.
  ///
  /// `allow_url` only applies to network origins and browser runtimes; packaged and local
  /// assets on a native runtime are always read and encoded.
  pub async fn resolve_to_encoded_data(
    &self,
    reference: impl Into<AssetReference>,
    options: EncodedDataOptions,
  ) -> Result<Resolved> {
    let source = match classify(reference.into(), self.modules.as_ref())? {
      Classified::Inline(value) => return Ok(Resolved::Inline(value)),
      Classified::Source(source) => source,
    };

    let packaged = match &self.runtime {
      Runtime::Browser => return self.url_or_data_url(source.url(), options).await,
      Runtime::Native(packaged) => packaged.as_ref(),
    };

    match source {
      AssetSource::Remote { url, from_bundle } => {
        let url = if from_bundle { strip_query(&url) } else { url.as_str() };
        self.url_or_data_url(url, options).await
      }
      AssetSource::Packaged(asset) => {
        let mime = self.mime_table.lookup(&asset.asset_type);
        let bytes = packaged.read(self.storage.as_ref(), &asset).await?;
        Ok(Resolved::DataUrl(encode_data_url(mime, &bytes)))
      }
      AssetSource::LocalFile { url } => {
        let mime = self.mime_table.lookup_path(&url);
        let bytes = self
          .storage
          .read_file(&AssetSource::local_path(&url))
          .await
          .map_err(|err| ResolveError::MissingResource {
            uri: url.clone(),
            location: LOCAL_FILE_LOCATION,
            source: err,
          })?;
        Ok(Resolved::DataUrl(encode_data_url(mime, &bytes)))
      }
    }
  }

  async fn url_or_data_url(&self, url: &str, options: EncodedDataOptions) -> Result<Resolved> {
    if options.allow_url {
      return Ok(Resolved::Url(url.to_string()));
    }
    let data_url = fetch_to_data_url(self.fetcher.as_ref(), &self.mime_table, url).await?;
    Ok(Resolved::DataUrl(data_url))
  }

  async fn download(&self, url: &str, destination: PathBuf) -> Option<Resolved> {
    match self.storage.download(url, &destination).await {
      Ok(bytes) => {
        log::info!("downloaded {url} to {} ({bytes} bytes)", destination.display());
        Some(Resolved::Path(destination))
      }
      Err(err) => {
        log::warn!("download of {url} to {} failed: {err}", destination.display());
        None
      }
    }
  }

  fn destination(
    &self,
    requested: Option<&Path>,
    packaged: &dyn PackagedAssets,
    uri: &str,
    asset_type: Option<&str>,
  ) -> Result<PathBuf> {
    if let Some(path) = requested {
      return Ok(path.to_path_buf());
    }

    let storage_dir = self
      .storage_dir
      .clone()
      .or_else(|| packaged.default_storage_dir())
      .ok_or(ResolveError::NoDestination)?;
    Ok(default_destination(
      &storage_dir,
      self.default_file_name.as_deref(),
      uri,
      asset_type,
    ))
  }

  async fn ensure_parent_dir(&self, destination: &Path) -> Result<()> {
    let Some(dir) = parent_dir(destination) else {
      return Ok(());
    };

    let exists = self
      .storage
      .exists(dir)
      .await
      .map_err(|err| ResolveError::io(dir, err))?;
    if !exists {
      log::debug!("creating {}", dir.display());
      self
        .storage
        .create_dir_all(dir)
        .await
        .map_err(|err| ResolveError::io(dir, err))?;
    }
    Ok(())
  }
}
