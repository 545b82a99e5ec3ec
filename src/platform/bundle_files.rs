use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{PackagedAssets, PlatformKind};
use crate::asset_paths::strip_file_scheme;
use crate::error::{ResolveError, Result};
use crate::models::ResolvedAsset;
use crate::storage::AssetStorage;

const EXPECTED_LOCATION: &str = "assets folder of the bundle folder";

/// Layout where packaged assets are plain files inside the application bundle,
/// addressed as `file://<bundle>/assets/...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleFiles;

#[async_trait]
impl PackagedAssets for BundleFiles {
  fn kind(&self) -> PlatformKind {
    PlatformKind::BundleFile
  }

  fn default_storage_dir(&self) -> Option<PathBuf> {
    dirs::document_dir()
  }

  fn in_place(&self, asset: &ResolvedAsset) -> Option<PathBuf> {
    Some(PathBuf::from(strip_file_scheme(&asset.uri)))
  }

  async fn store(
    &self,
    storage: &dyn AssetStorage,
    asset: &ResolvedAsset,
    destination: &Path,
  ) -> Result<PathBuf> {
    let packaged = Path::new(strip_file_scheme(&asset.uri));
    storage
      .copy_file(packaged, destination)
      .await
      .map_err(|source| ResolveError::MissingResource {
        uri: asset.uri.clone(),
        location: EXPECTED_LOCATION,
        source,
      })?;
    Ok(destination.to_path_buf())
  }

  async fn read(&self, storage: &dyn AssetStorage, asset: &ResolvedAsset) -> Result<Vec<u8>> {
    let packaged = Path::new(strip_file_scheme(&asset.uri));
    storage
      .read_file(packaged)
      .await
      .map_err(|source| ResolveError::MissingResource {
        uri: asset.uri.clone(),
        location: EXPECTED_LOCATION,
        source,
      })
  }
}
