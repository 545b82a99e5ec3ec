use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{PackagedAssets, PlatformKind};
use crate::asset_paths::resource_entry_name;
use crate::error::{ResolveError, Result};
use crate::models::ResolvedAsset;
use crate::storage::AssetStorage;

const EXPECTED_LOCATION: &str = "res/raw folder of the APK file";

/// Layout where packaged assets are resource-table entries named `{uri}.{type}`.
///
/// Entries live inside the application archive, so they can only be copied out or read,
/// never referenced in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceTable;

#[async_trait]
impl PackagedAssets for ResourceTable {
  fn kind(&self) -> PlatformKind {
    PlatformKind::ResourceTable
  }

  fn default_storage_dir(&self) -> Option<PathBuf> {
    dirs::data_local_dir()
  }

  async fn store(
    &self,
    storage: &dyn AssetStorage,
    asset: &ResolvedAsset,
    destination: &Path,
  ) -> Result<PathBuf> {
    let entry = resource_entry_name(asset);
    storage
      .copy_resource(&entry, destination)
      .await
      .map_err(|source| ResolveError::MissingResource {
        uri: asset.uri.clone(),
        location: EXPECTED_LOCATION,
        source,
      })?;
    Ok(destination.to_path_buf())
  }

  async fn read(&self, storage: &dyn AssetStorage, asset: &ResolvedAsset) -> Result<Vec<u8>> {
    let entry = resource_entry_name(asset);
    storage
      .read_resource(&entry)
      .await
      .map_err(|source| ResolveError::MissingResource {
        uri: asset.uri.clone(),
        location: EXPECTED_LOCATION,
        source,
      })
  }
}
