#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod classify;
pub mod config;
pub mod data_url;
pub mod error;
pub mod fetch;
pub mod mime;
pub mod models;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod storage;
#[cfg(test)]
mod testing;

pub use classify::{AssetSource, Classified, classify};
pub use config::ResolverConfig;
pub use error::{ResolveError, Result};
pub use fetch::{Fetch, FetchedPayload, HttpFetcher};
pub use mime::MimeTable;
pub use models::{
  AssetOrigin, AssetReference, BundleId, EncodedDataOptions, Resolved, ResolvedAsset,
  StoredFileOptions,
};
pub use platform::{BundleFiles, PackagedAssets, PlatformKind, ResourceTable, Runtime};
pub use registry::{AssetModules, AssetRegistry};
pub use resolver::AssetResolver;
pub use storage::{AssetStorage, LocalStorage};
