#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod resolution;
pub mod storage;

pub use catalog::{AssetFields, CatalogRecord};
pub use config::StorageConfig;
pub use resolution::{
    AssetResolver, PLACEHOLDER_ASSET_PATH, ReferenceClass, ResolvedAsset, classify,
    requires_raw_delivery,
};
pub use storage::{ObjectSummary, StorageError, StorageGateway, StorageLayout};
