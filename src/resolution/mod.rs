//! The pure asset-resolution pipeline.
//!
//! This module intentionally splits the responsibilities into focused submodules so that
//! reference classification, per-tier normalization, fallback composition, and the
//! delivery hint can be tested independently. The same code is shared between listing
//! pages, detail pages, and the admin gallery.

mod classify;
mod compose;
mod normalize;
mod optimization;

pub use classify::{ReferenceClass, classify};
pub use compose::{AssetResolver, PLACEHOLDER_ASSET_PATH, ResolvedAsset};
pub use normalize::normalize_reference;
pub use optimization::requires_raw_delivery;
