use tracing::warn;

use super::classify::{ReferenceClass, classify};
use super::normalize::normalize_reference;
use super::optimization::requires_raw_delivery;
use crate::storage::StorageLayout;

/// Fixed local path rendered whenever no tier resolves.
///
/// Must exist as a static asset in the deployed site; it is the guaranteed
/// terminal fallback of [`AssetResolver::resolve`].
pub const PLACEHOLDER_ASSET_PATH: &str = "/placeholder-image.svg";

/// Final render-ready URL plus its delivery hint.
///
/// Ephemeral: recomputed on every render pass and never persisted, so a
/// republished catalog record takes effect on the next read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Fetchable URL; never empty.
    pub url: String,
    /// When `true`, the renderer must not route the URL through an
    /// image-optimization proxy.
    pub skip_optimization: bool,
}

/// Resolves raw catalog references into render-ready URLs with a guaranteed
/// placeholder fallback.
///
/// Resolution is pure string work: no network access, no shared state, safe to
/// call from any thread on every render.
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    storage: Option<StorageLayout>,
}

impl AssetResolver {
    /// Resolver without storage-key expansion.
    ///
    /// Bare object keys classify as opaque and pass through unchanged; use
    /// [`AssetResolver::with_storage`] when records may hold keys instead of
    /// full URLs.
    pub fn new() -> Self {
        Self { storage: None }
    }

    /// Resolver that can expand bare object keys against the given storage
    /// deployment.
    pub fn with_storage(layout: StorageLayout) -> Self {
        Self { storage: Some(layout) }
    }

    /// Resolve a primary and an optional backup reference into one usable URL.
    ///
    /// Precedence is strict and short-circuiting: if the primary reference
    /// normalizes, the backup is never consulted. When neither candidate
    /// resolves, the result is [`PLACEHOLDER_ASSET_PATH`] — the function never
    /// returns an empty URL, so callers need no error path for missing images.
    ///
    /// `bucket` applies only when a candidate is a bare object key (no scheme,
    /// no leading slash) and this resolver was built with a storage layout; a
    /// reference that already classifies as an object-storage URL is taken
    /// as-is regardless of the bucket supplied.
    pub fn resolve(
        &self,
        primary: Option<&str>,
        backup: Option<&str>,
        bucket: Option<&str>,
    ) -> ResolvedAsset {
        for candidate in [primary, backup].into_iter().flatten() {
            if let Some(url) = self.resolve_candidate(candidate, bucket) {
                let skip_optimization = requires_raw_delivery(&url);
                return ResolvedAsset { url, skip_optimization };
            }
        }

        warn!(?primary, ?backup, "no asset tier resolved, falling back to placeholder");
        ResolvedAsset {
            url: PLACEHOLDER_ASSET_PATH.to_string(),
            skip_optimization: false,
        }
    }

    fn resolve_candidate(&self, reference: &str, bucket: Option<&str>) -> Option<String> {
        let class = classify(reference);

        if class == ReferenceClass::Opaque && is_bare_object_key(reference) {
            if let (Some(layout), Some(bucket)) = (self.storage.as_ref(), bucket) {
                return Some(layout.public_object_url(bucket, reference.trim()));
            }
        }

        normalize_reference(reference, class).filter(|url| !url.is_empty())
    }
}

/// A reference with no scheme and no leading slash is treated as an object key
/// when a bucket is available, mirroring how records written by the upload
/// flow store keys rather than full URLs.
fn is_bare_object_key(reference: &str) -> bool {
    let trimmed = reference.trim();
    !trimmed.is_empty() && !trimmed.contains("://") && !trimmed.starts_with('/')
}
