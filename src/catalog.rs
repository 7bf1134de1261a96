//! Canonical mapping of the historical catalog record schemas.
//!
//! Catalog entities were served from two sources over the site's lifetime: a
//! legacy headless-CMS GraphQL API with nested media nodes, and the hosted
//! database with flat image columns. Rendering code should never branch on the
//! source; this module maps either shape onto one canonical pair of asset
//! references that feeds [`crate::AssetResolver::resolve`] directly.

use serde::Deserialize;

/// Media item attached to a legacy CMS record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaNode {
    /// Direct URL of the media item.
    pub source_url: Option<String>,
    /// Alternative text authored alongside the media item.
    pub alt_text: Option<String>,
}

/// Wrapper object the CMS GraphQL API places around single media references.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaEdge {
    /// The wrapped media node.
    pub node: Option<MediaNode>,
}

/// Legacy CMS record shape (camelCase payloads, nested media nodes).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsRecord {
    /// Identifier assigned by the CMS.
    pub id: String,
    /// Record title.
    pub title: String,
    /// URL slug of the record's detail page.
    pub slug: String,
    /// Featured image reference, usually a sharing-host URL.
    pub featured_image: Option<MediaEdge>,
}

/// Hosted-database record shape (snake_case columns).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseRecord {
    /// Row identifier.
    pub id: i64,
    /// Record title.
    pub title: String,
    /// URL slug of the record's detail page.
    pub slug: String,
    /// Object key (or full public URL) written by the upload flow.
    pub image_path: Option<String>,
    /// Legacy externally hosted image URL kept as a backup tier.
    pub featured_image_url: Option<String>,
}

/// One catalog record from either historical source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum CatalogRecord {
    /// Row from the hosted database.
    Database(DatabaseRecord),
    /// Entry from the legacy CMS.
    Cms(CmsRecord),
}

/// Canonical asset references for one catalog record.
///
/// `primary` and `backup` plug straight into the resolver's precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFields {
    /// Reference tried first.
    pub primary: Option<String>,
    /// Reference tried when the primary tier fails to normalize.
    pub backup: Option<String>,
}

impl CatalogRecord {
    /// Map either source shape onto the canonical asset-reference pair.
    ///
    /// Database rows prefer the uploaded object over the legacy external URL;
    /// CMS entries only ever carried one image. Blank strings count as absent.
    pub fn asset_fields(&self) -> AssetFields {
        match self {
            CatalogRecord::Database(record) => AssetFields {
                primary: non_blank(record.image_path.as_deref()),
                backup: non_blank(record.featured_image_url.as_deref()),
            },
            CatalogRecord::Cms(record) => AssetFields {
                primary: non_blank(
                    record
                        .featured_image
                        .as_ref()
                        .and_then(|edge| edge.node.as_ref())
                        .and_then(|node| node.source_url.as_deref()),
                ),
                backup: None,
            },
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}
