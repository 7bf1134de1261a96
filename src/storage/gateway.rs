use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::StorageError;
use super::layout::StorageLayout;
use crate::config::StorageConfig;

/// Cache lifetime hint sent with every upload, in seconds.
const UPLOAD_CACHE_CONTROL: &str = "3600";

/// Page size requested from the listing endpoint; the admin gallery shows at
/// most one bucket of uploaded images.
const LIST_PAGE_LIMIT: u32 = 1000;

/// Extension used when an uploaded filename carries none.
const FALLBACK_EXTENSION: &str = "bin";

/// Summary of one stored object as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectSummary {
    /// Object key within the bucket.
    #[serde(rename = "name")]
    pub key: String,
}

#[derive(Debug, Serialize)]
struct ListRequest {
    prefix: String,
    limit: u32,
    offset: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Asynchronous client for the hosted object-storage backend.
///
/// The gateway is the only component in the crate that performs I/O.
/// Configuration is validated once at construction — a missing base URL or
/// access key is a startup defect, never a per-call error — and every request
/// carries the configured timeout so an unresponsive backend cannot stall page
/// rendering. Calls are independent request-response exchanges with no retry
/// policy; callers needing resilience layer their own backoff on top.
#[derive(Debug, Clone)]
pub struct StorageGateway {
    client: Client,
    layout: StorageLayout,
    access_key: String,
}

impl StorageGateway {
    /// Build a gateway from validated configuration.
    pub fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let base_url = config.base_url.trim();
        anyhow::ensure!(!base_url.is_empty(), "storage base URL is not configured");
        let access_key = config.access_key.trim();
        anyhow::ensure!(!access_key.is_empty(), "storage access key is not configured");

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to construct storage HTTP client")?;

        Ok(Self {
            client,
            layout: StorageLayout::new(base_url),
            access_key: access_key.to_string(),
        })
    }

    /// URL layout of this deployment, shared with the read-side resolver.
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Public URL for `key` inside `bucket`.
    ///
    /// Deterministic string construction; never touches the network and cannot
    /// fail once the gateway exists.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        self.layout.public_object_url(bucket, key)
    }

    /// List the objects stored in `bucket`.
    ///
    /// Follows the backend's paging until a short page is returned, so buckets
    /// larger than one page are not truncated. An empty bucket yields an empty
    /// list, never an error.
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, StorageError> {
        let mut objects = Vec::new();
        let mut offset = 0;

        loop {
            let response = self
                .client
                .post(self.layout.list_endpoint(bucket))
                .bearer_auth(&self.access_key)
                .header("apikey", &self.access_key)
                .json(&ListRequest {
                    prefix: String::new(),
                    limit: LIST_PAGE_LIMIT,
                    offset,
                })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(backend_error(
                    status,
                    response.text().await.unwrap_or_default(),
                    bucket,
                    "",
                ));
            }

            let page: Vec<ObjectSummary> = response.json().await?;
            if !extend_listing(&mut objects, page) {
                break;
            }
            offset += LIST_PAGE_LIMIT;
        }

        debug!(bucket, count = objects.len(), "listed storage objects");
        Ok(objects)
    }

    /// Upload `bytes` under `key` and return the resulting public URL.
    ///
    /// Keys are expected to be collision-resistant (see [`object_key_for`]);
    /// upsert is disabled, so a colliding key fails with
    /// [`StorageError::Collision`] and leaves the stored object untouched.
    pub async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let response = self
            .client
            .post(self.layout.object_endpoint(bucket, key))
            .bearer_auth(&self.access_key)
            .header("apikey", &self.access_key)
            .header("cache-control", UPLOAD_CACHE_CONTROL)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::CONFLICT {
                warn!(bucket, key, "upload rejected: key already exists");
            }
            return Err(backend_error(
                status,
                response.text().await.unwrap_or_default(),
                bucket,
                key,
            ));
        }

        debug!(bucket, key, "uploaded object");
        Ok(self.public_url(bucket, key))
    }

    /// Create a signed URL for a private object, valid for `ttl_seconds`.
    ///
    /// A missing object surfaces as [`StorageError::NotFound`], distinct from
    /// backend failures; a success always carries a usable URL.
    pub async fn create_signed_url(
        &self,
        bucket: &str,
        key: &str,
        ttl_seconds: u64,
    ) -> Result<String, StorageError> {
        let response = self
            .client
            .post(self.layout.sign_endpoint(bucket, key))
            .bearer_auth(&self.access_key)
            .header("apikey", &self.access_key)
            .json(&SignRequest { expires_in: ttl_seconds })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(backend_error(
                status,
                response.text().await.unwrap_or_default(),
                bucket,
                key,
            ));
        }

        let signed: SignResponse = response.json().await?;
        debug!(bucket, key, ttl_seconds, "created signed URL");
        Ok(self.layout.api_absolute(&signed.signed_url))
    }

    /// Remove `key` from `bucket`.
    ///
    /// Idempotent: removing a key that does not exist is not an error.
    pub async fn remove(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.layout.object_endpoint(bucket, key))
            .bearer_auth(&self.access_key)
            .header("apikey", &self.access_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(bucket, key, "remove skipped: object already absent");
            return Ok(());
        }
        if !status.is_success() {
            return Err(backend_error(
                status,
                response.text().await.unwrap_or_default(),
                bucket,
                key,
            ));
        }

        debug!(bucket, key, "removed object");
        Ok(())
    }
}

/// Accumulate one listing page into `objects`; returns `true` when the page
/// was full and another page may follow.
fn extend_listing(objects: &mut Vec<ObjectSummary>, page: Vec<ObjectSummary>) -> bool {
    let full_page = page.len() == LIST_PAGE_LIMIT as usize;
    objects.extend(page);
    full_page
}

fn backend_error(status: StatusCode, body: String, bucket: &str, key: &str) -> StorageError {
    if status == StatusCode::CONFLICT {
        return StorageError::Collision {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
    }
    if status == StatusCode::NOT_FOUND {
        return StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
    }
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body
    };
    StorageError::Backend { status: status.as_u16(), message }
}

/// Generate a collision-resistant object key for an uploaded file: a random
/// id plus the original file's extension, optionally under a folder prefix.
///
/// The extension is lowercased; a filename without one falls back to `bin`.
pub fn object_key_for(folder: Option<&str>, original_filename: &str) -> String {
    let extension = original_filename
        .rsplit_once('.')
        .map(|(stem, extension)| (stem, extension.trim()))
        .filter(|(stem, extension)| !stem.is_empty() && !extension.is_empty())
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    match folder.map(|folder| folder.trim().trim_matches('/')) {
        Some(folder) if !folder.is_empty() => format!("{folder}/{file_name}"),
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{
        LIST_PAGE_LIMIT, ObjectSummary, SignResponse, StorageGateway, backend_error,
        extend_listing, object_key_for,
    };
    use crate::config::StorageConfig;
    use crate::storage::error::StorageError;

    fn config() -> StorageConfig {
        StorageConfig {
            base_url: "https://abc.supabase.co".to_string(),
            access_key: "service-key".to_string(),
            ..StorageConfig::default()
        }
    }

    #[test]
    fn construction_requires_base_url_and_key() {
        let mut missing_url = config();
        missing_url.base_url = "  ".to_string();
        assert!(StorageGateway::new(&missing_url).is_err());

        let mut missing_key = config();
        missing_key.access_key = String::new();
        assert!(StorageGateway::new(&missing_key).is_err());

        assert!(StorageGateway::new(&config()).is_ok());
    }

    #[test]
    fn public_url_is_pure_construction() {
        let gateway = StorageGateway::new(&config()).unwrap();
        assert_eq!(
            gateway.public_url("service-images", "photo.jpg"),
            "https://abc.supabase.co/storage/v1/object/public/service-images/photo.jpg"
        );
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let error = backend_error(StatusCode::NOT_FOUND, String::new(), "bucket", "key");
        assert!(matches!(error, StorageError::NotFound { .. }));
    }

    #[test]
    fn conflict_status_maps_to_collision() {
        let error = backend_error(StatusCode::CONFLICT, String::new(), "service-images", "dup-key");
        match error {
            StorageError::Collision { bucket, key } => {
                assert_eq!(bucket, "service-images");
                assert_eq!(key, "dup-key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn listing_pages_accumulate_until_a_short_page() {
        let mut objects = Vec::new();

        let full_page: Vec<ObjectSummary> = (0..LIST_PAGE_LIMIT)
            .map(|index| ObjectSummary { key: format!("{index}.jpg") })
            .collect();
        assert!(extend_listing(&mut objects, full_page));

        let short_page = vec![ObjectSummary { key: "last.jpg".to_string() }];
        assert!(!extend_listing(&mut objects, short_page));

        assert_eq!(objects.len(), LIST_PAGE_LIMIT as usize + 1);
        assert_eq!(objects.last().unwrap().key, "last.jpg");
    }

    #[test]
    fn other_failures_carry_status_and_message() {
        let error =
            backend_error(StatusCode::FORBIDDEN, "permission denied".to_string(), "bucket", "key");
        match error {
            StorageError::Backend { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_error_bodies_fall_back_to_the_status_reason() {
        let error = backend_error(StatusCode::BAD_GATEWAY, "  ".to_string(), "bucket", "key");
        match error {
            StorageError::Backend { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn generated_keys_keep_the_lowercased_extension() {
        let key = object_key_for(None, "Holiday Photo.JPG");
        assert!(key.ends_with(".jpg"), "unexpected key {key}");
        assert_eq!(key.len(), 36 + ".jpg".len());
    }

    #[test]
    fn generated_keys_fall_back_to_bin_without_extension() {
        assert!(object_key_for(None, "README").ends_with(".bin"));
        assert!(object_key_for(None, ".gitignore").ends_with(".bin"));
    }

    #[test]
    fn generated_keys_are_unique_per_call() {
        assert_ne!(object_key_for(None, "a.png"), object_key_for(None, "a.png"));
    }

    #[test]
    fn folder_prefixes_are_normalized() {
        let key = object_key_for(Some("/heroes/"), "a.png");
        assert!(key.starts_with("heroes/"), "unexpected key {key}");

        let key = object_key_for(Some("  "), "a.png");
        assert!(!key.contains('/'), "unexpected key {key}");
    }

    #[tokio::test]
    async fn unreachable_backend_surfaces_a_transport_error() {
        let config = StorageConfig {
            base_url: "http://storage.invalid".to_string(),
            access_key: "service-key".to_string(),
            ..StorageConfig::default()
        };
        let gateway = StorageGateway::new(&config).unwrap();

        let error = gateway.list_objects("service-images").await.unwrap_err();
        assert!(matches!(error, StorageError::Transport(_)), "unexpected error: {error:?}");
    }

    #[test]
    fn sign_response_uses_the_backend_field_name() {
        let signed: SignResponse =
            serde_json::from_str(r#"{"signedURL":"/object/sign/b/k?token=t"}"#).unwrap();
        assert_eq!(signed.signed_url, "/object/sign/b/k?token=t");
    }
}
