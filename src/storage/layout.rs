/// Path segment that marks a public object URL on the storage backend.
///
/// Shared with the reference classifier: any reference containing this segment
/// is already a fetchable public URL and is never rewritten.
pub const PUBLIC_OBJECT_SEGMENT: &str = "/storage/v1/object/public/";

const OBJECT_API_PREFIX: &str = "/storage/v1/object";
const STORAGE_API_PREFIX: &str = "/storage/v1";

/// Deterministic URL construction for one storage deployment.
///
/// All methods are pure string work; misconfiguration (an empty base URL) is
/// caught at gateway construction, not here.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    base_url: String,
}

impl StorageLayout {
    /// Create a layout for the given deployment base URL
    /// (e.g. `https://project-ref.supabase.co`). Trailing slashes are trimmed
    /// so joined paths stay canonical.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Deployment base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public, unauthenticated URL for `key` inside `bucket`.
    pub fn public_object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}{}{}/{}",
            self.base_url,
            PUBLIC_OBJECT_SEGMENT,
            bucket,
            key.trim_start_matches('/')
        )
    }

    /// Authenticated endpoint for uploading or deleting `key` in `bucket`.
    pub(crate) fn object_endpoint(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base_url,
            OBJECT_API_PREFIX,
            bucket,
            key.trim_start_matches('/')
        )
    }

    /// Endpoint listing the objects of `bucket`.
    pub(crate) fn list_endpoint(&self, bucket: &str) -> String {
        format!("{}{}/list/{}", self.base_url, OBJECT_API_PREFIX, bucket)
    }

    /// Endpoint creating a signed URL for `key` in `bucket`.
    pub(crate) fn sign_endpoint(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}{}/sign/{}/{}",
            self.base_url,
            OBJECT_API_PREFIX,
            bucket,
            key.trim_start_matches('/')
        )
    }

    /// Absolute URL for a storage-API-relative path returned by the backend,
    /// such as the signed path from the signing endpoint.
    pub(crate) fn api_absolute(&self, api_relative: &str) -> String {
        format!("{}{}/{}", self.base_url, STORAGE_API_PREFIX, api_relative.trim_start_matches('/'))
    }
}
