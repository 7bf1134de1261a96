//! Storage configuration loader for the gateway.
//!
//! The original deployment re-read process-wide environment on every call;
//! here configuration is loaded once, handed to [`crate::StorageGateway`]
//! at construction, and validated there.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "storage.config.json";

const DEFAULT_BUCKET: &str = "service-images";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Connection settings for the hosted storage backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Deployment base URL, e.g. `https://project-ref.supabase.co`.
    pub base_url: String,
    /// API key sent as a bearer token on every gateway request.
    pub access_key: String,
    /// Bucket holding uploaded catalog images.
    pub default_bucket: String,
    /// Per-request timeout in seconds; an unresponsive backend must not block
    /// page rendering longer than this.
    pub request_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            access_key: String::new(),
            default_bucket: DEFAULT_BUCKET.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl StorageConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall
    /// back to default values; the empty credentials then fail loudly at
    /// gateway construction instead of producing broken per-call behavior.
    pub fn discover(config_dir: &Path) -> Self {
        let candidate = config_dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Timeout to apply to each gateway request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
