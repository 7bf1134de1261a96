use thiserror::Error;

/// Failure taxonomy for storage gateway operations.
///
/// Every gateway call surfaces its failure as one of these variants instead of
/// an unstructured error; callers decide whether to report it (admin uploads)
/// or let the read-side placeholder fallback apply. The gateway itself never
/// retries.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object does not exist in the bucket.
    #[error("object not found: {bucket}/{key}")]
    NotFound {
        /// Bucket that was queried.
        bucket: String,
        /// Key that was not present.
        key: String,
    },
    /// An upload collided with an existing key; upsert is disabled, so the
    /// stored object is left untouched.
    #[error("object key already exists: {bucket}/{key}")]
    Collision {
        /// Bucket that holds the existing object.
        bucket: String,
        /// Key that already exists.
        key: String,
    },
    /// The backend rejected or failed the request.
    #[error("storage backend error ({status}): {message}")]
    Backend {
        /// HTTP status returned by the backend.
        status: u16,
        /// Response body or canonical status reason.
        message: String,
    },
    /// The request never completed: connection failure, timeout, or an
    /// undecodable response.
    #[error("storage transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
