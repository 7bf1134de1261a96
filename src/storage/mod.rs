//! Asynchronous gateway to the hosted object-storage backend.
//!
//! Everything network-facing in the crate lives here. URL construction is kept
//! in [`StorageLayout`] so that the read-side resolver can build public object
//! URLs without ever touching the network; the [`StorageGateway`] performs the
//! actual upload, listing, signing, and removal calls used by admin flows.

mod error;
mod gateway;
mod layout;

pub use error::StorageError;
pub use gateway::{ObjectSummary, StorageGateway, object_key_for};
pub use layout::{PUBLIC_OBJECT_SEGMENT, StorageLayout};
