//! Object storage seam.
//!
//! Workflows persist artifacts through the [`ObjectStore`] trait; concrete
//! backends (S3, local filesystem) live in the `stockflow-storage` crate and
//! [`InMemoryObjectStore`] serves tests and dry runs.
//!
//! Objects are immutable once written: every write lands under a fresh
//! timestamped key (see [`keys`]).

mod artifacts;
pub mod keys;
mod locator;
mod memory;

pub use artifacts::{read_latest, write_artifact, write_artifact_at, LatestObject};
pub use locator::{LatestObjectLocator, ListingScanLocator};
pub use memory::InMemoryObjectStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;

/// Listing entry for one stored object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

/// Location of a written object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Bucket/key object storage.
///
/// Backends map their failures to `Error::StorageRead` (list, get) and
/// `Error::StorageWrite` (put).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// All objects whose key starts with `prefix`, in backend order.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;

    /// Full body of the object at `key`.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Store `body` at `key` in a single call.
    ///
    /// Fails with `Error::StorageWrite` when `key` already holds an object;
    /// an existing object is never replaced.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}
