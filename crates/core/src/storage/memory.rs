use std::collections::{btree_map, BTreeMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ObjectStore, ObjectSummary};
use crate::errors::{Error, Result};

#[derive(Clone, Debug)]
struct Entry {
    body: Vec<u8>,
    last_modified: DateTime<Utc>,
}

/// Process-local [`ObjectStore`], keyed by `(bucket, key)`.
///
/// Listing returns keys in lexical order. Reading a missing key is a
/// `StorageRead` error, like a `NoSuchKey` from S3. `put` never replaces an
/// existing key; [`InMemoryObjectStore::insert_at`] does, for seeding tests.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), Entry>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object with an explicit modification time.
    pub fn insert_at(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Vec<u8>>,
        last_modified: DateTime<Utc>,
    ) {
        self.lock().insert(
            (bucket.to_string(), key.to_string()),
            Entry {
                body: body.into(),
                last_modified,
            },
        );
    }

    /// Keys stored in `bucket`, in lexical order.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    pub fn body(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.lock()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|e| e.body.clone())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<(String, String), Entry>> {
        // A panic while holding the lock cannot leave a map half-updated.
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        Ok(self
            .lock()
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), entry)| ObjectSummary {
                key: k.clone(),
                last_modified: entry.last_modified,
                size: entry.body.len() as u64,
            })
            .collect())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.body(bucket, key)
            .ok_or_else(|| Error::storage_read(bucket, key, "NoSuchKey"))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let mut objects = self.lock();
        match objects.entry((bucket.to_string(), key.to_string())) {
            btree_map::Entry::Occupied(_) => {
                Err(Error::storage_write(bucket, key, "object already exists"))
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(Entry {
                    body,
                    last_modified: Utc::now(),
                });
                Ok(())
            }
        }
    }
}
