use async_trait::async_trait;
use log::debug;

use super::keys::{is_directory_marker, listing_prefix};
use super::{ObjectStore, ObjectSummary};
use crate::errors::{Error, Result};

/// Picks the most recent object under a prefix.
///
/// Workflows depend on this trait rather than on a listing scan so that an
/// index or manifest can replace the scan without touching them.
#[async_trait]
pub trait LatestObjectLocator: Send + Sync {
    async fn locate(
        &self,
        store: &dyn ObjectStore,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectSummary>;
}

/// Lists the whole prefix and keeps the entry with the greatest
/// last-modified time. On ties the first entry in listing order wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListingScanLocator;

#[async_trait]
impl LatestObjectLocator for ListingScanLocator {
    async fn locate(
        &self,
        store: &dyn ObjectStore,
        bucket: &str,
        prefix: &str,
    ) -> Result<ObjectSummary> {
        let objects = store.list(bucket, &listing_prefix(prefix)).await?;
        debug!(
            "Listed {} objects in '{}' under '{}'",
            objects.len(),
            bucket,
            prefix
        );

        objects
            .into_iter()
            .filter(|o| !is_directory_marker(&o.key))
            .reduce(|latest, candidate| {
                if candidate.last_modified > latest.last_modified {
                    candidate
                } else {
                    latest
                }
            })
            .ok_or_else(|| Error::NoDataFound {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
            })
    }
}
