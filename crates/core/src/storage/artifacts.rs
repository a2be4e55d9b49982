use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use serde_json::Value;

use super::keys::artifact_key;
use super::{LatestObjectLocator, ObjectStore, ObjectSummary, StoredObject};
use crate::errors::{Error, Result};

/// The most recent object under a prefix, parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct LatestObject {
    pub summary: ObjectSummary,
    pub value: Value,
}

/// Serialize `value` as indented JSON and store it under a fresh
/// timestamped key in `bucket`/`prefix`.
pub async fn write_artifact<T>(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    artifact_name: &str,
    value: &T,
) -> Result<StoredObject>
where
    T: Serialize + Sync + ?Sized,
{
    write_artifact_at(store, bucket, prefix, artifact_name, value, Utc::now()).await
}

/// [`write_artifact`] with an explicit timestamp for the key.
pub async fn write_artifact_at<T>(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    artifact_name: &str,
    value: &T,
    at: DateTime<Utc>,
) -> Result<StoredObject>
where
    T: Serialize + Sync + ?Sized,
{
    let key = artifact_key(prefix, artifact_name, at);
    let body =
        serde_json::to_vec_pretty(value).map_err(|e| Error::storage_write(bucket, &key, e))?;

    if let Err(e) = store.put(bucket, &key, body).await {
        error!("Error writing to object storage: {}", e);
        return Err(e);
    }

    info!("Data successfully written to object storage: {}/{}", bucket, key);
    Ok(StoredObject {
        bucket: bucket.to_string(),
        key,
    })
}

/// Locate the latest object under `prefix`, fetch it and parse it as JSON.
pub async fn read_latest(
    store: &dyn ObjectStore,
    locator: &dyn LatestObjectLocator,
    bucket: &str,
    prefix: &str,
) -> Result<LatestObject> {
    let summary = locator.locate(store, bucket, prefix).await?;
    info!("Reading data from: {}/{}", bucket, summary.key);

    let body = store.get(bucket, &summary.key).await?;
    let data_format = |message: String| Error::DataFormat {
        bucket: bucket.to_string(),
        key: summary.key.clone(),
        message,
    };

    let text = std::str::from_utf8(&body).map_err(|e| data_format(e.to_string()))?;
    let value = serde_json::from_str(text).map_err(|e| data_format(e.to_string()))?;

    Ok(LatestObject { summary, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::storage::{InMemoryObjectStore, ListingScanLocator};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
            Err(Error::storage_read(bucket, prefix, "AccessDenied"))
        }

        async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
            Err(Error::storage_read(bucket, key, "AccessDenied"))
        }

        async fn put(&self, bucket: &str, key: &str, _body: Vec<u8>) -> Result<()> {
            Err(Error::storage_write(bucket, key, "NoSuchBucket"))
        }
    }

    #[tokio::test]
    async fn test_write_then_get_round_trips() {
        let store = InMemoryObjectStore::new();
        let value = json!({
            "s": "text", "n": 1.5, "i": -3, "z": null,
            "nested": { "list": [1, "two", { "three": 3 }] }
        });

        let stored = write_artifact_at(&store, "b", "raw/", "raw_stock_data", &value, t(9))
            .await
            .unwrap();

        assert_eq!(stored.key, "raw/raw_stock_data_2024-05-01_09-00-00.json");
        let body = store.body("b", &stored.key).unwrap();
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, value);
        // indented output
        assert!(String::from_utf8(body).unwrap().contains("\n  "));
    }

    #[tokio::test]
    async fn test_same_second_write_keeps_first_artifact() {
        let store = InMemoryObjectStore::new();

        let (first_run, second_run) = (json!({"run": 1}), json!({"run": 2}));

        let first = write_artifact_at(&store, "b", "raw", "raw_stock_data", &first_run, t(9))
            .await
            .unwrap();
        let err = write_artifact_at(&store, "b", "raw", "raw_stock_data", &second_run, t(9))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StorageWrite);
        assert_eq!(store.keys("b"), vec![first.key.clone()]);
        let body: Value = serde_json::from_slice(&store.body("b", &first.key).unwrap()).unwrap();
        assert_eq!(body, first_run);
    }

    #[tokio::test]
    async fn test_write_failure_is_storage_write() {
        let err = write_artifact(&FailingStore, "b", "raw", "raw_stock_data", &json!([]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageWrite);
    }

    #[tokio::test]
    async fn test_read_latest_picks_newest() {
        let store = InMemoryObjectStore::new();
        store.insert_at("b", "raw/a.json", r#"{"v":1}"#, t(1));
        store.insert_at("b", "raw/b.json", r#"{"v":2}"#, t(2));
        store.insert_at("b", "raw/0.json", r#"{"v":0}"#, t(0));

        let latest = read_latest(&store, &ListingScanLocator, "b", "raw")
            .await
            .unwrap();

        assert_eq!(latest.summary.key, "raw/b.json");
        assert_eq!(latest.value, json!({ "v": 2 }));
    }

    #[tokio::test]
    async fn test_read_latest_tie_keeps_first_listed() {
        let store = InMemoryObjectStore::new();
        store.insert_at("b", "raw/a.json", "1", t(3));
        store.insert_at("b", "raw/b.json", "2", t(3));

        let latest = read_latest(&store, &ListingScanLocator, "b", "raw/")
            .await
            .unwrap();

        assert_eq!(latest.summary.key, "raw/a.json");
    }

    #[tokio::test]
    async fn test_read_latest_ignores_other_prefixes_and_markers() {
        let store = InMemoryObjectStore::new();
        store.insert_at("b", "raw/", "", t(9));
        store.insert_at("b", "raw_archive/x.json", "{}", t(8));
        store.insert_at("b", "raw/x.json", r#"{"ok":true}"#, t(1));

        let latest = read_latest(&store, &ListingScanLocator, "b", "raw")
            .await
            .unwrap();

        assert_eq!(latest.summary.key, "raw/x.json");
    }

    #[tokio::test]
    async fn test_empty_prefix_is_no_data_found() {
        let store = InMemoryObjectStore::new();
        store.insert_at("b", "transformed/x.json", "[]", t(1));

        let err = read_latest(&store, &ListingScanLocator, "b", "raw")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoDataFound);
    }

    #[tokio::test]
    async fn test_invalid_json_is_data_format() {
        let store = InMemoryObjectStore::new();
        store.insert_at("b", "raw/x.json", "{not json", t(1));

        let err = read_latest(&store, &ListingScanLocator, "b", "raw")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DataFormat);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_data_format() {
        let store = InMemoryObjectStore::new();
        store.insert_at("b", "raw/x.json", vec![0xff, 0xfe, 0x00], t(1));

        let err = read_latest(&store, &ListingScanLocator, "b", "raw")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DataFormat);
    }

    #[tokio::test]
    async fn test_listing_failure_is_storage_read() {
        let err = read_latest(&FailingStore, &ListingScanLocator, "b", "raw")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageRead);
    }
}
