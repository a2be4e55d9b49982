use std::sync::Arc;

use log::{error, info};
use stockflow_market_data::RawQuoteDocument;

use crate::errors::Result;
use crate::quotes::transform_quotes;
use crate::settings::TransformationSettings;
use crate::storage::{
    read_latest, write_artifact, LatestObjectLocator, ListingScanLocator, ObjectStore,
    StoredObject,
};

/// Outcome of a successful transformation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformationReport {
    /// Raw object that was transformed
    pub source: StoredObject,
    pub object: StoredObject,
    pub record_count: usize,
}

/// Latest raw object → normalized records → transformed object.
pub struct TransformationWorkflow {
    object_store: Arc<dyn ObjectStore>,
    locator: Arc<dyn LatestObjectLocator>,
    settings: TransformationSettings,
}

impl TransformationWorkflow {
    /// Uses a [`ListingScanLocator`] to find the latest raw object.
    pub fn new(object_store: Arc<dyn ObjectStore>, settings: TransformationSettings) -> Self {
        Self::with_locator(object_store, Arc::new(ListingScanLocator), settings)
    }

    pub fn with_locator(
        object_store: Arc<dyn ObjectStore>,
        locator: Arc<dyn LatestObjectLocator>,
        settings: TransformationSettings,
    ) -> Self {
        Self {
            object_store,
            locator,
            settings,
        }
    }

    pub fn settings(&self) -> &TransformationSettings {
        &self.settings
    }

    pub async fn run(&self) -> Result<TransformationReport> {
        let settings = &self.settings;

        info!("Reading raw data from object storage...");
        let latest = read_latest(
            self.object_store.as_ref(),
            self.locator.as_ref(),
            &settings.source_bucket,
            &settings.source_prefix,
        )
        .await
        .inspect_err(|e| error!("Error reading raw data: {}", e))?;

        info!("Transforming data...");
        let document = RawQuoteDocument::new(latest.value);
        let records =
            transform_quotes(&document).inspect_err(|e| error!("Error transforming data: {}", e))?;

        info!("Writing transformed data to object storage...");
        let object = write_artifact(
            self.object_store.as_ref(),
            &settings.target_bucket,
            &settings.target_prefix,
            &settings.artifact_name,
            &records,
        )
        .await?;

        info!("Data transformation completed successfully.");
        Ok(TransformationReport {
            source: StoredObject {
                bucket: settings.source_bucket.clone(),
                key: latest.summary.key,
            },
            object,
            record_count: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::storage::InMemoryObjectStore;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn settings() -> TransformationSettings {
        TransformationSettings {
            source_bucket: "raw-bucket".to_string(),
            target_bucket: "clean-bucket".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_transforms_latest_raw_object() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert_at(
            "raw-bucket",
            "raw/raw_stock_data_2024-01-01_00-00-00.json",
            r#"{"quoteResponse":{"result":[{"symbol":"OLD"}]}}"#,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        store.insert_at(
            "raw-bucket",
            "raw/raw_stock_data_2024-01-02_00-00-00.json",
            r#"{"quoteResponse":{"result":[{"symbol":"AAPL","longName":"Apple Inc.","currency":"USD","regularMarketPrice":150.0,"regularMarketDayLow":148.0,"regularMarketDayHigh":151.0}]}}"#,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        );
        let workflow = TransformationWorkflow::new(store.clone(), settings());

        let report = workflow.run().await.unwrap();

        assert_eq!(report.record_count, 1);
        assert_eq!(
            report.source.key,
            "raw/raw_stock_data_2024-01-02_00-00-00.json"
        );
        assert_eq!(report.object.bucket, "clean-bucket");
        assert!(report
            .object
            .key
            .starts_with("transformed/transformed_stock_data_"));

        let body = store.body("clean-bucket", &report.object.key).unwrap();
        let written: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            written,
            json!([{
                "company_id": "AAPL",
                "company_name": "Apple Inc.",
                "currency": "USD",
                "current_price": 150.0,
                "day_low": 148.0,
                "day_high": 151.0
            }])
        );
    }

    #[tokio::test]
    async fn test_no_raw_objects_is_no_data_found() {
        let store = Arc::new(InMemoryObjectStore::new());
        let workflow = TransformationWorkflow::new(store.clone(), settings());

        let err = workflow.run().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoDataFound);
        assert!(store.keys("clean-bucket").is_empty());
    }

    #[tokio::test]
    async fn test_schema_error_writes_nothing() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert_at(
            "raw-bucket",
            "raw/raw_stock_data_2024-01-01_00-00-00.json",
            r#"{"finance":{"error":"Unauthorized"}}"#,
            Utc::now(),
        );
        let workflow = TransformationWorkflow::new(store.clone(), settings());

        let err = workflow.run().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(store.keys("clean-bucket").is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_writes_empty_list() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert_at(
            "raw-bucket",
            "raw/raw_stock_data_2024-01-01_00-00-00.json",
            r#"{"quoteResponse":{"result":[]}}"#,
            Utc::now(),
        );
        let workflow = TransformationWorkflow::new(store.clone(), settings());

        let report = workflow.run().await.unwrap();

        assert_eq!(report.record_count, 0);
        let body = store.body("clean-bucket", &report.object.key).unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
    }
}
