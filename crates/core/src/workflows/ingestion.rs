use std::sync::Arc;

use log::{error, info};
use stockflow_market_data::QuoteSource;

use crate::errors::{Error, Result};
use crate::secrets::{fetch_secret, SecretStore};
use crate::settings::IngestionSettings;
use crate::storage::{write_artifact, ObjectStore, StoredObject};

/// Outcome of a successful ingestion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestionReport {
    pub object: StoredObject,
    pub symbol_count: usize,
    /// Entries in `quoteResponse.result`, when the document has that shape.
    pub result_count: Option<usize>,
}

/// Secret → quotes → raw object.
pub struct IngestionWorkflow {
    secret_store: Arc<dyn SecretStore>,
    quote_source: Arc<dyn QuoteSource>,
    object_store: Arc<dyn ObjectStore>,
    settings: IngestionSettings,
}

impl IngestionWorkflow {
    pub fn new(
        secret_store: Arc<dyn SecretStore>,
        quote_source: Arc<dyn QuoteSource>,
        object_store: Arc<dyn ObjectStore>,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            secret_store,
            quote_source,
            object_store,
            settings,
        }
    }

    pub fn settings(&self) -> &IngestionSettings {
        &self.settings
    }

    pub async fn run(&self) -> Result<IngestionReport> {
        let secrets = fetch_secret(self.secret_store.as_ref(), &self.settings.secret_name).await?;
        let api_key = secrets
            .require(&self.settings.api_key_field)
            .inspect_err(|e| error!("{}", e))?;

        info!("Fetching stock data...");
        let document = self
            .quote_source
            .fetch_quotes(&self.settings.symbols, api_key)
            .await
            .map_err(|e| {
                error!("Error fetching stock data: {}", e);
                Error::from(e)
            })?;
        let result_count = document.results().map(Vec::len);
        info!(
            "Fetched stock data from '{}': {} results",
            self.quote_source.id(),
            result_count.map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );

        info!("Writing data to object storage...");
        let object = write_artifact(
            self.object_store.as_ref(),
            &self.settings.bucket,
            &self.settings.prefix,
            &self.settings.artifact_name,
            &document,
        )
        .await?;

        info!("Stock data ingestion completed successfully.");
        Ok(IngestionReport {
            object,
            symbol_count: self.settings.symbols.len(),
            result_count,
        })
    }
}
