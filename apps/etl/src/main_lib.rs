use std::sync::Arc;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use stockflow_core::{
    errors::Error, IngestionWorkflow, ObjectStore, Result, SecretStore, TransformationWorkflow,
};
use stockflow_market_data::{QuoteSource, ReqwestTransport, YahooQuoteProvider};
use stockflow_storage::{LocalObjectStore, S3ObjectStore};

use crate::config::{Config, SecretBackend, StorageBackend};
use crate::secrets::{build_secret_store, AwsSecretsManagerStore};

pub fn init_tracing() {
    let log_format = std::env::var("ETL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Load the shared AWS configuration when any backend needs it, and report
/// whether credentials resolve.
pub async fn load_aws_config(config: &Config) -> Option<SdkConfig> {
    if !config.uses_aws() {
        return None;
    }

    let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    log_aws_credentials(&sdk_config).await;
    Some(sdk_config)
}

async fn log_aws_credentials(sdk_config: &SdkConfig) {
    let Some(provider) = sdk_config.credentials_provider() else {
        tracing::warn!("No AWS credentials provider configured.");
        return;
    };

    match provider.provide_credentials().await {
        Ok(credentials) => tracing::info!(
            "AWS credentials found. Access Key: {}",
            mask(credentials.access_key_id())
        ),
        Err(e) => tracing::warn!("No AWS credentials found: {}", e),
    }
}

/// Keep only the last four characters of an identifier.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{}", visible)
}

pub fn build_object_store(
    config: &Config,
    sdk_config: Option<&SdkConfig>,
) -> Result<Arc<dyn ObjectStore>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let sdk_config = sdk_config.ok_or_else(|| {
                Error::Config("S3 storage selected but AWS configuration is not loaded".into())
            })?;
            Ok(Arc::new(S3ObjectStore::from_conf(sdk_config)))
        }
        StorageBackend::Local => {
            tracing::info!(
                "Using local object storage at {}",
                config.local_storage_root.display()
            );
            Ok(Arc::new(LocalObjectStore::new(
                config.local_storage_root.clone(),
            )))
        }
    }
}

pub fn build_secret_backend(
    config: &Config,
    sdk_config: Option<&SdkConfig>,
) -> Result<Arc<dyn SecretStore>> {
    match config.secret_backend {
        SecretBackend::Aws => {
            let sdk_config = sdk_config.ok_or_else(|| {
                Error::Config("AWS secrets selected but AWS configuration is not loaded".into())
            })?;
            Ok(Arc::new(AwsSecretsManagerStore::from_conf(sdk_config)))
        }
        SecretBackend::File => Ok(Arc::new(build_secret_store(config.secret_file.clone()))),
    }
}

pub fn build_quote_source(config: &Config) -> Arc<dyn QuoteSource> {
    let transport = Arc::new(ReqwestTransport::new(config.quote_timeout));
    Arc::new(YahooQuoteProvider::new(
        transport,
        config.quote_config(),
        config.backoff_policy(),
    ))
}

pub async fn build_ingestion_workflow(config: &Config) -> Result<IngestionWorkflow> {
    let sdk_config = load_aws_config(config).await;
    let secret_store = build_secret_backend(config, sdk_config.as_ref())?;
    let object_store = build_object_store(config, sdk_config.as_ref())?;

    Ok(IngestionWorkflow::new(
        secret_store,
        build_quote_source(config),
        object_store,
        config.ingestion_settings(),
    ))
}

pub async fn build_transformation_workflow(config: &Config) -> Result<TransformationWorkflow> {
    let sdk_config = if config.storage_backend == StorageBackend::S3 {
        load_aws_config(config).await
    } else {
        None
    };
    let object_store = build_object_store(config, sdk_config.as_ref())?;

    Ok(TransformationWorkflow::new(
        object_store,
        config.transformation_settings(),
    ))
}
