use std::path::PathBuf;
use std::time::Duration;

use stockflow_core::constants::{
    API_KEY_FIELD, DEFAULT_BUCKET, DEFAULT_RAW_PREFIX, DEFAULT_SECRET_NAME, DEFAULT_SYMBOLS,
    DEFAULT_TRANSFORMED_PREFIX, RAW_ARTIFACT, TRANSFORMED_ARTIFACT,
};
use stockflow_core::errors::{Error, Result};
use stockflow_core::{IngestionSettings, TransformationSettings};
use stockflow_market_data::{BackoffPolicy, YahooQuoteConfig, DEFAULT_QUOTE_URL};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretBackend {
    Aws,
    File,
}

/// Process configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub secret_name: String,
    pub symbols: Vec<String>,
    /// Bucket the ingestion stage writes to
    pub ingest_bucket: String,
    /// Bucket the transformation stage reads from
    pub raw_bucket: String,
    pub transformed_bucket: String,
    pub raw_prefix: String,
    pub transformed_prefix: String,
    pub quote_api_url: String,
    pub quote_region: String,
    pub quote_lang: String,
    pub quote_max_retries: u32,
    pub quote_backoff_base: Duration,
    pub quote_timeout: Duration,
    pub storage_backend: StorageBackend,
    pub local_storage_root: PathBuf,
    pub secret_backend: SecretBackend,
    pub secret_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let symbols = match var("STOCK_SYMBOLS") {
            Some(raw) => parse_symbols(&raw)?,
            None => DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        };

        let quote_max_retries =
            parse_number::<u32>("QUOTE_MAX_RETRIES", var("QUOTE_MAX_RETRIES"), 3)?;
        if quote_max_retries == 0 {
            return Err(Error::Config("QUOTE_MAX_RETRIES must be at least 1".to_string()));
        }

        let ingest_bucket = var_or("S3_BUCKET", DEFAULT_BUCKET);
        let raw_bucket = var("RAW_BUCKET").unwrap_or_else(|| ingest_bucket.clone());
        let transformed_bucket = var("TRANSFORMED_BUCKET").unwrap_or_else(|| raw_bucket.clone());

        let storage_backend = match var("STORAGE_BACKEND").as_deref() {
            None => StorageBackend::S3,
            Some(v) if v.eq_ignore_ascii_case("s3") => StorageBackend::S3,
            Some(v) if v.eq_ignore_ascii_case("local") => StorageBackend::Local,
            Some(other) => {
                return Err(Error::Config(format!(
                    "STORAGE_BACKEND must be 's3' or 'local', got '{}'",
                    other
                )))
            }
        };

        let secret_backend = match var("SECRET_BACKEND").as_deref() {
            None => SecretBackend::Aws,
            Some(v) if v.eq_ignore_ascii_case("aws") => SecretBackend::Aws,
            Some(v) if v.eq_ignore_ascii_case("file") => SecretBackend::File,
            Some(other) => {
                return Err(Error::Config(format!(
                    "SECRET_BACKEND must be 'aws' or 'file', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            secret_name: var_or("SECRET_NAME", DEFAULT_SECRET_NAME),
            symbols,
            ingest_bucket,
            raw_bucket,
            transformed_bucket,
            raw_prefix: var_or("RAW_PREFIX", DEFAULT_RAW_PREFIX),
            transformed_prefix: var_or("TRANSFORMED_PREFIX", DEFAULT_TRANSFORMED_PREFIX),
            quote_api_url: var_or("QUOTE_API_URL", DEFAULT_QUOTE_URL),
            quote_region: var_or("QUOTE_REGION", "US"),
            quote_lang: var_or("QUOTE_LANG", "en"),
            quote_max_retries,
            quote_backoff_base: Duration::from_secs(parse_number(
                "QUOTE_BACKOFF_BASE_SECS",
                var("QUOTE_BACKOFF_BASE_SECS"),
                1,
            )?),
            quote_timeout: Duration::from_secs(parse_number(
                "QUOTE_TIMEOUT_SECS",
                var("QUOTE_TIMEOUT_SECS"),
                30,
            )?),
            storage_backend,
            local_storage_root: PathBuf::from(var_or("LOCAL_STORAGE_ROOT", "./data")),
            secret_backend,
            secret_file: PathBuf::from(var_or("SECRET_FILE", "./secrets.json")),
        })
    }

    pub fn ingestion_settings(&self) -> IngestionSettings {
        IngestionSettings {
            secret_name: self.secret_name.clone(),
            api_key_field: API_KEY_FIELD.to_string(),
            symbols: self.symbols.clone(),
            bucket: self.ingest_bucket.clone(),
            prefix: self.raw_prefix.clone(),
            artifact_name: RAW_ARTIFACT.to_string(),
        }
    }

    pub fn transformation_settings(&self) -> TransformationSettings {
        TransformationSettings {
            source_bucket: self.raw_bucket.clone(),
            source_prefix: self.raw_prefix.clone(),
            target_bucket: self.transformed_bucket.clone(),
            target_prefix: self.transformed_prefix.clone(),
            artifact_name: TRANSFORMED_ARTIFACT.to_string(),
        }
    }

    pub fn quote_config(&self) -> YahooQuoteConfig {
        YahooQuoteConfig {
            base_url: self.quote_api_url.clone(),
            region: self.quote_region.clone(),
            lang: self.quote_lang.clone(),
        }
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.quote_max_retries, self.quote_backoff_base)
    }

    /// Whether any selected backend talks to AWS.
    pub fn uses_aws(&self) -> bool {
        self.storage_backend == StorageBackend::S3 || self.secret_backend == SecretBackend::Aws
    }
}

/// Split a comma-separated list, dropping blanks and repeated symbols.
fn parse_symbols(raw: &str) -> Result<Vec<String>> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !symbols.iter().any(|s| s == symbol) {
            symbols.push(symbol.to_string());
        }
    }

    if symbols.is_empty() {
        return Err(Error::Config("STOCK_SYMBOLS contains no symbols".to_string()));
    }
    Ok(symbols)
}

fn parse_number<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stockflow_core::errors::ErrorKind;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.secret_name, "Yahoo_finance_Api");
        assert_eq!(config.symbols, vec!["AAPL", "MSFT", "GOOGL"]);
        assert_eq!(config.ingest_bucket, "finance-stock-data-de");
        assert_eq!(config.raw_bucket, "finance-stock-data-de");
        assert_eq!(config.transformed_bucket, "finance-stock-data-de");
        assert_eq!(config.raw_prefix, "raw");
        assert_eq!(config.transformed_prefix, "transformed");
        assert_eq!(config.quote_api_url, "https://yfapi.net/v6/finance/quote");
        assert_eq!(config.quote_max_retries, 3);
        assert_eq!(config.quote_backoff_base, Duration::from_secs(1));
        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert_eq!(config.secret_backend, SecretBackend::Aws);
        assert!(config.uses_aws());
    }

    #[test]
    fn test_bucket_fallbacks() {
        let config = config_from(&[("S3_BUCKET", "ingest")]).unwrap();
        assert_eq!(config.raw_bucket, "ingest");
        assert_eq!(config.transformed_bucket, "ingest");

        let config = config_from(&[
            ("S3_BUCKET", "ingest"),
            ("RAW_BUCKET", "raw"),
            ("TRANSFORMED_BUCKET", "clean"),
        ])
        .unwrap();
        assert_eq!(config.ingest_bucket, "ingest");
        assert_eq!(config.transformation_settings().source_bucket, "raw");
        assert_eq!(config.transformation_settings().target_bucket, "clean");
    }

    #[test]
    fn test_symbols_are_trimmed_and_deduplicated() {
        let config = config_from(&[("STOCK_SYMBOLS", " TSLA, AAPL,,TSLA ,nvda")]).unwrap();
        assert_eq!(config.symbols, vec!["TSLA", "AAPL", "nvda"]);
        assert_eq!(config.ingestion_settings().symbols, config.symbols);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("SECRET_NAME", "  "), ("RAW_PREFIX", "")]).unwrap();
        assert_eq!(config.secret_name, "Yahoo_finance_Api");
        assert_eq!(config.raw_prefix, "raw");
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for vars in [
            vec![("STOCK_SYMBOLS", ",, ,")],
            vec![("QUOTE_MAX_RETRIES", "three")],
            vec![("QUOTE_MAX_RETRIES", "0")],
            vec![("QUOTE_TIMEOUT_SECS", "-1")],
            vec![("STORAGE_BACKEND", "gcs")],
            vec![("SECRET_BACKEND", "vault")],
        ] {
            let err = config_from(&vars).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "vars {:?}", vars);
        }
    }

    #[test]
    fn test_local_backends() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "LOCAL"),
            ("LOCAL_STORAGE_ROOT", "/tmp/stockflow"),
            ("SECRET_BACKEND", "file"),
            ("SECRET_FILE", "/etc/stockflow/secrets.json"),
        ])
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.local_storage_root, PathBuf::from("/tmp/stockflow"));
        assert_eq!(config.secret_backend, SecretBackend::File);
        assert!(!config.uses_aws());
    }

    #[test]
    fn test_quote_settings() {
        let config = config_from(&[
            ("QUOTE_API_URL", "http://localhost:8080/quote"),
            ("QUOTE_MAX_RETRIES", "5"),
            ("QUOTE_BACKOFF_BASE_SECS", "2"),
        ])
        .unwrap();

        assert_eq!(config.quote_config().base_url, "http://localhost:8080/quote");
        let policy = config.backoff_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_after(1), Duration::from_secs(4));
    }
}
