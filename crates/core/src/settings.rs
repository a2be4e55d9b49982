//! Explicit settings handed to each workflow at construction.
//!
//! Nothing in this crate reads the environment; the binary builds these
//! once from its configuration.

use crate::constants::{
    API_KEY_FIELD, DEFAULT_BUCKET, DEFAULT_RAW_PREFIX, DEFAULT_SECRET_NAME, DEFAULT_SYMBOLS,
    DEFAULT_TRANSFORMED_PREFIX, RAW_ARTIFACT, TRANSFORMED_ARTIFACT,
};

/// Settings for the ingestion workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestionSettings {
    /// Name of the secret holding the quote API key
    pub secret_name: String,
    /// Field of the secret holding the quote API key
    pub api_key_field: String,
    pub symbols: Vec<String>,
    pub bucket: String,
    pub prefix: String,
    pub artifact_name: String,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            api_key_field: API_KEY_FIELD.to_string(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            bucket: DEFAULT_BUCKET.to_string(),
            prefix: DEFAULT_RAW_PREFIX.to_string(),
            artifact_name: RAW_ARTIFACT.to_string(),
        }
    }
}

/// Settings for the transformation workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformationSettings {
    pub source_bucket: String,
    pub source_prefix: String,
    pub target_bucket: String,
    pub target_prefix: String,
    pub artifact_name: String,
}

impl Default for TransformationSettings {
    fn default() -> Self {
        Self {
            source_bucket: DEFAULT_BUCKET.to_string(),
            source_prefix: DEFAULT_RAW_PREFIX.to_string(),
            target_bucket: DEFAULT_BUCKET.to_string(),
            target_prefix: DEFAULT_TRANSFORMED_PREFIX.to_string(),
            artifact_name: TRANSFORMED_ARTIFACT.to_string(),
        }
    }
}
