//! Core error types for the stockflow pipeline.
//!
//! Every stage either succeeds or fails with one [`Error`] variant; backends
//! (S3, filesystem, secret stores) convert their native errors into these.
//! Callers branch on [`Error::kind`] rather than on message text.

use stockflow_market_data::QuoteApiError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access secret '{name}': {message}")]
    SecretAccess { name: String, message: String },

    #[error("Secret '{name}' is not a flat JSON object: {message}")]
    SecretFormat { name: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Quote API request failed: {0}")]
    QuoteApi(#[from] QuoteApiError),

    #[error("Failed to write '{bucket}/{key}': {message}")]
    StorageWrite {
        bucket: String,
        key: String,
        message: String,
    },

    /// Listing or fetching failed. `key` holds the prefix for listing failures.
    #[error("Failed to read '{bucket}/{key}': {message}")]
    StorageRead {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("No files found in bucket '{bucket}' with prefix '{prefix}'")]
    NoDataFound { bucket: String, prefix: String },

    #[error("Object '{bucket}/{key}' is not valid JSON: {message}")]
    DataFormat {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Quote document is missing required path '{0}'")]
    Schema(String),
}

/// Failure taxonomy, one entry per [`Error`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SecretAccess,
    SecretFormat,
    Config,
    QuoteApi,
    StorageWrite,
    StorageRead,
    NoDataFound,
    DataFormat,
    Schema,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SecretAccess => "SecretAccessError",
            ErrorKind::SecretFormat => "SecretFormatError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::QuoteApi => "QuoteApiError",
            ErrorKind::StorageWrite => "StorageWriteError",
            ErrorKind::StorageRead => "StorageReadError",
            ErrorKind::NoDataFound => "NoDataFoundError",
            ErrorKind::DataFormat => "DataFormatError",
            ErrorKind::Schema => "SchemaError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SecretAccess { .. } => ErrorKind::SecretAccess,
            Error::SecretFormat { .. } => ErrorKind::SecretFormat,
            Error::Config(_) => ErrorKind::Config,
            Error::QuoteApi(_) => ErrorKind::QuoteApi,
            Error::StorageWrite { .. } => ErrorKind::StorageWrite,
            Error::StorageRead { .. } => ErrorKind::StorageRead,
            Error::NoDataFound { .. } => ErrorKind::NoDataFound,
            Error::DataFormat { .. } => ErrorKind::DataFormat,
            Error::Schema(_) => ErrorKind::Schema,
        }
    }

    pub fn storage_write(bucket: &str, key: &str, message: impl ToString) -> Self {
        Error::StorageWrite {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn storage_read(bucket: &str, key: &str, message: impl ToString) -> Self {
        Error::StorageRead {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}
