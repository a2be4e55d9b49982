//! Stockflow Core - pipeline workflows, seams and error taxonomy.
//!
//! This crate holds the two batch stages of the stock quote pipeline:
//!
//! - [`IngestionWorkflow`]: secret → quote API → raw JSON object
//! - [`TransformationWorkflow`]: latest raw object → normalized records → JSON object
//!
//! It is backend-agnostic and defines the [`SecretStore`] and [`ObjectStore`]
//! traits that the `storage` crate and the binaries implement.

pub mod constants;
pub mod errors;
pub mod quotes;
pub mod secrets;
pub mod settings;
pub mod storage;
pub mod workflows;

pub use quotes::{transform_quotes, NormalizedRecord};
pub use secrets::{fetch_secret, SecretBundle, SecretStore};
pub use settings::{IngestionSettings, TransformationSettings};
pub use storage::{ObjectStore, ObjectSummary, StoredObject};
pub use workflows::{
    IngestionReport, IngestionWorkflow, TransformationReport, TransformationWorkflow,
};

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
