//! The two pipeline stages.
//!
//! Both run their steps sequentially and stop at the first failure. Each
//! step's side effect is a new immutable object, so nothing is rolled back.
//! The stages share no state other than the object store.

mod ingestion;
mod transformation;

pub use ingestion::{IngestionReport, IngestionWorkflow};
pub use transformation::{TransformationReport, TransformationWorkflow};
