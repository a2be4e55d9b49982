//! Entry-point plumbing shared by the `ingest` and `transform` binaries.

pub mod config;
pub mod main_lib;
pub mod secrets;

pub use main_lib::{build_ingestion_workflow, build_transformation_workflow, init_tracing};
