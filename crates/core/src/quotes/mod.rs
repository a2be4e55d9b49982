//! Quote records.
//!
//! Turns the raw quote document into the flat record list written by the
//! transformation workflow.

mod transform;

pub use transform::{transform_quotes, NormalizedRecord};
