//! Market data models
//!
//! - `quote` - The raw quote document returned by the quote API

mod quote;

pub use quote::{RawQuoteDocument, QUOTE_RESPONSE_FIELD, QUOTE_RESULT_FIELD};
