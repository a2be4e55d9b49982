//! Stockflow Market Data Crate
//!
//! This crate fetches raw stock quotes from a remote quote API for the
//! stockflow ingestion workflow.
//!
//! # Overview
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |   QuoteSource    | --> |  HttpTransport   | --> |    Quote API     |
//! | (Yahoo provider) |     |    (reqwest)     |     |                  |
//! +------------------+     +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! | RawQuoteDocument |  (verbatim JSON response)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`QuoteSource`] - Fetches a quote document for a symbol batch
//! - [`YahooQuoteProvider`] - Yahoo Finance implementation with retry/backoff
//! - [`RawQuoteDocument`] - The unmodified API response
//! - [`QuoteApiError`] - Error type with [`RetryClass`] classification

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{QuoteApiError, RetryClass};
pub use models::RawQuoteDocument;
pub use provider::yahoo::{YahooQuoteConfig, YahooQuoteProvider, DEFAULT_QUOTE_URL};
pub use provider::{
    BackoffPolicy, HttpResponse, HttpTransport, QuoteSource, ReqwestTransport, TransportError,
};
