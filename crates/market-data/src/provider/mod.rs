//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteSource` trait that providers implement
//! - The `HttpTransport` seam providers use to reach the network
//! - The exponential `BackoffPolicy` applied to retryable failures
//! - The Yahoo Finance quote provider

mod backoff;
mod traits;
mod transport;

pub mod yahoo;

// Re-exports
pub use backoff::BackoffPolicy;
pub use traits::QuoteSource;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError, DEFAULT_TIMEOUT};
