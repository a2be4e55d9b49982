//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`QuoteApiError`]: The error enum for all quote API operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching quotes from the remote API.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the provider tries again.
#[derive(Error, Debug)]
pub enum QuoteApiError {
    /// The request could not be built (e.g. no symbols were given).
    #[error("Invalid quote request: {0}")]
    InvalidRequest(String),

    /// The provider rate limited the request (HTTP 429).
    /// Should retry with exponential backoff.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    /// Should retry with exponential backoff.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A connection-level failure (DNS, refused, reset).
    #[error("Network error: {provider} - {message}")]
    Network {
        /// The provider that could not be reached
        provider: String,
        /// The underlying transport error
        message: String,
    },

    /// The provider answered with a non-success status other than 429.
    #[error("HTTP {status} from {provider}: {message}")]
    HttpStatus {
        /// The provider that returned the status
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        message: String,
    },

    /// The provider answered 2xx but the body is not JSON.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that returned the body
        provider: String,
        /// Parse failure description
        message: String,
    },

    /// Every attempt failed with a retryable error.
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The error from the final attempt
        #[source]
        last: Box<QuoteApiError>,
    },
}

impl QuoteApiError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockflow_market_data::errors::{QuoteApiError, RetryClass};
    ///
    /// let error = QuoteApiError::RateLimited { provider: "YAHOO".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = QuoteApiError::InvalidRequest("no symbols".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Transient errors - retry with backoff
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network { .. } => {
                RetryClass::WithBackoff
            }

            // Terminal errors - never retry
            Self::InvalidRequest(_)
            | Self::HttpStatus { .. }
            | Self::InvalidResponse { .. }
            | Self::RetriesExhausted { .. } => RetryClass::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_retries_with_backoff() {
        let error = QuoteApiError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_timeout_retries_with_backoff() {
        let error = QuoteApiError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_network_retries_with_backoff() {
        let error = QuoteApiError::Network {
            provider: "YAHOO".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_http_status_never_retries() {
        let error = QuoteApiError::HttpStatus {
            provider: "YAHOO".to_string(),
            status: 500,
            message: "Internal server error".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_invalid_response_never_retries() {
        let error = QuoteApiError::InvalidResponse {
            provider: "YAHOO".to_string(),
            message: "expected value at line 1".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_exhausted_never_retries() {
        let error = QuoteApiError::RetriesExhausted {
            attempts: 3,
            last: Box::new(QuoteApiError::RateLimited {
                provider: "YAHOO".to_string(),
            }),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_error_display() {
        let error = QuoteApiError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: YAHOO");

        let error = QuoteApiError::HttpStatus {
            provider: "YAHOO".to_string(),
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(format!("{}", error), "HTTP 401 from YAHOO: Unauthorized");

        let error = QuoteApiError::RetriesExhausted {
            attempts: 3,
            last: Box::new(QuoteApiError::Timeout {
                provider: "YAHOO".to_string(),
            }),
        };
        assert_eq!(
            format!("{}", error),
            "Retries exhausted after 3 attempts: Timeout: YAHOO"
        );
    }
}
