//! Yahoo Finance quote provider.
//!
//! Fetches the `/v6/finance/quote` document for a batch of symbols in one
//! request, authenticating with an API key header. Rate limiting and
//! transport failures are retried with exponential backoff; any other
//! non-success status fails immediately.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use urlencoding::encode;

use crate::errors::{QuoteApiError, RetryClass};
use crate::models::RawQuoteDocument;
use crate::provider::{BackoffPolicy, HttpResponse, HttpTransport, QuoteSource, TransportError};

/// Default quote endpoint.
pub const DEFAULT_QUOTE_URL: &str = "https://yfapi.net/v6/finance/quote";

const PROVIDER_ID: &str = "YAHOO";
const API_KEY_HEADER: &str = "X-API-KEY";
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Maximum number of body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Endpoint parameters for [`YahooQuoteProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YahooQuoteConfig {
    pub base_url: String,
    pub region: String,
    pub lang: String,
}

impl Default for YahooQuoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_URL.to_string(),
            region: "US".to_string(),
            lang: "en".to_string(),
        }
    }
}

/// Yahoo Finance quote provider.
pub struct YahooQuoteProvider {
    transport: Arc<dyn HttpTransport>,
    config: YahooQuoteConfig,
    backoff: BackoffPolicy,
}

impl YahooQuoteProvider {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        config: YahooQuoteConfig,
        backoff: BackoffPolicy,
    ) -> Self {
        Self {
            transport,
            config,
            backoff,
        }
    }

    /// Build the request URL for a symbol batch.
    ///
    /// Symbols are URL-encoded individually; the comma separator stays literal.
    pub fn quote_url(&self, symbols: &[String]) -> String {
        let joined = symbols
            .iter()
            .map(|s| encode(s))
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "{}?region={}&lang={}&symbols={}",
            self.config.base_url,
            encode(&self.config.region),
            encode(&self.config.lang),
            joined
        )
    }

    /// Issue a single request and classify the outcome.
    async fn attempt(&self, url: &str, api_key: &str) -> Result<RawQuoteDocument, QuoteApiError> {
        let response = self
            .transport
            .get(url, &[(API_KEY_HEADER, api_key)])
            .await
            .map_err(|e| match e {
                TransportError::Timeout(_) => QuoteApiError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                },
                TransportError::Connect(message) => QuoteApiError::Network {
                    provider: PROVIDER_ID.to_string(),
                    message,
                },
            })?;

        debug!("Yahoo quote response status: {}", response.status);

        if response.status == STATUS_TOO_MANY_REQUESTS {
            return Err(QuoteApiError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !response.is_success() {
            return Err(status_error(&response));
        }

        let value: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| QuoteApiError::InvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })?;

        Ok(RawQuoteDocument::new(value))
    }
}

fn status_error(response: &HttpResponse) -> QuoteApiError {
    let message: String = response.body.chars().take(ERROR_BODY_LIMIT).collect();
    QuoteApiError::HttpStatus {
        provider: PROVIDER_ID.to_string(),
        status: response.status,
        message,
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_quotes(
        &self,
        symbols: &[String],
        api_key: &str,
    ) -> Result<RawQuoteDocument, QuoteApiError> {
        if symbols.is_empty() {
            return Err(QuoteApiError::InvalidRequest(
                "at least one symbol is required".to_string(),
            ));
        }

        let url = self.quote_url(symbols);
        let max_attempts = self.backoff.max_attempts;
        let mut attempt: u32 = 0;

        loop {
            match self.attempt(&url, api_key).await {
                Ok(document) => {
                    info!(
                        "Fetched quotes for {} symbols from '{}' on attempt {}",
                        symbols.len(),
                        PROVIDER_ID,
                        attempt + 1
                    );
                    return Ok(document);
                }
                Err(e) if e.retry_class() == RetryClass::WithBackoff => {
                    if !self.backoff.has_attempts_after(attempt) {
                        warn!(
                            "Giving up on '{}' after {} attempts: {}",
                            PROVIDER_ID,
                            attempt + 1,
                            e
                        );
                        return Err(QuoteApiError::RetriesExhausted {
                            attempts: attempt + 1,
                            last: Box::new(e),
                        });
                    }

                    let delay = self.backoff.delay_after(attempt);
                    warn!(
                        "{} (attempt {}/{}). Retrying in {:?}...",
                        e,
                        attempt + 1,
                        max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!("Terminal error from '{}': {}, not retrying", PROVIDER_ID, e);
                    return Err(e);
                }
            }
        }
    }
}
