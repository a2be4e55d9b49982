//! Quote source trait definition.

use async_trait::async_trait;

use crate::errors::QuoteApiError;
use crate::models::RawQuoteDocument;

/// Trait for quote sources.
///
/// A source takes a symbol list and an API key and returns the provider's
/// response document unmodified.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Unique identifier for this source, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch quotes for all `symbols` in a single request.
    ///
    /// Retrying transient failures is the source's responsibility; the
    /// returned error is final.
    async fn fetch_quotes(
        &self,
        symbols: &[String],
        api_key: &str,
    ) -> Result<RawQuoteDocument, QuoteApiError>;
}
