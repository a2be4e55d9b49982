use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level field holding the quote envelope.
pub const QUOTE_RESPONSE_FIELD: &str = "quoteResponse";

/// Field inside the envelope holding the per-symbol quote array.
pub const QUOTE_RESULT_FIELD: &str = "result";

/// The quote API response, kept verbatim.
///
/// Shaped `{ "quoteResponse": { "result": [ {symbol, longName, ...}, ... ] } }`,
/// but nothing here enforces that: unknown fields pass through untouched and
/// the document is stored exactly as it was received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawQuoteDocument(Value);

impl RawQuoteDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `quoteResponse.result` array, if present and an array.
    pub fn results(&self) -> Option<&Vec<Value>> {
        self.0
            .get(QUOTE_RESPONSE_FIELD)?
            .get(QUOTE_RESULT_FIELD)?
            .as_array()
    }
}

impl From<Value> for RawQuoteDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
