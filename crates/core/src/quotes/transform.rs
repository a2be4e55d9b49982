use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stockflow_market_data::models::{QUOTE_RESPONSE_FIELD, QUOTE_RESULT_FIELD};
use stockflow_market_data::RawQuoteDocument;

use crate::errors::{Error, Result};

/// Flat six-field view of one quote.
///
/// Values are copied from the source entry without coercion; a field the
/// source lacks becomes `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub company_id: Value,
    pub company_name: Value,
    pub currency: Value,
    pub current_price: Value,
    pub day_low: Value,
    pub day_high: Value,
}

impl NormalizedRecord {
    /// Map a single `quoteResponse.result` entry.
    pub fn from_quote(quote: &Value) -> Self {
        let field = |name: &str| quote.get(name).cloned().unwrap_or(Value::Null);

        Self {
            company_id: field("symbol"),
            company_name: field("longName"),
            currency: field("currency"),
            current_price: field("regularMarketPrice"),
            day_low: field("regularMarketDayLow"),
            day_high: field("regularMarketDayHigh"),
        }
    }
}

/// Map every entry of `quoteResponse.result`, preserving order.
///
/// Fails with `Error::Schema` when the result array is absent.
pub fn transform_quotes(document: &RawQuoteDocument) -> Result<Vec<NormalizedRecord>> {
    let results = document.results().ok_or_else(|| {
        Error::Schema(format!("{}.{}", QUOTE_RESPONSE_FIELD, QUOTE_RESULT_FIELD))
    })?;

    let records: Vec<NormalizedRecord> = results.iter().map(NormalizedRecord::from_quote).collect();

    info!("Transformed {} records.", records.len());
    Ok(records)
}
