/// Secret name used when none is configured
pub const DEFAULT_SECRET_NAME: &str = "Yahoo_finance_Api";

/// Field of the secret bundle holding the quote API key
pub const API_KEY_FIELD: &str = "yahoo_finance_api_key";

/// Bucket used when none is configured
pub const DEFAULT_BUCKET: &str = "finance-stock-data-de";

/// Prefix for raw quote documents
pub const DEFAULT_RAW_PREFIX: &str = "raw";

/// Prefix for normalized record lists
pub const DEFAULT_TRANSFORMED_PREFIX: &str = "transformed";

/// Artifact name for raw quote documents
pub const RAW_ARTIFACT: &str = "raw_stock_data";

/// Artifact name for normalized record lists
pub const TRANSFORMED_ARTIFACT: &str = "transformed_stock_data";

/// Symbols fetched when none are configured
pub const DEFAULT_SYMBOLS: &[&str] = &["AAPL", "MSFT", "GOOGL"];
