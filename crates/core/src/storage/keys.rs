//! Object key naming.
//!
//! Keys look like `{prefix}/{artifact}_{YYYY-MM-DD_HH-MM-SS}.json`; within a
//! prefix the lexical order of keys follows write order.

use chrono::{DateTime, Utc};

/// `strftime` pattern for the timestamp part of a key.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Strip leading and trailing slashes so `raw`, `raw/` and `/raw/` agree.
pub fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_matches('/')
}

/// Prefix passed to `list` for a logical prefix.
///
/// Ends with `/` so that `raw` never matches keys under `raw_archive/`.
pub fn listing_prefix(prefix: &str) -> String {
    let prefix = normalize_prefix(prefix);
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{}/", prefix)
    }
}

/// Key for an artifact written at `at`.
pub fn artifact_key(prefix: &str, artifact_name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}{}_{}.json",
        listing_prefix(prefix),
        artifact_name,
        at.format(TIMESTAMP_FORMAT)
    )
}

/// Keys ending in `/` are folder placeholders, not artifacts.
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}
