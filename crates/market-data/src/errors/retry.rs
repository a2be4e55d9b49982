/// Classification for retry policy.
///
/// Used by the quote provider to decide whether a failed attempt should be
/// followed by another one.
///
/// # Behavior Summary
///
/// | Class | Retry? | Sleep before next attempt? |
/// |-------|--------|----------------------------|
/// | `Never` | No | No |
/// | `WithBackoff` | Yes, while attempts remain | Yes, exponential |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad request, unexpected status, or malformed payload.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry after an exponential backoff delay.
    ///
    /// Used for transient errors: rate limiting (429), request timeouts and
    /// connection-level failures.
    WithBackoff,
}
