//! Page fetch error type for retry classification.

use thiserror::Error;

/// Error returned by a single page fetch (curl failure, HTTP error, or a
/// response body that is not the expected JSON). Used so we can classify and
/// decide retries before converting to anyhow.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Response body did not parse as a studies page. Not retried.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}
