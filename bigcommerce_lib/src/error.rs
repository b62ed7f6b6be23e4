//! Error types for the library layer.

use std::time::Duration;

use bigcommerce_api::RateLimitState;

/// Errors produced by a paginated fetch.
///
/// Throttling is the only failure the library enriches; transport and
/// remote errors from the API client pass through unchanged in
/// [`FetchError::Api`].
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The API answered 429 Too Many Requests. `retry_after` is the quota
    /// reset reported by the error response, when it carried one.
    #[error("Rate limited by API (HTTP 429)")]
    Throttled {
        retry_after: Option<Duration>,
        rate_limit: RateLimitState,
        #[source]
        source: bigcommerce_api::Error,
    },
    /// Any other failure from the API client.
    #[error("API error: {0}")]
    Api(#[from] bigcommerce_api::Error),
    /// A response was well-formed JSON but not the shape the caller needs.
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// The fetch was cancelled before it completed.
    #[error("Fetch cancelled")]
    Cancelled,
    /// Required configuration was missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Caller-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FetchError {
    /// Wraps a 429 response error, reading the reset time from its headers.
    pub(crate) fn throttled(source: bigcommerce_api::Error) -> Self {
        let rate_limit = source
            .headers()
            .map(bigcommerce_api::extract::extract_rate_limit)
            .unwrap_or_default();
        Self::Throttled {
            retry_after: rate_limit.reset_ms.map(Duration::from_millis),
            rate_limit,
            source,
        }
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }

    /// How long to wait before re-invoking the call, for throttling failures.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Throttled { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status of the underlying response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Throttled { source, .. } | Self::Api(source) => source.status(),
            _ => None,
        }
    }
}
