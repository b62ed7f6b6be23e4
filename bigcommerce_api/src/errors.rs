//! Error types for the API client.

use reqwest::header::HeaderMap;

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (connection reset, DNS, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API returned a non-success status. Headers and body are kept so
    /// callers can inspect rate-limit metadata and error payloads.
    #[error("Request failed with status {status}")]
    HttpStatus {
        status: u16,
        headers: HeaderMap,
        body: String,
    },
    /// A success response whose body was not valid JSON.
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
    /// The resource path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response headers of a non-success response.
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::HttpStatus { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// True when the server rejected the request with 429 Too Many Requests.
    pub fn is_too_many_requests(&self) -> bool {
        self.status() == Some(429)
    }
}
