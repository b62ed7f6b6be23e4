use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::extract::{extract_items, extract_pagination, extract_rate_limit};
use crate::extract::{PaginationState, RateLimitState};

/// One successful response from the REST API.
///
/// An empty body (e.g. `204 No Content` on an empty v2 collection) is
/// represented as [`Value::Null`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, headers: HeaderMap, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Pagination metadata from `meta.pagination`, defaulted where absent.
    pub fn pagination(&self) -> PaginationState {
        extract_pagination(&self.body)
    }

    /// Rate-limit metadata from the `X-Rate-Limit-*` headers.
    pub fn rate_limit(&self) -> RateLimitState {
        extract_rate_limit(&self.headers)
    }

    /// Consumes the body and returns the page's items in response order.
    pub fn take_items(&mut self) -> Vec<Value> {
        extract_items(self.body.take())
    }
}
