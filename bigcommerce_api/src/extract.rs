//! Pure extraction of pagination and rate-limit metadata from API responses.
//!
//! Nothing in this module performs I/O or fails: missing pagination fields
//! fall back to fixed defaults, and missing or non-numeric rate-limit headers
//! come back as `None`.

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

/// Header carrying milliseconds until the current quota window resets.
pub const HEADER_RESET_MS: &str = "x-rate-limit-time-reset-ms";
/// Header carrying the quota window length in milliseconds.
pub const HEADER_WINDOW_MS: &str = "x-rate-limit-time-window-ms";
/// Header carrying the number of requests left in the current window.
pub const HEADER_REQUESTS_LEFT: &str = "x-rate-limit-requests-left";
/// Header carrying the number of requests allowed per window.
pub const HEADER_REQUESTS_QUOTA: &str = "x-rate-limit-requests-quota";

const DEFAULT_CURRENT_PAGE: u64 = 1;
const DEFAULT_PER_PAGE: u64 = 10;

/// Pagination metadata of one page, read from `meta.pagination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub count: u64,
    pub previous_link: Option<String>,
    pub current_link: Option<String>,
    pub next_link: Option<String>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            total: 0,
            total_pages: 0,
            current_page: DEFAULT_CURRENT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            count: 0,
            previous_link: None,
            current_link: None,
            next_link: None,
        }
    }
}

impl PaginationState {
    /// Whether another page follows this one. Always false when
    /// `total_pages` is zero.
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Quota metadata of one response. Every field is `None` when the header is
/// absent or not a non-negative integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RateLimitState {
    pub reset_ms: Option<u64>,
    pub window_ms: Option<u64>,
    pub requests_left: Option<u64>,
    pub requests_quota: Option<u64>,
}

/// Reads `meta.pagination` from a response body.
///
/// Zero or missing values for `current_page` and `per_page` fall back to 1
/// and 10, every other count falls back to 0, and empty links are `None`.
pub fn extract_pagination(body: &Value) -> PaginationState {
    let Some(pagination) = body.pointer("/meta/pagination") else {
        return PaginationState::default();
    };

    let count = |key: &str| pagination.get(key).and_then(as_count).filter(|n| *n != 0);
    let link = |key: &str| {
        pagination
            .get("links")
            .and_then(|links| links.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    PaginationState {
        total: count("total").unwrap_or(0),
        total_pages: count("total_pages").unwrap_or(0),
        current_page: count("current_page").unwrap_or(DEFAULT_CURRENT_PAGE),
        per_page: count("per_page").unwrap_or(DEFAULT_PER_PAGE),
        count: count("count").unwrap_or(0),
        previous_link: link("previous"),
        current_link: link("current"),
        next_link: link("next"),
    }
}

/// Reads the four `X-Rate-Limit-*` headers. Lookup is case-insensitive.
pub fn extract_rate_limit(headers: &HeaderMap) -> RateLimitState {
    RateLimitState {
        reset_ms: header_u64(headers, HEADER_RESET_MS),
        window_ms: header_u64(headers, HEADER_WINDOW_MS),
        requests_left: header_u64(headers, HEADER_REQUESTS_LEFT),
        requests_quota: header_u64(headers, HEADER_REQUESTS_QUOTA),
    }
}

/// Splits a page body into its items.
///
/// v2 endpoints answer with a bare array; v3 endpoints wrap the page in
/// `{"data": [...], "meta": {...}}`. A non-array `data` is a single item.
/// Anything else (including `null` from an empty body) has no items.
pub fn extract_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(item) => vec![item],
        },
        _ => Vec::new(),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};
    use serde_json::json;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn pagination_defaults_without_meta() {
        let state = extract_pagination(&json!([{"id": 1}]));
        assert_eq!(
            state,
            PaginationState {
                total: 0,
                total_pages: 0,
                current_page: 1,
                per_page: 10,
                count: 0,
                previous_link: None,
                current_link: None,
                next_link: None,
            }
        );
        assert!(!state.has_next_page());
    }

    #[test]
    fn pagination_defaults_for_null_body() {
        assert_eq!(extract_pagination(&Value::Null), PaginationState::default());
    }

    #[test]
    fn pagination_reads_full_meta() {
        let body = json!({
            "data": [],
            "meta": {
                "pagination": {
                    "total": 260,
                    "count": 250,
                    "per_page": 250,
                    "current_page": 1,
                    "total_pages": 2,
                    "links": {
                        "current": "?page=1&limit=250",
                        "next": "?page=2&limit=250"
                    }
                }
            }
        });
        let state = extract_pagination(&body);
        assert_eq!(state.total, 260);
        assert_eq!(state.count, 250);
        assert_eq!(state.per_page, 250);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 2);
        assert_eq!(state.previous_link, None);
        assert_eq!(state.current_link.as_deref(), Some("?page=1&limit=250"));
        assert_eq!(state.next_link.as_deref(), Some("?page=2&limit=250"));
        assert!(state.has_next_page());
    }

    #[test]
    fn pagination_partial_meta_and_string_numbers() {
        let body = json!({"meta": {"pagination": {"total_pages": "3", "current_page": 0}}});
        let state = extract_pagination(&body);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.per_page, 10);
        assert_eq!(state.total, 0);
    }

    #[test]
    fn pagination_ignores_garbage_values() {
        let body = json!({"meta": {"pagination": {"total": "lots", "per_page": -5, "links": {"next": ""}}}});
        let state = extract_pagination(&body);
        assert_eq!(state.total, 0);
        assert_eq!(state.per_page, 10);
        assert_eq!(state.next_link, None);
    }

    #[test]
    fn rate_limit_reads_all_headers() {
        let map = headers(&[
            ("x-rate-limit-time-reset-ms", "5000"),
            ("x-rate-limit-time-window-ms", "30000"),
            ("x-rate-limit-requests-left", "149"),
            ("x-rate-limit-requests-quota", "150"),
        ]);
        assert_eq!(
            extract_rate_limit(&map),
            RateLimitState {
                reset_ms: Some(5000),
                window_ms: Some(30000),
                requests_left: Some(149),
                requests_quota: Some(150),
            }
        );
    }

    #[test]
    fn rate_limit_header_names_are_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_bytes(b"X-Rate-Limit-Requests-Left").unwrap(),
            HeaderValue::from_static("0"),
        );
        let lower = headers(&[("x-rate-limit-requests-left", "0")]);
        assert_eq!(extract_rate_limit(&map), extract_rate_limit(&lower));
        assert_eq!(extract_rate_limit(&map).requests_left, Some(0));
    }

    #[test]
    fn rate_limit_missing_or_malformed_is_unknown() {
        let map = headers(&[
            ("x-rate-limit-requests-left", "soon"),
            ("x-rate-limit-time-reset-ms", "-1"),
        ]);
        assert_eq!(extract_rate_limit(&map), RateLimitState::default());
    }

    #[test]
    fn items_from_v2_array() {
        let items = extract_items(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn items_from_v3_envelope() {
        let items = extract_items(json!({"data": [{"id": 7}], "meta": {}}));
        assert_eq!(items, vec![json!({"id": 7})]);
    }

    #[test]
    fn items_from_single_entry_and_empty_bodies() {
        assert_eq!(extract_items(json!({"data": {"id": 3}})), vec![json!({"id": 3})]);
        assert!(extract_items(Value::Null).is_empty());
        assert!(extract_items(json!({"meta": {}})).is_empty());
        assert!(extract_items(json!("text")).is_empty());
    }
}
