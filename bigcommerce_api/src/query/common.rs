//! Shared query infrastructure: the [`Query`] trait and the [`QueryParams`] map.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

const PAGE: &str = "page";
const LIMIT: &str = "limit";

/// Trait implemented by all query builders. Provides conversion to a
/// parameter map and URL serialization.
pub trait Query {
    /// Returns this query's parameters as a name/value map.
    fn to_params(&self) -> QueryParams;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url {
        self.to_params().add_to_url(url)
    }
}

/// Query parameters of a collection request, keyed by parameter name.
///
/// `page` and `limit` get typed accessors because the paginated fetcher
/// drives them; every other parameter is passed through verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.params.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The 1-indexed page number, if set to a valid integer.
    pub fn page(&self) -> Option<u64> {
        self.get(PAGE).and_then(|p| p.parse().ok())
    }

    pub fn set_page(&mut self, page: u64) {
        self.insert(PAGE, page);
    }

    /// The page size, if set to a valid integer.
    pub fn limit(&self) -> Option<u64> {
        self.get(LIMIT).and_then(|l| l.parse().ok())
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.insert(LIMIT, limit);
    }

    /// Fills in `page` and `limit` where they are missing or not integers.
    /// Caller-supplied values win.
    pub fn with_defaults(mut self, page: u64, limit: u64) -> Self {
        if self.page().is_none() {
            self.set_page(page);
        }
        if self.limit().is_none() {
            self.set_limit(limit);
        }
        self
    }

    /// Advances `page` by one and returns the new page number.
    pub fn increment_page(&mut self) -> u64 {
        let next = self.page().unwrap_or(0) + 1;
        self.set_page(next);
        next
    }

    /// Appends every parameter to the URL's query string.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.params.iter() {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

impl Query for QueryParams {
    fn to_params(&self) -> QueryParams {
        self.clone()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
