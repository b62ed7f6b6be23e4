//! Environment configuration for store credentials and fetch behavior.

use bigcommerce_api::Client;

use crate::error::FetchError;
use crate::policy::{DelayFormula, ThrottlePolicy, DEFAULT_THRESHOLD};

/// Largest page size the platform accepts; the default minimizes round trips.
pub const MAX_PAGE_LIMIT: u64 = 250;

/// Credentials and endpoint of one store.
#[derive(Clone)]
pub struct StoreConfig {
    pub store_hash: String,
    pub client_id: String,
    pub access_token: String,
    /// Overrides the production store root, e.g. for a local mock.
    pub api_base_url: Option<String>,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("store_hash", &self.store_hash)
            .field("client_id", &self.client_id)
            .field("access_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl StoreConfig {
    /// Reads `BC_STORE_HASH`, `BC_CLIENT_ID`, `BC_ACCESS_TOKEN` and the
    /// optional `BC_API_BASE_URL`.
    pub fn from_env() -> Result<Self, FetchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, FetchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| FetchError::Config(format!("{} is not set", key)))
        };
        Ok(Self {
            store_hash: required("BC_STORE_HASH")?,
            client_id: required("BC_CLIENT_ID")?,
            access_token: required("BC_ACCESS_TOKEN")?,
            api_base_url: lookup("BC_API_BASE_URL").filter(|v| !v.trim().is_empty()),
        })
    }

    /// Builds an API client for this store.
    pub fn client(&self) -> Result<Client, FetchError> {
        let client = match &self.api_base_url {
            Some(base_url) => Client::with_base_url(base_url, &self.client_id, &self.access_token),
            None => Client::new(&self.store_hash, &self.client_id, &self.access_token),
        }?;
        Ok(client)
    }
}

/// Tunables of a paginated fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetcherConfig {
    /// `limit` applied when the caller does not set one.
    pub page_limit: u64,
    pub policy: ThrottlePolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            page_limit: MAX_PAGE_LIMIT,
            policy: ThrottlePolicy::default(),
        }
    }
}

impl FetcherConfig {
    /// Reads `BC_PAGE_LIMIT`, `BC_THROTTLE_THRESHOLD` and `BC_THROTTLE_DELAY`.
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_limit = parse_or(&lookup, "BC_PAGE_LIMIT", MAX_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        let threshold = parse_or(&lookup, "BC_THROTTLE_THRESHOLD", DEFAULT_THRESHOLD);
        let delay = match lookup("BC_THROTTLE_DELAY") {
            Some(raw) => raw.parse::<DelayFormula>().unwrap_or_else(|e| {
                tracing::warn!("{}, using {}", e, DelayFormula::default());
                DelayFormula::default()
            }),
            None => DelayFormula::default(),
        };
        Self {
            page_limit,
            policy: ThrottlePolicy::new(threshold, delay),
        }
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
