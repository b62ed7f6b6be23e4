//! Paginated, rate-limit-aware collection fetcher.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use bigcommerce_api::{HeaderMap, PaginationState, QueryParams, RateLimitState};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::FetcherConfig;
use crate::coordinator::{RateLimitCoordinator, RequestOutcome};
use crate::error::FetchError;
use crate::source::PageSource;

/// Resource path of the default orders collection.
pub const ORDERS_RESOURCE: &str = "v2/orders";

/// Every item of a collection plus the metadata of its last page.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    /// Items of all pages, in page order.
    pub data: Vec<Value>,
    pub pagination: PaginationState,
    pub rate_limit: RateLimitState,
    #[serde(serialize_with = "serialize_headers")]
    pub headers: HeaderMap,
    pub status: u16,
    /// Parameters of the last request made; `page` is the last page fetched.
    pub params: QueryParams,
    /// Number of page requests made.
    pub pages: u64,
}

/// Fetches whole resource collections from one store, one page at a time.
///
/// Quota pauses go through the store's gate on the shared
/// [`RateLimitCoordinator`], so concurrent fetchers against the same store
/// wait for each other's pauses. Throttling (HTTP 429) is reported as
/// [`FetchError::Throttled`] and never retried here: retrying is the
/// caller's decision.
pub struct PaginatedFetcher<S> {
    source: S,
    store: String,
    coordinator: Arc<RateLimitCoordinator>,
    config: FetcherConfig,
}

impl<S: PageSource> PaginatedFetcher<S> {
    pub fn new(source: S, store: &str, coordinator: Arc<RateLimitCoordinator>) -> Self {
        Self::with_config(source, store, coordinator, FetcherConfig::default())
    }

    pub fn with_config(
        source: S,
        store: &str,
        coordinator: Arc<RateLimitCoordinator>,
        config: FetcherConfig,
    ) -> Self {
        Self {
            source,
            store: store.to_string(),
            coordinator,
            config,
        }
    }

    pub fn coordinator(&self) -> &Arc<RateLimitCoordinator> {
        &self.coordinator
    }

    /// Fetches every page of `resource`, starting from `params`.
    ///
    /// `page` defaults to 1 and `limit` to the configured page size. At least
    /// one request is always made, even for an empty collection. On any
    /// failure the pages fetched so far are discarded.
    pub async fn fetch_all_pages(
        &self,
        resource: &str,
        params: QueryParams,
    ) -> Result<FetchOutcome, FetchError> {
        let mut params = params.with_defaults(1, self.config.page_limit);
        let gate = self.coordinator.gate(&self.store);
        let mut data = Vec::new();
        let mut pages = 0u64;

        loop {
            let waited = gate.acquire().await;
            if !waited.is_zero() {
                tracing::debug!(
                    "Resumed {} after {:.1}s quota pause",
                    resource,
                    waited.as_secs_f64()
                );
            }

            tracing::debug!(
                "Fetching {} page {} (limit {})",
                resource,
                params.page().unwrap_or(1),
                params.limit().unwrap_or(self.config.page_limit)
            );
            let mut response = match self.source.get_page(resource, &params).await {
                Ok(response) => {
                    gate.tracker().record(RequestOutcome::Succeeded);
                    response
                }
                Err(e) if e.is_too_many_requests() => {
                    gate.tracker().record(RequestOutcome::Throttled);
                    let err = FetchError::throttled(e);
                    tracing::warn!(
                        "Throttled fetching {} page {}, retry after {:?}",
                        resource,
                        params.page().unwrap_or(1),
                        err.retry_after()
                    );
                    return Err(err);
                }
                Err(e) => {
                    gate.tracker().record(RequestOutcome::Failed);
                    return Err(e.into());
                }
            };
            pages += 1;

            let pagination = response.pagination();
            let rate_limit = response.rate_limit();
            if let Some(left) = rate_limit.requests_left {
                gate.tracker().observe_requests_left(left);
            }
            data.extend(response.take_items());

            let has_next_page = pagination.has_next_page();
            if has_next_page {
                params.increment_page();
            }

            if let Some(pause) = self.config.policy.pause_for(&rate_limit) {
                tracing::warn!(
                    "{} requests left in quota window, pausing {} for {:.1}s",
                    rate_limit.requests_left.unwrap_or(0),
                    self.store,
                    pause.as_secs_f64()
                );
                gate.defer(pause).await;
            }

            if !has_next_page {
                tracing::info!(
                    "Fetched {} items from {} in {} page(s)",
                    data.len(),
                    resource,
                    pages
                );
                return Ok(FetchOutcome {
                    data,
                    pagination,
                    rate_limit,
                    headers: response.headers,
                    status: response.status,
                    params,
                    pages,
                });
            }
        }
    }

    /// Fetches every page of `resource`, including collections whose
    /// responses carry no pagination metadata (the v2 API).
    ///
    /// Pages with metadata are followed as in
    /// [`fetch_all_pages`](Self::fetch_all_pages). A meta-less page holding
    /// exactly `limit` items is followed by a request for the next page; a
    /// short or empty page ends the collection.
    pub async fn fetch_collection(
        &self,
        resource: &str,
        params: QueryParams,
    ) -> Result<FetchOutcome, FetchError> {
        let params = params.with_defaults(1, self.config.page_limit);
        let limit = params.limit().unwrap_or(self.config.page_limit);
        let mut outcome = self.fetch_all_pages(resource, params).await?;
        let mut last_page_len = outcome.data.len() as u64;

        while outcome.pagination.total_pages == 0 && limit > 0 && last_page_len == limit {
            let mut params = outcome.params.clone();
            let page = params.increment_page();
            tracing::debug!(
                "{} returned a full page without pagination metadata, requesting page {}",
                resource,
                page
            );

            let FetchOutcome {
                data,
                pagination,
                rate_limit,
                headers,
                status,
                params,
                pages,
            } = self.fetch_all_pages(resource, params).await?;
            last_page_len = data.len() as u64;
            outcome.data.extend(data);
            outcome.pagination = pagination;
            outcome.rate_limit = rate_limit;
            outcome.headers = headers;
            outcome.status = status;
            outcome.params = params;
            outcome.pages += pages;
        }
        Ok(outcome)
    }

    /// Like [`fetch_all_pages`](Self::fetch_all_pages), but gives up with
    /// [`FetchError::Cancelled`] as soon as `cancel` fires. The in-flight
    /// request or pause is dropped, which aborts the connection.
    pub async fn fetch_all_pages_with_cancel(
        &self,
        resource: &str,
        params: QueryParams,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, FetchError> {
        with_cancel(resource, cancel, self.fetch_all_pages(resource, params)).await
    }

    /// Cancellable [`fetch_collection`](Self::fetch_collection).
    pub async fn fetch_collection_with_cancel(
        &self,
        resource: &str,
        params: QueryParams,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, FetchError> {
        with_cancel(resource, cancel, self.fetch_collection(resource, params)).await
    }

    /// Fetches every order matching `params`, page by page.
    pub async fn export_orders(&self, params: QueryParams) -> Result<FetchOutcome, FetchError> {
        self.fetch_collection(ORDERS_RESOURCE, params).await
    }
}

/// Runs `operation` until it completes or `cancel` fires. On cancellation
/// the operation future is dropped mid-flight.
pub async fn with_cancel<T, F>(
    label: &str,
    cancel: &CancellationToken,
    operation: F,
) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!("{} cancelled", label);
            Err(FetchError::Cancelled)
        }
        result = operation => result,
    }
}

/// Headers as a name to value map; repeated names are joined with `, `.
fn serialize_headers<S: Serializer>(headers: &HeaderMap, serializer: S) -> Result<S::Ok, S::Error> {
    let map: BTreeMap<&str, String> = headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str(), joined)
        })
        .collect();
    serializer.collect_map(map)
}
