//! CLI subcommand implementations.

pub mod fetch;
pub mod orders;
pub mod report;

use bigcommerce_lib::bigcommerce_api::Client;
use bigcommerce_lib::{retry_throttled, FetchError, FetchOutcome, PaginatedFetcher, QueryParams};
use tokio_util::sync::CancellationToken;

use crate::output::OutputFormat;

/// Shared state handed to every subcommand.
pub struct Context<'a> {
    pub fetcher: &'a PaginatedFetcher<Client>,
    pub format: &'a OutputFormat,
    pub max_retries: u32,
    pub cancel: &'a CancellationToken,
}

impl Context<'_> {
    /// Fetches a whole collection, re-running the fetch from the first
    /// page whenever it is throttled. Collections without pagination
    /// metadata are paged by item count.
    pub async fn fetch_all(
        &self,
        resource: &str,
        params: QueryParams,
    ) -> Result<FetchOutcome, FetchError> {
        let fetcher = self.fetcher;
        let cancel = self.cancel;
        retry_throttled(resource, self.max_retries, move || {
            fetcher.fetch_collection_with_cancel(resource, params.clone(), cancel)
        })
        .await
    }
}
