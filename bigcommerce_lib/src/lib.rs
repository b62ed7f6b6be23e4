//! Library layer for BigCommerce collection exports: paginated fetching,
//! shared quota coordination, throttle policy and order reports.
//!
//! Wraps the `bigcommerce_api` crate, which owns HTTP and response parsing.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod policy;
pub mod report;
pub mod retry;
pub mod source;

pub use bigcommerce_api;
pub use bigcommerce_api::{OrderQuery, PaginationState, Query, QueryParams, RateLimitState};

pub use config::{FetcherConfig, StoreConfig};
pub use coordinator::{RateLimitCoordinator, RequestOutcome, TrackerSummary};
pub use error::FetchError;
pub use fetcher::{with_cancel, FetchOutcome, PaginatedFetcher, ORDERS_RESOURCE};
pub use policy::{DelayFormula, ThrottlePolicy};
pub use report::{calculate_order_stats, OrderReport, OrderStats};
pub use retry::retry_throttled;
pub use source::PageSource;
