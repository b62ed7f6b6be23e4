mod client;
mod errors;
pub mod extract;
mod query;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::extract::{PaginationState, RateLimitState};
pub use self::query::{OrderQuery, OrderSortBy, Query, QueryParams};

pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
