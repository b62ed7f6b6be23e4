//! The HTTP capability the fetcher drives.

use std::future::Future;

use bigcommerce_api::types::ApiResponse;
use bigcommerce_api::{Client, QueryParams};

/// Anything that can fetch one page of a resource collection.
///
/// Implemented by [`bigcommerce_api::Client`]; tests substitute scripted
/// sources. Dropping the returned future must abort the request.
pub trait PageSource: Send + Sync {
    fn get_page(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> impl Future<Output = Result<ApiResponse, bigcommerce_api::Error>> + Send;
}

impl PageSource for Client {
    async fn get_page(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> Result<ApiResponse, bigcommerce_api::Error> {
        self.get_resource_collection(resource, params).await
    }
}
