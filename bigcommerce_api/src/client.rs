//! HTTP client for the BigCommerce store REST API.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::{query::QueryParams, types::ApiResponse, Error};

/// Request timeout for every API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path prefix of the `orders` resource.
const ORDERS_RESOURCE: &str = "v2/orders";

/// HTTP client for one store's REST API.
///
/// Every request is authenticated with the app's client id and the store's
/// access token. Resource paths are relative to the store root, e.g.
/// `v2/orders` or `v3/catalog/products`.
pub struct Client {
    http: reqwest::Client,
    /// Store root, always ending in `/`.
    base_api_url: Url,
    client_id: String,
    access_token: String,
}

impl Client {
    /// Creates a client for the given store on the production API host.
    pub fn new(store_hash: &str, client_id: &str, access_token: &str) -> Result<Self, Error> {
        Self::with_base_url(
            &format!("https://api.bigcommerce.com/stores/{}/", store_hash),
            client_id,
            access_token,
        )
    }

    /// Creates a client with a custom store root. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, client_id: &str, access_token: &str) -> Result<Self, Error> {
        let base_api_url = if base_url.ends_with('/') {
            Url::parse(base_url)
        } else {
            Url::parse(&format!("{}/", base_url))
        }
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_api_url,
            client_id: client_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn get_url(&self, resource: &str, params: Option<&QueryParams>) -> Result<Url, Error> {
        let path = normalize_resource(resource);
        let url = self.base_api_url.join(&path).map_err(|e| {
            tracing::error!("Invalid URL constructed for {}: {}", resource, e);
            Error::InvalidUrl(format!("{}: {}", path, e))
        })?;
        Ok(match params {
            Some(params) => params.add_to_url(&url),
            None => url,
        })
    }

    async fn send(
        &self,
        method: Method,
        resource: &str,
        params: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<ApiResponse, Error> {
        let url = self.get_url(resource, params)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .header("x-auth-client", &self.client_id)
            .header("x-auth-token", &self.access_token)
            .header("accept", "application/json")
            .header("content-type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to request {}: {}", resource, e);
            Error::Transport(e)
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let text = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&text);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                headers,
                body: snippet,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                let snippet = truncate_body(&text);
                tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
                Error::MalformedBody(e.to_string())
            })?
        };

        Ok(ApiResponse::new(status.as_u16(), headers, body))
    }

    /// Fetches one page of a resource collection.
    pub async fn get_resource_collection(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> Result<ApiResponse, Error> {
        self.send(Method::GET, resource, Some(params), None).await
    }

    /// Fetches a single resource entry.
    pub async fn get_resource_entry(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> Result<ApiResponse, Error> {
        self.send(Method::GET, resource, Some(params), None).await
    }

    /// Replaces fields of a single resource entry with a JSON body.
    pub async fn update_resource_entry(
        &self,
        resource: &str,
        data: &Value,
    ) -> Result<ApiResponse, Error> {
        self.send(Method::PUT, resource, None, Some(data)).await
    }

    /// Deletes a single resource entry.
    pub async fn delete_resource_entry(&self, resource: &str) -> Result<ApiResponse, Error> {
        self.send(Method::DELETE, resource, None, None).await
    }

    /// Updates one order by id.
    pub async fn update_order(&self, order_id: u64, data: &Value) -> Result<ApiResponse, Error> {
        self.update_resource_entry(&format!("{}/{}", ORDERS_RESOURCE, order_id), data)
            .await
    }

    /// Deletes one order by id.
    pub async fn delete_order(&self, order_id: u64) -> Result<ApiResponse, Error> {
        self.delete_resource_entry(&format!("{}/{}", ORDERS_RESOURCE, order_id))
            .await
    }
}

/// Strips leading slashes and gives v2 paths their `.json` suffix.
fn normalize_resource(resource: &str) -> String {
    let path = resource.trim_start_matches('/');
    if path.starts_with("v2/") && !path.ends_with(".json") {
        format!("{}.json", path)
    } else {
        path.to_string()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v2_paths_get_json_suffix() {
        assert_eq!(normalize_resource("v2/orders"), "v2/orders.json");
        assert_eq!(normalize_resource("/v2/orders/12"), "v2/orders/12.json");
        assert_eq!(normalize_resource("v2/orders.json"), "v2/orders.json");
    }

    #[test]
    fn v3_paths_are_untouched() {
        assert_eq!(normalize_resource("v3/catalog/products"), "v3/catalog/products");
    }

    #[test]
    fn store_root_url() {
        let client = Client::new("abc123", "id", "token").unwrap();
        let url = client.get_url("v2/orders", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.bigcommerce.com/stores/abc123/v2/orders.json"
        );
    }

    #[test]
    fn base_url_without_trailing_slash() {
        let client = Client::with_base_url("http://localhost:8080/root", "id", "token").unwrap();
        let params = QueryParams::new().with("page", 1);
        let url = client.get_url("v3/catalog/products", Some(&params)).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/root/v3/catalog/products?page=1"
        );
    }

    #[test]
    fn truncates_long_bodies() {
        let body = "x".repeat(2500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert_eq!(out.len(), 2000 + "...[truncated]".len());
    }
}
