use bigcommerce_api::{Client, Error, QueryParams};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client(server: &MockServer) -> Client {
    Client::with_base_url(&server.uri(), "client-id", "secret-token").unwrap()
}

#[tokio::test]
async fn get_collection_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products_page.json");

    Mock::given(method("GET"))
        .and(path("/v3/catalog/products"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(&body)
                .insert_header("X-Rate-Limit-Requests-Left", "148")
                .insert_header("X-Rate-Limit-Time-Reset-Ms", "2000"),
        )
        .mount(&mock_server)
        .await;

    let params = QueryParams::new().with("page", 1).with("limit", 2);
    let mut resp = client(&mock_server)
        .get_resource_collection("v3/catalog/products", &params)
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    let pagination = resp.pagination();
    assert_eq!(pagination.total_pages, 6);
    assert_eq!(pagination.next_link.as_deref(), Some("?page=2&limit=2"));
    let rate_limit = resp.rate_limit();
    assert_eq!(rate_limit.requests_left, Some(148));
    assert_eq!(rate_limit.reset_ms, Some(2000));
    assert_eq!(rate_limit.requests_quota, None);

    let items = resp.take_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], 77);
}

#[tokio::test]
async fn sends_auth_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orders.json"))
        .and(header("X-Auth-Client", "client-id"))
        .and(header("X-Auth-Token", "secret-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 100}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resp = client(&mock_server)
        .get_resource_collection("v2/orders", &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(resp.body, json!([{"id": 100}]));
}

#[tokio::test]
async fn empty_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orders.json"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let mut resp = client(&mock_server)
        .get_resource_collection("v2/orders", &QueryParams::new())
        .await
        .unwrap();
    assert_eq!(resp.status, 204);
    assert!(resp.body.is_null());
    assert!(resp.take_items().is_empty());
    assert_eq!(resp.pagination().total_pages, 0);
}

#[tokio::test]
async fn too_many_requests_keeps_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orders.json"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_string("{\"status\":429,\"title\":\"Too many requests\"}")
                .insert_header("x-rate-limit-time-reset-ms", "5000"),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .get_resource_collection("v2/orders", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(err.is_too_many_requests());
    assert_eq!(err.status(), Some(429));
    let headers = err.headers().unwrap();
    assert_eq!(
        headers.get("X-Rate-Limit-Time-Reset-Ms").unwrap(),
        "5000"
    );
}

#[tokio::test]
async fn server_error_preserves_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/customers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .get_resource_collection("v3/customers", &QueryParams::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .get_resource_collection("v3/customers", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedBody(_)));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let client = Client::with_base_url("http://127.0.0.1:1", "id", "token").unwrap();
    let err = client
        .get_resource_collection("v2/orders", &QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(!err.is_too_many_requests());
}

#[tokio::test]
async fn update_order_puts_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v2/orders/123.json"))
        .and(body_json(json!({"status_id": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123, "status_id": 2})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resp = client(&mock_server)
        .update_order(123, &json!({"status_id": 2}))
        .await
        .unwrap();
    assert_eq!(resp.body["status_id"], 2);
}

#[tokio::test]
async fn delete_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/orders/123.json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resp = client(&mock_server).delete_order(123).await.unwrap();
    assert_eq!(resp.status, 204);
}

#[tokio::test]
async fn get_single_entry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/catalog/products/77"))
        .and(query_param("include", "variants"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 77}, "meta": {}})),
        )
        .mount(&mock_server)
        .await;

    let params = QueryParams::new().with("include", "variants");
    let mut resp = client(&mock_server)
        .get_resource_entry("v3/catalog/products/77", &params)
        .await
        .unwrap();
    assert_eq!(resp.take_items(), vec![json!({"id": 77})]);
}
