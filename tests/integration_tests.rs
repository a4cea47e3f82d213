//! Integration tests using wiremock to simulate the BSH platform.

use bsh_engine::{
    BshClient, BshEngine, BshRequest, BshSearch, Callbacks, Credential, Error, ExportFormat,
    FilterOperator, FormData, LoginRequest, ReqwestTransport,
};
use http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Product {
    id: u32,
    name: String,
}

fn envelope(code: u16, data: Value) -> Value {
    json!({
        "data": data,
        "code": code,
        "status": "OK",
        "error": "",
        "timestamp": 1700000000000i64
    })
}

fn engine(server: &MockServer) -> BshEngine {
    BshEngine::builder().host(server.uri()).build()
}

#[tokio::test]
async fn test_find_by_id_decodes_typed_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/entities/Product/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(200, json!([{"id": 1, "name": "Lamp"}]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = engine(&mock_server)
        .entities("Product")
        .unwrap()
        .find_by_id::<Product>(1, Callbacks::none())
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert!(response.is_ok());
    assert_eq!(response.api.as_deref(), Some("entities.Product.findById"));
    assert_eq!(
        response.into_first(),
        Some(Product {
            id: 1,
            name: "Lamp".to_string()
        })
    );
}

#[tokio::test]
async fn test_create_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/entities/Product"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"id": 0, "name": "New"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(envelope(201, json!([{"id": 7, "name": "New"}]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let payload = Product {
        id: 0,
        name: "New".to_string(),
    };
    let response = engine(&mock_server)
        .entities("Product")
        .unwrap()
        .create::<Product, _>(&payload, Callbacks::none())
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(response.code, 201);
    assert_eq!(response.first().map(|p| p.id), Some(7));
}

#[tokio::test]
async fn test_http_error_4xx_is_returned_with_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/entities/Product/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "data": [],
            "code": 404,
            "status": "NOT_FOUND",
            "error": "Product 404 not found",
            "timestamp": 1700000000000i64
        })))
        .mount(&mock_server)
        .await;

    let result = engine(&mock_server)
        .entities("Product")
        .unwrap()
        .find_by_id::<Product>(404, Callbacks::none())
        .await;

    match result {
        Err(Error::Api(err)) => {
            assert_eq!(err.status.as_u16(), 404);
            assert_eq!(err.endpoint, "/api/entities/Product/404");
            let response = err.response.unwrap();
            assert_eq!(response.error, "Product 404 not found");
            assert_eq!(response.endpoint.as_deref(), Some("/api/entities/Product/404"));
            assert_eq!(response.api.as_deref(), Some("entities.Product.findById"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_body_keeps_raw_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .mount(&mock_server)
        .await;

    let err = engine(&mock_server)
        .status()
        .unwrap()
        .status::<Value>(Callbacks::none())
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(502));
    assert!(err.response().is_none());
    assert_eq!(err.raw_response(), Some("Bad gateway"));
}

#[tokio::test]
async fn test_on_error_receives_server_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "data": [],
            "code": 401,
            "status": "UNAUTHORIZED",
            "error": "Bad credentials",
            "timestamp": 1700000000000i64
        })))
        .mount(&mock_server)
        .await;

    let failures = Arc::new(AtomicUsize::new(0));
    let failures_clone = failures.clone();
    let outcome = engine(&mock_server)
        .auth()
        .unwrap()
        .login(
            &LoginRequest::new("a@b.c", "wrong"),
            Callbacks::none().on_error(move |err| {
                assert!(err.is_unauthorized());
                assert_eq!(err.endpoint(), Some("/api/auth/login"));
                failures_clone.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await
        .unwrap();

    assert!(outcome.is_consumed());
    assert_eq!(failures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_decodes_token_pair() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "a@b.c", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(200, json!([{"access": "jwt-a", "refresh": "jwt-r"}]))),
        )
        .mount(&mock_server)
        .await;

    let tokens = engine(&mock_server)
        .auth()
        .unwrap()
        .login(&LoginRequest::new("a@b.c", "secret"), Callbacks::none())
        .await
        .unwrap()
        .into_value()
        .and_then(|r| r.into_first())
        .unwrap();

    assert_eq!(tokens.access, "jwt-a");
    assert_eq!(tokens.refresh, "jwt-r");
}

#[tokio::test]
async fn test_jwt_header_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(200, json!([{"id": 1}]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = BshEngine::builder()
        .host(mock_server.uri())
        .auth(|| async { Some(Credential::jwt("T")) })
        .build();

    let outcome = engine.users().unwrap().me::<Value>(Callbacks::none()).await.unwrap();
    assert!(outcome.value().is_some_and(|r| r.is_ok()));
}

#[tokio::test]
async fn test_api_key_header_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .and(header("x-bsh-apikey", "K"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(200, json!([{"theme": "dark"}]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = BshEngine::builder()
        .host(mock_server.uri())
        .auth(Credential::api_key("K"))
        .build();

    let settings = engine.settings().unwrap().get::<Value>(Callbacks::none()).await.unwrap();
    assert_eq!(settings.into_value().unwrap().data[0]["theme"], "dark");
}

#[tokio::test]
async fn test_repeated_caller_header_reaches_server_with_every_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(200, json!([]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::builder()
        .default_header("x-tag", "default")
        .unwrap()
        .default_header("x-client", "bsh-engine")
        .unwrap()
        .build()
        .unwrap();
    let client = BshClient::builder()
        .host(mock_server.uri())
        .transport(transport)
        .build()
        .unwrap();

    let mut headers = HeaderMap::new();
    headers.append("x-tag", HeaderValue::from_static("a"));
    headers.append("x-tag", HeaderValue::from_static("b"));
    client
        .get::<Value>(BshRequest::new("/api/status").with_headers(headers), Callbacks::none())
        .await
        .unwrap();

    let received = mock_server.received_requests().await.unwrap();
    let tags: Vec<&str> = received[0]
        .headers
        .get_all("x-tag")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["a", "b"]);
    assert_eq!(received[0].headers["x-client"], "bsh-engine");
}

#[tokio::test]
async fn test_search_posts_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/entities/Product/search"))
        .and(body_json(json!({
            "filters": [{"field": "name", "operator": "like", "value": "La"}],
            "pagination": {"page": 0, "size": 10}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            200,
            json!([{"id": 1, "name": "Lamp"}, {"id": 2, "name": "Ladder"}]),
        )))
        .mount(&mock_server)
        .await;

    let search = BshSearch::new()
        .filter("name", FilterOperator::Like, "La")
        .page(0, 10);
    let found = engine(&mock_server)
        .entities("Product")
        .unwrap()
        .search::<Product, _>(&search, Callbacks::none())
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(found.data.len(), 2);
}

#[tokio::test]
async fn test_search_pages_with_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/entities/Product/search"))
        .and(query_param("offset", "20"))
        .and(query_param("size", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(200, json!([{"id": 21, "name": "Rug"}]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = engine(&mock_server)
        .entities("Product")
        .unwrap()
        .with_params([("offset", "20"), ("size", "10")])
        .search::<Product, _>(&BshSearch::new(), Callbacks::none())
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(page.first().map(|p| p.id), Some(21));
}

#[tokio::test]
async fn test_export_downloads_blob_with_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/entities/Product/export"))
        .and(query_param("format", "csv"))
        .and(query_param("filename", "products"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_bytes(b"id,name\n1,Lamp\n".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let blob = engine(&mock_server)
        .entities("Product")
        .unwrap()
        .export(ExportFormat::Csv, Some("products"), Callbacks::none())
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(blob.text().unwrap(), "id,name\n1,Lamp\n");
    assert_eq!(blob.content_type.as_deref(), Some("text/csv"));
}

#[tokio::test]
async fn test_image_upload_sends_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/images/upload"))
        .and(header_exists("content-type"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(200, json!([{"url": "/img/1.png"}]))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let form = FormData::new().file("file", b"\x89PNG".to_vec(), "1.png", Some("image/png"));
    let response = engine(&mock_server)
        .images()
        .unwrap()
        .upload::<Value>(form, Callbacks::none())
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(response.data[0]["url"], "/img/1.png");

    let received = mock_server.received_requests().await.unwrap();
    let content_type = received[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_engine_reconfiguration_rebuilds_client() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    for server in [&first, &second] {
        Mock::given(method("GET"))
            .and(path("/api/status/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(200, json!([]))))
            .expect(1)
            .mount(server)
            .await;
    }

    let mut engine = engine(&first);
    engine.status().unwrap().health::<Value>(Callbacks::none()).await.unwrap();

    engine.with_host(second.uri());
    assert_eq!(engine.client().unwrap().host(), second.uri());
    engine.status().unwrap().health::<Value>(Callbacks::none()).await.unwrap();
}

#[tokio::test]
async fn test_network_failure_is_not_an_api_error() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let engine = BshEngine::builder()
        .host(format!("http://127.0.0.1:{}", port))
        .build();
    let err = engine
        .status()
        .unwrap()
        .status::<Value>(Callbacks::none().on_error(|_| panic!("network failures bypass on_error")))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(_)));
}
