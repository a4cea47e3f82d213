//! Verifies the verb, path and operation id every service method dispatches.

use bsh_engine::{
    BshEngine, BshSearch, Callbacks, ChangePasswordRequest, ExportFormat, FormData, LoginRequest,
    Mail, TransportBody, TransportRequest, TransportResponse,
};
use http::{Method, StatusCode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

struct Harness {
    engine: BshEngine,
    recorded: Arc<Mutex<Vec<TransportRequest>>>,
}

impl Harness {
    fn new() -> Self {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = recorded.clone();
        let engine = BshEngine::builder()
            .host("https://bsh.test")
            .transport(move |request: TransportRequest| {
                sink.lock().unwrap().push(request);
                std::future::ready(Ok::<_, bsh_engine::Error>(TransportResponse::json(
                    StatusCode::OK,
                    &json!({"data": [], "code": 200, "status": "OK", "error": "", "timestamp": 0}),
                )))
            })
            .build();
        Self { engine, recorded }
    }

    fn last(&self) -> (Method, String, TransportBody) {
        let recorded = self.recorded.lock().unwrap();
        let request = recorded.last().expect("a request was dispatched");
        (
            request.method.clone(),
            request.url.trim_start_matches("https://bsh.test").to_string(),
            request.body.clone(),
        )
    }

    fn assert_last(&self, expected_method: Method, expected_path: &str) {
        let (method, path, _) = self.last();
        assert_eq!(method, expected_method, "method for {}", expected_path);
        assert_eq!(path, expected_path);
    }
}

fn none() -> Callbacks<Value> {
    Callbacks::none()
}

#[tokio::test]
async fn test_entity_paths() {
    let h = Harness::new();
    let products = h.engine.entities("Product").unwrap();
    let search = BshSearch::new();
    let row = json!({"name": "Lamp"});

    let api = products.find_by_id(5, none()).await.unwrap().into_value().unwrap().api;
    assert_eq!(api.as_deref(), Some("entities.Product.findById"));
    h.assert_last(Method::GET, "/api/entities/Product/5");

    products.create(&row, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/entities/Product");

    products.create_batch(&[row.clone(), row.clone()], none()).await.unwrap();
    let (_, _, body) = h.last();
    assert_eq!(body.as_text(), Some(r#"[{"name":"Lamp"},{"name":"Lamp"}]"#));
    h.assert_last(Method::POST, "/api/entities/Product/batch");

    products.update(&row, none()).await.unwrap();
    h.assert_last(Method::PUT, "/api/entities/Product");

    products.update_batch(&[row.clone()], none()).await.unwrap();
    h.assert_last(Method::PUT, "/api/entities/Product/batch");

    products.search(&search, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/entities/Product/search");

    products.delete(&search, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/entities/Product/delete");

    products.delete_by_id("abc", none()).await.unwrap();
    h.assert_last(Method::DELETE, "/api/entities/Product/abc");

    products.columns(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/entities/Product/columns");

    products.count(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/entities/Product/count");

    products.count_matching(&search, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/entities/Product/count");

    products.export(ExportFormat::Excel, Some("all products"), Callbacks::none()).await.unwrap();
    h.assert_last(
        Method::GET,
        "/api/entities/Product/export?format=excel&filename=all+products",
    );

    products.export(ExportFormat::Json, None, Callbacks::none()).await.unwrap();
    h.assert_last(Method::GET, "/api/entities/Product/export?format=json");
}

#[tokio::test]
async fn test_auth_paths() {
    let h = Harness::new();
    let auth = h.engine.auth().unwrap();

    auth.login(&LoginRequest::new("a@b.c", "pw"), Callbacks::none()).await.unwrap();
    h.assert_last(Method::POST, "/api/auth/login");

    auth.register(&json!({"email": "a@b.c"}), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/auth/register");

    auth.refresh("R", Callbacks::none()).await.unwrap();
    let (_, _, body) = h.last();
    assert_eq!(body.as_text(), Some(r#"{"refresh":"R"}"#));
    h.assert_last(Method::POST, "/api/auth/refresh");

    auth.forget_password("a@b.c", none()).await.unwrap();
    h.assert_last(Method::POST, "/api/auth/forget-password");

    auth.reset_password(&json!({"code": "1", "password": "x"}), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/auth/reset-password");

    auth.activate_account(&json!({"code": "1"}), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/auth/activate-account");

    auth.resend_activation_email("a@b.c", none()).await.unwrap();
    h.assert_last(Method::POST, "/api/auth/resend-activation-email");
}

#[tokio::test]
async fn test_user_paths() {
    let h = Harness::new();
    let users = h.engine.users().unwrap();

    users.me(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/users/me");

    users.init(&json!({"email": "admin@b.c"}), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/users/init");

    users.update_profile(&json!({"firstName": "Ada"}), none()).await.unwrap();
    h.assert_last(Method::PUT, "/api/users/profile");

    let picture = FormData::new().file("file", b"jpg".to_vec(), "me.jpg", Some("image/jpeg"));
    users.update_picture(picture, none()).await.unwrap();
    let (_, _, body) = h.last();
    assert!(matches!(body, TransportBody::Form(_)));
    h.assert_last(Method::POST, "/api/users/picture");

    let change = ChangePasswordRequest {
        current_password: "old".to_string(),
        new_password: "new".to_string(),
    };
    users.change_password(&change, none()).await.unwrap();
    let (_, _, body) = h.last();
    assert_eq!(body.as_text(), Some(r#"{"currentPassword":"old","newPassword":"new"}"#));
    h.assert_last(Method::PUT, "/api/users/password");

    users.search(&BshSearch::new(), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/users/search");

    users.find_by_id(3, none()).await.unwrap();
    h.assert_last(Method::GET, "/api/users/3");

    users.update(3, &json!({"status": "ACTIVE"}), none()).await.unwrap();
    h.assert_last(Method::PUT, "/api/users/3");

    users.delete_by_id(3, none()).await.unwrap();
    h.assert_last(Method::DELETE, "/api/users/3");
}

#[tokio::test]
async fn test_settings_images_mailing_paths() {
    let h = Harness::new();

    let settings = h.engine.settings().unwrap();
    settings.get(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/settings");
    settings.update(&json!({"theme": "dark"}), none()).await.unwrap();
    h.assert_last(Method::PUT, "/api/settings");

    let form = FormData::new().file("file", b"png".to_vec(), "a.png", None);
    h.engine.images().unwrap().upload(form, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/images/upload");

    let mail = Mail {
        to: vec!["a@b.c".to_string()],
        subject: "Hi".to_string(),
        message: "Hello".to_string(),
    };
    h.engine.mailing().unwrap().send(&mail, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/mailing/send");
}

#[tokio::test]
async fn test_caching_paths() {
    let h = Harness::new();
    let caching = h.engine.caching().unwrap();

    caching.find_by_id("entities", none()).await.unwrap();
    h.assert_last(Method::GET, "/api/caching/entities");

    caching.search(&BshSearch::new(), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/caching/search");

    caching.names(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/caching/names");

    caching.clear_by_id("entities", none()).await.unwrap();
    h.assert_last(Method::DELETE, "/api/caching/clearById/entities");

    caching.clear_all(none()).await.unwrap();
    h.assert_last(Method::DELETE, "/api/caching/clearAll");
}

#[tokio::test]
async fn test_api_key_plugin_status_paths() {
    let h = Harness::new();

    let keys = h.engine.api_keys().unwrap();
    keys.create(&json!({"name": "ci"}), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/api-keys");
    keys.find_by_id(9, none()).await.unwrap();
    h.assert_last(Method::GET, "/api/api-keys/9");
    keys.update(&json!({"id": 9, "name": "ci-2"}), none()).await.unwrap();
    h.assert_last(Method::PUT, "/api/api-keys");
    keys.delete_by_id(9, none()).await.unwrap();
    h.assert_last(Method::DELETE, "/api/api-keys/9");
    keys.revoke(9, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/api-keys/9/revoke");
    keys.search(&BshSearch::new(), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/api-keys/search");

    let plugins = h.engine.plugins().unwrap();
    let zip = FormData::new().file("file", b"PK".to_vec(), "plugin.zip", Some("application/zip"));
    plugins.install_zip(zip, none()).await.unwrap();
    h.assert_last(Method::POST, "/api/plugins/install/zip");
    plugins.install_core(&json!({"name": "audit"}), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/plugins/install/core");

    let status = h.engine.status().unwrap();
    status.status(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/status");
    status.health(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/status/health");
}

#[tokio::test]
async fn test_query_params_are_appended_to_service_paths() {
    let h = Harness::new();
    let paging = [("offset", "40"), ("size", "20")];

    let products = h.engine.entities("Product").unwrap().with_params(paging);
    products.search(&BshSearch::new(), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/entities/Product/search?offset=40&size=20");

    products.find_by_id(5, none()).await.unwrap();
    h.assert_last(Method::GET, "/api/entities/Product/5?offset=40&size=20");

    products.export(ExportFormat::Csv, None, Callbacks::none()).await.unwrap();
    h.assert_last(
        Method::GET,
        "/api/entities/Product/export?offset=40&size=20&format=csv",
    );

    let users = h.engine.users().unwrap();
    users.with_params(paging).search(&BshSearch::new(), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/users/search?offset=40&size=20");

    // The original service is left without parameters.
    users.me(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/users/me");

    let keys = h.engine.api_keys().unwrap().with_params([("name", "ci key")]);
    keys.search(&BshSearch::new(), none()).await.unwrap();
    h.assert_last(Method::POST, "/api/api-keys/search?name=ci+key");

    let caching = h.engine.caching().unwrap().with_params(paging);
    caching.names(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/caching/names?offset=40&size=20");

    let status = h.engine.status().unwrap().with_params([("verbose", "true")]);
    status.health(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/status/health?verbose=true");

    let auth = h.engine.auth().unwrap().with_params([("lang", "fr")]);
    auth.forget_password("a@b.c", none()).await.unwrap();
    h.assert_last(Method::POST, "/api/auth/forget-password?lang=fr");

    let settings = h.engine.settings().unwrap().with_params([("scope", "ui")]);
    settings.get(none()).await.unwrap();
    h.assert_last(Method::GET, "/api/settings?scope=ui");
}
