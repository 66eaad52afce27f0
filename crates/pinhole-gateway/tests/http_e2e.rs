//! Drives the full router in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, LOCATION, USER_AGENT};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pinhole_gateway::{App, AppState};
use pinhole_generator::RandomGenerator;
use pinhole_qrcode::QrCodeStore;
use pinhole_shortener::ShortenerSettings;
use pinhole_storage::InMemoryRepository;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BASE_URL: &str = "http://pin.test";
const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

struct TestApp {
    router: Router,
    qr_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let qr_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let qrcodes = QrCodeStore::open(qr_dir.path())
            .await
            .expect("Failed to open QR store");
        let state = AppState::with_repository(
            Arc::new(InMemoryRepository::new()),
            RandomGenerator::default(),
            ShortenerSettings::builder().base_url(BASE_URL).build(),
            qrcodes,
        );
        Self {
            router: App::router(state),
            qr_dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send(json_request(Method::POST, uri, body)).await
    }

    async fn post_form(&self, uri: &str, body: &'static str) -> Response {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Creates a link through the JSON API and returns its short id.
    async fn create(&self, body: Value) -> String {
        let response = self.post_json("/shorten", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let short_url = json["short_url"].as_str().unwrap();
        short_url.rsplit('/').next().unwrap().to_string()
    }

    async fn clicks(&self, id: &str) -> u64 {
        let stats = body_json(self.get(&format!("/stats/{id}")).await).await;
        stats["clicks"].as_u64().unwrap()
    }
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn json_creation_returns_short_and_qr_links() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/shorten", json!({"long_url": "https://example.com"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let short_url = json["short_url"].as_str().unwrap();
    let id = short_url.strip_prefix("http://pin.test/").unwrap();
    assert_eq!(id.len(), 6);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["qr_code"], format!("http://pin.test/qr/{id}"));
}

#[tokio::test]
async fn max_clicks_limits_redirects() {
    let app = TestApp::new().await;
    let id = app
        .create(json!({"long_url": "https://example.com", "max_clicks": 2}))
        .await;

    for expected in 1..=2 {
        let response = app.get(&format!("/{id}")).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://example.com");
        assert_eq!(app.clicks(&id).await, expected);
    }

    let response = app.get(&format!("/{id}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_text(response)
        .await
        .contains("Link expired or max clicks reached"));
    assert_eq!(app.clicks(&id).await, 2);
}

#[tokio::test]
async fn past_expiry_is_forbidden() {
    let app = TestApp::new().await;
    let id = app
        .create(json!({"long_url": "https://example.com", "expiry_date": "2001-01-01 00:00:00"}))
        .await;

    let response = app.get(&format!("/{id}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.clicks(&id).await, 0);
}

#[tokio::test]
async fn country_header_overrides_target() {
    let app = TestApp::new().await;
    let id = app
        .create(json!({
            "long_url": "https://example.com",
            "mobile_url": "https://m.example.com",
            "country_redirect": "US=https://us.x.com;IN=https://in.x.com"
        }))
        .await;

    let to = |country: Option<&'static str>, ua: &'static str| {
        let mut builder = Request::get(format!("/{id}")).header(USER_AGENT, ua);
        if let Some(country) = country {
            builder = builder.header("X-Country", country);
        }
        builder.body(Body::empty()).unwrap()
    };

    let response = app.send(to(Some("IN"), IPHONE)).await;
    assert_eq!(location(&response), "https://in.x.com");

    let response = app.send(to(Some("us"), WINDOWS)).await;
    assert_eq!(location(&response), "https://us.x.com");

    let response = app.send(to(Some("FR"), IPHONE)).await;
    assert_eq!(location(&response), "https://m.example.com");

    let response = app.send(to(None, WINDOWS)).await;
    assert_eq!(location(&response), "https://example.com");

    assert_eq!(app.clicks(&id).await, 4);
}

#[tokio::test]
async fn country_with_empty_target_falls_through() {
    let app = TestApp::new().await;
    let response = app
        .post_form(
            "/shorten",
            "long_url=https%3A%2F%2Fexample.com&custom_id=blank-us&mobile_url=https%3A%2F%2Fm.example.com&country_redirect=US%3D",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("skipped"));

    let stats = body_json(app.get("/stats/blank-us").await).await;
    assert!(stats["country_redirect"].is_null());

    let request = |ua: &'static str| {
        Request::get("/blank-us")
            .header(USER_AGENT, ua)
            .header("X-Country", "US")
            .body(Body::empty())
            .unwrap()
    };
    let response = app.send(request(IPHONE)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://m.example.com");

    let response = app.send(request(WINDOWS)).await;
    assert_eq!(location(&response), "https://example.com");
}

#[tokio::test]
async fn password_protected_link() {
    let app = TestApp::new().await;
    let id = app
        .create(json!({"long_url": "https://example.com", "password": "secret"}))
        .await;

    let response = app.get(&format!("/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Password required"));

    let response = app.post_form(&format!("/{id}"), "password=wrong").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_text(response).await.contains("Incorrect password"));

    let response = app
        .send(
            Request::post(format!("/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.clicks(&id).await, 0);

    let response = app.post_form(&format!("/{id}"), "password=secret").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://example.com");

    let response = app
        .send(json_request(
            Method::POST,
            &format!("/{id}"),
            json!({"password": "secret"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(app.clicks(&id).await, 2);

    let stats = body_json(app.get(&format!("/stats/{id}")).await).await;
    assert_eq!(stats["password_protected"], true);
    assert!(stats.get("password").is_none());
}

#[tokio::test]
async fn duplicate_custom_id_is_rejected() {
    let app = TestApp::new().await;
    let id = app
        .create(json!({"long_url": "https://a.example.com", "custom_id": "promo"}))
        .await;
    assert_eq!(id, "promo");

    let response = app
        .post_json(
            "/shorten",
            json!({"long_url": "https://b.example.com", "custom_id": "promo"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Custom ID already taken"})
    );

    let response = app.get("/promo").await;
    assert_eq!(location(&response), "https://a.example.com");
}

#[tokio::test]
async fn creation_validation_errors() {
    let app = TestApp::new().await;

    let response = app.post_json("/shorten", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Missing URL"}));

    for body in [
        json!({"long_url": "not a url"}),
        json!({"long_url": "https://example.com", "max_clicks": "ten"}),
        json!({"long_url": "https://example.com", "expiry_date": "31/12/2030"}),
        json!({"long_url": "https://example.com", "custom_id": "qr"}),
        json!({"long_url": "https://example.com", "custom_id": "has space"}),
    ] {
        let response = app.post_json("/shorten", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn form_creation_renders_confirmation_and_qr() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/shorten",
            "long_url=https%3A%2F%2Fexample.com&custom_id=formlink&max_clicks=&password=",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("http://pin.test/formlink"));
    assert!(page.contains(r#"src="http://pin.test/qr/formlink""#));

    assert!(app.qr_dir.path().join("formlink.png").exists());
    let response = app.get("/qr/formlink").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert!(body_bytes(response).await.starts_with(b"\x89PNG"));

    // Empty optional fields mean unset.
    let response = app.get("/formlink").await;
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn missing_qr_is_not_found() {
    let app = TestApp::new().await;
    let id = app.create(json!({"long_url": "https://example.com"})).await;
    std::fs::remove_file(app.qr_dir.path().join(format!("{id}.png"))).unwrap();

    assert_eq!(app.get(&format!("/qr/{id}")).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/qr/nothing").await.status(), StatusCode::NOT_FOUND);

    // The link itself still works.
    assert_eq!(app.get(&format!("/{id}")).await.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/nothere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("URL not found"));

    let response = app.get("/stats/nothere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "URL not found"}));
}

#[tokio::test]
async fn stats_snapshot() {
    let app = TestApp::new().await;
    let id = app
        .create(json!({
            "long_url": "https://example.com",
            "expiry_date": "2099-12-31 23:59:59",
            "max_clicks": "5",
            "country_redirect": "de=https://de.x.com"
        }))
        .await;
    app.get(&format!("/{id}")).await;

    let stats = body_json(app.get(&format!("/stats/{id}")).await).await;
    assert_eq!(
        stats,
        json!({
            "short_url": format!("http://pin.test/{id}"),
            "long_url": "https://example.com",
            "clicks": 1,
            "expiry_date": "2099-12-31 23:59:59",
            "max_clicks": 5,
            "password_protected": false,
            "mobile_url": null,
            "desktop_url": null,
            "country_redirect": {"DE": "https://de.x.com"}
        })
    );
}

#[tokio::test]
async fn update_flow() {
    let app = TestApp::new().await;
    let id = app
        .create(json!({"long_url": "https://example.com", "password": "pw", "max_clicks": 1}))
        .await;
    let uri = format!("/update/{id}");

    let response = app
        .send(
            Request::patch(&uri)
                .header(CONTENT_TYPE, "text/plain")
                .body(Body::from("max_clicks=3"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Send JSON data"}));

    let response = app
        .send(json_request(Method::PATCH, &uri, json!({"clicks": 0})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"message": "No updates provided"})
    );

    let response = app
        .send(json_request(
            Method::PATCH,
            &uri,
            json!({"password": null, "max_clicks": "", "desktop_url": "https://desk.example.com", "country_redirect": "us=https://us.x.com;broken"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "URL updated successfully");
    assert_eq!(
        json["updated_fields"],
        json!({
            "password": null,
            "max_clicks": null,
            "desktop_url": "https://desk.example.com",
            "country_redirect": {"US": "https://us.x.com"}
        })
    );
    assert_eq!(json["warnings"].as_array().unwrap().len(), 1);

    // POST works as well as PATCH.
    let response = app
        .post_json(&uri, json!({"mobile_url": "https://m.example.com"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stats = body_json(app.get(&format!("/stats/{id}")).await).await;
    assert_eq!(stats["password_protected"], false);
    assert_eq!(stats["max_clicks"], Value::Null);
    assert_eq!(stats["mobile_url"], "https://m.example.com");

    let response = app
        .send(json_request(Method::PATCH, &uri, json!({"max_clicks": "lots"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_unknown_id_is_not_found_before_body_checks() {
    let app = TestApp::new().await;

    let response = app
        .send(
            Request::patch("/update/ghost")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_methods_get_405_page() {
    let app = TestApp::new().await;

    for (method, uri) in [
        (Method::DELETE, "/shorten"),
        (Method::PUT, "/stats/abc123"),
        (Method::DELETE, "/abc123"),
        (Method::GET, "/update/abc123"),
    ] {
        let response = app
            .send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(body_text(response).await.contains("405 Method Not Allowed"));
    }
}

#[tokio::test]
async fn html_pages_render() {
    let app = TestApp::new().await;

    let home = app.get("/").await;
    assert_eq!(home.status(), StatusCode::OK);
    assert!(body_text(home).await.contains("/shorten"));

    let form = app.get("/shorten").await;
    assert_eq!(form.status(), StatusCode::OK);
    let page = body_text(form).await;
    for field in [
        "long_url",
        "custom_id",
        "password",
        "expiry_date",
        "max_clicks",
        "mobile_url",
        "desktop_url",
        "country_redirect",
    ] {
        assert!(page.contains(&format!(r#"name="{field}""#)), "missing {field}");
    }
}
