use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

use quotidian::db::{QuoteCreate, QuoteRepo};

async fn test_app(tag: &str) -> (axum::Router, QuoteRepo, std::path::PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "quotidian-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let repo = QuoteRepo::connect(&database_url)
        .await
        .expect("db connect failed");

    let mut cfg = quotidian::config::Config::default();
    cfg.basic.admin_key = "pwd".to_string();
    // Generous quotas so route assertions never trip the limiter.
    cfg.basic.rate_per_minute = 10_000;
    cfg.basic.burst_per_second = 10_000;

    let state = quotidian::server::router::QuotidianState::new(repo.clone(), &cfg);
    let app = quotidian::server::router::quotidian_router(state);
    (app, repo, temp_path)
}

async fn seed(repo: &QuoteRepo, n: usize) {
    for i in 0..n {
        repo.insert(QuoteCreate {
            text: format!("Test Quote {i}"),
            author: format!("Author {i}"),
        })
        .await
        .expect("seed insert failed");
    }
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

#[tokio::test]
async fn health_and_index_use_the_envelope() {
    let (app, _repo, path) = test_app("health").await;

    let resp = app.clone().oneshot(get("/health")).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["meta"]["version"], "v1");
    assert!(body["meta"]["generated_at"].is_string());

    let resp = app.clone().oneshot(get("/")).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["endpoints"]["random_quote"], "/api/v1/quote");

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn list_quotes_paginates_in_stable_order() {
    let (app, repo, path) = test_app("list").await;
    seed(&repo, 5).await;

    // limit=2&offset=0 -> exactly 2 items
    let resp = app
        .clone()
        .oneshot(get("/api/v1/quotes?limit=2&offset=0"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    let items = body["data"].as_array().expect("data is an array");
    assert_eq!(items.len(), 2);
    assert!(items[0]["id"].as_i64().unwrap() < items[1]["id"].as_i64().unwrap());

    // offset=4&limit=10 -> the single trailing item
    let resp = app
        .clone()
        .oneshot(get("/api/v1/quotes?offset=4&limit=10"))
        .await
        .expect("request failed");
    let body = json_body(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // offset=10 -> empty page
    let resp = app
        .clone()
        .oneshot(get("/api/v1/quotes?offset=10"))
        .await
        .expect("request failed");
    let body = json_body(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // defaults: limit 10, offset 0 -> all 5
    let resp = app
        .clone()
        .oneshot(get("/api/v1/quotes"))
        .await
        .expect("request failed");
    let body = json_body(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn non_integer_pagination_is_rejected() {
    let (app, _repo, path) = test_app("badpage").await;

    let resp = app
        .clone()
        .oneshot(get("/api/v1/quotes?limit=abc"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "limit and offset must be integers");

    let resp = app
        .clone()
        .oneshot(get("/api/v1/quotes?offset=1.5"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn unknown_routes_return_the_envelope_404() {
    let (app, _repo, path) = test_app("fallback").await;

    for uri in ["/api/v1/nonexistent", "/definitely/not/a/route"] {
        let resp = app.clone().oneshot(get(uri)).await.expect("request failed");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = json_body(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Resource not found");
        assert_eq!(body["meta"]["version"], "v1");
    }

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn exhausted_quota_yields_plain_429() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "quotidian-throttle-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let repo = QuoteRepo::connect(&database_url)
        .await
        .expect("db connect failed");
    seed(&repo, 1).await;

    let mut cfg = quotidian::config::Config::default();
    cfg.basic.admin_key = "pwd".to_string();
    cfg.basic.rate_per_minute = 3;
    cfg.basic.burst_per_second = 100;

    let state = quotidian::server::router::QuotidianState::new(repo, &cfg);
    let app = quotidian::server::router::quotidian_router(state);

    for _ in 0..3 {
        let resp = app
            .clone()
            .oneshot(get("/api/v1/quote"))
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app
        .clone()
        .oneshot(get("/api/v1/quote"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // Routes outside /api/v1 are not throttled.
    let resp = app.clone().oneshot(get("/health")).await.expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = std::fs::remove_file(&temp_path);
}
