mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sizechart::config::Config;
use support::{spawn_app, spawn_with, TestApp};

async fn create_key(app: &TestApp, scopes: Option<Vec<&str>>) -> (i64, String) {
    let body = match scopes {
        Some(s) => json!({ "name": "storefront", "scopes": s }),
        None => json!({ "name": "storefront" }),
    };
    let res = app.post("/api/api-keys", body).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    (
        res.body["id"].as_i64().unwrap(),
        res.body["rawKey"].as_str().unwrap().to_string(),
    )
}

async fn seed_charts(app: &TestApp) {
    let (_, tops) = app.category_with_sub("Men", "Tops").await;
    app.simple_chart("tees", &[tops], true).await;
    app.simple_chart("draft-tees", &[tops], false).await;
}

#[tokio::test]
async fn anonymous_callers_only_see_published_charts() {
    let app = spawn_app().await;
    seed_charts(&app).await;

    let res = app
        .get("/api/v1/size-charts?includeUnpublished=true")
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["slug"], "tees");
    assert_eq!(data[0]["rows"][0]["cells"][1]["value"]["cm"], 86.4);

    let hidden = app.get("/api/v1/size-charts/draft-tees").await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    let missing = app.get("/api/v1/size-charts?slug=nope").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    let by_slug = app.get("/api/v1/size-charts/tees").await;
    assert_eq!(by_slug.body["data"]["slug"], "tees");
}

#[tokio::test]
async fn valid_key_can_include_unpublished_and_is_touched() {
    let app = spawn_app().await;
    seed_charts(&app).await;
    let (_, key) = create_key(&app, None).await;

    let res = app
        .send(
            Method::GET,
            "/api/v1/size-charts?includeUnpublished=true&category=men",
            None,
            &[("x-api-key", key.as_str())],
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().map(Vec::len), Some(2));

    let bearer = format!("Bearer {}", key);
    let draft = app
        .send(
            Method::GET,
            "/api/v1/size-charts/draft-tees?includeUnpublished=true",
            None,
            &[("authorization", bearer.as_str())],
        )
        .await;
    assert_eq!(draft.status, StatusCode::OK);

    let keys = app.get("/api/api-keys").await;
    assert!(keys.body[0]["lastUsedAt"].is_i64());
    assert!(keys.body[0].get("keyHash").is_none());
    assert_eq!(keys.body[0]["scopes"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn bad_revoked_and_underscoped_keys_are_refused() {
    let app = spawn_app().await;
    seed_charts(&app).await;

    let garbage = app
        .send(Method::GET, "/api/v1/size-charts", None, &[("x-api-key", "nope")])
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let (_, labels_only) = create_key(&app, Some(vec!["labels:read"])).await;
    let headers = [("x-api-key", labels_only.as_str())];
    let charts = app
        .send(Method::GET, "/api/v1/size-charts", None, &headers)
        .await;
    assert_eq!(charts.status, StatusCode::FORBIDDEN);
    let labels = app.send(Method::GET, "/api/v1/labels", None, &headers).await;
    assert_eq!(labels.status, StatusCode::OK);

    let (id, key) = create_key(&app, Some(vec!["*"])).await;
    let revoked = app.delete(&format!("/api/api-keys/{}", id)).await;
    assert_eq!(revoked.status, StatusCode::NO_CONTENT);
    let res = app
        .send(Method::GET, "/api/v1/categories", None, &[("x-api-key", key.as_str())])
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let unknown_scope = app
        .post("/api/api-keys", json!({ "name": "x", "scopes": ["charts:write"] }))
        .await;
    assert_eq!(unknown_scope.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn require_api_key_rejects_anonymous_calls() {
    let app = spawn_with(Config {
        require_api_key: true,
        ..Config::default()
    })
    .await;
    let res = app.get("/api/v1/categories").await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.body["error"].is_string());

    let (_, key) = create_key(&app, None).await;
    let ok = app
        .send(Method::GET, "/api/v1/categories", None, &[("x-api-key", key.as_str())])
        .await;
    assert_eq!(ok.status, StatusCode::OK);
}

#[tokio::test]
async fn public_categories_count_published_charts_only() {
    let app = spawn_app().await;
    seed_charts(&app).await;
    let res = app.get("/api/v1/categories").await;
    assert_eq!(res.body["data"][0]["subcategories"][0]["chartCount"], 1);
    let admin = app.get("/api/categories").await;
    assert_eq!(admin.body[0]["subcategories"][0]["chartCount"], 2);
}

#[tokio::test]
async fn rate_limit_returns_429_after_the_limit() {
    let app = spawn_with(Config {
        rate_limit_per_minute: 2,
        ..Config::default()
    })
    .await;
    let headers = [("x-forwarded-for", "203.0.113.9")];
    let first = app.send(Method::GET, "/api/v1/labels", None, &headers).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.headers["x-ratelimit-limit"], "2");
    assert_eq!(first.headers["x-ratelimit-remaining"], "1");
    app.send(Method::GET, "/api/v1/labels", None, &headers).await;

    let limited = app.send(Method::GET, "/api/v1/labels", None, &headers).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers.contains_key("retry-after"));
    assert_eq!(limited.headers["x-ratelimit-remaining"], "0");

    // 其他客户端独立计数，管理端不限流
    let other = app
        .send(Method::GET, "/api/v1/labels", None, &[("x-forwarded-for", "198.51.100.1")])
        .await;
    assert_eq!(other.status, StatusCode::OK);
    assert_eq!(app.get("/api/labels").await.status, StatusCode::OK);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let app = spawn_app().await;
    let res = app
        .send(
            Method::OPTIONS,
            "/api/v1/size-charts",
            None,
            &[
                ("origin", "https://shop.example.com"),
                ("access-control-request-method", "GET"),
                ("access-control-request-headers", "x-api-key"),
            ],
        )
        .await;
    assert!(res.status.is_success());
    assert_eq!(res.headers["access-control-allow-origin"], "*");

    let simple = app
        .send(
            Method::GET,
            "/api/v1/labels",
            None,
            &[("origin", "https://shop.example.com")],
        )
        .await;
    assert_eq!(simple.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = spawn_app().await;
    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
}
