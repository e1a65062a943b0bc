mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sizechart::config::Config;
use support::{spawn_app, spawn_with};

#[tokio::test]
async fn templates_are_listed_with_variants() {
    let app = spawn_app().await;
    let res = app.get("/api/templates").await;
    assert_eq!(res.status, StatusCode::OK);
    let list = res.body.as_array().unwrap();
    assert_eq!(list.len(), 6);
    let bottoms = list.iter().find(|t| t["id"] == "mens-bottoms").unwrap();
    assert_eq!(bottoms["columnCount"], 4);
    assert_eq!(bottoms["variants"].as_array().map(Vec::len), Some(3));

    let detail = app.get("/api/templates/mens-bottoms").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["measurementInstructions"], json!(["WAIST", "HIP", "INSEAM"]));
    assert_eq!(detail.body["rows"].as_array().map(Vec::len), Some(4));
    assert_eq!(detail.body["variantRows"].as_array().map(Vec::len), Some(3));

    assert_eq!(app.get("/api/templates/capes").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn applying_a_variant_creates_an_unpublished_chart() {
    let app = spawn_app().await;
    let res = app
        .post("/api/templates/mens-bottoms/apply", json!({ "variant": "long" }))
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["name"], "Men's Bottoms (Long)");
    assert_eq!(res.body["slug"], "mens-bottoms-long");
    assert_eq!(res.body["isPublished"], false);
    // 分类不存在时跳过挂载
    assert_eq!(res.body["subcategories"], json!([]));
    let row = &res.body["rows"][0]["cells"];
    assert_eq!(row[0]["value"]["key"], "SIZE_SM");
    assert_eq!(row[3]["value"]["inches"], 34.0);
    assert_eq!(res.body["measurementInstructions"].as_array().map(Vec::len), Some(3));

    let labels = app.get("/api/labels?type=ALPHA").await;
    assert_eq!(labels.body.as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn applying_twice_reuses_labels_and_suffixes_slug() {
    let app = spawn_app().await;
    let cat = app
        .post("/api/categories", json!({ "name": "Men", "slug": "mens" }))
        .await;
    let cat_id = cat.body["id"].as_i64().unwrap();
    app.post(
        &format!("/api/categories/{}/subcategories", cat_id),
        json!({ "name": "Bottoms" }),
    )
    .await;

    let first = app
        .send(Method::POST, "/api/templates/mens-bottoms/apply", None, &[])
        .await;
    assert_eq!(first.status, StatusCode::CREATED, "{}", first.body);
    assert_eq!(first.body["slug"], "mens-bottoms");
    assert_eq!(first.body["subcategories"][0]["slug"], "bottoms");
    assert_eq!(first.body["rows"][0]["cells"][3]["value"]["inches"], 32.0);

    let second = app
        .post("/api/templates/mens-bottoms/apply", json!({ "isPublished": true }))
        .await;
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(second.body["slug"], "mens-bottoms-2");
    assert_eq!(second.body["isPublished"], true);

    let labels = app.get("/api/labels").await;
    assert_eq!(labels.body.as_array().map(Vec::len), Some(4));
    let instructions = app.get("/api/instructions").await;
    assert_eq!(instructions.body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn apply_rejects_bad_requests() {
    let app = spawn_app().await;
    let res = app
        .post("/api/templates/mens-bottoms/apply", json!({ "variant": "petite" }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = app.post("/api/templates/capes/apply", json!({})).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let res = app
        .post("/api/templates/kids-tops/apply", json!({ "subcategoryIds": [999] }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/api/labels").await.body, json!([]));
}

#[tokio::test]
async fn repeated_subcategory_ids_are_collapsed() {
    let app = spawn_app().await;
    let (_, tops) = app.category_with_sub("Kids", "Tops").await;
    let res = app
        .post(
            "/api/templates/kids-tops/apply",
            json!({ "subcategoryIds": [tops, tops] }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["subcategories"].as_array().map(Vec::len), Some(1));
    assert_eq!(res.body["subcategories"][0]["id"], tops);
}

fn demo_config() -> Config {
    Config {
        demo_mode: true,
        demo_reset_token: Some("secret".into()),
        ..Config::default()
    }
}

#[tokio::test]
async fn demo_reset_is_hidden_outside_demo_mode() {
    let app = spawn_app().await;
    let res = app
        .send(Method::POST, "/api/demo/reset", None, &[("authorization", "Bearer secret")])
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let status = app.get("/api/demo/status").await;
    assert_eq!(status.body, json!({ "demoMode": false, "lastResetAt": null }));
}

#[tokio::test]
async fn demo_reset_requires_token() {
    let app = spawn_with(demo_config()).await;
    let res = app.send(Method::POST, "/api/demo/reset", None, &[]).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    let res = app
        .send(Method::POST, "/api/demo/reset", None, &[("authorization", "Bearer wrong")])
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(app.get("/api/demo/status").await.body["lastResetAt"].is_null());
}

#[tokio::test]
async fn demo_reset_is_repeatable() {
    let app = spawn_with(demo_config()).await;
    let auth = [("authorization", "Bearer secret")];

    let first = app.send(Method::POST, "/api/demo/reset", None, &auth).await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.body);
    assert_eq!(first.body["charts"], 6);

    // 用户改动会在下次重置时被清掉
    app.simple_chart("scratch", &[], true).await;
    let second = app.send(Method::POST, "/api/demo/reset", None, &auth).await;
    assert_eq!(second.status, StatusCode::OK);
    for field in ["categories", "subcategories", "labels", "instructions", "charts"] {
        assert_eq!(first.body[field], second.body[field], "{}", field);
    }
    assert_eq!(app.get("/api/size-charts/scratch").await.status, StatusCode::NOT_FOUND);

    let chart = app.get("/api/size-charts/mens-tops").await;
    assert_eq!(chart.body["isPublished"], true);
    assert_eq!(chart.body["subcategories"][0]["slug"], "tops");

    let status = app.get("/api/demo/status").await;
    assert_eq!(status.body["demoMode"], true);
    assert_eq!(status.body["lastResetAt"], second.body["resetAt"]);
}
