mod support;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use sizechart::config::Config;
use support::{spawn_app, spawn_with, TestApp};

async fn seed(app: &TestApp) -> Value {
    let (_, tops) = app.category_with_sub("Men", "Tops").await;
    app.label("SIZE_SM", "SM", "ALPHA").await;
    app.post(
        "/api/instructions",
        json!({ "key": "CHEST", "name": "Chest", "instruction": "Measure around the chest." }),
    )
    .await;
    app.simple_chart("tees", &[tops], true).await
}

fn document(slug: &str, chest: f64) -> Value {
    json!({
        "version": "1.0",
        "charts": [{
            "name": "Imported",
            "slug": slug,
            "isPublished": true,
            "categories": [{ "category": "men", "subcategory": "tops" }],
            "measurementInstructions": ["CHEST"],
            "columns": [
                { "name": "Size", "type": "SIZE_LABEL", "labelType": "ALPHA" },
                { "name": "Chest", "type": "MEASUREMENT" },
                { "name": "Note", "type": "TEXT" }
            ],
            "rows": [
                { "Size": { "labelKey": "SIZE_SM" }, "Chest": chest, "Note": "slim" },
                { "Size": "Custom", "Chest": { "min": 36, "max": 38 } }
            ]
        }]
    })
}

#[tokio::test]
async fn export_uses_natural_keys() {
    let app = spawn_app().await;
    let chart = seed(&app).await;

    let res = app
        .get(&format!("/api/size-charts/export?ids={}", chart["id"]))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["version"], "1.0");
    assert!(res.body["exportedAt"].is_string());
    let exported = &res.body["charts"][0];
    assert_eq!(exported["slug"], "tees");
    assert_eq!(exported["categories"][0], json!({ "category": "men", "subcategory": "tops" }));
    assert_eq!(exported["columns"][1], json!({ "name": "Chest", "type": "MEASUREMENT" }));
    assert_eq!(exported["rows"][0], json!({ "Size": "S", "Chest": 34.0 }));
    assert_eq!(exported["rows"][1]["Chest"], json!({ "min": 36.0, "max": 38.0 }));

    let bad = app.get("/api/size-charts/export?ids=1,x").await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_then_import_into_fresh_database() {
    let source = spawn_app().await;
    seed(&source).await;
    let doc = source.get("/api/size-charts/export").await.body;

    let target = spawn_app().await;
    target.category_with_sub("Men", "Tops").await;
    let res = target
        .post("/api/size-charts/import", json!({ "data": doc }))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["created"], 1);
    let chart = target.get("/api/size-charts/tees").await;
    assert_eq!(chart.body["rows"][1]["cells"][1]["value"]["max"]["cm"], 96.5);
    assert_eq!(chart.body["subcategories"][0]["slug"], "tops");
}

#[tokio::test]
async fn skip_mode_never_modifies_existing_charts() {
    let app = spawn_app().await;
    let before = seed(&app).await;

    let res = app
        .post("/api/size-charts/import", json!({ "data": document("tees", 99.0) }))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["skipped"], 1);
    assert_eq!(res.body["results"][0], json!({ "slug": "tees", "status": "skipped" }));

    let after = app.get("/api/size-charts/tees").await.body;
    assert_eq!(after["name"], before["name"]);
    assert_eq!(after["updatedAt"], before["updatedAt"]);
    assert_eq!(after["rows"], before["rows"]);
}

#[tokio::test]
async fn overwrite_and_error_modes() {
    let app = spawn_app().await;
    seed(&app).await;

    let res = app
        .post(
            "/api/size-charts/import",
            json!({ "mode": "error", "data": document("tees", 40.0) }),
        )
        .await;
    assert_eq!(res.body["failed"], 1);
    assert!(res.body["results"][0]["error"].is_string());

    let res = app
        .post(
            "/api/size-charts/import",
            json!({ "mode": "overwrite", "data": document("tees", 40.0) }),
        )
        .await;
    assert_eq!(res.body["replaced"], 1, "{}", res.body);
    let chart = app.get("/api/size-charts/tees").await.body;
    assert_eq!(chart["name"], "Imported");
    assert_eq!(chart["columns"].as_array().map(Vec::len), Some(3));
    assert_eq!(chart["rows"][0]["cells"][0]["value"]["key"], "SIZE_SM");
    assert_eq!(chart["rows"][0]["cells"][1]["value"]["cm"], 101.6);
    assert_eq!(chart["rows"][1]["cells"][0]["value"]["text"], "Custom");
    assert_eq!(chart["measurementInstructions"][0]["key"], "CHEST");
}

#[tokio::test]
async fn unresolved_references_fail_only_that_item() {
    let app = spawn_app().await;
    seed(&app).await;
    let mut doc = document("fresh", 40.0);
    let mut broken = doc["charts"][0].clone();
    broken["slug"] = json!("broken");
    broken["rows"][0]["Size"] = json!({ "labelKey": "SIZE_UNKNOWN" });
    doc["charts"].as_array_mut().unwrap().push(broken);

    let res = app
        .post("/api/size-charts/import", json!({ "data": doc }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["created"], 1);
    assert_eq!(res.body["failed"], 1);
    assert_eq!(res.body["results"][1]["slug"], "broken");
    assert_eq!(app.get("/api/size-charts/broken").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_documents_are_rejected_whole() {
    let app = spawn_app().await;
    let mut doc = document("fresh", 40.0);
    doc["charts"][0]["rows"][0]["Hip"] = json!(40);
    let res = app
        .post("/api/size-charts/import", json!({ "data": doc }))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post(
            "/api/size-charts/import",
            json!({ "mode": "merge", "data": document("fresh", 40.0) }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/api/size-charts/fresh").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn overwrite_cannot_replace_protected_demo_charts() {
    let app = spawn_with(Config {
        demo_mode: true,
        demo_reset_token: Some("secret".into()),
        ..Config::default()
    })
    .await;
    let reset = app
        .send(Method::POST, "/api/demo/reset", None, &[("authorization", "Bearer secret")])
        .await;
    assert_eq!(reset.status, StatusCode::OK);

    let doc = json!({
        "version": "1.0",
        "charts": [{
            "name": "Hacked",
            "slug": "mens-tops",
            "columns": [{ "name": "Size", "type": "TEXT" }],
            "rows": [{ "Size": "S" }]
        }]
    });
    let res = app
        .post("/api/size-charts/import", json!({ "mode": "overwrite", "data": doc }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["replaced"], 0);
    assert_eq!(res.body["failed"], 1);
    assert!(res.body["results"][0]["error"].as_str().unwrap().contains("protected"));

    let chart = app.get("/api/size-charts/mens-tops").await;
    assert_eq!(chart.body["name"], "Men's Tops");
}
