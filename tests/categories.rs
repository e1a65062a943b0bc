mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::spawn_app;

#[tokio::test]
async fn create_then_fetch_returns_same_name_and_slug() {
    let app = spawn_app().await;
    let res = app
        .post("/api/categories", json!({ "name": "Men's Wear" }))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["slug"], "mens-wear");
    let id = res.body["id"].as_i64().unwrap();

    let fetched = app.get(&format!("/api/categories/{}", id)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Men's Wear");
    assert_eq!(fetched.body["slug"], "mens-wear");

    let list = app.get("/api/categories").await;
    assert_eq!(list.body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn duplicate_slugs_conflict() {
    let app = spawn_app().await;
    app.post("/api/categories", json!({ "name": "Women", "slug": "womens" }))
        .await;
    let res = app
        .post("/api/categories", json!({ "name": "Other", "slug": "womens" }))
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.body["error"].as_str().unwrap().contains("womens"));

    let bad = app
        .post("/api/categories", json!({ "name": "X", "slug": "Not A Slug" }))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_rejected_with_error_envelope() {
    let app = spawn_app().await;
    let res = app.post("/api/categories", json!({ "slug": "x" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].is_string());
}

#[tokio::test]
async fn deleting_subcategory_with_charts_is_blocked_unless_reassigned() {
    let app = spawn_app().await;
    let (_, tops) = app.category_with_sub("Men", "Tops").await;
    let (_, shirts) = app.category_with_sub("Women", "Shirts").await;
    let chart = app.simple_chart("tees", &[tops], true).await;

    let blocked = app.delete(&format!("/api/subcategories/{}", tops)).await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);

    let same = app
        .delete(&format!("/api/subcategories/{}?reassignTo={}", tops, tops))
        .await;
    assert_eq!(same.status, StatusCode::BAD_REQUEST);

    let moved = app
        .delete(&format!("/api/subcategories/{}?reassignTo={}", tops, shirts))
        .await;
    assert_eq!(moved.status, StatusCode::NO_CONTENT);

    let fetched = app
        .get(&format!("/api/size-charts/{}", chart["id"]))
        .await;
    assert_eq!(fetched.body["subcategories"][0]["id"], shirts);
    assert_eq!(fetched.body["subcategories"][0]["category"]["slug"], "women");
}

#[tokio::test]
async fn deleting_category_requires_target_outside_it() {
    let app = spawn_app().await;
    let (men, tops) = app.category_with_sub("Men", "Tops").await;
    let bottoms = app
        .post(
            &format!("/api/categories/{}/subcategories", men),
            json!({ "name": "Bottoms" }),
        )
        .await
        .body["id"]
        .as_i64()
        .unwrap();
    let (_, kids_tops) = app.category_with_sub("Kids", "Tops").await;
    app.simple_chart("tees", &[tops], true).await;

    let blocked = app.delete(&format!("/api/categories/{}", men)).await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);

    let inside = app
        .delete(&format!("/api/categories/{}?reassignTo={}", men, bottoms))
        .await;
    assert_eq!(inside.status, StatusCode::BAD_REQUEST);

    let ok = app
        .delete(&format!("/api/categories/{}?reassignTo={}", men, kids_tops))
        .await;
    assert_eq!(ok.status, StatusCode::NO_CONTENT);

    let missing = app.get(&format!("/api/categories/{}", men)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let tree = app.get("/api/categories").await;
    assert_eq!(tree.body[0]["subcategories"][0]["chartCount"], 1);
}

#[tokio::test]
async fn subcategory_slugs_are_unique_per_category() {
    let app = spawn_app().await;
    let (men, _) = app.category_with_sub("Men", "Tops").await;
    let dup = app
        .post(
            &format!("/api/categories/{}/subcategories", men),
            json!({ "name": "Tops" }),
        )
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    // 其他分类下可以重名
    app.category_with_sub("Women", "Tops").await;
}
