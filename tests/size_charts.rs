mod support;

use axum::http::StatusCode;
use serde_json::json;
use sizechart::config::Config;
use sizechart::templates::reset_demo_data;
use support::{spawn_app, spawn_with};

#[tokio::test]
async fn cm_is_derived_from_inches_on_write() {
    let app = spawn_app().await;
    let sm = app.label("SIZE_SM", "SM", "ALPHA").await;
    let res = app
        .post(
            "/api/size-charts",
            json!({
                "name": "Tees",
                "columns": [
                    { "name": "Size", "columnType": "SIZE_LABEL", "labelType": "ALPHA" },
                    { "name": "Chest", "columnType": "MEASUREMENT" },
                    { "name": "Waist", "columnType": "MEASUREMENT" }
                ],
                "rows": [{ "cells": [
                    { "type": "label", "labelId": sm },
                    { "type": "measurement", "inches": 34, "cm": 10 },
                    { "type": "range", "minCm": 76.2, "maxCm": 81.28 }
                ]}]
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    assert_eq!(res.body["slug"], "tees");
    assert_eq!(res.body["isPublished"], false);

    let cells = &res.body["rows"][0]["cells"];
    assert_eq!(cells[0]["value"]["type"], "label");
    assert_eq!(cells[0]["value"]["displayValue"], "SM");
    // 同时提交时以英寸为准
    assert_eq!(cells[1]["value"]["inches"], 34.0);
    assert_eq!(cells[1]["value"]["cm"], 86.4);
    assert_eq!(cells[2]["value"]["min"]["inches"], 30.0);
    assert_eq!(cells[2]["value"]["max"]["inches"], 32.0);
    assert_eq!(cells[2]["value"]["max"]["cm"], 81.3);
}

#[tokio::test]
async fn replace_on_update_keeps_retained_ids() {
    let app = spawn_app().await;
    let chart = app.simple_chart("tees", &[], false).await;
    let id = chart["id"].as_i64().unwrap();
    let size_col = chart["columns"][0]["id"].clone();
    let chest_col = chart["columns"][1]["id"].clone();
    let first_row = chart["rows"][0]["id"].clone();

    let res = app
        .put(
            &format!("/api/size-charts/{}", id),
            json!({
                "name": "Tees",
                "isPublished": true,
                "columns": [
                    { "id": chest_col, "name": "Chest", "columnType": "MEASUREMENT" },
                    { "id": size_col, "name": "Size", "columnType": "TEXT" },
                    { "name": "Length", "columnType": "MEASUREMENT" }
                ],
                "rows": [
                    { "id": first_row, "cells": [
                        { "type": "measurement", "inches": 35 },
                        { "type": "text", "text": "S" },
                        { "type": "measurement", "inches": 27 }
                    ]},
                    { "cells": [
                        { "type": "empty" },
                        { "type": "text", "text": "L" },
                        { "type": "empty" }
                    ]}
                ]
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    let body = res.body;
    assert_eq!(body["slug"], "tees");
    assert_eq!(body["isPublished"], true);
    assert_eq!(body["columns"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["columns"][0]["id"], chest_col);
    assert_eq!(body["columns"][0]["displayOrder"], 0);
    assert_eq!(body["columns"][1]["id"], size_col);
    assert_eq!(body["rows"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["rows"][0]["id"], first_row);
    assert_eq!(body["rows"][0]["cells"][0]["value"]["inches"], 35.0);
    assert_eq!(body["rows"][0]["cells"][2]["value"]["cm"], 68.6);
    assert_eq!(body["rows"][1]["cells"][0]["value"]["type"], "empty");
    assert_ne!(body["rows"][1]["id"], chart["rows"][1]["id"]);
}

#[tokio::test]
async fn invalid_graphs_are_rejected() {
    let app = spawn_app().await;
    let other = app.simple_chart("other", &[], false).await;
    let chart = app.simple_chart("tees", &[], false).await;
    let id = chart["id"].as_i64().unwrap();

    let short_row = app
        .put(
            &format!("/api/size-charts/{}", id),
            json!({
                "name": "Tees",
                "columns": [{ "name": "Size", "columnType": "TEXT" }],
                "rows": [{ "cells": [] }]
            }),
        )
        .await;
    assert_eq!(short_row.status, StatusCode::BAD_REQUEST);

    let foreign_row = app
        .put(
            &format!("/api/size-charts/{}", id),
            json!({
                "name": "Tees",
                "columns": [{ "name": "Size", "columnType": "TEXT" }],
                "rows": [{ "id": other["rows"][0]["id"], "cells": [{ "type": "empty" }] }]
            }),
        )
        .await;
    assert_eq!(foreign_row.status, StatusCode::BAD_REQUEST);

    let unknown_label = app
        .post(
            "/api/size-charts",
            json!({
                "name": "Bad",
                "columns": [{ "name": "Size", "columnType": "SIZE_LABEL" }],
                "rows": [{ "cells": [{ "type": "label", "labelId": 999 }] }]
            }),
        )
        .await;
    assert_eq!(unknown_label.status, StatusCode::BAD_REQUEST);

    let inverted = app
        .post(
            "/api/size-charts",
            json!({
                "name": "Bad",
                "columns": [{ "name": "Chest", "columnType": "MEASUREMENT" }],
                "rows": [{ "cells": [{ "type": "range", "minInches": 40, "maxInches": 30 }] }]
            }),
        )
        .await;
    assert_eq!(inverted.status, StatusCode::BAD_REQUEST);

    let taken = app
        .post(
            "/api/size-charts",
            json!({
                "name": "Dup",
                "slug": "tees",
                "columns": [{ "name": "Size", "columnType": "TEXT" }]
            }),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn fetch_by_id_or_slug_and_delete() {
    let app = spawn_app().await;
    let chart = app.simple_chart("tees", &[], false).await;
    let by_slug = app.get("/api/size-charts/tees").await;
    assert_eq!(by_slug.body["id"], chart["id"]);
    let by_id = app.get(&format!("/api/size-charts/{}", chart["id"])).await;
    assert_eq!(by_id.body["slug"], "tees");

    let deleted = app.delete(&format!("/api/size-charts/{}", chart["id"])).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/api/size-charts/tees").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.delete(&format!("/api/size-charts/{}", chart["id"])).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn duplicate_creates_unpublished_copy() {
    let app = spawn_app().await;
    let (_, tops) = app.category_with_sub("Men", "Tops").await;
    let chart = app.simple_chart("tees", &[tops], true).await;

    let copy = app
        .post(&format!("/api/size-charts/{}/duplicate", chart["id"]), json!({}))
        .await;
    assert_eq!(copy.status, StatusCode::CREATED, "{}", copy.body);
    assert_eq!(copy.body["slug"], "tees-copy");
    assert_eq!(copy.body["name"], "Chart tees (copy)");
    assert_eq!(copy.body["isPublished"], false);
    assert_eq!(copy.body["rows"][1]["cells"][1]["value"]["min"]["inches"], 36.0);
    assert_eq!(copy.body["subcategories"][0]["id"], tops);
    assert_ne!(copy.body["rows"][0]["id"], chart["rows"][0]["id"]);

    let again = app
        .post(&format!("/api/size-charts/{}/duplicate", chart["id"]), json!({}))
        .await;
    assert_eq!(again.body["slug"], "tees-copy-2");
}

#[tokio::test]
async fn list_filters_by_category_and_published() {
    let app = spawn_app().await;
    let (_, tops) = app.category_with_sub("Men", "Tops").await;
    let (_, dresses) = app.category_with_sub("Women", "Dresses").await;
    app.simple_chart("tees", &[tops], true).await;
    app.simple_chart("polos", &[tops], false).await;
    app.simple_chart("gowns", &[dresses], true).await;

    let all = app.get("/api/size-charts").await;
    assert_eq!(all.body.as_array().map(Vec::len), Some(3));
    let men = app.get("/api/size-charts?category=men").await;
    assert_eq!(men.body.as_array().map(Vec::len), Some(2));
    let published = app.get("/api/size-charts?category=men&published=true").await;
    assert_eq!(published.body[0]["slug"], "tees");
    assert_eq!(published.body[0]["columnCount"], 2);
    assert_eq!(published.body[0]["rowCount"], 2);
    let drafts = app.get("/api/size-charts?published=false").await;
    assert_eq!(drafts.body[0]["slug"], "polos");
}

#[tokio::test]
async fn demo_mode_protects_template_charts() {
    let app = spawn_with(Config {
        demo_mode: true,
        ..Config::default()
    })
    .await;
    reset_demo_data(&app.state.db).await.unwrap();

    let chart = app.get("/api/size-charts/mens-tops").await;
    assert_eq!(chart.status, StatusCode::OK);
    let id = chart.body["id"].as_i64().unwrap();

    let del = app.delete(&format!("/api/size-charts/{}", id)).await;
    assert_eq!(del.status, StatusCode::FORBIDDEN);
    let put = app
        .put(
            &format!("/api/size-charts/{}", id),
            json!({ "name": "Hacked", "columns": [{ "name": "Size", "columnType": "TEXT" }] }),
        )
        .await;
    assert_eq!(put.status, StatusCode::FORBIDDEN);

    // 复制后的副本可以自由编辑
    let copy = app
        .post(&format!("/api/size-charts/{}/duplicate", id), json!({}))
        .await;
    let copy_id = copy.body["id"].as_i64().unwrap();
    let del = app.delete(&format!("/api/size-charts/{}", copy_id)).await;
    assert_eq!(del.status, StatusCode::NO_CONTENT);
}
