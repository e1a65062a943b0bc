#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sizechart::api::build_router;
use sizechart::config::Config;
use sizechart::state::{AppState, SharedState};
use sizechart::storage::establish_connection;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: SharedState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn spawn_app() -> TestApp {
    spawn_with(Config::default()).await
}

pub async fn spawn_with(config: Config) -> TestApp {
    let db = establish_connection("sqlite::memory:")
        .await
        .expect("in-memory database");
    let state = AppState::new(
        db,
        Config {
            database_url: "sqlite::memory:".into(),
            ..config
        },
    );
    TestApp {
        router: build_router(state.clone()),
        state,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, &[]).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), &[]).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), &[]).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, &[]).await
    }

    /// 返回 (category id, subcategory id)
    pub async fn category_with_sub(&self, category: &str, sub: &str) -> (i64, i64) {
        let cat = self.post("/api/categories", json!({ "name": category })).await;
        assert_eq!(cat.status, StatusCode::CREATED, "{}", cat.body);
        let cat_id = cat.body["id"].as_i64().unwrap();
        let sub = self
            .post(
                &format!("/api/categories/{}/subcategories", cat_id),
                json!({ "name": sub }),
            )
            .await;
        assert_eq!(sub.status, StatusCode::CREATED, "{}", sub.body);
        (cat_id, sub.body["id"].as_i64().unwrap())
    }

    pub async fn label(&self, key: &str, display: &str, label_type: &str) -> i64 {
        let res = self
            .post(
                "/api/labels",
                json!({ "key": key, "displayValue": display, "labelType": label_type }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["id"].as_i64().unwrap()
    }

    /// 两列两行的简单尺码表
    pub async fn simple_chart(&self, slug: &str, subcategory_ids: &[i64], published: bool) -> Value {
        let res = self
            .post(
                "/api/size-charts",
                json!({
                    "name": format!("Chart {}", slug),
                    "slug": slug,
                    "isPublished": published,
                    "subcategoryIds": subcategory_ids,
                    "columns": [
                        { "name": "Size", "columnType": "TEXT" },
                        { "name": "Chest", "columnType": "MEASUREMENT" }
                    ],
                    "rows": [
                        { "cells": [ { "type": "text", "text": "S" }, { "type": "measurement", "inches": 34 } ] },
                        { "cells": [ { "type": "text", "text": "M" }, { "type": "range", "minInches": 36, "maxInches": 38 } ] }
                    ]
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body
    }
}
