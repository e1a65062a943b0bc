//! HTTP 路由：管理端 `/api/*` 与公共只读接口 `/api/v1/*`。

pub mod admin;
pub mod health;
pub mod middleware;
pub mod v1;

use crate::config::Config;
use crate::state::SharedState;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;
use log::warn;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn build_router(state: SharedState) -> Router {
    // 最后添加的 layer 最先执行：CORS -> 限流 -> 鉴权
    let public = v1::routes()
        .layer(from_fn_with_state(state.clone(), middleware::authenticate))
        .layer(from_fn_with_state(state.clone(), middleware::rate_limit))
        .layer(cors_layer(&state.config));

    Router::new()
        .route("/health", get(health::health))
        .merge(admin::routes())
        .nest("/api/v1", public)
        .layer(from_fn(middleware::access_log))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = &config.cors_allowed_origins;
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let list: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("⚠ 忽略无效的 CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(middleware::auth::API_KEY_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("retry-after"),
        ])
        .max_age(Duration::from_secs(60 * 60))
}
