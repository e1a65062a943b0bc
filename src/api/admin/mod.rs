//! 管理端 JSON 接口，供后台页面使用。

pub mod api_keys;
pub mod categories;
pub mod demo;
pub mod instructions;
pub mod labels;
pub mod size_charts;
pub mod templates;

use crate::state::SharedState;
use axum::routing::{get, post, put};
use axum::Router;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/categories", get(categories::list).post(categories::create))
        .route(
            "/api/categories/:id",
            get(categories::get_one)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/api/categories/:id/subcategories",
            post(categories::create_subcategory),
        )
        .route(
            "/api/subcategories/:id",
            put(categories::update_subcategory).delete(categories::delete_subcategory),
        )
        .route("/api/labels", get(labels::list).post(labels::create))
        .route("/api/labels/:id", put(labels::update).delete(labels::delete))
        .route(
            "/api/instructions",
            get(instructions::list).post(instructions::create),
        )
        .route(
            "/api/instructions/:id",
            put(instructions::update).delete(instructions::delete),
        )
        .route(
            "/api/size-charts",
            get(size_charts::list).post(size_charts::create),
        )
        .route("/api/size-charts/export", get(size_charts::export))
        .route("/api/size-charts/import", post(size_charts::import))
        .route(
            "/api/size-charts/:id",
            get(size_charts::get_one)
                .put(size_charts::update)
                .delete(size_charts::delete),
        )
        .route("/api/size-charts/:id/duplicate", post(size_charts::duplicate))
        .route("/api/templates", get(templates::list))
        .route("/api/templates/:id", get(templates::get_one))
        .route("/api/templates/:id/apply", post(templates::apply))
        .route("/api/api-keys", get(api_keys::list).post(api_keys::create))
        .route("/api/api-keys/:id", axum::routing::delete(api_keys::revoke))
        .route("/api/demo/reset", post(demo::reset))
        .route("/api/demo/status", get(demo::status))
}
