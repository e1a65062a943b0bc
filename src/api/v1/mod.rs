//! 公共只读接口，供店铺前端与嵌入脚本调用。

pub mod categories;
pub mod labels;
pub mod size_charts;

use crate::state::SharedState;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

/// 公共接口统一的 `{ "data": ... }` 包装
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/size-charts", get(size_charts::list))
        .route("/size-charts/:slug", get(size_charts::get_by_slug))
        .route("/categories", get(categories::list))
        .route("/labels", get(labels::list))
}
