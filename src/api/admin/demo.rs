use crate::errors::{AppError, AppResult};
use crate::state::SharedState;
use crate::templates::{reset_demo_data, DemoSummary};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use log::warn;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoStatus {
    pub demo_mode: bool,
    pub last_reset_at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    #[serde(flatten)]
    pub summary: DemoSummary,
    pub reset_at: i64,
}

pub async fn reset(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> AppResult<Json<ResetResponse>> {
    if !state.config.demo_mode {
        return Err(AppError::not_found("demo mode"));
    }
    let expected = state.config.demo_reset_token.as_deref();
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);
    match (expected, bearer) {
        (Some(token), Some(given)) if token == given => {}
        _ => {
            warn!("⚠ 演示数据重置请求的令牌无效");
            return Err(AppError::Unauthorized("invalid demo reset token".into()));
        }
    }
    let summary = reset_demo_data(&state.db).await?;
    let reset_at = Utc::now().timestamp();
    state.demo.record(reset_at).await;
    Ok(Json(ResetResponse { summary, reset_at }))
}

pub async fn status(State(state): State<SharedState>) -> Json<DemoStatus> {
    Json(DemoStatus {
        demo_mode: state.config.demo_mode,
        last_reset_at: state.demo.last_reset_at().await,
    })
}
