use crate::errors::{AppError, AppResult};
use crate::services::charts::DuplicateInput;
use crate::services::{ChartInput, ChartService};
use crate::state::SharedState;
use crate::storage::repository::{ChartFilter, SizeChartDto, SizeChartRepository, SizeChartSummaryDto};
use crate::templates::is_protected;
use crate::transfer::{export_charts, import_charts, ExportDocument, ImportReport, ImportRequest};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// 逗号分隔的 id 列表
    #[serde(default)]
    pub ids: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<SizeChartSummaryDto>>> {
    let Query(query) = query?;
    let filter = ChartFilter {
        category: query.category,
        subcategory: query.subcategory,
        published_only: query.published.unwrap_or(false),
        ..Default::default()
    };
    let mut summaries = SizeChartRepository::summaries(&state.db, &filter).await?;
    if query.published == Some(false) {
        summaries.retain(|s| !s.is_published);
    }
    Ok(Json(summaries))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<ChartInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SizeChartDto>)> {
    let Json(input) = payload?;
    let chart = ChartService::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(chart)))
}

/// 纯数字按 id 查找，否则按 slug
pub async fn get_one(
    State(state): State<SharedState>,
    Path(id_or_slug): Path<String>,
) -> AppResult<Json<SizeChartDto>> {
    let chart = SizeChartRepository::find_by_id_or_slug(&state.db, &id_or_slug)
        .await?
        .ok_or_else(|| AppError::not_found("size chart"))?;
    Ok(Json(SizeChartRepository::load_graph(&state.db, chart).await?))
}

/// 演示模式下模板生成的尺码表只读
async fn ensure_editable(state: &SharedState, id: i32) -> AppResult<()> {
    if !state.config.demo_mode {
        return Ok(());
    }
    let chart = SizeChartRepository::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("size chart"))?;
    if is_protected(&chart.slug) {
        return Err(AppError::Forbidden(format!(
            "{} is a protected demo chart; duplicate it to make changes",
            chart.slug
        )));
    }
    Ok(())
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    payload: Result<Json<ChartInput>, JsonRejection>,
) -> AppResult<Json<SizeChartDto>> {
    let Json(input) = payload?;
    ensure_editable(&state, id).await?;
    Ok(Json(ChartService::update(&state.db, id, input).await?))
}

pub async fn delete(State(state): State<SharedState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    ensure_editable(&state, id).await?;
    ChartService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn duplicate(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    payload: Option<Json<DuplicateInput>>,
) -> AppResult<(StatusCode, Json<SizeChartDto>)> {
    let input = payload.map(|Json(i)| i).unwrap_or_default();
    let chart = ChartService::duplicate(&state.db, id, input).await?;
    Ok((StatusCode::CREATED, Json(chart)))
}

pub async fn export(
    State(state): State<SharedState>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> AppResult<Json<ExportDocument>> {
    let Query(query) = query?;
    let ids = match query.ids.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.split(',')
                .map(|s| {
                    s.trim()
                        .parse::<i32>()
                        .map_err(|_| AppError::validation(format!("invalid id: {:?}", s)))
                })
                .collect::<AppResult<Vec<_>>>()?,
        ),
        None => None,
    };
    Ok(Json(export_charts(&state.db, ids).await?))
}

pub async fn import(
    State(state): State<SharedState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> AppResult<Json<ImportReport>> {
    let Json(request) = payload?;
    Ok(Json(import_charts(&state.db, request, state.config.demo_mode).await?))
}
