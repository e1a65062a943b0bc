use crate::errors::{AppError, AppResult};
use crate::state::SharedState;
use crate::storage::repository::SizeChartDto;
use crate::templates::{
    apply_template, find_template, ApplyTemplateInput, TemplateDetailDto, TemplateSummaryDto,
    TEMPLATES,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list() -> Json<Vec<TemplateSummaryDto>> {
    Json(TEMPLATES.iter().map(TemplateSummaryDto::from).collect())
}

pub async fn get_one(Path(id): Path<String>) -> AppResult<Json<TemplateDetailDto>> {
    let template = find_template(&id).ok_or_else(|| AppError::not_found("template"))?;
    Ok(Json(TemplateDetailDto::from(template)))
}

pub async fn apply(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Option<Json<ApplyTemplateInput>>,
) -> AppResult<(StatusCode, Json<SizeChartDto>)> {
    let input = payload.map(|Json(i)| i).unwrap_or_default();
    let chart = apply_template(&state.db, &id, input).await?;
    Ok((StatusCode::CREATED, Json(chart)))
}
